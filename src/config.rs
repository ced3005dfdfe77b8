use crate::mappings::KeyNames;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub window: WindowConfig,
    pub gaze: GazeConfig,
    pub dwell: DwellConfig,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    pub title: String,
    #[serde(default)]
    pub class: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GazeConfig {
    /// Адрес, на который источник взгляда шлёт UDP датаграммы
    pub bind_address: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DwellConfig {
    pub threshold_ms: u64,
    pub throttle_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
    pub forward_key: String,
    pub quit_key: String,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "full".to_string(),
            },
            window: WindowConfig {
                title: "Minecraft 1.9".to_string(),
                class: None,
            },
            gaze: GazeConfig {
                bind_address: "127.0.0.1:4242".to_string(),
            },
            dwell: DwellConfig {
                threshold_ms: 3000,
                throttle_ms: 16,
            },
            input: InputConfig {
                device_path: "auto".to_string(),
                forward_key: "w".to_string(),
                quit_key: ".".to_string(),
                poll_interval_ms: 16,
            },
        }
    }
}

impl Config {
    /// Загружает конфигурацию: встроенные значения, затем TOML файл (если есть),
    /// затем переменные окружения `GAZE_СЕКЦИЯ__КЛЮЧ`.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("GAZE_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "full" | "compact" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.window.title.trim().is_empty() {
            anyhow::bail!("window.title не может быть пустым");
        }

        self.gaze
            .bind_address
            .parse::<SocketAddr>()
            .with_context(|| format!("Неверный gaze.bind_address: {}", self.gaze.bind_address))?;

        // Валидация настроек задержки взгляда
        if self.dwell.threshold_ms == 0 {
            anyhow::bail!("threshold_ms должно быть больше 0");
        }

        if self.dwell.throttle_ms == 0 {
            anyhow::bail!("throttle_ms должно быть больше 0");
        }

        if !(1..=1000).contains(&self.input.poll_interval_ms) {
            anyhow::bail!("poll_interval_ms должно быть в диапазоне 1..=1000");
        }

        // Валидация клавиш
        if KeyNames::resolve(&self.input.forward_key).is_none() {
            anyhow::bail!("Неизвестная клавиша forward_key: '{}'", self.input.forward_key);
        }

        if KeyNames::resolve(&self.input.quit_key).is_none() {
            anyhow::bail!("Неизвестная клавиша quit_key: '{}'", self.input.quit_key);
        }

        Ok(())
    }

    pub fn dwell_threshold(&self) -> Duration {
        Duration::from_millis(self.dwell.threshold_ms)
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.dwell.throttle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.input.poll_interval_ms)
    }

    /// Адрес уже проверен в `validate`, поэтому здесь только разбор
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.gaze
            .bind_address
            .parse()
            .with_context(|| format!("Неверный gaze.bind_address: {}", self.gaze.bind_address))
    }
}
