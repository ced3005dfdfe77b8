use crate::config::Config;
use crate::error::{GazeError, Result};
use crate::mappings::KeyNames;
use crate::services::shutdown::{ShutdownReason, ShutdownSignal};
use crate::utils::DeviceFinder;
use evdev::{Device, KeyCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::TerminationWatcher;

/// Опрос состояния клавиши завершения на клавиатурном evdev устройстве.
/// Устройство не захватывается: ввод продолжает идти в окно игры.
pub struct HotkeyWatcher {
    device: Device,
    quit_key: KeyCode,
    poll_interval: Duration,
}

impl HotkeyWatcher {
    pub fn new(config: &Config) -> Result<Self> {
        let quit_key = KeyNames::resolve_evdev(&config.input.quit_key).ok_or_else(|| {
            GazeError::Internal(format!("Неизвестная клавиша завершения: {}", config.input.quit_key))
        })?;

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path, quit_key)?;
        let device = Device::open(&device_path).map_err(|e| {
            GazeError::DeviceNotFound(format!("Не удалось открыть устройство {:?}: {}", device_path, e))
        })?;

        info!(
            "Горячая клавиша завершения {:?} на устройстве {}",
            quit_key,
            device.name().unwrap_or("Unknown")
        );

        Ok(Self {
            device,
            quit_key,
            poll_interval: config.poll_interval(),
        })
    }
}

#[async_trait::async_trait]
impl TerminationWatcher for HotkeyWatcher {
    async fn run(self: Box<Self>, shutdown: Arc<ShutdownSignal>) -> Result<()> {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut failures = 0u32;

        while !shutdown.is_triggered() {
            ticker.tick().await;

            match self.device.get_key_state() {
                Ok(state) => {
                    failures = 0;
                    if state.contains(self.quit_key) {
                        debug!("Нажата клавиша завершения {:?}", self.quit_key);
                        shutdown.trigger(ShutdownReason::Hotkey);
                    }
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    if failures == 1 {
                        warn!("Не удалось прочитать состояние клавиатуры: {}", e);
                    }
                }
            }
        }

        Ok(())
    }
}
