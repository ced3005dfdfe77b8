use crate::error::{GazeError, Result};
use evdev::KeyCode;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct DeviceFinder;

impl DeviceFinder {
    /// Найти клавиатурное устройство, на котором есть нужная клавиша
    pub fn find_keyboard_device(device_path: &str, required_key: KeyCode) -> Result<PathBuf> {
        if device_path != "auto" {
            let path = PathBuf::from(device_path);
            return if path.exists() {
                info!("Используется указанное устройство: {:?}", path);
                Ok(path)
            } else {
                GazeError::device_not_found(format!("Указанное устройство не найдено: {:?}", path))
            };
        }

        info!("Начинаем автопоиск клавиатурного устройства...");

        if let Some(device) = Self::scan(Path::new("/dev/input/by-id"), required_key, |name| {
            name.ends_with("event-kbd")
        })? {
            info!("Найдено устройство по ID: {:?}", device);
            return Ok(device);
        }

        if let Some(device) = Self::scan(Path::new("/dev/input"), required_key, |name| {
            name.starts_with("event")
        })? {
            info!("Найдено устройство среди event устройств: {:?}", device);
            return Ok(device);
        }

        GazeError::device_not_found(
            "Не удалось найти подходящее клавиатурное устройство. \
             Убедитесь, что пользователь добавлен в группу 'input'",
        )
    }

    fn scan(
        dir: &Path,
        required_key: KeyCode,
        name_filter: impl Fn(&str) -> bool,
    ) -> Result<Option<PathBuf>> {
        if !dir.exists() {
            debug!("Директория {:?} не существует", dir);
            return Ok(None);
        }

        let entries = fs::read_dir(dir)
            .map_err(|e| GazeError::Permission(format!("Нет доступа к {:?}: {}", dir, e)))?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(&name_filter)
            })
            .collect();

        // Сортируем устройства по имени для стабильного выбора
        candidates.sort();

        Ok(candidates
            .into_iter()
            .find(|path| Self::is_keyboard_device(path, required_key)))
    }

    fn is_keyboard_device(device_path: &Path, required_key: KeyCode) -> bool {
        match evdev::Device::open(device_path) {
            Ok(device) => {
                let device_name = device.name().unwrap_or("Unknown").to_lowercase();

                // Исключаем мыши по имени устройства
                if is_pointer_name(&device_name) {
                    debug!("Исключаем устройство как мышь/тачпад: {:?} ({})", device_path, device_name);
                    return false;
                }

                let suitable = device.supported_keys().is_some_and(|keys| {
                    keys.contains(required_key)
                        && keys.contains(KeyCode::KEY_A)
                        && keys.contains(KeyCode::KEY_SPACE)
                });

                debug!("Устройство {:?} ({}) подходит: {}", device_path, device_name, suitable);
                suitable
            }
            Err(e) => {
                debug!("Не удалось открыть устройство {:?}: {}", device_path, e);
                false
            }
        }
    }
}

fn is_pointer_name(name: &str) -> bool {
    ["mouse", "touchpad", "trackpoint", "deathadder"]
        .iter()
        .any(|marker| name.contains(marker))
}
