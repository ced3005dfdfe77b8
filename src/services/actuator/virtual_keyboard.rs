use crate::error::{GazeError, Result};
use crate::events::{KeyCode, KeyFlags};
use parking_lot::Mutex;
use tracing::{debug, info};

const EV_SYN: i32 = 0;
const EV_KEY: i32 = 1;

/// Виртуальная клавиатура uinput для инъекции нажатий в целевое окно
pub struct VirtualKeyboard {
    device: Mutex<uinput::Device>,
    device_name: String,
}

impl VirtualKeyboard {
    pub fn new(device_name: &str) -> Result<Self> {
        info!("Создание виртуального устройства uinput '{}' для инъекции клавиш", device_name);

        let device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| {
                GazeError::Internal(format!(
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);

        Ok(Self {
            device: Mutex::new(device),
            device_name: device_name.to_string(),
        })
    }

    pub fn send(&self, code: KeyCode, flags: KeyFlags) -> Result<()> {
        let mut device = self.device.lock();
        let keycode = code.value() as i32;

        device.write(EV_KEY, keycode, flags.event_value()).map_err(|e| {
            GazeError::Actuator(format!("Не удалось отправить событие клавиши {}: {}", code, e))
        })?;

        // Синхронизируем события
        device
            .write(EV_SYN, 0, 0)
            .map_err(|e| GazeError::Actuator(format!("Не удалось синхронизировать события: {}", e)))?;

        debug!("Событие {:?} для {} отправлено", flags, code);
        Ok(())
    }
}

impl Drop for VirtualKeyboard {
    fn drop(&mut self) {
        info!("Закрытие виртуального устройства '{}'", self.device_name);
    }
}
