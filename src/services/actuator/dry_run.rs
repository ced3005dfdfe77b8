use crate::error::Result;
use crate::events::{KeyCode, KeyFlags, ScreenPoint};
use parking_lot::Mutex;
use tracing::info;

use super::OutputActuator;

/// Курсор хранится в памяти, инъекции только логируются
pub struct DryRunActuator {
    cursor: Mutex<ScreenPoint>,
}

impl DryRunActuator {
    pub fn new(cursor: ScreenPoint) -> Self {
        info!("Dry-run режим - Actuator работает в режиме эмуляции");
        Self {
            cursor: Mutex::new(cursor),
        }
    }
}

impl OutputActuator for DryRunActuator {
    fn cursor_position(&self) -> Result<ScreenPoint> {
        Ok(*self.cursor.lock())
    }

    fn set_cursor_position(&self, point: ScreenPoint) -> Result<()> {
        let mut cursor = self.cursor.lock();
        if *cursor != point {
            info!("[DRY RUN] Курсор: {} -> {}", *cursor, point);
        }
        *cursor = point;
        Ok(())
    }

    fn inject_key(&self, code: KeyCode, flags: KeyFlags) -> Result<()> {
        info!("[DRY RUN] Клавиша {}: {:?}", code, flags);
        Ok(())
    }
}
