//! Actuator service: responsibility and boundaries
//!
//! Only primitive output operations live here: reading and placing the cursor,
//! injecting key down/up. Deciding WHEN to move or press belongs to the dwell
//! tracker and the mode controller.

mod desktop;
mod dry_run;
mod virtual_keyboard;

pub use self::desktop::DesktopActuator;
pub use self::dry_run::DryRunActuator;
pub use self::virtual_keyboard::VirtualKeyboard;

use crate::error::Result;
use crate::events::{KeyCode, KeyFlags, ScreenPoint};
use crate::services::mode_controller::Mode;
use std::sync::Arc;

/// Примитивы вывода: курсор и клавиши
pub trait OutputActuator: Send + Sync {
    fn cursor_position(&self) -> Result<ScreenPoint>;
    fn set_cursor_position(&self, point: ScreenPoint) -> Result<()>;
    fn inject_key(&self, code: KeyCode, flags: KeyFlags) -> Result<()>;
}

/// Factory function to create an appropriate actuator based on the dry_run flag
pub fn create_actuator(mode: Mode, dry_run: bool) -> Result<Arc<dyn OutputActuator>> {
    if dry_run {
        Ok(Arc::new(DryRunActuator::new(ScreenPoint::new(400, 300))))
    } else {
        Ok(Arc::new(DesktopActuator::new(mode.injects_keys())?))
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::error::GazeError;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ActuatorCall {
        SetCursor(ScreenPoint),
        Key(KeyCode, KeyFlags),
    }

    /// Записывает все вызовы; курсор можно «сломать» для проверки пропуска отсчёта
    pub struct RecordingActuator {
        cursor: Mutex<ScreenPoint>,
        cursor_fails: Mutex<bool>,
        calls: Mutex<Vec<ActuatorCall>>,
    }

    impl RecordingActuator {
        pub fn new(cursor: ScreenPoint) -> Self {
            Self {
                cursor: Mutex::new(cursor),
                cursor_fails: Mutex::new(false),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn fail_cursor_queries(&self, fail: bool) {
            *self.cursor_fails.lock() = fail;
        }

        pub fn calls(&self) -> Vec<ActuatorCall> {
            self.calls.lock().clone()
        }

        pub fn key_calls(&self) -> Vec<KeyFlags> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    ActuatorCall::Key(_, flags) => Some(flags),
                    ActuatorCall::SetCursor(_) => None,
                })
                .collect()
        }
    }

    impl OutputActuator for RecordingActuator {
        fn cursor_position(&self) -> Result<ScreenPoint> {
            if *self.cursor_fails.lock() {
                return Err(GazeError::Actuator("cursor unavailable".to_string()));
            }
            Ok(*self.cursor.lock())
        }

        fn set_cursor_position(&self, point: ScreenPoint) -> Result<()> {
            *self.cursor.lock() = point;
            self.calls.lock().push(ActuatorCall::SetCursor(point));
            Ok(())
        }

        fn inject_key(&self, code: KeyCode, flags: KeyFlags) -> Result<()> {
            self.calls.lock().push(ActuatorCall::Key(code, flags));
            Ok(())
        }
    }
}
