use serde::{Deserialize, Serialize};
use std::fmt;

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<evdev::KeyCode> for KeyCode {
    fn from(key: evdev::KeyCode) -> Self {
        Self(key.code())
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Флаги инъекции клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyFlags {
    /// Нажатие с признаком расширенной клавиши
    ExtendedKeyDown,
    KeyUp,
}

impl KeyFlags {
    /// Значение для EV_KEY: 1 нажатие, 0 отпускание
    pub fn event_value(&self) -> i32 {
        match self {
            KeyFlags::ExtendedKeyDown => 1,
            KeyFlags::KeyUp => 0,
        }
    }
}
