use crate::error::Result;
use crate::gaze_error;
use crate::events::{KeyCode, KeyFlags, ScreenPoint};
use crate::utils::xdotool;
use tracing::info;

use super::{OutputActuator, VirtualKeyboard};

/// Курсор через xdotool, клавиши через uinput
pub struct DesktopActuator {
    keyboard: Option<VirtualKeyboard>,
}

impl DesktopActuator {
    pub fn new(with_keyboard: bool) -> Result<Self> {
        info!("Инициализация DesktopActuator (клавиатура: {})", with_keyboard);

        let keyboard = if with_keyboard {
            Some(VirtualKeyboard::new("Gaze-Dwell Virtual Keyboard")?)
        } else {
            None
        };

        Ok(Self { keyboard })
    }
}

impl OutputActuator for DesktopActuator {
    fn cursor_position(&self) -> Result<ScreenPoint> {
        let output = xdotool::run(&["getmouselocation", "--shell"])?;
        let vars = xdotool::parse_shell_vars(&output);

        match (xdotool::shell_int(&vars, "X"), xdotool::shell_int(&vars, "Y")) {
            (Some(x), Some(y)) => Ok(ScreenPoint::new(x, y)),
            _ => Err(gaze_error!(actuator, "Неожиданный вывод getmouselocation: '{}'", output)),
        }
    }

    fn set_cursor_position(&self, point: ScreenPoint) -> Result<()> {
        let x = point.x.to_string();
        let y = point.y.to_string();
        // "--" чтобы отрицательные координаты не считались флагами
        xdotool::run(&["mousemove", "--", &x, &y])?;
        Ok(())
    }

    fn inject_key(&self, code: KeyCode, flags: KeyFlags) -> Result<()> {
        match &self.keyboard {
            Some(keyboard) => keyboard.send(code, flags),
            None => Err(gaze_error!(actuator, "Виртуальная клавиатура не создана для режима")),
        }
    }
}
