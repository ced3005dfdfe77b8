use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор окна оконной системы (для X11 это XID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Прямоугольник окна в экранных координатах
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_geometry(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl fmt::Display for WindowRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}}} ({}x{})",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

/// Целевое окно: дескриптор и прямоугольник, снятый один раз при старте.
///
/// Прямоугольник больше не перечитывается. Если окно переместят или изменят
/// его размер, режим управления курсором продолжит работать со старой геометрией.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetWindow {
    pub handle: WindowHandle,
    pub rect: WindowRect,
}

impl TargetWindow {
    pub fn new(handle: WindowHandle, rect: WindowRect) -> Self {
        Self { handle, rect }
    }
}

impl fmt::Display for TargetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.handle, self.rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let rect = WindowRect::new(0, 0, 800, 600);
        assert_eq!(rect.width(), 800);
        assert_eq!(rect.height(), 600);
    }

    #[test]
    fn test_rect_from_geometry() {
        let rect = WindowRect::from_geometry(100, 40, 1280, 720);
        assert_eq!(rect, WindowRect::new(100, 40, 1380, 760));
        assert_eq!(rect.width(), 1280);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(WindowHandle(0x3a00007).to_string(), "0x3a00007");
    }
}
