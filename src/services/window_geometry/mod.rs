//! WindowGeometry service: responsibility and boundaries
//!
//! This module is responsible ONLY for locating the target window and answering
//! geometry questions about it (bounding rectangle, screen -> client conversion).
//! The rectangle is resolved once at startup by the caller; nothing here caches
//! or refreshes it.

mod dry_run;
mod xdotool;

pub use self::dry_run::DryRunWindowGeometry;
pub use self::xdotool::XdotoolWindowGeometry;

use crate::error::Result;
use crate::events::{ClientPoint, ScreenPoint, WindowHandle, WindowRect};
use std::sync::Arc;

pub trait WindowGeometry: Send + Sync {
    /// Найти окно по точному заголовку и, если задан, классу
    fn find_window(&self, class: Option<&str>, title: &str) -> Result<Option<WindowHandle>>;
    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect>;
    fn screen_to_client(&self, handle: WindowHandle, point: ScreenPoint) -> Result<ClientPoint>;
}

/// Factory function to create an appropriate geometry provider based on the dry_run flag
pub fn create_window_geometry(dry_run: bool) -> Arc<dyn WindowGeometry> {
    if dry_run {
        Arc::new(DryRunWindowGeometry::new(WindowRect::new(0, 0, 800, 600)))
    } else {
        Arc::new(XdotoolWindowGeometry::new())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::error::GazeError;
    use parking_lot::Mutex;

    /// Окно с фиксированным прямоугольником; преобразование можно «сломать»
    pub struct FixedWindow {
        rect: WindowRect,
        conversion_fails: Mutex<bool>,
    }

    impl FixedWindow {
        pub fn new(rect: WindowRect) -> Self {
            Self {
                rect,
                conversion_fails: Mutex::new(false),
            }
        }

        pub fn fail_conversions(&self, fail: bool) {
            *self.conversion_fails.lock() = fail;
        }
    }

    impl WindowGeometry for FixedWindow {
        fn find_window(&self, _class: Option<&str>, _title: &str) -> Result<Option<WindowHandle>> {
            Ok(Some(WindowHandle(1)))
        }

        fn window_rect(&self, _handle: WindowHandle) -> Result<WindowRect> {
            Ok(self.rect)
        }

        fn screen_to_client(&self, _handle: WindowHandle, point: ScreenPoint) -> Result<ClientPoint> {
            if *self.conversion_fails.lock() {
                return Err(GazeError::WindowQuery("window gone".to_string()));
            }
            Ok(ClientPoint::new(
                point.x.saturating_sub(self.rect.left),
                point.y.saturating_sub(self.rect.top),
            ))
        }
    }
}
