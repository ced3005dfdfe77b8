use crate::error::Result;
use crate::events::{ClientPoint, ScreenPoint, WindowHandle, WindowRect};
use tracing::info;

use super::WindowGeometry;

const DRY_RUN_HANDLE: WindowHandle = WindowHandle(0xd12);

/// Эмулируемое окно с заранее заданным прямоугольником
pub struct DryRunWindowGeometry {
    rect: WindowRect,
}

impl DryRunWindowGeometry {
    pub fn new(rect: WindowRect) -> Self {
        Self { rect }
    }
}

impl WindowGeometry for DryRunWindowGeometry {
    fn find_window(&self, class: Option<&str>, title: &str) -> Result<Option<WindowHandle>> {
        info!(
            "Dry-run: эмулируем окно \"{}\" (класс: {})",
            title,
            class.unwrap_or("любой")
        );
        Ok(Some(DRY_RUN_HANDLE))
    }

    fn window_rect(&self, _handle: WindowHandle) -> Result<WindowRect> {
        Ok(self.rect)
    }

    fn screen_to_client(&self, _handle: WindowHandle, point: ScreenPoint) -> Result<ClientPoint> {
        Ok(ClientPoint::new(
            point.x.saturating_sub(self.rect.left),
            point.y.saturating_sub(self.rect.top),
        ))
    }
}
