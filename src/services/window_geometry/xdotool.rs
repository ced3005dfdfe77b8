use crate::error::Result;
use crate::gaze_error;
use crate::events::{ClientPoint, ScreenPoint, WindowHandle, WindowRect};
use crate::utils::xdotool;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

use super::WindowGeometry;

/// Прямоугольник окна запрашивается один раз; дальше пересчёт координат
/// идёт по запомненному значению без запуска xdotool на каждый отсчёт
pub struct XdotoolWindowGeometry {
    known: Mutex<HashMap<WindowHandle, WindowRect>>,
}

impl XdotoolWindowGeometry {
    pub fn new() -> Self {
        Self {
            known: Mutex::new(HashMap::new()),
        }
    }

    fn remember(&self, handle: WindowHandle, rect: WindowRect) {
        self.known.lock().insert(handle, rect);
    }

    fn known_rect(&self, handle: WindowHandle) -> Result<WindowRect> {
        if let Some(rect) = self.known.lock().get(&handle) {
            return Ok(*rect);
        }
        let rect = self.geometry(handle)?;
        self.remember(handle, rect);
        Ok(rect)
    }

    /// X, Y, WIDTH, HEIGHT окна из `getwindowgeometry --shell`
    fn geometry(&self, handle: WindowHandle) -> Result<WindowRect> {
        let id = handle.0.to_string();
        let output = xdotool::run(&["getwindowgeometry", "--shell", &id])
            .map_err(|e| gaze_error!(window_query, "{}: {}", handle, e))?;
        parse_geometry(&output)
            .ok_or_else(|| gaze_error!(window_query, "Неожиданный вывод getwindowgeometry: '{}'", output))
    }
}

impl Default for XdotoolWindowGeometry {
    fn default() -> Self {
        Self::new()
    }
}

/// Заголовок должен совпасть целиком, а не подстрокой
fn title_pattern(title: &str) -> String {
    let mut pattern = String::with_capacity(title.len() + 2);
    pattern.push('^');
    for c in title.chars() {
        if "\\.^$|?*+()[]{}".contains(c) {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('$');
    pattern
}

fn search_args<'a>(class: Option<&'a str>, pattern: &'a str) -> Vec<&'a str> {
    match class {
        Some(class) => vec!["search", "--all", "--class", class, "--name", pattern],
        None => vec!["search", "--name", pattern],
    }
}

fn parse_geometry(output: &str) -> Option<WindowRect> {
    let vars = xdotool::parse_shell_vars(output);
    Some(WindowRect::from_geometry(
        xdotool::shell_int(&vars, "X")?,
        xdotool::shell_int(&vars, "Y")?,
        xdotool::shell_int(&vars, "WIDTH")?,
        xdotool::shell_int(&vars, "HEIGHT")?,
    ))
}

impl WindowGeometry for XdotoolWindowGeometry {
    fn find_window(&self, class: Option<&str>, title: &str) -> Result<Option<WindowHandle>> {
        let pattern = title_pattern(title);
        let args = search_args(class, &pattern);
        debug!("Поиск окна через xdotool: {:?}", args);

        // xdotool search завершается с ошибкой, если ничего не нашёл
        let output = match xdotool::run(&args) {
            Ok(output) => output,
            Err(e) => {
                debug!("xdotool search ничего не нашёл: {}", e);
                return Ok(None);
            }
        };

        Ok(output
            .lines()
            .find_map(|line| line.trim().parse::<u64>().ok())
            .map(WindowHandle))
    }

    fn window_rect(&self, handle: WindowHandle) -> Result<WindowRect> {
        let rect = self.geometry(handle)?;
        self.remember(handle, rect);
        Ok(rect)
    }

    fn screen_to_client(&self, handle: WindowHandle, point: ScreenPoint) -> Result<ClientPoint> {
        let rect = self.known_rect(handle)?;
        Ok(ClientPoint::new(
            point.x.saturating_sub(rect.left),
            point.y.saturating_sub(rect.top),
        ))
    }
}
