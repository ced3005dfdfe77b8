use crate::events::{ClientPoint, ScreenPoint, WindowRect};

/// Горизонтальная мёртвая зона: |dx| < width / 25
const DEAD_ZONE_X_DIVISOR: i32 = 25;
/// Вертикальная мёртвая зона несимметрична: -height/5 < dy < height/20
const DEAD_ZONE_UP_DIVISOR: i32 = 5;
const DEAD_ZONE_DOWN_DIVISOR: i32 = 20;
/// Демпфирование смещения курсора
const DAMPING_X: i32 = 40;
const DAMPING_Y: i32 = 30;
/// Радиус неподвижности для сравнения с предыдущим отсчётом
pub const HISTORY_RADIUS_PX: i32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Still,
    Moved,
}

/// Смещение взгляда от центра окна после обнуления мёртвых зон
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterOffset {
    pub dx: i32,
    pub dy: i32,
}

impl CenterOffset {
    /// Смещение курсора: целочисленное деление с усечением к нулю
    pub fn cursor_delta(&self) -> (i32, i32) {
        (self.dx / DAMPING_X, self.dy / DAMPING_Y)
    }
}

/// Смещение точки взгляда от логического центра окна.
/// `None` означает, что обе компоненты попали в мёртвые зоны.
pub fn center_offset(eye: ClientPoint, rect: &WindowRect) -> Option<CenterOffset> {
    let width = rect.width();
    let height = rect.height();

    let mut dx = eye.x.saturating_sub(width / 2);
    let mut dy = eye.y.saturating_sub(height / 2);

    if dx.saturating_abs() < width / DEAD_ZONE_X_DIVISOR {
        dx = 0;
    }
    if dy < height / DEAD_ZONE_DOWN_DIVISOR && dy > -(height / DEAD_ZONE_UP_DIVISOR) {
        dy = 0;
    }

    if dx == 0 && dy == 0 {
        None
    } else {
        Some(CenterOffset { dx, dy })
    }
}

/// Сравнение с предыдущим отсчётом (режим журналирования)
pub fn history_movement(eye: ScreenPoint, previous: ScreenPoint) -> Movement {
    let dx = eye.x.saturating_sub(previous.x);
    let dy = eye.y.saturating_sub(previous.y);

    if dx.saturating_abs() < HISTORY_RADIUS_PX && dy.saturating_abs() < HISTORY_RADIUS_PX {
        Movement::Still
    } else {
        Movement::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> WindowRect {
        WindowRect::new(0, 0, 800, 600)
    }

    #[test]
    fn test_inside_dead_zone_is_still() {
        // width/25 = 32, вертикаль -120..40
        assert_eq!(center_offset(ClientPoint::new(410, 305), &rect()), None);
        assert_eq!(center_offset(ClientPoint::new(400 - 31, 300 - 119), &rect()), None);
        assert_eq!(center_offset(ClientPoint::new(400 + 31, 300 + 39), &rect()), None);
    }

    #[test]
    fn test_vertical_dead_zone_is_asymmetric() {
        let up = center_offset(ClientPoint::new(400, 300 - 100), &rect());
        assert_eq!(up, None);

        let down = center_offset(ClientPoint::new(400, 300 + 100), &rect());
        assert_eq!(down, Some(CenterOffset { dx: 0, dy: 100 }));

        // Границы исключаются из мёртвой зоны
        assert_eq!(
            center_offset(ClientPoint::new(400, 300 + 40), &rect()),
            Some(CenterOffset { dx: 0, dy: 40 })
        );
        assert_eq!(
            center_offset(ClientPoint::new(400, 300 - 120), &rect()),
            Some(CenterOffset { dx: 0, dy: -120 })
        );
    }

    #[test]
    fn test_horizontal_movement_keeps_zeroed_vertical() {
        let offset = center_offset(ClientPoint::new(600, 300), &rect()).unwrap();
        assert_eq!(offset, CenterOffset { dx: 200, dy: 0 });
        assert_eq!(offset.cursor_delta(), (5, 0));
    }

    #[test]
    fn test_cursor_delta_truncates_toward_zero() {
        let offset = CenterOffset { dx: -79, dy: -59 };
        assert_eq!(offset.cursor_delta(), (-1, -1));

        let offset = CenterOffset { dx: 79, dy: 59 };
        assert_eq!(offset.cursor_delta(), (1, 1));

        // Движение есть, но после демпфирования смещение нулевое
        let offset = CenterOffset { dx: -35, dy: 0 };
        assert_eq!(offset.cursor_delta(), (0, 0));
    }

    #[test]
    fn test_history_movement() {
        let prev = ScreenPoint::new(100, 100);
        assert_eq!(history_movement(ScreenPoint::new(160, 100), prev), Movement::Moved);
        assert_eq!(history_movement(ScreenPoint::new(124, 76), prev), Movement::Still);
        assert_eq!(history_movement(ScreenPoint::new(100, 125), prev), Movement::Moved);
        assert_eq!(history_movement(ScreenPoint::new(75, 100), prev), Movement::Moved);
    }

    #[test]
    fn test_extreme_points_saturate() {
        let prev = ScreenPoint::new(100, 100);
        assert_eq!(history_movement(ScreenPoint::new(i32::MIN, 100), prev), Movement::Moved);
        assert_eq!(history_movement(ScreenPoint::new(100, i32::MAX), prev), Movement::Moved);

        // Смещение остаётся со знаком взгляда
        let offset = center_offset(ClientPoint::new(i32::MIN, 300), &rect()).unwrap();
        assert_eq!(offset.dx, i32::MIN);
        assert!(offset.cursor_delta().0 < 0);
    }
}
