use serde::{Deserialize, Serialize};
use std::fmt;

/// Непрозрачный признак валидности, который присылает источник взгляда.
/// Конвейер его не интерпретирует, только переносит.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Validity(pub u32);

/// Отсчёт позиции взгляда в экранных координатах
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    pub x: f64,
    pub y: f64,
    pub validity: Validity,
}

impl GazeSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            validity: Validity::default(),
        }
    }

    pub fn with_validity(mut self, validity: Validity) -> Self {
        self.validity = validity;
        self
    }

    /// Усечение к нулю (не округление): пороги мёртвых зон настроены под него.
    pub fn to_point(&self) -> ScreenPoint {
        ScreenPoint::new(self.x as i32, self.y as i32)
    }
}

impl fmt::Display for GazeSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Точка в абсолютных координатах рабочего стола
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Точка относительно левого верхнего угла целевого окна
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientPoint {
    pub x: i32,
    pub y: i32,
}

impl ClientPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ClientPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client({}, {})", self.x, self.y)
    }
}
