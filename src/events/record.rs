use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Что сделал контроллер режимов при превышении порога задержки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceededAction {
    Terminate,
    MoveForward,
}

impl fmt::Display for ExceededAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExceededAction::Terminate => write!(f, "terminating."),
            ExceededAction::MoveForward => write!(f, "moving forward."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// Обычная строка отсчёта без статуса
    Sample,
    DwellStarted,
    DwellEnded { length: Duration },
    DwellExceeded {
        threshold: Duration,
        action: Option<ExceededAction>,
    },
}

/// Диагностическая запись выходного потока.
///
/// Формат строк сохранён для совместимости с существующими логами, но
/// машинно-разбираемым контрактом не является.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRecord {
    pub at: DateTime<Utc>,
    pub x: i32,
    pub y: i32,
    pub status: RecordStatus,
}

impl OutputRecord {
    pub fn new(at: DateTime<Utc>, x: i32, y: i32, status: RecordStatus) -> Self {
        Self { at, x, y, status }
    }

    pub fn timestamp(&self) -> String {
        self.at.format("%I:%M:%S%.3f").to_string()
    }
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.timestamp();
        match self.status {
            RecordStatus::Sample => write!(f, "[{}]: x: {}, y: {}", t, self.x, self.y),
            RecordStatus::DwellStarted => write!(f, "[{}]: starting dwell.", t),
            RecordStatus::DwellEnded { length } => write!(
                f,
                "[{}]: ending dwell. length: {} ms",
                t,
                length.as_secs_f64() * 1000.0
            ),
            RecordStatus::DwellExceeded { threshold, action } => {
                write!(f, "[{}]: dwell exceeded {} seconds.", t, threshold.as_secs_f64())?;
                match action {
                    Some(action) => write!(f, " {}", action),
                    None => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 14, 7, 9).unwrap() + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn test_sample_line() {
        let record = OutputRecord::new(at(), 410, -3, RecordStatus::Sample);
        assert_eq!(record.to_string(), "[02:07:09.042]: x: 410, y: -3");
    }

    #[test]
    fn test_dwell_lines() {
        let started = OutputRecord::new(at(), 0, 0, RecordStatus::DwellStarted);
        assert_eq!(started.to_string(), "[02:07:09.042]: starting dwell.");

        let ended = OutputRecord::new(
            at(),
            0,
            0,
            RecordStatus::DwellEnded {
                length: Duration::from_millis(1250),
            },
        );
        assert_eq!(ended.to_string(), "[02:07:09.042]: ending dwell. length: 1250 ms");
    }

    #[test]
    fn test_exceeded_lines() {
        let threshold = Duration::from_secs(3);
        let plain = OutputRecord::new(
            at(),
            0,
            0,
            RecordStatus::DwellExceeded {
                threshold,
                action: None,
            },
        );
        assert_eq!(plain.to_string(), "[02:07:09.042]: dwell exceeded 3 seconds.");

        let stop = OutputRecord::new(
            at(),
            0,
            0,
            RecordStatus::DwellExceeded {
                threshold,
                action: Some(ExceededAction::Terminate),
            },
        );
        assert_eq!(
            stop.to_string(),
            "[02:07:09.042]: dwell exceeded 3 seconds. terminating."
        );
    }
}
