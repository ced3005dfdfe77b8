use std::time::{Duration, Instant};

/// Пропускает отсчёт дальше, только если с последнего пропущенного прошло
/// не меньше `min_interval`. Отброшенный отсчёт теряется навсегда.
#[derive(Debug, Clone)]
pub struct SampleThrottler {
    min_interval: Duration,
    last_forwarded: Instant,
}

impl SampleThrottler {
    /// Отсчёт времени начинается с момента подписки на поток
    pub fn new(min_interval: Duration, started_at: Instant) -> Self {
        Self {
            min_interval,
            last_forwarded: started_at,
        }
    }

    pub fn admit(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_forwarded) < self.min_interval {
            return false;
        }
        self.last_forwarded = now;
        true
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
