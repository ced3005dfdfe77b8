use std::time::{Duration, Instant};

/// Секундомер задержки взгляда: либо простаивает, либо идёт с момента `since`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DwellTimer {
    #[default]
    Idle,
    Running { since: Instant },
}

impl DwellTimer {
    pub fn is_running(&self) -> bool {
        matches!(self, DwellTimer::Running { .. })
    }

    /// Запускает таймер. Повторный запуск работающего таймера ничего не меняет.
    pub fn start(&mut self, now: Instant) -> bool {
        match self {
            DwellTimer::Idle => {
                *self = DwellTimer::Running { since: now };
                true
            }
            DwellTimer::Running { .. } => false,
        }
    }

    /// Сбрасывает таймер и возвращает длительность завершившейся задержки
    pub fn stop(&mut self, now: Instant) -> Option<Duration> {
        let elapsed = self.elapsed(now);
        *self = DwellTimer::Idle;
        elapsed
    }

    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        match self {
            DwellTimer::Idle => None,
            DwellTimer::Running { since } => Some(now.saturating_duration_since(*since)),
        }
    }

    /// Строго больше порога, как и в исходном поведении
    pub fn exceeded(&self, now: Instant, threshold: Duration) -> bool {
        self.elapsed(now).is_some_and(|elapsed| elapsed > threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_idempotent() {
        let t0 = Instant::now();
        let mut timer = DwellTimer::default();
        assert!(!timer.is_running());

        assert!(timer.start(t0));
        assert!(!timer.start(t0 + Duration::from_millis(500)));
        assert_eq!(
            timer.elapsed(t0 + Duration::from_secs(1)),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_elapsed_is_monotonic_until_stop() {
        let t0 = Instant::now();
        let mut timer = DwellTimer::default();
        timer.start(t0);

        let mut last = Duration::ZERO;
        for ms in [0u64, 16, 32, 1000, 2999] {
            let elapsed = timer.elapsed(t0 + Duration::from_millis(ms)).unwrap();
            assert!(elapsed >= last);
            last = elapsed;
        }

        assert_eq!(timer.stop(t0 + Duration::from_millis(3100)), Some(Duration::from_millis(3100)));
        assert_eq!(timer, DwellTimer::Idle);
        assert_eq!(timer.stop(t0), None);
    }

    #[test]
    fn test_exceeded_is_strict() {
        let t0 = Instant::now();
        let threshold = Duration::from_secs(3);
        let mut timer = DwellTimer::default();
        assert!(!timer.exceeded(t0, threshold));

        timer.start(t0);
        assert!(!timer.exceeded(t0 + threshold, threshold));
        assert!(timer.exceeded(t0 + threshold + Duration::from_millis(1), threshold));
    }
}
