//! Dwell detection: throttling, displacement policies and the per-sample state
//! machine that turns sustained gaze into dwell start/end/exceeded transitions.

mod displacement;
mod throttler;
mod timer;

pub use self::displacement::{center_offset, history_movement, CenterOffset, Movement};
pub use self::throttler::SampleThrottler;
pub use self::timer::DwellTimer;

use crate::debug_if_enabled;
use crate::events::{ExceededAction, GazeSample, OutputRecord, RecordStatus, ScreenPoint, TargetWindow};
use crate::services::actuator::OutputActuator;
use crate::services::mode_controller::{DisplacementPolicy, KeyHoldState, ModeController};
use crate::services::window_geometry::WindowGeometry;
use chrono::{DateTime, Utc};
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Итог обработки одного отсчёта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOutcome {
    Continue,
    Terminate,
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub records: SmallVec<[OutputRecord; 3]>,
    pub outcome: SampleOutcome,
}

/// Конечный автомат задержки взгляда.
///
/// Вызывается последовательно для каждого пропущенного троттлером отсчёта;
/// всё состояние (таймер, предыдущий отсчёт, удержание клавиши) принадлежит ему.
pub struct DwellTracker {
    target: TargetWindow,
    window: Arc<dyn WindowGeometry>,
    actuator: Arc<dyn OutputActuator>,
    controller: ModeController,
    timer: DwellTimer,
    threshold: Duration,
    previous: Option<ScreenPoint>,
}

impl DwellTracker {
    pub fn new(
        target: TargetWindow,
        window: Arc<dyn WindowGeometry>,
        actuator: Arc<dyn OutputActuator>,
        controller: ModeController,
        threshold: Duration,
    ) -> Self {
        Self {
            target,
            window,
            actuator,
            controller,
            timer: DwellTimer::Idle,
            threshold,
            previous: None,
        }
    }

    #[cfg(test)]
    pub fn timer(&self) -> DwellTimer {
        self.timer
    }

    pub fn evaluate(&mut self, sample: &GazeSample, now: Instant, at: DateTime<Utc>) -> Evaluation {
        let eye = sample.to_point();
        let mut records = SmallVec::new();

        // Превышение порога проверяется до классификации и повторяется
        // на каждом отсчёте, пока таймер не сброшен
        if self.timer.exceeded(now, self.threshold) {
            let action = self.controller.on_dwell_exceeded();
            records.push(OutputRecord::new(
                at,
                eye.x,
                eye.y,
                RecordStatus::DwellExceeded {
                    threshold: self.threshold,
                    action,
                },
            ));
            if action == Some(ExceededAction::Terminate) {
                return Evaluation {
                    records,
                    outcome: SampleOutcome::Terminate,
                };
            }
        }

        records.push(OutputRecord::new(at, eye.x, eye.y, RecordStatus::Sample));

        let movement = match self.controller.mode().displacement_policy() {
            DisplacementPolicy::CursorRelative => self.steer_cursor(eye),
            DisplacementPolicy::HistoryRelative => {
                self.previous.map(|previous| history_movement(eye, previous))
            }
        };
        self.previous = Some(eye);

        match movement {
            Some(Movement::Still) if !self.timer.is_running() => {
                self.timer.start(now);
                records.push(OutputRecord::new(at, eye.x, eye.y, RecordStatus::DwellStarted));
            }
            Some(Movement::Moved) if self.timer.is_running() => {
                if let Some(length) = self.timer.stop(now) {
                    records.push(OutputRecord::new(
                        at,
                        eye.x,
                        eye.y,
                        RecordStatus::DwellEnded { length },
                    ));
                }
                self.controller.on_dwell_end();
            }
            _ => {}
        }

        Evaluation {
            records,
            outcome: SampleOutcome::Continue,
        }
    }

    /// Завершение работы: не оставлять нажатую клавишу
    pub fn finish(&mut self) {
        if self.timer.is_running() {
            debug_if_enabled!("Остановка во время незавершённой задержки");
        }
        if self.controller.key_hold() == KeyHoldState::Held {
            self.controller.release_held_key();
        }
    }

    /// Сдвигает курсор к взгляду. `None` если отсчёт пропущен из-за сбоя запроса.
    fn steer_cursor(&self, eye: ScreenPoint) -> Option<Movement> {
        let cursor = match self.actuator.cursor_position() {
            Ok(cursor) => cursor,
            Err(e) => {
                debug_if_enabled!("Пропуск отсчёта: позиция курсора недоступна: {}", e);
                return None;
            }
        };

        let client = match self.window.screen_to_client(self.target.handle, eye) {
            Ok(client) => client,
            Err(e) => {
                debug_if_enabled!("Пропуск отсчёта: не удалось перевести {} в клиентские координаты: {}", eye, e);
                return None;
            }
        };

        let Some(offset) = center_offset(client, &self.target.rect) else {
            return Some(Movement::Still);
        };

        let (dx, dy) = offset.cursor_delta();
        if let Err(e) = self.actuator.set_cursor_position(cursor.offset(dx, dy)) {
            debug_if_enabled!("Не удалось переместить курсор: {}", e);
        }
        Some(Movement::Moved)
    }
}
