use crate::events::{ExceededAction, KeyCode, KeyFlags};
use crate::services::actuator::OutputActuator;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Режим работы, выбирается один раз при старте
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Управление курсором без побочных действий по таймауту
    #[default]
    Cursor,
    StopOnDwell,
    MoveOnDwell,
    Logging,
}

/// Относительно чего измеряется смещение взгляда
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplacementPolicy {
    /// Относительно центра окна, с движением курсора
    CursorRelative,
    /// Относительно предыдущего отсчёта, без вывода
    HistoryRelative,
}

/// Источник сигнала завершения для режима
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationTrigger {
    Hotkey,
    Console,
}

impl Mode {
    pub fn from_flags(stop_on_dwell: bool, move_on_dwell: bool, logging: bool) -> Self {
        match (stop_on_dwell, move_on_dwell, logging) {
            (true, _, _) => Mode::StopOnDwell,
            (_, true, _) => Mode::MoveOnDwell,
            (_, _, true) => Mode::Logging,
            _ => Mode::Cursor,
        }
    }

    pub fn displacement_policy(&self) -> DisplacementPolicy {
        match self {
            Mode::Logging => DisplacementPolicy::HistoryRelative,
            _ => DisplacementPolicy::CursorRelative,
        }
    }

    pub fn termination_trigger(&self) -> TerminationTrigger {
        match self {
            Mode::Logging => TerminationTrigger::Console,
            _ => TerminationTrigger::Hotkey,
        }
    }

    pub fn injects_keys(&self) -> bool {
        matches!(self, Mode::MoveOnDwell)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Cursor => "cursor",
            Mode::StopOnDwell => "stop-on-dwell",
            Mode::MoveOnDwell => "move-on-dwell",
            Mode::Logging => "logging",
        };
        write!(f, "{}", name)
    }
}

/// Удерживается ли сейчас клавиша движения вперёд
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyHoldState {
    #[default]
    Released,
    Held,
}

/// Побочные действия режима на события задержки взгляда
pub struct ModeController {
    mode: Mode,
    forward_key: KeyCode,
    key_hold: KeyHoldState,
    actuator: Arc<dyn OutputActuator>,
}

impl ModeController {
    pub fn new(mode: Mode, forward_key: KeyCode, actuator: Arc<dyn OutputActuator>) -> Self {
        Self {
            mode,
            forward_key,
            key_hold: KeyHoldState::Released,
            actuator,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn key_hold(&self) -> KeyHoldState {
        self.key_hold
    }

    /// Вызывается на каждом отсчёте, пока задержка превышает порог
    pub fn on_dwell_exceeded(&mut self) -> Option<ExceededAction> {
        match self.mode {
            Mode::StopOnDwell => Some(ExceededAction::Terminate),
            Mode::MoveOnDwell if self.key_hold == KeyHoldState::Released => {
                self.key_hold = KeyHoldState::Held;
                self.inject(KeyFlags::ExtendedKeyDown);
                Some(ExceededAction::MoveForward)
            }
            _ => None,
        }
    }

    /// Конец задержки: отпускаем клавишу, если она была нажата
    pub fn on_dwell_end(&mut self) {
        if self.mode == Mode::MoveOnDwell {
            self.release_held_key();
        }
    }

    /// Отпустить клавишу при завершении работы, чтобы она не «залипла»
    pub fn release_held_key(&mut self) {
        if self.key_hold == KeyHoldState::Held {
            info!("Отпускаем клавишу движения {}", self.forward_key);
            self.key_hold = KeyHoldState::Released;
            self.inject(KeyFlags::KeyUp);
        }
    }

    fn inject(&self, flags: KeyFlags) {
        if let Err(e) = self.actuator.inject_key(self.forward_key, flags) {
            error!("Не удалось отправить {:?} для {}: {}", flags, self.forward_key, e);
        }
    }
}
