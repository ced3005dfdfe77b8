use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::info;

/// Почему завершается работа
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Горячая клавиша в режимах управления курсором
    Hotkey,
    /// Команда "." или EOF в консоли (режим журналирования)
    Console,
    /// Ctrl+C
    Interrupt,
    /// Превышение порога задержки в режиме stop-on-dwell
    DwellExceeded,
    /// Источник взгляда закрыл поток
    SourceClosed,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShutdownReason::Hotkey => "горячая клавиша",
            ShutdownReason::Console => "команда консоли",
            ShutdownReason::Interrupt => "Ctrl+C",
            ShutdownReason::DwellExceeded => "превышение порога задержки",
            ShutdownReason::SourceClosed => "источник взгляда закрыт",
        };
        write!(f, "{}", text)
    }
}

/// Единый сигнал завершения. Срабатывает один раз, побеждает первая причина.
pub struct ShutdownSignal {
    triggered: AtomicBool,
    reason: Mutex<Option<ShutdownReason>>,
    notify: Notify,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            triggered: AtomicBool::new(false),
            reason: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Возвращает `true`, если именно этот вызов инициировал завершение
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        {
            let mut current = self.reason.lock();
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
        }
        self.triggered.store(true, Ordering::Release);
        info!("Получен сигнал завершения: {}", reason);
        self.notify.notify_waiters();
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Acquire)
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        *self.reason.lock()
    }

    /// Дождаться срабатывания сигнала
    pub async fn wait(&self) -> ShutdownReason {
        loop {
            let notified = self.notify.notified();
            if let Some(reason) = self.reason() {
                return reason;
            }
            notified.await;
        }
    }
}
