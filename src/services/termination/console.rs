use crate::error::Result;
use crate::services::shutdown::{ShutdownReason, ShutdownSignal};
use std::io::BufRead;
use std::sync::Arc;
use tracing::{info, warn};

use super::TerminationWatcher;

/// Завершение по строке "." в консоли или по EOF
pub struct ConsoleWatcher;

impl ConsoleWatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleWatcher {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_quit_command(line: &str) -> bool {
    line.trim_start().starts_with('.')
}

#[async_trait::async_trait]
impl TerminationWatcher for ConsoleWatcher {
    async fn run(self: Box<Self>, shutdown: Arc<ShutdownSignal>) -> Result<()> {
        info!("Для завершения введите '.' и нажмите Enter");

        // Блокирующее чтение stdin в отдельном потоке: задача tokio на stdin
        // держала бы рантайм при завершении до следующего ввода
        let signal = shutdown.clone();
        std::thread::Builder::new()
            .name("console-watcher".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(line) if is_quit_command(&line) => break,
                        Ok(_) => {}
                        Err(e) => {
                            warn!("Ошибка чтения консоли: {}", e);
                            break;
                        }
                    }
                    if signal.is_triggered() {
                        return;
                    }
                }
                signal.trigger(ShutdownReason::Console);
            })?;

        shutdown.wait().await;
        Ok(())
    }
}
