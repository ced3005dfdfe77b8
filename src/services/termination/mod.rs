//! Termination watchers: the only things allowed to end a run besides the dwell
//! pipeline itself. Every watcher reports through the shared `ShutdownSignal`.

mod console;
mod hotkey;

pub use self::console::{is_quit_command, ConsoleWatcher};
pub use self::hotkey::HotkeyWatcher;

use crate::config::Config;
use crate::error::Result;
use crate::services::mode_controller::{Mode, TerminationTrigger};
use crate::services::shutdown::ShutdownSignal;
use std::sync::Arc;

/// Trait for termination watchers that can run in different modes
#[async_trait::async_trait]
pub trait TerminationWatcher {
    /// Run the watcher until it triggers or the shutdown signal fires
    async fn run(self: Box<Self>, shutdown: Arc<ShutdownSignal>) -> Result<()>;
}

/// Factory function: hotkey polling for cursor modes, console input for logging
/// mode and for dry runs (no keyboard device is opened then).
pub fn create_termination_watcher(
    config: &Config,
    mode: Mode,
    dry_run: bool,
) -> Result<Box<dyn TerminationWatcher + Send>> {
    match (mode.termination_trigger(), dry_run) {
        (TerminationTrigger::Hotkey, false) => Ok(Box::new(HotkeyWatcher::new(config)?)),
        _ => Ok(Box::new(ConsoleWatcher::new())),
    }
}
