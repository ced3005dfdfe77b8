//! GazeSource service: responsibility and boundaries
//!
//! A source owns the connection to the eye-tracking engine and publishes samples
//! into a single-slot `watch` channel: the newest sample always replaces an
//! unread one. It MUST NOT throttle or interpret samples; that belongs to the
//! gaze pipeline.

mod dry_run;
mod udp;

pub use self::dry_run::DryRunGazeSource;
pub use self::udp::{parse_datagram, UdpGazeSource};

use crate::config::Config;
use crate::error::Result;
use crate::events::GazeSample;
use tokio::sync::watch;
use tracing::info;

pub type SampleReceiver = watch::Receiver<Option<GazeSample>>;

/// Источник отсчётов взгляда
#[async_trait::async_trait]
pub trait GazeSource: Send {
    /// Начать доставку отсчётов
    async fn subscribe(&mut self) -> Result<SampleReceiver>;

    /// Освободить соединение с источником
    fn disable(&mut self);
}

/// Factory function to create an appropriate gaze source based on the dry_run flag
pub fn create_gaze_source(config: &Config, dry_run: bool) -> Result<Box<dyn GazeSource>> {
    if dry_run {
        Ok(Box::new(DryRunGazeSource::new()))
    } else {
        let addr = config.bind_address()?;
        Ok(Box::new(UdpGazeSource::connect(addr)?))
    }
}

/// Соединение с источником, которое гарантированно освобождается ровно один раз:
/// явно через `release` или в `Drop` на любом другом пути выхода.
pub struct GazeConnection {
    source: Box<dyn GazeSource>,
    released: bool,
}

impl GazeConnection {
    pub fn new(source: Box<dyn GazeSource>) -> Self {
        Self {
            source,
            released: false,
        }
    }

    pub async fn subscribe(&mut self) -> Result<SampleReceiver> {
        self.source.subscribe().await
    }

    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.released {
            self.released = true;
            info!("Освобождение соединения с источником взгляда");
            self.source.disable();
        }
    }
}

impl Drop for GazeConnection {
    fn drop(&mut self) {
        self.release_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        disabled: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl GazeSource for CountingSource {
        async fn subscribe(&mut self) -> Result<SampleReceiver> {
            let (_tx, rx) = watch::channel(None);
            Ok(rx)
        }

        fn disable(&mut self) {
            self.disabled.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn connection() -> (GazeConnection, Arc<AtomicUsize>) {
        let disabled = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            disabled: disabled.clone(),
        };
        (GazeConnection::new(Box::new(source)), disabled)
    }

    #[test]
    fn test_release_disables_exactly_once() {
        let (connection, disabled) = connection();
        connection.release();
        assert_eq!(disabled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_disables_when_not_released() {
        let (connection, disabled) = connection();
        drop(connection);
        assert_eq!(disabled.load(Ordering::SeqCst), 1);
    }
}
