use crate::error::Result;
use crate::events::GazeSample;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::info;

use super::{GazeSource, SampleReceiver};

/// Частота эмулируемого трекера
const SAMPLE_PERIOD: Duration = Duration::from_millis(11);

/// Фиксация: точка и сколько миллисекунд взгляд на ней держится
const SCRIPT: &[(f64, f64, u64)] = &[
    (400.0, 300.0, 4000), // задержка в центре дольше порога
    (620.0, 300.0, 800),  // взгляд вправо
    (405.0, 310.0, 1500), // короткая задержка
    (400.0, 90.0, 700),   // взгляд вверх
    (150.0, 470.0, 600),  // влево вниз
];

/// Эмуляция трекера: фиксации по сценарию с небольшим дрожанием
pub struct DryRunGazeSource {
    task: Option<JoinHandle<()>>,
}

impl DryRunGazeSource {
    pub fn new() -> Self {
        info!("Dry-run режим - GazeSource работает в режиме эмуляции");
        Self { task: None }
    }

    async fn emit_loop(tx: watch::Sender<Option<GazeSample>>) {
        let mut ticker = interval(SAMPLE_PERIOD);
        let mut tick: u64 = 0;

        loop {
            for &(x, y, hold_ms) in SCRIPT {
                let ticks = hold_ms / SAMPLE_PERIOD.as_millis() as u64;
                for _ in 0..ticks {
                    ticker.tick().await;
                    tick += 1;
                    tx.send_replace(Some(jitter(x, y, tick)));
                    if tx.is_closed() {
                        return;
                    }
                }
            }
        }
    }
}

impl Default for DryRunGazeSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Детерминированное дрожание в пределах нескольких пикселей
fn jitter(x: f64, y: f64, tick: u64) -> GazeSample {
    let phase = tick as f64 * 0.7;
    GazeSample::new(x + 4.0 * phase.sin(), y + 3.0 * (phase * 1.3).cos())
}

#[async_trait::async_trait]
impl GazeSource for DryRunGazeSource {
    async fn subscribe(&mut self) -> Result<SampleReceiver> {
        let (tx, rx) = watch::channel(None);
        if let Some(previous) = self.task.replace(tokio::spawn(Self::emit_loop(tx))) {
            previous.abort();
        }
        Ok(rx)
    }

    fn disable(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        info!("Dry-run: эмуляция трекера остановлена");
    }
}
