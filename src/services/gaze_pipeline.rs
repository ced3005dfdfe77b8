use crate::error::Result;
use crate::gaze_error;
use crate::events::OutputRecord;
use crate::services::dwell::{DwellTracker, SampleOutcome, SampleThrottler};
use crate::services::gaze_source::SampleReceiver;
use crate::services::shutdown::{ShutdownReason, ShutdownSignal};
use chrono::Utc;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Куда пишутся выходные записи (по умолчанию stdout)
pub struct RecordSink {
    writer: Box<dyn Write + Send>,
}

impl RecordSink {
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, record: &OutputRecord) {
        if let Err(e) = writeln!(self.writer, "{}", record) {
            warn!("Не удалось записать выходную запись: {}", e);
        }
    }
}

/// Потребитель отсчётов: троттлинг, автомат задержки, запись результатов
pub struct GazePipeline {
    tracker: DwellTracker,
    throttler: SampleThrottler,
    shutdown: Arc<ShutdownSignal>,
    sink: RecordSink,
}

impl GazePipeline {
    pub fn new(
        tracker: DwellTracker,
        throttler: SampleThrottler,
        shutdown: Arc<ShutdownSignal>,
        sink: RecordSink,
    ) -> Self {
        Self {
            tracker,
            throttler,
            shutdown,
            sink,
        }
    }

    pub async fn run(self, mut samples: SampleReceiver) -> Result<()> {
        let Self {
            mut tracker,
            mut throttler,
            shutdown,
            mut sink,
        } = self;

        info!(
            "GazePipeline запущен (интервал отсчётов: {:?})",
            throttler.min_interval()
        );

        loop {
            tokio::select! {
                reason = shutdown.wait() => {
                    info!("GazePipeline останавливается: {}", reason);
                    break;
                }
                changed = samples.changed() => {
                    if changed.is_err() {
                        warn!("Источник взгляда закрыл поток");
                        shutdown.trigger(ShutdownReason::SourceClosed);
                        break;
                    }

                    let Some(sample) = *samples.borrow_and_update() else {
                        continue;
                    };

                    let now = Instant::now();
                    if !throttler.admit(now) {
                        continue;
                    }

                    // Запросы курсора и окна блокирующие (xdotool), уводим их с потока рантайма
                    let at = Utc::now();
                    let (returned, evaluation) = tokio::task::spawn_blocking(move || {
                        let evaluation = tracker.evaluate(&sample, now, at);
                        (tracker, evaluation)
                    })
                    .await
                    .map_err(|e| gaze_error!(internal, "Обработка отсчёта прервана: {}", e))?;
                    tracker = returned;

                    for record in &evaluation.records {
                        sink.write(record);
                    }

                    if evaluation.outcome == SampleOutcome::Terminate {
                        shutdown.trigger(ShutdownReason::DwellExceeded);
                        break;
                    }
                }
            }
        }

        tracker.finish();
        let _ = sink.writer.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{GazeSample, KeyCode, KeyFlags, ScreenPoint, TargetWindow, WindowHandle, WindowRect};
    use crate::services::actuator::testing::RecordingActuator;
    use crate::services::mode_controller::{Mode, ModeController};
    use crate::services::window_geometry::testing::FixedWindow;
    use parking_lot::Mutex;
    use std::time::Duration;
    use tokio::sync::watch;

    /// Буфер, который можно прочитать после завершения конвейера
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    struct Fixture {
        pipeline: GazePipeline,
        buffer: SharedBuffer,
        actuator: Arc<RecordingActuator>,
    }

    fn pipeline(mode: Mode, shutdown: Arc<ShutdownSignal>) -> (GazePipeline, SharedBuffer) {
        let fixture = fixture(mode, shutdown, Duration::from_secs(3));
        (fixture.pipeline, fixture.buffer)
    }

    fn fixture(mode: Mode, shutdown: Arc<ShutdownSignal>, threshold: Duration) -> Fixture {
        let rect = WindowRect::new(0, 0, 800, 600);
        let actuator = Arc::new(RecordingActuator::new(ScreenPoint::new(400, 300)));
        let controller = ModeController::new(mode, KeyCode::new(17), actuator.clone());
        let tracker = DwellTracker::new(
            TargetWindow::new(WindowHandle(1), rect),
            Arc::new(FixedWindow::new(rect)),
            actuator.clone(),
            controller,
            threshold,
        );
        let buffer = SharedBuffer::default();
        let throttler = SampleThrottler::new(Duration::from_millis(1), Instant::now());
        let pipeline = GazePipeline::new(
            tracker,
            throttler,
            shutdown,
            RecordSink::new(Box::new(buffer.clone())),
        );
        Fixture {
            pipeline,
            buffer,
            actuator,
        }
    }

    #[tokio::test]
    async fn test_forwards_samples_until_shutdown() {
        let shutdown = Arc::new(ShutdownSignal::new());
        let (pipeline, buffer) = pipeline(Mode::Logging, shutdown.clone());
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(pipeline.run(rx));

        tokio::time::sleep(Duration::from_millis(5)).await;
        tx.send_replace(Some(GazeSample::new(100.4, 200.9)));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.trigger(ShutdownReason::Interrupt);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pipeline should stop")
            .unwrap()
            .unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("]: x: 100, y: 200"));
        assert_eq!(shutdown.reason(), Some(ShutdownReason::Interrupt));
    }

    #[tokio::test]
    async fn test_closed_source_triggers_shutdown() {
        let shutdown = Arc::new(ShutdownSignal::new());
        let (pipeline, buffer) = pipeline(Mode::Cursor, shutdown.clone());
        let (tx, rx) = watch::channel(None);
        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), pipeline.run(rx))
            .await
            .expect("pipeline should stop")
            .unwrap();

        assert_eq!(shutdown.reason(), Some(ShutdownReason::SourceClosed));
        assert!(buffer.lines().is_empty());
    }

    #[tokio::test]
    async fn test_stop_on_dwell_ends_run_on_exceeding_sample() {
        let shutdown = Arc::new(ShutdownSignal::new());
        let fixture = fixture(Mode::StopOnDwell, shutdown.clone(), Duration::from_millis(30));
        let buffer = fixture.buffer.clone();
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(fixture.pipeline.run(rx));

        // Взгляд в центре окна: задержка начинается
        tokio::time::sleep(Duration::from_millis(5)).await;
        tx.send_replace(Some(GazeSample::new(400.0, 300.0)));
        tokio::time::sleep(Duration::from_millis(60)).await;

        tx.send_replace(Some(GazeSample::new(402.0, 301.0)));
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send_replace(Some(GazeSample::new(404.0, 302.0)));

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pipeline should stop")
            .unwrap()
            .unwrap();

        assert_eq!(shutdown.reason(), Some(ShutdownReason::DwellExceeded));

        let lines = buffer.lines();
        assert_eq!(lines.len(), 3, "{:?}", lines);
        assert!(lines[0].ends_with("]: x: 400, y: 300"));
        assert!(lines[1].ends_with("]: starting dwell."));
        assert!(lines[2].ends_with("]: dwell exceeded 0.03 seconds. terminating."));
        assert!(!lines.iter().any(|line| line.contains("x: 404")));
    }

    #[tokio::test]
    async fn test_held_key_is_released_when_pipeline_stops() {
        let shutdown = Arc::new(ShutdownSignal::new());
        let fixture = fixture(Mode::MoveOnDwell, shutdown.clone(), Duration::from_millis(30));
        let actuator = fixture.actuator.clone();
        let buffer = fixture.buffer.clone();
        let (tx, rx) = watch::channel(None);

        let handle = tokio::spawn(fixture.pipeline.run(rx));

        tokio::time::sleep(Duration::from_millis(5)).await;
        tx.send_replace(Some(GazeSample::new(400.0, 300.0)));
        tokio::time::sleep(Duration::from_millis(60)).await;
        tx.send_replace(Some(GazeSample::new(401.0, 300.0)));
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(actuator.key_calls(), vec![KeyFlags::ExtendedKeyDown]);

        shutdown.trigger(ShutdownReason::Interrupt);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pipeline should stop")
            .unwrap()
            .unwrap();

        assert_eq!(
            actuator.key_calls(),
            vec![KeyFlags::ExtendedKeyDown, KeyFlags::KeyUp]
        );
        assert!(buffer
            .lines()
            .iter()
            .any(|line| line.ends_with("dwell exceeded 0.03 seconds. moving forward.")));
    }
}
