pub mod actuator;
pub mod dwell;
pub mod gaze_pipeline;
pub mod gaze_source;
pub mod mode_controller;
pub mod shutdown;
pub mod termination;
pub mod window_geometry;

pub use actuator::create_actuator;
pub use dwell::{DwellTracker, SampleThrottler};
pub use gaze_pipeline::{GazePipeline, RecordSink};
pub use gaze_source::{create_gaze_source, GazeConnection};
pub use mode_controller::{Mode, ModeController};
pub use shutdown::{ShutdownReason, ShutdownSignal};
pub use termination::create_termination_watcher;
pub use window_geometry::create_window_geometry;
