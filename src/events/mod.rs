pub mod gaze;
pub mod keyboard;
pub mod record;
pub mod window;

pub use gaze::{ClientPoint, GazeSample, ScreenPoint, Validity};
pub use keyboard::{KeyCode, KeyFlags};
pub use record::{ExceededAction, OutputRecord, RecordStatus};
pub use window::{TargetWindow, WindowHandle, WindowRect};
