pub mod controller;
pub mod counter;
pub mod loop_worker;
pub mod state;

pub use controller::CaptureController;
pub use counter::SessionCounter;
pub use state::{RepDetector, RepEvent, RepPhase};
