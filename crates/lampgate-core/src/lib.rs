pub mod config;
pub mod error;
pub mod types;

pub use config::LampgateConfig;
pub use error::{LampgateError, Result};
pub use types::{ActuatorState, DetectionRecord, FrameInput, StageOutput};
