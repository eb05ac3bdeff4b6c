use lampgate_core::LampgateError;
use thiserror::Error;

/// Errors that can occur when talking to the relay device.
///
/// Callers must treat any error as "unknown state" and skip actions that
/// depend on it rather than assuming off or on.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Transport failure or a non-success HTTP status from the device.
    #[error("device unreachable: {0}")]
    DeviceUnreachable(String),
    /// The device answered, but the response did not match the protocol.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<RelayError> for LampgateError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::DeviceUnreachable(msg) => LampgateError::DeviceUnreachable(msg),
            RelayError::Protocol(msg) => LampgateError::Protocol(msg),
        }
    }
}
