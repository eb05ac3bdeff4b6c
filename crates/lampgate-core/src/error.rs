use thiserror::Error;

/// Top-level error type for the Lampgate system.
///
/// Each variant wraps a subsystem-specific failure. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for
/// LampgateError` so that the `?` operator works seamlessly across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LampgateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Relay device unreachable: {0}")]
    DeviceUnreachable(String),

    #[error("Relay protocol error: {0}")]
    Protocol(String),

    #[error("Input decode error: {0}")]
    InputDecode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for LampgateError {
    fn from(err: toml::de::Error) -> Self {
        LampgateError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LampgateError {
    fn from(err: toml::ser::Error) -> Self {
        LampgateError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for LampgateError {
    fn from(err: serde_json::Error) -> Self {
        LampgateError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Lampgate operations.
pub type Result<T> = std::result::Result<T, LampgateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LampgateError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LampgateError = io_err.into();
        assert!(matches!(err, LampgateError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let parsed: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        let err: LampgateError = parsed.unwrap_err().into();
        assert!(matches!(err, LampgateError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        let err: LampgateError = parsed.unwrap_err().into();
        assert!(matches!(err, LampgateError::Serialization(_)));
    }

    #[test]
    fn test_error_display_device_variants() {
        let unreachable = LampgateError::DeviceUnreachable("connection refused".to_string());
        assert_eq!(
            unreachable.to_string(),
            "Relay device unreachable: connection refused"
        );

        let protocol = LampgateError::Protocol("unexpected state 7".to_string());
        assert_eq!(protocol.to_string(), "Relay protocol error: unexpected state 7");

        let decode = LampgateError::InputDecode("missing frame_data".to_string());
        assert_eq!(decode.to_string(), "Input decode error: missing frame_data");
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }
}
