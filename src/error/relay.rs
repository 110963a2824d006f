use std::io;

use thiserror::Error;

pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    // ==== External ====
    #[error("Broker error: {0}")]
    Broker(#[from] redis::RedisError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // ==== Setup ====
    #[error("Logging setup error: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_error_display() {
        let err = RelayError::Logging("bad filter directive".into());
        assert_eq!(err.to_string(), "Logging setup error: bad filter directive");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let converted: RelayError = io_err.into();
        assert!(matches!(converted, RelayError::Io(_)));
        assert!(converted.to_string().starts_with("IO error:"));
    }
}
