//! Common error types for PRF

use thiserror::Error;

/// Common result type for PRF operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by PRF crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        fn open_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/prf/config.toml")?)
        }
        let err = open_missing().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("IO error: "));
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("bad threshold".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad threshold");
    }
}
