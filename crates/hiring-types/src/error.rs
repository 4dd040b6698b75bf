//! Error types shared across the hiring crates.

use thiserror::Error;

/// Errors raised while loading or validating shared types.
#[derive(Debug, Error)]
pub enum HiringError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for HiringError {
    fn from(err: config::ConfigError) -> Self {
        HiringError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HiringError::Config("bad port".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad port");
    }
}
