//! Error types for lagwatch services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LagwatchError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LagwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl LagwatchError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LagwatchError::Config("x".into()).error_code(), "CONFIG_ERROR");
        assert_eq!(
            LagwatchError::Validation("x".into()).error_code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = LagwatchError::Config("Invalid LAGWATCH_TICK_INTERVAL_MS".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid LAGWATCH_TICK_INTERVAL_MS"
        );
    }
}
