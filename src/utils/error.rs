//! Error types for the compression engine.
//!
//! Provides a single error enum using `thiserror`. Every failure is returned to
//! the immediate caller; nothing in the engine logs an error and carries on.

use std::io;
use thiserror::Error;
use serde::Serialize;

use crate::core::Technique;

/// Main error type for the compression engine.
///
/// `UnsupportedFormat`, `Decode` and `Technique` are fatal to a whole request:
/// a caller never receives a partial result set.
#[derive(Error, Debug, Serialize)]
pub enum EngineError {
    /// Leading bytes match none of the supported signatures
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Bytes passed signature sniffing but could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// A single technique's encode step failed
    #[error("Technique '{technique}' failed: {reason}")]
    Technique {
        technique: Technique,
        reason: String,
    },

    /// Injected policy is out of range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Policy file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// File IO error (caller layer only)
    #[error("IO error: {0}")]
    IO(String),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// Helper methods for error creation
impl EngineError {
    pub fn unsupported<T: Into<String>>(msg: T) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn technique(technique: Technique, reason: impl ToString) -> Self {
        Self::Technique {
            technique,
            reason: reason.to_string(),
        }
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

}

// Convert std::io::Error to EngineError
impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

// Malformed policy JSON surfaces as a config error
impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technique_error_names_the_technique() {
        let err = EngineError::technique(Technique::ProgressiveEncoding, "width exceeds 65535");
        assert_eq!(
            err.to_string(),
            "Technique 'Progressive Encoding' failed: width exceeds 65535"
        );
    }

    #[test]
    fn json_errors_become_config_errors() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: EngineError = parse.into();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
