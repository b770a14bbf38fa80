//! Error types for the CiteGraph engine
//!
//! Provides:
//! - Distinct error types for different failure modes
//! - Machine-readable error codes for embedding hosts
//! - A shared `Result` alias used across the engine crates

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Conflict errors (1xxx)
    DuplicateKeyConflict,

    // Resource errors (2xxx)
    UnknownEntity,

    // Validation errors (3xxx)
    InvalidWeightKey,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Conflicts (1xxx)
            ErrorCode::DuplicateKeyConflict => 1001,

            // Resources (2xxx)
            ErrorCode::UnknownEntity => 2001,

            // Validation (3xxx)
            ErrorCode::InvalidWeightKey => 3001,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Engine error types
///
/// Structural errors abort the specific ingestion or inference call and are
/// surfaced to the caller. Numeric non-convergence is deliberately *not* an
/// error: algorithm outcomes carry a `converged` flag instead, since an
/// approximate result is still a result.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The key is already bound to an entity with a different label.
    ///
    /// Keys form one namespace across labels so that the key-based connect
    /// surface can resolve endpoints; reuse under another label is never
    /// silently resolved.
    #[error("duplicate key conflict: '{key}' already bound to {existing}, requested {requested}")]
    DuplicateKeyConflict {
        key: String,
        existing: String,
        requested: String,
    },

    /// An edge endpoint references a key that was never upserted.
    #[error("unknown entity: '{key}' (upsert-before-connect is the caller's contract)")]
    UnknownEntity { key: String },

    /// A projection requested a weight property edges do not carry.
    #[error("invalid weight key: '{key}' (expected 'weight' or 'order')")]
    InvalidWeightKey { key: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl GraphError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            GraphError::DuplicateKeyConflict { .. } => ErrorCode::DuplicateKeyConflict,
            GraphError::UnknownEntity { .. } => ErrorCode::UnknownEntity,
            GraphError::InvalidWeightKey { .. } => ErrorCode::InvalidWeightKey,
            GraphError::Configuration { .. } => ErrorCode::ConfigurationError,
            GraphError::Serialization(_) => ErrorCode::SerializationError,
            GraphError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Structural errors must abort the ingestion/inference call that hit
    /// them; everything else is recoverable by re-invoking the failed step.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GraphError::DuplicateKeyConflict { .. } | GraphError::UnknownEntity { .. }
        )
    }
}

impl From<config::ConfigError> for GraphError {
    fn from(err: config::ConfigError) -> Self {
        GraphError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = GraphError::UnknownEntity { key: "10.1000/x".into() };
        assert_eq!(err.code(), ErrorCode::UnknownEntity);
        assert_eq!(err.code().as_code(), 2001);
        assert!(err.is_structural());
    }

    #[test]
    fn test_conflict_is_structural() {
        let err = GraphError::DuplicateKeyConflict {
            key: "ana".into(),
            existing: "author".into(),
            requested: "keyword".into(),
        };
        assert_eq!(err.code(), ErrorCode::DuplicateKeyConflict);
        assert!(err.is_structural());
    }

    #[test]
    fn test_configuration_not_structural() {
        let err = GraphError::Configuration {
            message: "bad damping".into(),
        };
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert!(!err.is_structural());
    }
}
