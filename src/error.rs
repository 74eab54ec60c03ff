//! Error types for the grade prediction service
//!
//! Two broad kinds exist, mirroring the service's failure policy:
//!
//! - Startup errors (`DatasetNotFound`, `MissingColumn`, `DatasetParse`) are
//!   unrecoverable: without a model the process must not serve.
//! - Artifact-load errors (`ArtifactNotFound`, `ArtifactCorrupt`) are
//!   distinguished so logs and tests can tell "never trained" from "bad
//!   file", even though the recovery action (retrain) is the same.
//! - Request errors (`InvalidRequest`, `InvalidShape`) are caught per
//!   request and surfaced to the caller as a 400 response.

use thiserror::Error;

/// Errors that can occur in calificar operations
#[derive(Debug, Error)]
pub enum CalificarError {
    /// Training dataset file does not exist
    #[error("dataset file not found: {path}")]
    DatasetNotFound {
        /// Path that was probed
        path: String,
    },

    /// Dataset header lacks a required column
    #[error("dataset missing required column '{column}'")]
    MissingColumn {
        /// Name of the absent column
        column: String,
    },

    /// Dataset contents could not be parsed
    #[error("failed to parse dataset: {reason}")]
    DatasetParse {
        /// Why parsing failed
        reason: String,
    },

    /// Persisted artifact file does not exist
    #[error("artifact not found: {path}")]
    ArtifactNotFound {
        /// Path that was probed
        path: String,
    },

    /// Persisted artifact exists but could not be deserialized
    #[error("artifact corrupt: {path}: {reason}")]
    ArtifactCorrupt {
        /// Path of the unreadable artifact
        path: String,
        /// Deserialization failure detail
        reason: String,
    },

    /// Matrix or row dimensions do not match what a fitted component expects
    #[error("invalid shape: {reason}")]
    InvalidShape {
        /// Description of the mismatch
        reason: String,
    },

    /// Request body could not be turned into a feature record
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Description of the problem
        reason: String,
    },

    /// Filesystem or serialization failure outside the cases above
    #[error("io error: {reason}")]
    Io {
        /// Underlying error detail
        reason: String,
    },
}

/// Result type alias for calificar operations
pub type Result<T> = std::result::Result<T, CalificarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_column() {
        let err = CalificarError::MissingColumn {
            column: "G3".to_string(),
        };
        assert_eq!(err.to_string(), "dataset missing required column 'G3'");
    }

    #[test]
    fn test_error_display_dataset_not_found() {
        let err = CalificarError::DatasetNotFound {
            path: "student-mat.csv".to_string(),
        };
        assert!(err.to_string().contains("student-mat.csv"));
    }

    #[test]
    fn test_error_display_artifact_kinds_distinct() {
        let missing = CalificarError::ArtifactNotFound {
            path: "model.bin".to_string(),
        };
        let corrupt = CalificarError::ArtifactCorrupt {
            path: "model.bin".to_string(),
            reason: "unexpected end of file".to_string(),
        };
        assert_ne!(missing.to_string(), corrupt.to_string());
        assert!(corrupt.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn test_error_display_invalid_shape() {
        let err = CalificarError::InvalidShape {
            reason: "expected 5 features, got 3".to_string(),
        };
        assert!(err.to_string().starts_with("invalid shape"));
    }
}
