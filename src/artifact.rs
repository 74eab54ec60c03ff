//! Binary artifact persistence
//!
//! Fitted models and scalers are serialized with bincode to fixed paths and
//! reloaded verbatim across process restarts. Load failures distinguish
//! "file absent" from "file unreadable" so the lifecycle layer can log which
//! one triggered a retrain.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CalificarError, Result};

/// Serialize `value` to `path`, overwriting any prior artifact.
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = bincode::serialize(value).map_err(|e| CalificarError::Io {
        reason: format!("failed to serialize artifact for {}: {e}", path.display()),
    })?;
    std::fs::write(path, bytes).map_err(|e| CalificarError::Io {
        reason: format!("failed to write {}: {e}", path.display()),
    })
}

/// Deserialize an artifact from `path`.
///
/// # Errors
///
/// Returns `ArtifactNotFound` when the file does not exist and
/// `ArtifactCorrupt` when it exists but cannot be deserialized.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CalificarError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        },
        Err(e) => {
            return Err(CalificarError::Io {
                reason: format!("failed to read {}: {e}", path.display()),
            });
        },
    };
    bincode::deserialize(&bytes).map_err(|e| CalificarError::ArtifactCorrupt {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
