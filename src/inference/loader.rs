//! Model file loading.
//!
//! A missing file is fatal at startup. An unreadable or corrupt file is not:
//! the service starts without a model and reports itself unavailable.

use super::{ForestClassifier, LinearRegressor, Model};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read model file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model file {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
}

impl ModelLoadError {
    /// Whether startup must stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, ModelLoadError::NotFound(_))
    }
}

/// Model file contents, tagged by `kind`
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelFile {
    Forest(ForestClassifier),
    Linear(LinearRegressor),
}

impl ModelFile {
    pub fn into_model(self) -> Arc<dyn Model> {
        match self {
            ModelFile::Forest(forest) => Arc::new(forest),
            ModelFile::Linear(linear) => Arc::new(linear),
        }
    }
}

/// Load a model from a JSON file
pub fn load_model(path: impl AsRef<Path>) -> Result<Arc<dyn Model>, ModelLoadError> {
    let path = path.as_ref();

    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelLoadError::NotFound(path.to_path_buf())
        } else {
            ModelLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let file: ModelFile = serde_json::from_str(&raw).map_err(|e| ModelLoadError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(file.into_model())
}

/// Load the model at startup
///
/// Returns `Err` only for fatal failures; recoverable ones are logged and
/// yield `Ok(None)`.
pub fn load_startup_model(
    path: impl AsRef<Path>,
) -> Result<Option<Arc<dyn Model>>, ModelLoadError> {
    match load_model(path.as_ref()) {
        Ok(model) => {
            tracing::info!(
                path = %path.as_ref().display(),
                n_features = model.n_features(),
                "Model loaded"
            );
            Ok(Some(model))
        }
        Err(e) if e.is_fatal() => {
            tracing::error!(error = %e, "Model file not found");
            Err(e)
        }
        Err(e) => {
            tracing::error!(error = %e, "Model could not be loaded, serving without a model");
            Ok(None)
        }
    }
}
