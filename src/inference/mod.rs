//! Model capability and the model implementations the service can load.
//!
//! A model is opaque to the rest of the service: it declares its input
//! arity, produces a score and may produce a class distribution.

pub mod forest;
pub mod linear;
pub mod loader;

pub use forest::ForestClassifier;
pub use linear::LinearRegressor;
pub use loader::{load_model, load_startup_model, ModelFile, ModelLoadError};

use thiserror::Error;

/// Failure raised by a model while predicting
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("malformed model: {0}")]
    Malformed(String),

    #[error("model produced a non-finite value")]
    NonFinite,
}

/// Prediction capability shared by every request
///
/// Implementations are immutable after construction, so a single instance
/// is read concurrently without locking.
pub trait Model: Send + Sync {
    /// Number of input features expected
    fn n_features(&self) -> usize;

    /// Score for one feature vector
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;

    /// Class distribution for one feature vector, `None` if the model has none
    fn predict_proba(&self, _features: &[f64]) -> Option<Result<Vec<f64>, ModelError>> {
        None
    }
}

pub(crate) fn check_arity(expected: usize, features: &[f64]) -> Result<(), ModelError> {
    if features.len() != expected {
        return Err(ModelError::DimensionMismatch {
            expected,
            got: features.len(),
        });
    }
    Ok(())
}
