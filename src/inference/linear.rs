//! Linear regressor. Has no class distribution.

use super::{check_arity, Model, ModelError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LinearSpec {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "LinearSpec")]
pub struct LinearRegressor {
    weights: Vec<f64>,
    bias: f64,
}

impl TryFrom<LinearSpec> for LinearRegressor {
    type Error = ModelError;

    fn try_from(spec: LinearSpec) -> Result<Self, Self::Error> {
        Self::new(spec.weights, spec.bias)
    }
}

impl LinearRegressor {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self, ModelError> {
        if weights.is_empty() {
            return Err(ModelError::Malformed("linear model has no weights".to_string()));
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Malformed(
                "linear model has non-finite coefficients".to_string(),
            ));
        }
        Ok(Self { weights, bias })
    }
}

impl Model for LinearRegressor {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        check_arity(self.weights.len(), features)?;

        let score = self
            .weights
            .iter()
            .zip(features)
            .fold(self.bias, |acc, (w, x)| acc + w * x);

        if !score.is_finite() {
            return Err(ModelError::NonFinite);
        }
        Ok(score)
    }
}
