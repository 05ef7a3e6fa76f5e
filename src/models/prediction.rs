//! Prediction request and response bodies

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `/predict` request body
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PredictionRequest {
    #[validate(length(min = 1, message = "Feature vector must not be empty"))]
    pub features: Vec<f64>,
}

/// `/predict` response body
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub prediction: f64,
    pub probabilities: Option<Vec<f64>>,
}
