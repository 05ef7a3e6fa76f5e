//! 预测 HTTP 处理器

use crate::{
    auth::middleware::AuthenticatedIdentity,
    error::AppError,
    middleware::AppState,
    models::prediction::*,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

/// 预测
///
/// 模型未加载时直接返回 503，不看请求体。
pub async fn predict(
    State(state): State<Arc<AppState>>,
    identity: AuthenticatedIdentity,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    state.inference.require_model()?;

    let Json(req) = payload?;
    req.validate()
        .map_err(|e| AppError::BadRequest(first_message(&e)))?;

    let response = state.inference.predict(req.features).await?;

    tracing::info!(
        username = %identity.username,
        prediction = response.prediction,
        "Prediction completed"
    );

    Ok(Json(response))
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
