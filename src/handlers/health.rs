//! 健康检查与根路由处理器

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{error::AppError, middleware::AppState, services::HealthReport};

/// 健康检查
/// 对模型做冒烟预测，健康返回 200，否则 503
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    let report = state.inference.health_report().await;

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}

/// 根路由
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome!" }))
}

/// 未匹配的路由
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
