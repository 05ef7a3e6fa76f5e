//! 用户相关的 HTTP 处理器

use crate::{
    auth::middleware::AuthenticatedIdentity,
    error::AppError,
    middleware::AppState,
    models::user::*,
};
use axum::{extract::State, Json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 当前用户信息
pub async fn read_current_user(
    State(state): State<Arc<AppState>>,
    identity: AuthenticatedIdentity,
) -> Result<Json<UserResponse>, AppError> {
    let record = state
        .credentials
        .find(&identity.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(UserResponse {
        username: record.username,
        phone: record.phone,
        email: record.email,
        role: identity.role,
    }))
}

/// 用户目录（仅管理员，密码哈希已脱敏）
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    identity: AuthenticatedIdentity,
) -> Result<Json<BTreeMap<String, DirectoryEntry>>, AppError> {
    identity.require_role(Role::Admin)?;

    let directory = state
        .credentials
        .list()
        .await?
        .iter()
        .map(|record| (record.username.clone(), DirectoryEntry::from(record)))
        .collect();

    Ok(Json(directory))
}
