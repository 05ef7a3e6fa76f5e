//! JWT 认证中间件

use crate::{
    error::{AppError, AuthRejection},
    middleware::AppState,
    models::user::Role,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// 认证身份（附加到请求扩展）
///
/// 每个请求都从令牌声明重新推导，不做缓存。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub username: String,
    pub role: Role,
}

impl AuthenticatedIdentity {
    /// 要求特定角色
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            tracing::warn!(username = %self.username, role = %self.role, required = %role, "Role check failed");
            Err(AppError::Forbidden)
        }
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取身份
impl<S> FromRequestParts<S> for AuthenticatedIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取 Bearer 令牌
///
/// 方案名大小写不敏感。
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingHeader)?
        .to_str()
        .map_err(|_| AuthRejection::BadScheme)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AuthRejection::BadScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthRejection::BadScheme);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthRejection::BadScheme);
    }

    Ok(token)
}

/// 认证请求：提取令牌 -> 验证 -> 解析身份
pub async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedIdentity, AppError> {
    let token = extract_token(headers)?;
    let claims = state.jwt_service.validate(token)?;

    // 令牌有效但账户已不存在
    if state.credentials.find(&claims.subject).await?.is_none() {
        return Err(AuthRejection::UnknownSubject.into());
    }

    Ok(AuthenticatedIdentity {
        username: claims.subject,
        role: claims.role,
    })
}

/// JWT 认证中间件 - 必须认证
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = authenticate(&state, req.headers()).await?;

    tracing::debug!(username = %identity.username, role = %identity.role, "Request authenticated");

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
