//! 认证服务：登录

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::auth::{LoginRequest, TokenResponse},
    repository::CredentialStore,
};
use std::sync::Arc;

pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        jwt_service: Arc<JwtService>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            credentials,
            jwt_service,
            hasher,
        }
    }

    /// 用户登录
    ///
    /// 用户不存在与密码错误返回同一个 401。
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, AppError> {
        let Some(user) = self.credentials.find(&req.username).await? else {
            tracing::warn!(username = %req.username, "Login failed: unknown user");
            return Err(AppError::Unauthorized);
        };

        // bcrypt 为 CPU 密集操作，放入阻塞线程池
        let hasher = self.hasher.clone();
        let password_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || {
            hasher.verify(&req.password, &password_hash)
        })
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {:?}", e);
            AppError::internal_error("Password verification task failed")
        })?;

        if !verified {
            tracing::warn!(username = %user.username, "Login failed: wrong password");
            return Err(AppError::Unauthorized);
        }

        let access_token = self
            .jwt_service
            .issue_access_token(&user.username, user.role)?;

        tracing::info!(username = %user.username, role = %user.role, "Login succeeded");

        Ok(TokenResponse::bearer(access_token))
    }
}
