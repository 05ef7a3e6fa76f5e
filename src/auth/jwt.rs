//! JWT token issuing and validation
//!
//! Tokens are stateless: nothing is stored server-side, validity is the
//! signature plus the `exp` claim. There is no refresh token.

use crate::{
    config::AppConfig,
    error::{AppError, AuthRejection},
    models::user::Role,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Minimum secret length accepted for HS256
pub const MIN_SECRET_LEN: usize = 32;

/// Wire claims
///
/// `sub` and `role` are optional on the wire so that a token missing either
/// decodes and is then rejected as [`AuthRejection::MissingClaim`].
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// User role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Claims of a token that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub subject: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_ttl: Duration,
}

impl JwtService {
    /// Create JWT service from a raw secret
    pub fn new(secret: &[u8], access_token_ttl: Duration) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_token_ttl,
        })
    }

    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            config.security.jwt_secret.expose_secret().as_bytes(),
            Duration::seconds(config.security.access_token_exp_secs as i64),
        )
    }

    /// Issue an access token with the default lifetime
    pub fn issue_access_token(&self, subject: &str, role: Role) -> Result<String, AppError> {
        self.issue(subject, role, self.access_token_ttl)
    }

    /// Issue a token that expires `ttl` from now
    pub fn issue(&self, subject: &str, role: Role, ttl: Duration) -> Result<String, AppError> {
        self.issue_at(subject, role, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expiration = now + ttl;

        let claims = Claims {
            sub: Some(subject.to_string()),
            role: Some(role),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AppError::Internal(format!("Failed to encode access token: {}", e))
        })
    }

    /// Validate and decode a token
    pub fn validate(&self, token: &str) -> Result<VerifiedClaims, AuthRejection> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`
    ///
    /// A token is live while `now < exp`; at `exp` it is already expired.
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<VerifiedClaims, AuthRejection> {
        let mut validation = Validation::new(self.algorithm);
        // expiry is checked below against the supplied clock, without leeway
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature => AuthRejection::BadSignature,
                    ErrorKind::InvalidAlgorithm => AuthRejection::AlgorithmMismatch,
                    ErrorKind::ExpiredSignature => AuthRejection::Expired,
                    ErrorKind::MissingRequiredClaim(_) => AuthRejection::MissingClaim,
                    _ => AuthRejection::Malformed,
                };
                tracing::debug!("Token validation failed: {:?}", e);
                reason
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            tracing::debug!(exp = claims.exp, "Token expired");
            return Err(AuthRejection::Expired);
        }

        let (Some(subject), Some(role)) = (claims.sub, claims.role) else {
            return Err(AuthRejection::MissingClaim);
        };

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(AuthRejection::Malformed)?;

        Ok(VerifiedClaims {
            subject,
            role,
            expires_at,
        })
    }
}
