//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, VerifiedClaims};
pub use middleware::{authenticate, extract_token, jwt_auth_middleware, AuthenticatedIdentity};
pub use password::PasswordHasher;
