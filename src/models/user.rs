//! User domain models

use serde::{Deserialize, Serialize};
use std::fmt;

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored credential record
///
/// Immutable once the store is built.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
}

/// Public profile returned by `/users/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
}

/// Directory entry returned by `/users/`, password hash redacted
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    pub username: String,
    pub hashed_password: &'static str,
    pub phone: String,
    pub email: String,
    pub role: Role,
}

pub const REDACTED: &str = "<redacted>";

impl From<&CredentialRecord> for DirectoryEntry {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            username: record.username.clone(),
            hashed_password: REDACTED,
            phone: record.phone.clone(),
            email: record.email.clone(),
            role: record.role,
        }
    }
}
