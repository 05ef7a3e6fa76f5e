//! Credential repository layer

pub mod credential_repo;

pub use credential_repo::{CredentialStore, StaticCredentialStore};
