//! Business logic services layer

pub mod auth_service;
pub mod inference_service;

pub use auth_service::AuthService;
pub use inference_service::{HealthReport, HealthStatus, InferenceService};
