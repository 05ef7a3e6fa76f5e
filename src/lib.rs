//! 模型推理网关库
//! JWT 认证 + 单一推理端点

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
