//! 测试公共模块
//! 提供测试配置、假模型、应用构建与请求辅助函数

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use model_gateway::{
    auth::password::PasswordHasher,
    config::{AppConfig, LoggingConfig, ModelConfig, SecurityConfig, ServerConfig},
    inference::{LinearRegressor, Model, ModelError},
    middleware::AppState,
    models::user::{CredentialRecord, Role},
    repository::StaticCredentialStore,
};
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

pub const ADMIN: (&str, &str) = ("alice", "wonderland");
pub const USER: (&str, &str) = ("bob", "builder-pass");

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
            max_body_bytes: 65536,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            access_token_exp_secs: 300,
            bcrypt_cost: 4,
        },
        model: ModelConfig {
            path: "models/model.json".to_string(),
        },
    }
}

/// 低成本哈希的测试用户目录
pub fn create_test_store() -> StaticCredentialStore {
    let hasher = PasswordHasher::with_cost(4);
    StaticCredentialStore::new([
        CredentialRecord {
            username: ADMIN.0.to_string(),
            password_hash: hasher.hash(ADMIN.1).expect("hash"),
            phone: "555-0100".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Admin,
        },
        CredentialRecord {
            username: USER.0.to_string(),
            password_hash: hasher.hash(USER.1).expect("hash"),
            phone: "555-0101".to_string(),
            email: "bob@example.com".to_string(),
            role: Role::User,
        },
    ])
}

/// 四维线性模型，没有概率分布
pub fn linear_model() -> Arc<dyn Model> {
    Arc::new(LinearRegressor::new(vec![1.0, 1.0, 1.0, 1.0], 0.0).expect("linear model"))
}

/// 仓库自带的示例森林模型
pub fn sample_forest() -> Arc<dyn Model> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("models/model.json");
    model_gateway::inference::load_model(path).expect("sample model")
}

/// 声明维度正常但每次预测都失败的模型
pub struct FaultyModel {
    pub n_features: usize,
}

impl Model for FaultyModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, _features: &[f64]) -> Result<f64, ModelError> {
        Err(ModelError::Malformed("internal table corrupted".to_string()))
    }
}

/// 创建测试应用状态
pub fn create_test_app_state(model: Option<Arc<dyn Model>>) -> Arc<AppState> {
    Arc::new(
        AppState::new(create_test_config(), Arc::new(create_test_store()), model)
            .expect("Failed to create app state"),
    )
}

/// 创建测试应用
pub fn create_test_app(model: Option<Arc<dyn Model>>) -> Router {
    model_gateway::routes::create_router(create_test_app_state(model))
}

/// 发送请求并解析 JSON 响应体
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn json_post(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// 登录并返回访问令牌
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, json) = send(
        app,
        json_post(
            "/login",
            &json!({ "username": username, "password": password }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", json);
    json["access_token"].as_str().unwrap().to_string()
}
