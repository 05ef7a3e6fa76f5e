//! HTTP 中间件与应用状态
//! 请求追踪

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::AppConfig,
    error::{AppError, ErrorDetail},
    inference::Model,
    repository::CredentialStore,
    services::{AuthService, InferenceService},
};

/// 应用状态
///
/// 启动时构建一次，通过 `State<Arc<AppState>>` 注入每个 handler，之后只读。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub credentials: Arc<dyn CredentialStore>,
    pub jwt_service: Arc<JwtService>,
    pub auth_service: Arc<AuthService>,
    pub inference: Arc<InferenceService>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        credentials: Arc<dyn CredentialStore>,
        model: Option<Arc<dyn Model>>,
    ) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config(&config)?);
        let auth_service = Arc::new(AuthService::new(
            credentials.clone(),
            jwt_service.clone(),
            PasswordHasher::from_config(&config),
        ));

        Ok(Self {
            config,
            credentials,
            jwt_service,
            auth_service,
            inference: Arc::new(InferenceService::new(model)),
        })
    }
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标；
/// 错误响应体中的 request_id 与 `x-request-id` 头一致
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = finalize_error_body(next.run(req).await, &request_id);

        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        metrics::counter!(
            "http_requests_total",
            "method" => method_label(&method),
            "status" => status_label(status)
        )
        .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 统一错误响应体
///
/// `AppError` 生成的响应在扩展里带有 [`ErrorDetail`]，在此写入 request_id 后重建响应体。
/// 框架层直接返回的非 JSON 错误（如请求体超限的 413、405）包装成同样的格式。
fn finalize_error_body(response: Response, request_id: &str) -> Response {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let detail = match parts.extensions.remove::<ErrorDetail>() {
        Some(detail) => detail,
        None if is_json(&parts.headers) => return Response::from_parts(parts, body),
        None => ErrorDetail::new(
            status,
            status.canonical_reason().unwrap_or("Request failed"),
        ),
    };

    let mut rebuilt = ErrorDetail {
        request_id: request_id.to_string(),
        ..detail
    }
    .into_response_with_status(status);

    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    rebuilt.headers_mut().extend(parts.headers);
    rebuilt
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        _ => "UNKNOWN",
    }
}

fn status_label(status: u16) -> &'static str {
    match status {
        200 => "200",
        400 => "400",
        401 => "401",
        403 => "403",
        404 => "404",
        413 => "413",
        422 => "422",
        500 => "500",
        503 => "503",
        _ => "other",
    }
}
