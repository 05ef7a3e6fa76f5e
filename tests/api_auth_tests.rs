//! 认证 API 集成测试

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::*;
use model_gateway::{auth::jwt::JwtService, models::user::Role};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_success() {
    let app = create_test_app(Some(linear_model()));

    let (status, json) = send(
        &app,
        json_post(
            "/login",
            &json!({ "username": ADMIN.0, "password": ADMIN.1 }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["token_type"], "bearer");
    assert!(json["access_token"].as_str().unwrap().split('.').count() == 3);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_look_the_same() {
    let app = create_test_app(None);

    let (wrong_status, wrong_json) = send(
        &app,
        json_post(
            "/login",
            &json!({ "username": ADMIN.0, "password": "not-the-password" }),
            None,
        ),
    )
    .await;
    let (unknown_status, unknown_json) = send(
        &app,
        json_post(
            "/login",
            &json!({ "username": "mallory", "password": ADMIN.1 }),
            None,
        ),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_json["error"]["message"],
        unknown_json["error"]["message"]
    );
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let app = create_test_app(None);

    for body in [
        json!({ "username": "alice" }),
        json!({ "username": "alice", "password": 42 }),
    ] {
        let (status, json) = send(&app, json_post("/login", &body, None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], 400);
    }
}

#[tokio::test]
async fn test_login_without_json_content_type() {
    let app = create_test_app(None);

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .body(Body::from(
            json!({ "username": ADMIN.0, "password": ADMIN.1 }).to_string(),
        ))
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], 400);
}

#[tokio::test]
async fn test_login_rejects_oversized_body() {
    let app = create_test_app(None);
    let padding = "x".repeat(70_000);
    let body = json!({ "username": padding, "password": "p" }).to_string();

    // 声明了 Content-Length 时由限流层直接拒绝
    let declared = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body.clone()))
        .unwrap();
    let (status, json) = send(&app, declared).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"]["code"], 413);

    // 未声明长度时在读取请求体时超限
    let streamed = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let (status, json) = send(&app, streamed).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"]["message"], "Request body too large");
}

#[tokio::test]
async fn test_current_user_with_token() {
    let app = create_test_app(None);
    let token = login(&app, USER.0, USER.1).await;

    let (status, json) = send(&app, get("/users/me", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["username"], USER.0);
    assert_eq!(json["email"], "bob@example.com");
    assert_eq!(json["phone"], "555-0101");
    assert_eq!(json["role"], "user");
    assert!(json.get("password_hash").is_none());
    assert!(json.get("hashed_password").is_none());
}

#[tokio::test]
async fn test_current_user_without_token() {
    let app = create_test_app(None);

    let response = app.clone().oneshot(get("/users/me", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected() {
    let app = create_test_app(None);
    let token = login(&app, USER.0, USER.1).await;

    let request = Request::builder()
        .method("GET")
        .uri("/users/me")
        .header(header::AUTHORIZATION, format!("Basic {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_lowercase_bearer_scheme_is_accepted() {
    let app = create_test_app(None);
    let token = login(&app, USER.0, USER.1).await;

    let request = Request::builder()
        .method("GET")
        .uri("/users/me")
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = create_test_app(None);

    let (status, json) = send(&app, get("/users/me", Some("not.a.token"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["message"], "Could not validate credentials");
}

#[tokio::test]
async fn test_error_request_id_matches_header() {
    let app = create_test_app(None);

    let response = app
        .clone()
        .oneshot(get("/users/me", Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    let header_id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert!(!header_id.is_empty());
    assert_eq!(json["error"]["request_id"], header_id.as_str());
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = create_test_app(None);
    let jwt = JwtService::new(TEST_SECRET.as_bytes(), Duration::seconds(300)).unwrap();
    let token = jwt
        .issue_at(
            USER.0,
            Role::User,
            Duration::seconds(300),
            Utc::now() - Duration::seconds(301),
        )
        .unwrap();

    let (status, _) = send(&app, get("/users/me", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_another_secret_is_rejected() {
    let app = create_test_app(None);
    let foreign =
        JwtService::new(b"some-other-deployment-secret-0123456789", Duration::seconds(300))
            .unwrap();
    let token = foreign.issue_access_token(ADMIN.0, Role::Admin).unwrap();

    let (status, _) = send(&app, get("/users/me", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_subject_is_rejected() {
    let app = create_test_app(None);
    let jwt = JwtService::new(TEST_SECRET.as_bytes(), Duration::seconds(300)).unwrap();
    let token = jwt.issue_access_token("ghost", Role::Admin).unwrap();

    let (status, _) = send(&app, get("/users/me", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_directory_for_admin_is_redacted() {
    let app = create_test_app(None);
    let token = login(&app, ADMIN.0, ADMIN.1).await;

    let (status, json) = send(&app, get("/users/", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    let directory = json.as_object().unwrap();
    assert_eq!(directory.len(), 2);
    assert_eq!(json["alice"]["role"], "admin");
    assert_eq!(json["bob"]["email"], "bob@example.com");
    for entry in directory.values() {
        assert_eq!(entry["hashed_password"], "<redacted>");
    }
    assert!(!json.to_string().contains("$2"));
}

#[tokio::test]
async fn test_user_directory_forbidden_for_plain_user() {
    let app = create_test_app(None);
    let token = login(&app, USER.0, USER.1).await;

    let (status, json) = send(&app, get("/users/", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], 403);
}

#[tokio::test]
async fn test_user_directory_requires_token() {
    let app = create_test_app(None);

    let (status, _) = send(&app, get("/users/", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
