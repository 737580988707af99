use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::connect_info::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gatehouse_common::{AppConfig, PolicyConfig, RouteRule};
use gatehouse_gatekeeper::app;

fn test_config() -> AppConfig {
    AppConfig {
        policies: vec![
            PolicyConfig {
                name: "auth".to_string(),
                max_requests: 2,
                window_secs: 300,
            },
            PolicyConfig {
                name: "api".to_string(),
                max_requests: 100,
                window_secs: 60,
            },
        ],
        routes: vec![
            RouteRule {
                path_prefix: "/auth".to_string(),
                policy: "auth".to_string(),
            },
            RouteRule {
                path_prefix: "/api".to_string(),
                policy: "api".to_string(),
            },
        ],
        ..AppConfig::default()
    }
}

fn remote() -> SocketAddr {
    "198.51.100.9:40000".parse().unwrap()
}

fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(remote()))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_allowed_request_carries_security_headers() {
    let app = app::build(test_config());
    let router = app::build_app_router(&app);

    let response = router
        .oneshot(request("GET", "/api/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert_eq!(
        response.headers()["content-security-policy"],
        "default-src 'self'"
    );

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_auth_rate_limit_escalates_to_block() {
    let app = app::build(test_config());
    let router = app::build_app_router(&app);

    // Auth policy allows 2 per window
    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(request("GET", "/auth/csrf").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Third request trips the limit and applies a block
    let third = router
        .clone()
        .oneshot(request("GET", "/auth/csrf").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(third).await;
    assert_eq!(body["error"], "rate limit exceeded");

    // Fourth is answered by the block itself, on any path
    let fourth = router
        .clone()
        .oneshot(request("GET", "/api/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(fourth.status(), StatusCode::TOO_MANY_REQUESTS);
    // Denials carry the security headers too
    assert_eq!(fourth.headers()["x-content-type-options"], "nosniff");
    let body = body_json(fourth).await;
    assert_eq!(body["error"], "temporarily blocked");
}

#[tokio::test]
async fn test_csrf_roundtrip() {
    let app = app::build(test_config());
    let router = app::build_app_router(&app);

    // Obtain a session and its token
    let response = router
        .clone()
        .oneshot(request("GET", "/auth/csrf").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap()
        .to_string();
    let token = body_json(response).await["csrf_token"]
        .as_str()
        .unwrap()
        .to_string();

    // Mutating request with cookie and matching token passes
    let response = router
        .clone()
        .oneshot(
            request("POST", "/api/echo")
                .header(header::COOKIE, &cookie)
                .header("x-csrf-token", &token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"hello":"world"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["hello"], "world");

    // Same cookie with a wrong token is rejected
    let response = router
        .clone()
        .oneshot(
            request("POST", "/api/echo")
                .header(header::COOKIE, &cookie)
                .header("x-csrf-token", "not-the-token")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"hello":"world"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid csrf token");
}

#[tokio::test]
async fn test_mutating_without_session_rejected() {
    let app = app::build(test_config());
    let router = app::build_app_router(&app);

    let response = router
        .oneshot(
            request("POST", "/api/echo")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid csrf token");
}

#[tokio::test]
async fn test_scanner_user_agent_rejected() {
    let app = app::build(test_config());
    let router = app::build_app_router(&app);

    let response = router
        .oneshot(
            request("GET", "/api/ping")
                .header(header::USER_AGENT, "sqlmap/1.7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "request rejected");
}

#[tokio::test]
async fn test_unrouted_path_still_passes_the_gate() {
    let app = app::build(test_config());
    let router = app::build_app_router(&app);

    // No handler for the path, but the gate and headers still apply
    let response = router
        .oneshot(request("GET", "/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}
