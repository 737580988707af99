use std::net::SocketAddr;
use std::sync::Arc;

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
                max_requests: 5,
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
    "203.0.113.50:40000".parse().unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(router: &axum::Router, uri: &str) -> axum::response::Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app::build(test_config());
    let admin = gatehouse_admin::build_router(Arc::clone(&app.admin_state));

    let response = get(&admin, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_config_endpoint_reflects_policies() {
    let app = app::build(test_config());
    let admin = gatehouse_admin::build_router(Arc::clone(&app.admin_state));

    let response = get(&admin, "/api/config").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["policies"][0]["name"], "auth");
    assert_eq!(body["policies"][0]["max_requests"], 5);
}

#[tokio::test]
async fn test_denial_shows_up_in_stats_events_and_metrics() {
    let app = app::build(test_config());
    let router = app::build_app_router(&app);
    let admin = gatehouse_admin::build_router(Arc::clone(&app.admin_state));

    // Drive one clean request and one heuristic denial through the gate
    let ok = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/ping")
                .extension(ConnectInfo(remote()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let denied = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/ping")
                .header(header::USER_AGENT, "nikto/2.5")
                .extension(ConnectInfo(remote()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    // Stats reflect both
    let stats = body_json(get(&admin, "/api/stats").await).await;
    assert_eq!(stats["total_requests"], 2);
    assert_eq!(stats["denials"]["suspicious"], 1);
    assert_eq!(stats["denials"]["rate_limited"], 0);

    // The denial produced exactly one event, newest first
    let events = body_json(get(&admin, "/api/events").await).await;
    assert_eq!(events["total"], 1);
    assert_eq!(events["events"][0]["kind"], "suspicious_request");
    assert_eq!(events["events"][0]["identity"], "203.0.113.50");
    assert_eq!(events["events"][0]["endpoint"], "/api/ping");

    // Filtering by kind
    let filtered = body_json(get(&admin, "/api/events?kind=csrf_failure").await).await;
    assert_eq!(filtered["total"], 0);

    // Prometheus exposition carries the counters
    let metrics = get(&admin, "/api/metrics").await;
    assert_eq!(metrics.status(), StatusCode::OK);
    let text = metrics.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(text.to_vec()).unwrap();
    assert!(text.contains("gatehouse_requests_total 2"));
    assert!(text.contains("gatehouse_denials_total"));
}
