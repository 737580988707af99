use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::info;

use crate::context::DenyReason;
use crate::service::Gatekeeper;

/// Request middleware: every request is evaluated before any handler runs.
///
/// Denied requests are answered here and never reach the inner router.
pub async fn gate(
    State(gatekeeper): State<Arc<Gatekeeper>>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let metrics = gatekeeper.metrics();
    metrics.requests_total.inc();

    let decision = gatekeeper.evaluate(&method, &path, request.headers(), remote_addr);

    if let Some(reason) = decision.reason {
        metrics
            .denials_total
            .with_label_values(&[reason.as_str()])
            .inc();
        info!(
            identity = %decision.identity,
            policy = %decision.policy,
            method = %method,
            path = %path,
            reason = reason.as_str(),
            "request denied"
        );
        return deny_response(reason);
    }

    let start = Instant::now();
    let response = next.run(request).await;

    metrics
        .request_duration
        .with_label_values(&[&decision.policy])
        .observe(start.elapsed().as_secs_f64());
    info!(
        identity = %decision.identity,
        policy = %decision.policy,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        "request completed"
    );

    response
}

/// Stamp baseline security headers on every response, including denials.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "x-xss-protection",
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static("default-src 'self'"),
    );
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    response
}

/// Rate pressure maps to 429, everything else to 403. The body carries the
/// deliberately vague client message, never the internal reason label.
fn deny_response(reason: DenyReason) -> Response {
    let status = match reason {
        DenyReason::Blocked | DenyReason::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        DenyReason::CsrfInvalid | DenyReason::Suspicious => StatusCode::FORBIDDEN,
    };
    (status, Json(json!({ "error": reason.message() }))).into_response()
}
