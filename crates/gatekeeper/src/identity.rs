use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Resolve the client identity used for rate limiting and blocking.
///
/// Precedence: first comma-separated element of `X-Forwarded-For`, then
/// `X-Real-IP`, then the transport remote address. Header values are taken
/// as opaque identifiers without syntax validation, so a malformed value
/// simply becomes its own bucket. The headers are trusted unconditionally
/// and are only meaningful behind a proxy that sets them; exposed directly,
/// callers can pick their own bucket.
pub fn resolve(headers: &HeaderMap, remote_addr: SocketAddr) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim())
    {
        if !forwarded.is_empty() {
            return forwarded.to_string();
        }
    }

    if let Some(real_ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
    {
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    remote_addr.ip().to_string()
}
