use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a security event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A request exceeded its policy's window limit.
    RateLimitExceeded,
    /// The auth policy was exhausted; the identity also gets blocked.
    AuthRateLimitExceeded,
    /// A mutating request failed CSRF validation.
    CsrfFailure,
    /// The integrity heuristic flagged the request headers.
    SuspiciousRequest,
    /// A request arrived from an identity with an active block.
    BlockedRequest,
    /// Reported by the authentication collaborator, not by the gatekeeper.
    LoginFailure,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::RateLimitExceeded => "rate_limit_exceeded",
            EventKind::AuthRateLimitExceeded => "auth_rate_limit_exceeded",
            EventKind::CsrfFailure => "csrf_failure",
            EventKind::SuspiciousRequest => "suspicious_request",
            EventKind::BlockedRequest => "blocked_request",
            EventKind::LoginFailure => "login_failure",
        }
    }
}

/// A single security event. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: Uuid,
    pub kind: EventKind,
    pub identity: String,
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
    pub detail: String,
}

impl SecurityEvent {
    pub fn new(
        kind: EventKind,
        identity: impl Into<String>,
        endpoint: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            identity: identity.into(),
            endpoint: endpoint.into(),
            timestamp: Utc::now(),
            detail: detail.into(),
        }
    }
}
