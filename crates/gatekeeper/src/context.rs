/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The identity has an active temporary block.
    Blocked,
    /// The governing policy's window limit was exceeded.
    RateLimited,
    /// A mutating request failed CSRF validation.
    CsrfInvalid,
    /// The integrity heuristic flagged the request headers.
    Suspicious,
}

impl DenyReason {
    /// Stable wire label used in JSON bodies, metric labels, and event detail.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Blocked => "blocked",
            DenyReason::RateLimited => "rate_limited",
            DenyReason::CsrfInvalid => "csrf_invalid",
            DenyReason::Suspicious => "suspicious",
        }
    }

    /// Client-facing message for the denial body. Deliberately vague: the
    /// response never explains which internal check fired or what state the
    /// gatekeeper holds for the caller.
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::Blocked => "temporarily blocked",
            DenyReason::RateLimited => "rate limit exceeded",
            DenyReason::CsrfInvalid => "invalid csrf token",
            DenyReason::Suspicious => "request rejected",
        }
    }
}

/// The outcome of evaluating one request.
#[derive(Debug, Clone)]
pub struct Decision {
    /// Resolved client identity the decision applies to.
    pub identity: String,
    /// Name of the policy that governed the rate-limit stage.
    pub policy: String,
    /// `None` means the request may proceed.
    pub reason: Option<DenyReason>,
}

impl Decision {
    pub fn allow(identity: impl Into<String>, policy: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            policy: policy.into(),
            reason: None,
        }
    }

    pub fn deny(
        identity: impl Into<String>,
        policy: impl Into<String>,
        reason: DenyReason,
    ) -> Self {
        Self {
            identity: identity.into(),
            policy: policy.into(),
            reason: Some(reason),
        }
    }

    pub fn allowed(&self) -> bool {
        self.reason.is_none()
    }
}
