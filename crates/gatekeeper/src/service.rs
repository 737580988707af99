use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, Method};
use tracing::{info, warn};

use gatehouse_admin::GatekeeperMetrics;
use gatehouse_block_registry::BlockRegistry;
use gatehouse_common::{AppConfig, CsrfConfig};
use gatehouse_csrf::{extract_session_cookie, SessionStore};
use gatehouse_events::{EventKind, EventSink, SecurityEvent};
use gatehouse_rate_limit::{Policy, PolicyTable, SlidingWindowStore};

use crate::classifier::RouteClassifier;
use crate::context::{Decision, DenyReason};
use crate::identity;

/// Exhausting this policy escalates to a temporary block.
const AUTH_POLICY: &str = "auth";

/// The per-request decision engine.
///
/// Checks run in a fixed order: block registry, sliding-window limit under
/// the route's policy, CSRF for mutating methods, then the integrity
/// heuristic. The first failing check wins, emits exactly one security
/// event, and no later check runs. An allowed request emits nothing.
///
/// All state lives behind shared handles; `evaluate` is called concurrently
/// from every request task without further coordination.
pub struct Gatekeeper {
    policies: PolicyTable,
    classifier: RouteClassifier,
    windows: Arc<SlidingWindowStore>,
    blocks: Arc<BlockRegistry>,
    events: Arc<EventSink>,
    sessions: Arc<dyn SessionStore>,
    metrics: Arc<GatekeeperMetrics>,
    csrf: CsrfConfig,
    extra_patterns: Vec<String>,
    auth_block: Duration,
}

impl Gatekeeper {
    pub fn new(
        config: &AppConfig,
        windows: Arc<SlidingWindowStore>,
        blocks: Arc<BlockRegistry>,
        events: Arc<EventSink>,
        sessions: Arc<dyn SessionStore>,
        metrics: Arc<GatekeeperMetrics>,
    ) -> Self {
        let policies = PolicyTable::new(
            config
                .policies
                .iter()
                .map(|p| {
                    Policy::new(
                        p.name.clone(),
                        p.max_requests,
                        Duration::from_secs(p.window_secs),
                    )
                })
                .collect(),
        );
        let classifier = RouteClassifier::new(config.routes.clone());

        info!(
            policies = policies.len(),
            routes = config.routes.len(),
            auth_block_secs = config.gatekeeper.auth_block_secs,
            "gatekeeper initialized"
        );

        Self {
            policies,
            classifier,
            windows,
            blocks,
            events,
            sessions,
            metrics,
            csrf: config.csrf.clone(),
            extra_patterns: config.heuristic.extra_patterns.clone(),
            auth_block: Duration::from_secs(config.gatekeeper.auth_block_secs),
        }
    }

    /// Decide whether one request may proceed.
    ///
    /// Never fails and never blocks: every check is an in-memory lookup.
    /// Denials are ordinary [`Decision`] values, not errors.
    pub fn evaluate(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
        remote_addr: SocketAddr,
    ) -> Decision {
        let identity = identity::resolve(headers, remote_addr);
        let policy_name = self.classifier.classify(path);

        if self.blocks.is_blocked(&identity) {
            self.record_event(
                EventKind::BlockedRequest,
                &identity,
                path,
                "request during active block",
            );
            return Decision::deny(identity, policy_name, DenyReason::Blocked);
        }

        let policy = self.governing_policy(policy_name);
        let policy_label = policy.map(|p| p.name.as_str()).unwrap_or(policy_name);

        if let Some(policy) = policy {
            if !self.windows.allow(&identity, policy) {
                return self.deny_rate_limited(identity, policy, path);
            }
        }

        if !is_safe_method(method) && !self.csrf_valid(headers) {
            self.record_event(
                EventKind::CsrfFailure,
                &identity,
                path,
                format!("{} without valid csrf token", method),
            );
            return Decision::deny(identity, policy_label, DenyReason::CsrfInvalid);
        }

        let user_agent = headers.get("user-agent").and_then(|v| v.to_str().ok());
        let referer = headers.get("referer").and_then(|v| v.to_str().ok());
        if gatehouse_heuristic::looks_suspicious(user_agent, referer, &self.extra_patterns) {
            self.record_event(
                EventKind::SuspiciousRequest,
                &identity,
                path,
                "denylisted pattern in request headers",
            );
            return Decision::deny(identity, policy_label, DenyReason::Suspicious);
        }

        Decision::allow(identity, policy_label)
    }

    /// Feed a security event into the sink. Also the entry point for
    /// collaborators, e.g. an authentication module reporting a failed login.
    pub fn record_event(
        &self,
        kind: EventKind,
        identity: &str,
        endpoint: &str,
        detail: impl Into<String>,
    ) {
        self.events
            .record(SecurityEvent::new(kind, identity, endpoint, detail));
    }

    /// Retention horizon for periodic sweeps: twice the longest policy
    /// window, so no timestamp still relevant to any policy is ever evicted.
    pub fn retention_horizon(&self) -> Duration {
        self.policies.max_window() * 2
    }

    pub fn metrics(&self) -> &GatekeeperMetrics {
        &self.metrics
    }

    /// The policy named by the classifier, or the `api` fallback when the
    /// table has no such entry. `None` only in the degenerate configuration
    /// where the fallback itself is undefined; the rate stage is skipped then.
    fn governing_policy(&self, name: &str) -> Option<&Policy> {
        self.policies
            .get(name)
            .or_else(|| self.policies.get(crate::classifier::FALLBACK_POLICY))
    }

    fn deny_rate_limited(&self, identity: String, policy: &Policy, path: &str) -> Decision {
        if policy.name == AUTH_POLICY {
            self.blocks.block(&identity, self.auth_block);
            self.metrics.blocks_applied_total.inc();
            self.record_event(
                EventKind::AuthRateLimitExceeded,
                &identity,
                path,
                format!("blocked for {}s", self.auth_block.as_secs()),
            );
        } else {
            self.record_event(
                EventKind::RateLimitExceeded,
                &identity,
                path,
                format!(
                    "limit {} per {}s on policy {}",
                    policy.max_requests,
                    policy.window.as_secs(),
                    policy.name
                ),
            );
        }
        Decision::deny(identity, policy.name.clone(), DenyReason::RateLimited)
    }

    /// CSRF check for a mutating request. The session cookie names the
    /// session; the comparison token travels in the configured header. Any
    /// gap in that chain, including a session-store failure, reads as
    /// invalid: validity that cannot be determined fails closed.
    fn csrf_valid(&self, headers: &HeaderMap) -> bool {
        let session_id = match headers
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .and_then(|cookies| extract_session_cookie(cookies, &self.csrf.cookie_name))
        {
            Some(id) => id,
            None => return false,
        };

        let stored = match self.sessions.csrf_token(&session_id) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "session store lookup failed, denying mutating request");
                return false;
            }
        };

        let supplied = headers
            .get(self.csrf.header_name.as_str())
            .and_then(|v| v.to_str().ok());

        gatehouse_csrf::validate(stored.as_deref(), supplied)
    }
}

fn is_safe_method(method: &Method) -> bool {
    *method == Method::GET
        || *method == Method::HEAD
        || *method == Method::OPTIONS
        || *method == Method::TRACE
}
