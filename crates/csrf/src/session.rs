use dashmap::DashMap;
use thiserror::Error;

use crate::token::generate_token;

/// The session backend failed to answer. Callers treat this as "validity
/// unknown" and deny the mutating request rather than wave it through.
#[derive(Debug, Error)]
#[error("session store unavailable: {0}")]
pub struct SessionStoreError(pub String);

/// Lookup seam between the gatekeeper and whatever owns sessions.
///
/// Implementations must be cheap and non-blocking; the gatekeeper calls this
/// inline on the request path.
pub trait SessionStore: Send + Sync {
    /// The CSRF token bound to `session_id`, or `None` if no such session.
    fn csrf_token(&self, session_id: &str) -> Result<Option<String>, SessionStoreError>;
}

/// In-memory session store. The demo host uses it directly; production
/// deployments implement [`SessionStore`] over their real session backend.
pub struct MemorySessionStore {
    sessions: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a session with a fresh CSRF token. Returns `(session_id, token)`.
    pub fn create_session(&self) -> (String, String) {
        let session_id = generate_token();
        let token = generate_token();
        self.sessions.insert(session_id.clone(), token.clone());
        (session_id, token)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn csrf_token(&self, session_id: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self
            .sessions
            .get(session_id)
            .map(|entry| entry.value().clone()))
    }
}

/// Extract the value of `cookie_name` from a Cookie header.
pub fn extract_session_cookie(cookie_header: &str, cookie_name: &str) -> Option<String> {
    for pair in cookie_header.split(';') {
        let pair = pair.trim();
        if let Some((name, value)) = pair.split_once('=') {
            if name == cookie_name {
                return Some(value.to_string());
            }
        }
    }
    None
}
