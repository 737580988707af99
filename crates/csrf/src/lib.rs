//! CSRF token issuance and validation.
//!
//! Tokens are opaque random strings bound to a session. Validation never
//! rotates the token and compares in constant time; session lookup goes
//! through the [`SessionStore`] trait so the gatekeeper stays decoupled from
//! the session backend.

pub mod session;
pub mod token;

pub use session::{extract_session_cookie, MemorySessionStore, SessionStore, SessionStoreError};
pub use token::{constant_time_eq, generate_token, validate};
