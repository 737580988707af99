//! Security event recording.
//!
//! Every denial the gatekeeper makes produces exactly one [`SecurityEvent`],
//! emitted as a structured log line and retained in a bounded in-memory ring
//! for the ops surface. Collaborators (e.g. an authentication module
//! reporting failed logins) feed the same sink.

pub mod event;
pub mod sink;

pub use event::{EventKind, SecurityEvent};
pub use sink::EventSink;
