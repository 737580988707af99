//! Request gatehouse: every request is evaluated before any handler runs.
//!
//! The [`service::Gatekeeper`] runs a fixed sequence of checks per request:
//! active block, sliding-window rate limit under the route's policy, CSRF
//! for mutating methods, then an integrity heuristic over request headers.
//! The first failing check denies the request and records a security event.
//!
//! [`app`] wires the shared stores, the axum middleware and the protected
//! router; [`reaper`] reclaims memory left behind by idle identities.

pub mod app;
pub mod classifier;
pub mod context;
pub mod identity;
pub mod middleware;
pub mod reaper;
pub mod service;

pub use context::{Decision, DenyReason};
pub use service::Gatekeeper;
