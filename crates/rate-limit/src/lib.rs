//! Per-identity sliding-window rate limiting.
//!
//! The store keeps an ordered timestamp log per `(identity, policy)` pair and
//! enforces hard per-window caps: prune, count, then append, all under the
//! entry's shard lock. That makes the limit exact under concurrency at the
//! cost of `max_requests` timestamps of memory per active key.
//!
//! Policies are named `{max_requests, window}` pairs defined once at startup
//! and looked up through [`PolicyTable`]; which policy governs a request is
//! the caller's decision.

pub mod policy;
pub mod sliding_window;

pub use policy::{Policy, PolicyTable};
pub use sliding_window::SlidingWindowStore;
