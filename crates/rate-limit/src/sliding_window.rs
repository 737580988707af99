use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::policy::Policy;

/// A concurrent sliding-window counter store.
///
/// Each `(identity, policy)` pair owns an ordered log of request timestamps.
/// On every check the log is pruned to the policy's window, counted, and only
/// then appended to, so the limit is exact rather than an approximation: a
/// denied request is never recorded and cannot push later requests over the
/// edge.
pub struct SlidingWindowStore {
    windows: DashMap<(String, String), Vec<Instant>>,
}

impl SlidingWindowStore {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Check whether `identity` may make another request under `policy`,
    /// recording the request timestamp if it may.
    ///
    /// The prune-count-append sequence runs while holding the map entry, so
    /// two concurrent requests for the same key can never both observe
    /// `count == max_requests - 1` and both be admitted.
    pub fn allow(&self, identity: &str, policy: &Policy) -> bool {
        let now = Instant::now();

        let mut entry = self
            .windows
            .entry((identity.to_string(), policy.name.clone()))
            .or_insert_with(Vec::new);
        let timestamps = entry.value_mut();

        timestamps.retain(|t| now.duration_since(*t) < policy.window);

        if timestamps.len() >= policy.max_requests as usize {
            return false;
        }

        timestamps.push(now);
        true
    }

    /// Drop timestamps older than `horizon` and remove records left empty.
    ///
    /// Returns the number of records evicted. Callers pick a horizon no
    /// shorter than the longest policy window; eviction only reclaims memory,
    /// it never changes what [`allow`](Self::allow) would decide.
    pub fn sweep(&self, horizon: Duration) -> usize {
        let now = Instant::now();
        let before = self.windows.len();

        self.windows.retain(|_key, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < horizon);
            !timestamps.is_empty()
        });

        let evicted = before.saturating_sub(self.windows.len());
        tracing::debug!(
            evicted,
            remaining = self.windows.len(),
            "window store sweep complete"
        );
        evicted
    }

    /// Number of `(identity, policy)` records currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

impl Default for SlidingWindowStore {
    fn default() -> Self {
        Self::new()
    }
}
