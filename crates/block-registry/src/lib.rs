//! Temporary identity blocks with lazy expiry.
//!
//! A block is a single `expires_at` instant per identity. Readers treat an
//! expired entry as absent, so correctness never depends on how promptly the
//! periodic sweep runs, and no per-block timer or waiter is ever spawned.

use dashmap::DashMap;
use std::time::{Duration, Instant};

pub struct BlockRegistry {
    blocks: DashMap<String, Instant>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: DashMap::new(),
        }
    }

    /// Block `identity` for `duration` from now.
    ///
    /// Overwrites any existing block: the most recent call wins, whether it
    /// extends or shortens the remaining time. A zero duration produces an
    /// entry that is already expired.
    pub fn block(&self, identity: &str, duration: Duration) {
        let expires_at = Instant::now() + duration;
        self.blocks.insert(identity.to_string(), expires_at);
        tracing::info!(
            identity = %identity,
            duration_secs = duration.as_secs(),
            "identity blocked"
        );
    }

    /// Whether `identity` is currently blocked. An entry whose expiry has
    /// passed reads as absent even before the sweep removes it.
    pub fn is_blocked(&self, identity: &str) -> bool {
        match self.blocks.get(identity) {
            Some(expires_at) => Instant::now() < *expires_at,
            None => false,
        }
    }

    /// Physically remove expired entries. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let before = self.blocks.len();

        self.blocks.retain(|_identity, expires_at| now < *expires_at);

        let evicted = before.saturating_sub(self.blocks.len());
        tracing::debug!(
            evicted,
            remaining = self.blocks.len(),
            "block registry sweep complete"
        );
        evicted
    }

    /// Number of blocks that are still in force.
    pub fn active_blocks(&self) -> usize {
        let now = Instant::now();
        self.blocks
            .iter()
            .filter(|entry| now < *entry.value())
            .count()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn block_denies_until_expiry() {
        let registry = BlockRegistry::new();
        registry.block("198.51.100.7", Duration::from_millis(100));

        assert!(registry.is_blocked("198.51.100.7"));

        thread::sleep(Duration::from_millis(150));
        assert!(!registry.is_blocked("198.51.100.7"));
    }

    #[test]
    fn unknown_identity_is_not_blocked() {
        let registry = BlockRegistry::new();
        assert!(!registry.is_blocked("203.0.113.9"));
    }

    #[test]
    fn zero_duration_expires_immediately() {
        let registry = BlockRegistry::new();
        registry.block("198.51.100.7", Duration::from_secs(0));

        assert!(!registry.is_blocked("198.51.100.7"));
    }

    #[test]
    fn later_block_overwrites_earlier() {
        let registry = BlockRegistry::new();
        registry.block("198.51.100.7", Duration::from_millis(50));
        registry.block("198.51.100.7", Duration::from_millis(300));

        // Past the first expiry but inside the second: the overwrite won.
        thread::sleep(Duration::from_millis(100));
        assert!(registry.is_blocked("198.51.100.7"));
    }

    #[test]
    fn sweep_removes_expired_entries() {
        let registry = BlockRegistry::new();
        registry.block("expired", Duration::from_millis(10));
        registry.block("active", Duration::from_secs(60));

        thread::sleep(Duration::from_millis(50));
        let evicted = registry.sweep();

        assert_eq!(evicted, 1);
        assert_eq!(registry.active_blocks(), 1);
        assert!(registry.is_blocked("active"));
    }
}
