use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use gatehouse_block_registry::BlockRegistry;
use gatehouse_rate_limit::SlidingWindowStore;

/// Periodic janitor for the in-memory stores.
///
/// Correctness never depends on it: expired blocks read as absent and stale
/// window timestamps are pruned on access. The reaper only reclaims memory
/// held by identities that stopped sending requests, so entries for one-off
/// clients do not accumulate forever.
pub struct Reaper {
    windows: Arc<SlidingWindowStore>,
    blocks: Arc<BlockRegistry>,
    horizon: Duration,
    interval: Duration,
}

impl Reaper {
    pub fn new(
        windows: Arc<SlidingWindowStore>,
        blocks: Arc<BlockRegistry>,
        horizon: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            windows,
            blocks,
            horizon,
            interval,
        }
    }

    /// One sweep over both stores.
    pub fn tick(&self) {
        let windows_dropped = self.windows.sweep(self.horizon);
        let blocks_dropped = self.blocks.sweep();
        debug!(windows_dropped, blocks_dropped, "reaper tick completed");
    }

    /// Spawn a background thread that ticks every interval until the runtime
    /// shuts down. The thread holds `Arc` references to both stores, so they
    /// stay alive as long as it runs.
    pub fn start(self) {
        std::thread::Builder::new()
            .name("gatehouse-reaper".into())
            .spawn(move || loop {
                std::thread::sleep(self.interval);
                self.tick();
            })
            .expect("failed to spawn reaper thread");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_rate_limit::Policy;

    #[test]
    fn tick_sweeps_both_stores() {
        let windows = Arc::new(SlidingWindowStore::new());
        let blocks = Arc::new(BlockRegistry::new());

        let policy = Policy::new("api", 5, Duration::from_millis(10));
        windows.allow("10.0.0.1", &policy);
        blocks.block("10.0.0.2", Duration::from_millis(10));
        assert_eq!(windows.tracked_keys(), 1);
        assert_eq!(blocks.active_blocks(), 1);

        std::thread::sleep(Duration::from_millis(30));

        let reaper = Reaper::new(
            Arc::clone(&windows),
            Arc::clone(&blocks),
            Duration::from_millis(20),
            Duration::from_secs(60),
        );
        reaper.tick();

        assert_eq!(windows.tracked_keys(), 0);
        assert_eq!(blocks.active_blocks(), 0);
    }

    #[test]
    fn tick_keeps_live_entries() {
        let windows = Arc::new(SlidingWindowStore::new());
        let blocks = Arc::new(BlockRegistry::new());

        let policy = Policy::new("api", 5, Duration::from_secs(60));
        windows.allow("10.0.0.1", &policy);
        blocks.block("10.0.0.2", Duration::from_secs(60));

        let reaper = Reaper::new(
            Arc::clone(&windows),
            Arc::clone(&blocks),
            Duration::from_secs(120),
            Duration::from_secs(60),
        );
        reaper.tick();

        assert_eq!(windows.tracked_keys(), 1);
        assert_eq!(blocks.active_blocks(), 1);
    }
}
