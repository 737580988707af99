use std::sync::Arc;
use std::time::Instant;

use gatehouse_block_registry::BlockRegistry;
use gatehouse_common::AppConfig;
use gatehouse_events::EventSink;
use gatehouse_rate_limit::SlidingWindowStore;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};

/// Shared state type alias used across all route handlers.
pub type SharedState = Arc<AdminState>;

/// State shared between the gatekeeper and the ops surface.
///
/// The gatekeeper increments the metrics and feeds the event sink; the admin
/// routes only read. Configuration is fixed at startup, so no lock guards it.
pub struct AdminState {
    pub config: AppConfig,
    pub metrics: Arc<GatekeeperMetrics>,
    pub events: Arc<EventSink>,
    pub windows: Arc<SlidingWindowStore>,
    pub blocks: Arc<BlockRegistry>,
    pub start_time: Instant,
}

impl AdminState {
    pub fn new(
        config: AppConfig,
        events: Arc<EventSink>,
        windows: Arc<SlidingWindowStore>,
        blocks: Arc<BlockRegistry>,
    ) -> Self {
        Self {
            config,
            metrics: Arc::new(GatekeeperMetrics::new()),
            events,
            windows,
            blocks,
            start_time: Instant::now(),
        }
    }
}

/// Prometheus metrics collected by the gatekeeper.
pub struct GatekeeperMetrics {
    pub registry: Registry,
    pub requests_total: IntCounter,
    pub denials_total: IntCounterVec,
    pub blocks_applied_total: IntCounter,
    pub request_duration: HistogramVec,
}

impl GatekeeperMetrics {
    /// Create a new metrics instance with all counters and histograms
    /// registered against a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests_total = IntCounter::with_opts(Opts::new(
            "gatehouse_requests_total",
            "Total number of requests evaluated",
        ))
        .expect("failed to create requests_total counter");

        let denials_total = IntCounterVec::new(
            Opts::new(
                "gatehouse_denials_total",
                "Total number of requests denied, by reason",
            ),
            &["reason"],
        )
        .expect("failed to create denials_total counter");

        let blocks_applied_total = IntCounter::with_opts(Opts::new(
            "gatehouse_blocks_applied_total",
            "Total number of temporary blocks applied",
        ))
        .expect("failed to create blocks_applied_total counter");

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "gatehouse_request_duration_seconds",
                "Request processing duration in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0,
            ]),
            &["policy"],
        )
        .expect("failed to create request_duration histogram");

        registry
            .register(Box::new(requests_total.clone()))
            .expect("failed to register requests_total");
        registry
            .register(Box::new(denials_total.clone()))
            .expect("failed to register denials_total");
        registry
            .register(Box::new(blocks_applied_total.clone()))
            .expect("failed to register blocks_applied_total");
        registry
            .register(Box::new(request_duration.clone()))
            .expect("failed to register request_duration");

        Self {
            registry,
            requests_total,
            denials_total,
            blocks_applied_total,
            request_duration,
        }
    }
}

impl Default for GatekeeperMetrics {
    fn default() -> Self {
        Self::new()
    }
}
