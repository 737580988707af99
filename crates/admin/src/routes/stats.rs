use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::SharedState;

/// GET /api/stats
///
/// Returns aggregated traffic statistics derived from Prometheus counters
/// and the live store handles.
pub async fn get_stats(State(state): State<SharedState>) -> Json<Value> {
    let uptime_secs = state.start_time.elapsed().as_secs();
    let total_requests = state.metrics.requests_total.get();

    let denials = |reason: &str| {
        state
            .metrics
            .denials_total
            .with_label_values(&[reason])
            .get()
    };

    let requests_per_second = if uptime_secs > 0 {
        total_requests as f64 / uptime_secs as f64
    } else {
        0.0
    };

    Json(json!({
        "total_requests": total_requests,
        "denials": {
            "blocked": denials("blocked"),
            "rate_limited": denials("rate_limited"),
            "csrf_invalid": denials("csrf_invalid"),
            "suspicious": denials("suspicious"),
        },
        "blocks_applied": state.metrics.blocks_applied_total.get(),
        "tracked_keys": state.windows.tracked_keys(),
        "active_blocks": state.blocks.active_blocks(),
        "events_retained": state.events.len(),
        "uptime_secs": uptime_secs,
        "requests_per_second": requests_per_second
    }))
}
