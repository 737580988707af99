use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::SharedState;

/// Query parameters for the security events endpoint.
#[derive(Debug, Deserialize)]
pub struct EventQuery {
    /// Maximum number of events to return (default: 100).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of events to skip (default: 0).
    #[serde(default)]
    pub offset: usize,
    /// Optional filter by identity.
    pub identity: Option<String>,
    /// Optional filter by event kind (wire label, e.g. `csrf_failure`).
    pub kind: Option<String>,
}

fn default_limit() -> usize {
    100
}

/// GET /api/events
///
/// Returns a paginated, optionally filtered list of recent security events
/// from the in-memory ring, newest first.
pub async fn get_events(
    State(state): State<SharedState>,
    Query(params): Query<EventQuery>,
) -> Json<Value> {
    let all = state.events.snapshot();

    // Apply filters.
    let filtered: Vec<_> = all
        .iter()
        .rev()
        .filter(|event| {
            if let Some(ref identity) = params.identity {
                if &event.identity != identity {
                    return false;
                }
            }
            if let Some(ref kind) = params.kind {
                if event.kind.as_str() != kind {
                    return false;
                }
            }
            true
        })
        .collect();

    let total = filtered.len();

    // Apply pagination.
    let page: Vec<_> = filtered
        .into_iter()
        .skip(params.offset)
        .take(params.limit)
        .cloned()
        .collect();

    Json(json!({
        "total": total,
        "offset": params.offset,
        "limit": params.limit,
        "events": page
    }))
}
