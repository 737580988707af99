use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use gatehouse_admin::{AdminState, SharedState};
use gatehouse_block_registry::BlockRegistry;
use gatehouse_common::AppConfig;
use gatehouse_csrf::{extract_session_cookie, MemorySessionStore, SessionStore};
use gatehouse_events::EventSink;
use gatehouse_rate_limit::SlidingWindowStore;

use crate::middleware::{gate, security_headers};
use crate::reaper::Reaper;
use crate::service::Gatekeeper;

/// Everything the binary needs, wired once from configuration.
///
/// The stores are created here and shared by handle: the gatekeeper writes
/// them, the admin surface reads them, the reaper sweeps them. No component
/// creates its own private copy.
pub struct App {
    pub gatekeeper: Arc<Gatekeeper>,
    pub admin_state: SharedState,
    pub sessions: Arc<MemorySessionStore>,
    pub windows: Arc<SlidingWindowStore>,
    pub blocks: Arc<BlockRegistry>,
    pub config: AppConfig,
}

pub fn build(config: AppConfig) -> App {
    let windows = Arc::new(SlidingWindowStore::new());
    let blocks = Arc::new(BlockRegistry::new());
    let events = Arc::new(EventSink::new(config.events.capacity));
    let sessions = Arc::new(MemorySessionStore::new());

    let admin_state = Arc::new(AdminState::new(
        config.clone(),
        Arc::clone(&events),
        Arc::clone(&windows),
        Arc::clone(&blocks),
    ));

    let gatekeeper = Arc::new(Gatekeeper::new(
        &config,
        Arc::clone(&windows),
        Arc::clone(&blocks),
        events,
        Arc::clone(&sessions) as Arc<dyn SessionStore>,
        Arc::clone(&admin_state.metrics),
    ));

    App {
        gatekeeper,
        admin_state,
        sessions,
        windows,
        blocks,
        config,
    }
}

impl App {
    pub fn start_reaper(&self) {
        let reaper = Reaper::new(
            Arc::clone(&self.windows),
            Arc::clone(&self.blocks),
            self.gatekeeper.retention_horizon(),
            Duration::from_secs(self.config.gatekeeper.reaper_interval_secs),
        );
        reaper.start();
    }
}

#[derive(Clone)]
struct DemoState {
    sessions: Arc<MemorySessionStore>,
    cookie_name: String,
}

/// The protected application router. Every route sits behind the gate; the
/// security headers layer wraps the gate so denials carry them too.
pub fn build_app_router(app: &App) -> Router {
    let demo = DemoState {
        sessions: Arc::clone(&app.sessions),
        cookie_name: app.config.csrf.cookie_name.clone(),
    };

    Router::new()
        .route("/auth/csrf", get(issue_csrf))
        .route("/api/ping", get(ping))
        .route("/api/echo", post(echo))
        .with_state(demo)
        .layer(from_fn_with_state(Arc::clone(&app.gatekeeper), gate))
        .layer(from_fn(security_headers))
}

/// Hand out a CSRF token. A request that already carries a live session
/// cookie gets that session's token back; anything else gets a fresh
/// session and a `Set-Cookie` for it.
async fn issue_csrf(State(state): State<DemoState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = headers
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| extract_session_cookie(cookies, &state.cookie_name))
    {
        if let Ok(Some(token)) = state.sessions.csrf_token(&session_id) {
            return Json(json!({ "csrf_token": token })).into_response();
        }
    }

    let (session_id, token) = state.sessions.create_session();
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict",
        state.cookie_name, session_id
    );
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "csrf_token": token })),
    )
        .into_response()
}

async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}
