use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use gatehouse_common::AppConfig;
use gatehouse_gatekeeper::app;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .json()
        .init();

    // Parse command-line args for config path
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/gatehouse.yaml".to_string());

    info!(config_path = %config_path, "starting gatehouse");

    let config = AppConfig::load(&config_path)?;

    let app = app::build(config);
    app.start_reaper();

    // Admin API runs beside the protected application
    let admin_state = Arc::clone(&app.admin_state);
    let admin_listen = app.config.server.admin.listen.clone();
    tokio::spawn(async move {
        if let Err(e) = gatehouse_admin::run_admin_server(admin_state, &admin_listen).await {
            error!(error = %e, "admin API server error");
        }
    });

    let router = app::build_app_router(&app);
    let listener = tokio::net::TcpListener::bind(&app.config.server.listen).await?;
    info!(addr = %app.config.server.listen, "gatehouse started successfully");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("shutdown signal received");
}
