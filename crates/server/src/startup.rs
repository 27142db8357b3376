use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = format!("{}:{}", cfg.server.host, cfg.server.port);
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Open storage, seed the bootstrap moderator if configured, and build the state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    common::env::ensure_data_dir(&cfg.storage.data_dir).await?;
    let state = ServerState::open(&cfg.storage).await?;
    if let Some((username, password)) = cfg.auth.bootstrap_moderator() {
        let moderator = state.auth.ensure_moderator(username, password).await?;
        info!(user_id = moderator.id, "bootstrap moderator ready");
    }
    Ok(state)
}

/// Public entry: build the app and run the HTTP server until it fails
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting blog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
