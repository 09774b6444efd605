use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::pokemon::{MemoryPokemonRepository, PokemonRepository, SeaOrmPokemonRepository};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Pick the repository named by `database.url`.
pub async fn build_repository(cfg: &AppConfig) -> Result<Arc<dyn PokemonRepository>, StartupError> {
    if cfg.database.is_memory() {
        warn!("database.url = memory; catalog will not survive a restart");
        return Ok(Arc::new(MemoryPokemonRepository::new()));
    }
    let db = models::db::connect_and_migrate(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    Ok(Arc::new(SeaOrmPokemonRepository::new(db)))
}

pub fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Build the app from a validated config and run the HTTP server.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let repo = build_repository(&cfg).await?;
    let state = ServerState::new(repo, &cfg);
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting pokedex server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
