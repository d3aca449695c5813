//! PIAWE engine HTTP server.
//!
//! Serves the calculation API. Configuration comes from the environment:
//! `PIAWE_BIND_ADDR` (default `127.0.0.1:3000`), `PIAWE_RULES_PATH` (optional
//! YAML rule table; the built-in table is used otherwise), and `RUST_LOG`.

use piawe_engine::api::{AppState, create_router};
use piawe_engine::config::{ConfigLoader, RuleTable};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let rules = match std::env::var("PIAWE_RULES_PATH") {
        Ok(path) => {
            let table = ConfigLoader::load(&path)
                .map_err(|e| {
                    tracing::error!("Failed to load rule table: {e}");
                    e
                })?
                .into_table();
            tracing::info!(path = %path, "Loaded jurisdiction rule table");
            table
        }
        Err(_) => {
            tracing::info!("Using built-in jurisdiction rule table");
            RuleTable::builtin().clone()
        }
    };

    let addr = std::env::var("PIAWE_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let app = create_router(AppState::new(rules));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("PIAWE engine listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
