//! Products API - REST server

use axum_helpers::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use products_api::{build_app, config::Config, state::AppState};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let state = AppState::connect(config).await?;
    let app = build_app(&state);

    info!(
        store = state.store.kind(),
        format = %state.config.validation_format,
        "Starting Products API on port {}",
        state.config.server.port
    );

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        state.store.clone().close(),
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
