use std::sync::Arc;

use anyhow::Result;
use restaurant_orderservice::{
    api::RestBackend, app_state::AppState, bootstrap, config, routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_tracing();
    bootstrap::init_env();

    let config = config::load()?;
    tracing::info!("Using restaurant backend at {}", config.backend.url);
    let backend = RestBackend::from_config(&config.backend)?;

    let app = routes::app(AppState::new(Arc::new(backend)));

    tracing::info!("Bootstrapping...");
    bootstrap::serve("OrderService", app, &config.server).await?;
    Ok(())
}
