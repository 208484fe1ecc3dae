//! Greenleaf Storefront - single-session storefront API

use anyhow::Result;
use greenleaf_storefront::http::{router, AppState};
use greenleaf_storefront::{FileStorage, MemoryHistory, SimulatedBackend, Storefront, StorefrontConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = StorefrontConfig::from_env()?;
    let storage = FileStorage::open(&config.data_path)?;
    let backend = Arc::new(SimulatedBackend::new(config.simulated_latency));
    let port = config.port;
    let store = Storefront::load(storage, MemoryHistory::new(), backend, config);

    let app = router(AppState::new(store));
    tracing::info!("🌿 Greenleaf Storefront listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
