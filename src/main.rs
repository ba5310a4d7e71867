//! Cafe Storefront - server-rendered pages over the cafe backend services

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cafe_storefront::api::http::HttpBackend;
use cafe_storefront::config::Config;
use cafe_storefront::gateway::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;
    let backend = HttpBackend::from_config(&config)?;
    tracing::info!(api = %backend.base_url(), timeout = ?config.request_timeout, "backend configured");

    let app = gateway::router(AppState::new(Arc::new(backend)));

    tracing::info!("☕ Cafe storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?, app).await?;
    Ok(())
}
