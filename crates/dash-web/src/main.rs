//! tickerdash web server
//!
//! Serves the three dashboard pages: overview with forecast, news
//! sentiment, and technical analysis. Single-user, no persistence; every
//! interaction recomputes from fresh (or session-cached) provider data.
//!
//! # Usage
//!
//! ```bash
//! # Optional provider keys; absent keys disable the dependent sections
//! export FINNHUB_API_KEY="..."
//! export NEWSAPI_KEY="..."
//!
//! cargo run --bin dash-web
//! ```

mod logging;
mod routes;
mod views;

use std::env;
use std::sync::Arc;

use dash_core::{DashConfig, Dashboard};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let config = DashConfig::from_env();
    if config.finnhub_api_key.is_none() {
        warn!("FINNHUB_API_KEY not set; the fundamentals section will be unavailable");
    }
    if config.newsapi_key.is_none() {
        warn!("NEWSAPI_KEY not set; news and sentiment sections will be unavailable");
    }

    let dashboard = Dashboard::new(config)?;
    let state = Arc::new(routes::AppState::new(dashboard)?);
    let app = routes::router(state);

    info!(port, "Starting tickerdash: http://0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutting down tickerdash...");
        })
        .await?;

    Ok(())
}
