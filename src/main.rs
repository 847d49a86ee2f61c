//! OHLCV Gateway
//!
//! Serves canonical OHLCV candle data to a charting front-end, normalized
//! from whichever upstream price API covers the requested token.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use ohlcv_gateway::{Config, OhlcvApiServer, UpstreamClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("🚀 Starting OHLCV gateway");

    let config = Arc::new(Config::from_env()?);
    let port = config.port;
    let fetcher = Arc::new(UpstreamClient::new());

    let server = OhlcvApiServer::new(config, fetcher, port);
    server.start().await;

    Ok(())
}
