//! Environment-backed configuration

use dotenv::dotenv;

/// Runtime configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// CoinAPI key, sent as the `X-CoinAPI-Key` header.
    pub coinapi_key: String,
    pub alphavantage_key: String,
    pub cryptocompare_key: Option<String>,
    /// Token served by `GET /api/ohlcv`.
    pub default_token: String,
    pub default_interval: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            coinapi_key: std::env::var("API_KEY").unwrap_or_default(),
            alphavantage_key: std::env::var("ALPHAVANTAGE_API_KEY").unwrap_or_default(),
            cryptocompare_key: std::env::var("CRYPTOCOMPARE_API_KEY").ok(),
            default_token: std::env::var("DEFAULT_TOKEN").unwrap_or_else(|_| "BTC".to_string()),
            default_interval: std::env::var("DEFAULT_INTERVAL")
                .unwrap_or_else(|_| "5MIN".to_string()),
        })
    }
}
