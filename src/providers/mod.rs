//! Upstream price-data providers
//!
//! Each provider pairs a payload schema with a URL template and auth scheme.
//! Adding a provider means adding a variant and a routing row; the
//! normalization core stays untouched.

pub mod client;
pub mod errors;

pub use client::{UpstreamClient, UpstreamFetch};
pub use errors::{ErrorKind, ErrorStatus, ProviderError};

use crate::config::Config;
use std::fmt;

/// Top-level payload shape a provider responds with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    /// JSON array of flat records with named OHLC fields.
    FlatRecords,
    /// JSON object keyed by ISO-8601 date strings.
    DateKeyedMap,
}

/// Upstream price-data provider identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    CoinApi,
    AlphaVantage,
    CryptoCompare,
}

impl Provider {
    /// Extraction strategy for this provider's payloads.
    pub fn schema(&self) -> SchemaKind {
        match self {
            Provider::CoinApi | Provider::CryptoCompare => SchemaKind::FlatRecords,
            Provider::AlphaVantage => SchemaKind::DateKeyedMap,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::CoinApi => write!(f, "CoinAPI"),
            Provider::AlphaVantage => write!(f, "AlphaVantage"),
            Provider::CryptoCompare => write!(f, "CryptoCompare"),
        }
    }
}

/// One fully resolved upstream call: URL plus optional auth header.
#[derive(Clone, Debug)]
pub struct UpstreamRequest {
    pub provider: Provider,
    pub url: String,
    pub auth_header: Option<(&'static str, String)>,
}

/// Routing entry: which provider serves a chart token, and under what
/// upstream symbol id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenRoute {
    pub provider: Provider,
    pub symbol_id: &'static str,
}

/// Map a chart token to its provider route. Unknown tokens get `None`,
/// which the HTTP layer reports as `Invalid token`.
pub fn resolve_token(token: &str) -> Option<TokenRoute> {
    let route = match token.to_uppercase().as_str() {
        "BTC" => TokenRoute {
            provider: Provider::CoinApi,
            symbol_id: "BITSTAMP_SPOT_BTC_USD",
        },
        "ETH" => TokenRoute {
            provider: Provider::CoinApi,
            symbol_id: "BITSTAMP_SPOT_ETH_USD",
        },
        "SOL" => TokenRoute {
            provider: Provider::CryptoCompare,
            symbol_id: "SOL",
        },
        "DOGE" => TokenRoute {
            provider: Provider::AlphaVantage,
            symbol_id: "DOGE",
        },
        _ => return None,
    };
    Some(route)
}

impl TokenRoute {
    /// Build the concrete HTTP request for this route.
    pub fn to_request(&self, interval: &str, config: &Config) -> UpstreamRequest {
        match self.provider {
            Provider::CoinApi => UpstreamRequest {
                provider: self.provider,
                url: format!(
                    "https://rest.coinapi.io/v1/ohlcv/{}/latest?period_id={}",
                    self.symbol_id, interval
                ),
                auth_header: Some(("X-CoinAPI-Key", config.coinapi_key.clone())),
            },
            Provider::AlphaVantage => UpstreamRequest {
                provider: self.provider,
                url: format!(
                    "https://www.alphavantage.co/query?function=CRYPTO_INTRADAY&symbol={}&market=USD&interval={}&apikey={}",
                    self.symbol_id, interval, config.alphavantage_key
                ),
                auth_header: None,
            },
            Provider::CryptoCompare => UpstreamRequest {
                provider: self.provider,
                url: format!(
                    "https://min-api.cryptocompare.com/data/v2/histominute?fsym={}&tsym=USD",
                    self.symbol_id
                ),
                auth_header: config
                    .cryptocompare_key
                    .as_ref()
                    .map(|key| ("authorization", format!("Apikey {key}"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            port: 8080,
            coinapi_key: "test-key".to_string(),
            alphavantage_key: "av-key".to_string(),
            cryptocompare_key: None,
            default_token: "BTC".to_string(),
            default_interval: "5MIN".to_string(),
        }
    }

    #[test]
    fn test_known_tokens_resolve() {
        let btc = resolve_token("BTC").unwrap();
        assert_eq!(btc.provider, Provider::CoinApi);
        assert_eq!(btc.symbol_id, "BITSTAMP_SPOT_BTC_USD");

        let eth = resolve_token("eth").unwrap();
        assert_eq!(eth.symbol_id, "BITSTAMP_SPOT_ETH_USD");
    }

    #[test]
    fn test_unknown_token_has_no_route() {
        assert!(resolve_token("NOPE").is_none());
        assert!(resolve_token("").is_none());
    }

    #[test]
    fn test_schema_per_provider() {
        assert_eq!(Provider::CoinApi.schema(), SchemaKind::FlatRecords);
        assert_eq!(Provider::CryptoCompare.schema(), SchemaKind::FlatRecords);
        assert_eq!(Provider::AlphaVantage.schema(), SchemaKind::DateKeyedMap);
    }

    #[test]
    fn test_coinapi_request_carries_auth_and_interval() {
        let config = test_config();
        let request = resolve_token("BTC").unwrap().to_request("5MIN", &config);

        assert!(request.url.contains("BITSTAMP_SPOT_BTC_USD"));
        assert!(request.url.contains("period_id=5MIN"));
        let (name, value) = request.auth_header.unwrap();
        assert_eq!(name, "X-CoinAPI-Key");
        assert_eq!(value, "test-key");
    }

    #[test]
    fn test_cryptocompare_auth_only_with_key() {
        let mut config = test_config();
        let route = resolve_token("SOL").unwrap();

        assert!(route.to_request("1MIN", &config).auth_header.is_none());

        config.cryptocompare_key = Some("cc-key".to_string());
        let (_, value) = route.to_request("1MIN", &config).auth_header.unwrap();
        assert_eq!(value, "Apikey cc-key");
    }
}
