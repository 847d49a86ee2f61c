//! OHLCV Gateway Library
//!
//! Fetches raw candle history from upstream price-data providers and
//! normalizes each provider's JSON schema into one canonical shape that a
//! charting front-end can consume. Can be used as a library or run as the
//! standalone gateway binary.

pub mod api;
pub mod config;
pub mod normalize;
pub mod providers;

// Re-export main types for easy access
pub use api::OhlcvApiServer;
pub use config::Config;
pub use normalize::{normalize, CanonicalCandle, CanonicalResponse};
pub use providers::{
    resolve_token, Provider, ProviderError, SchemaKind, TokenRoute, UpstreamClient, UpstreamFetch,
    UpstreamRequest,
};
