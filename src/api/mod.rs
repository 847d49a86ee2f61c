//! HTTP API for the charting front-end
//!
//! Thin warp layer over the normalization core: resolve the token to a
//! provider route, fetch the raw payload, normalize, reply.

use std::convert::Infallible;
use std::sync::Arc;

use serde_json::json;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::config::Config;
use crate::normalize::normalize;
use crate::providers::{resolve_token, ProviderError, UpstreamFetch};

/// Rejection carrying a provider failure through to the recover handler.
#[derive(Debug)]
struct UpstreamRejection {
    error: ProviderError,
}

impl warp::reject::Reject for UpstreamRejection {}

/// Rejection for chart tokens with no provider route.
#[derive(Debug)]
struct InvalidToken;

impl warp::reject::Reject for InvalidToken {}

/// OHLCV gateway HTTP server.
pub struct OhlcvApiServer {
    config: Arc<Config>,
    fetcher: Arc<dyn UpstreamFetch>,
    port: u16,
}

impl OhlcvApiServer {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn UpstreamFetch>, port: u16) -> Self {
        Self {
            config,
            fetcher,
            port,
        }
    }

    /// Start serving. Runs until the process is stopped.
    pub async fn start(&self) {
        let routes = routes(self.config.clone(), self.fetcher.clone());

        tracing::info!("Starting OHLCV API server on port {}", self.port);
        warp::serve(routes).run(([0, 0, 0, 0], self.port)).await;
    }
}

fn routes(
    config: Arc<Config>,
    fetcher: Arc<dyn UpstreamFetch>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    // Health check endpoint
    let health = warp::path("health").and(warp::get()).map(|| {
        warp::reply::json(&json!({
            "status": "ok",
            "service": "ohlcv-gateway",
            "timestamp": chrono::Utc::now()
        }))
    });

    // Candle history for an explicit token and interval
    let ohlcv = warp::path!("api" / "ohlcv" / String / String)
        .and(warp::get())
        .and(with_config(config.clone()))
        .and(with_fetcher(fetcher.clone()))
        .and_then(get_ohlcv);

    // Candle history for the configured default token
    let default_ohlcv = warp::path!("api" / "ohlcv")
        .and(warp::get())
        .and(with_config(config))
        .and(with_fetcher(fetcher))
        .and_then(get_default_ohlcv);

    // CORS for the charting front-end
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["origin", "content-type", "accept"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(ohlcv)
        .or(default_ohlcv)
        .with(cors)
        .recover(handle_rejection)
}

// Helper filters to inject shared state into handlers
fn with_config(
    config: Arc<Config>,
) -> impl Filter<Extract = (Arc<Config>,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

fn with_fetcher(
    fetcher: Arc<dyn UpstreamFetch>,
) -> impl Filter<Extract = (Arc<dyn UpstreamFetch>,), Error = Infallible> + Clone {
    warp::any().map(move || fetcher.clone())
}

/// Fetch and normalize candle history for one token/interval pair.
async fn get_ohlcv(
    token: String,
    interval: String,
    config: Arc<Config>,
    fetcher: Arc<dyn UpstreamFetch>,
) -> Result<impl Reply, Rejection> {
    let token = token.to_uppercase();
    let route = resolve_token(&token).ok_or_else(|| warp::reject::custom(InvalidToken))?;
    let request = route.to_request(&interval, &config);

    let payload = fetcher
        .fetch_json(&request)
        .await
        .map_err(|error| warp::reject::custom(UpstreamRejection { error }))?;

    let response = normalize(route.provider, &token, &interval, &payload)
        .map_err(|error| warp::reject::custom(UpstreamRejection { error }))?;

    tracing::info!(
        "normalized {} candles for {} ({}) via {}",
        response.candles.len(),
        response.token_name,
        response.interval,
        route.provider
    );
    Ok(warp::reply::json(&response))
}

async fn get_default_ohlcv(
    config: Arc<Config>,
    fetcher: Arc<dyn UpstreamFetch>,
) -> Result<impl Reply, Rejection> {
    let token = config.default_token.clone();
    let interval = config.default_interval.clone();
    get_ohlcv(token, interval, config, fetcher).await
}

/// Map rejections to plain-text error bodies.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Endpoint not found".to_string())
    } else if err.find::<InvalidToken>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid token".to_string())
    } else if let Some(rejection) = err.find::<UpstreamRejection>() {
        tracing::error!("request failed: {}", rejection.error);
        (StatusCode::INTERNAL_SERVER_ERROR, rejection.error.to_string())
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(message, code))
}
