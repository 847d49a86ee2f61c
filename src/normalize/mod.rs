//! Response-normalization engine
//!
//! Takes a decoded upstream payload and produces the canonical candle stream
//! the charting client consumes. The two extraction paths mirror the two
//! payload shapes upstreams use: flat record arrays and date-keyed maps.

mod dates;
mod flat;
mod keyed;

use crate::providers::{Provider, ProviderError, SchemaKind};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One normalized candle: epoch seconds plus the four OHLC prices, always in
/// open/high/low/close order.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalCandle {
    pub timestamp: i64,
    pub ohlc: [f64; 4],
}

impl Serialize for CanonicalCandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Wire shape is the two-element tuple [timestamp, [o, h, l, c]].
        (self.timestamp, self.ohlc).serialize(serializer)
    }
}

/// Canonical normalized response, serialized in the wire shape the charting
/// client expects. `volumes` is positionally aligned with `candles`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CanonicalResponse {
    #[serde(rename = "tokenName")]
    pub token_name: String,
    pub interval: String,
    #[serde(rename = "formattedOhlc")]
    pub candles: Vec<CanonicalCandle>,
    #[serde(rename = "volArr")]
    pub volumes: Vec<f64>,
}

/// Normalize a decoded upstream payload into the canonical response.
///
/// Fatal shape problems surface as `MalformedPayload` or
/// `InvalidRecordFormat` and abort the whole batch; unparseable date keys
/// degrade output length instead of failing.
pub fn normalize(
    provider: Provider,
    token: &str,
    interval: &str,
    payload: &Value,
) -> Result<CanonicalResponse, ProviderError> {
    match provider.schema() {
        SchemaKind::FlatRecords => flat::normalize_records(token, interval, payload),
        SchemaKind::DateKeyedMap => keyed::normalize_series(token, interval, payload),
    }
}

/// Sort extracted rows oldest-first and split them into the candle and
/// volume sequences.
fn assemble(token_name: &str, interval: &str, mut rows: Vec<(i64, [f64; 4], f64)>) -> CanonicalResponse {
    // Upstream ordering is not trusted; candles always come back ascending.
    rows.sort_by_key(|&(timestamp, _, _)| timestamp);

    let mut candles = Vec::with_capacity(rows.len());
    let mut volumes = Vec::with_capacity(rows.len());
    for (timestamp, ohlc, volume) in rows {
        candles.push(CanonicalCandle { timestamp, ohlc });
        volumes.push(volume);
    }
    align(&mut candles, &mut volumes);

    CanonicalResponse {
        token_name: token_name.to_string(),
        interval: interval.to_string(),
        candles,
        volumes,
    }
}

/// Truncate both sequences to the shorter length. Truncation only, never
/// padding.
fn align(candles: &mut Vec<CanonicalCandle>, volumes: &mut Vec<f64>) {
    let len = candles.len().min(volumes.len());
    candles.truncate(len);
    volumes.truncate(len);
}
