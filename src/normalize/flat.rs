//! Flat record-array extraction
//!
//! Covers providers that answer with a JSON array of candle records carrying
//! named OHLC fields and either an ISO-8601 timestamp string or an integer
//! epoch (seconds or milliseconds).

use super::dates::{parse_rfc3339, scale_epoch};
use super::{assemble, CanonicalResponse};
use crate::providers::ProviderError;
use serde_json::Value;

// Field aliases across the flat-record providers. The first match wins.
const OPEN_KEYS: [&str; 2] = ["price_open", "open"];
const HIGH_KEYS: [&str; 2] = ["price_high", "high"];
const LOW_KEYS: [&str; 2] = ["price_low", "low"];
const CLOSE_KEYS: [&str; 2] = ["price_close", "close"];
const VOLUME_KEYS: [&str; 2] = ["volume_traded", "volume"];
const TIME_KEYS: [&str; 3] = ["time_period_start", "timestamp", "time"];

pub(super) fn normalize_records(
    token: &str,
    interval: &str,
    payload: &Value,
) -> Result<CanonicalResponse, ProviderError> {
    let records = payload.as_array().ok_or_else(|| {
        ProviderError::MalformedPayload("expected a top-level array of candle records".to_string())
    })?;

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let ohlc = [
            numeric_field(record, &OPEN_KEYS)?,
            numeric_field(record, &HIGH_KEYS)?,
            numeric_field(record, &LOW_KEYS)?,
            numeric_field(record, &CLOSE_KEYS)?,
        ];
        let volume = numeric_field(record, &VOLUME_KEYS)?;

        // A record whose timestamp does not normalize is dropped; OHLC and
        // volume stay aligned because the whole row goes with it.
        if let Some(timestamp) = record_timestamp(record) {
            rows.push((timestamp, ohlc, volume));
        }
    }

    Ok(assemble(token, interval, rows))
}

/// First matching alias, required to be a JSON number. A missing or
/// non-numeric field fails the whole batch.
fn numeric_field(record: &Value, aliases: &[&str]) -> Result<f64, ProviderError> {
    for key in aliases {
        if let Some(value) = record.get(key) {
            return value.as_f64().ok_or_else(|| {
                ProviderError::InvalidRecordFormat(format!("field `{key}` is not numeric"))
            });
        }
    }
    Err(ProviderError::InvalidRecordFormat(format!(
        "missing `{}` field",
        aliases[0]
    )))
}

/// Timestamp from an RFC 3339 string or an integer epoch; millisecond
/// magnitudes are scaled down to seconds.
fn record_timestamp(record: &Value) -> Option<i64> {
    for key in &TIME_KEYS {
        match record.get(*key) {
            Some(Value::String(text)) => return parse_rfc3339(text),
            Some(value) => return value.as_i64().map(scale_epoch),
            None => continue,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coinapi_record_normalizes() {
        let payload = json!([
            {
                "time_period_start": "2024-01-01T00:00:00Z",
                "price_open": 1,
                "price_high": 2,
                "price_low": 0.5,
                "price_close": 1.5,
                "volume_traded": 100
            }
        ]);

        let response = normalize_records("BTC", "5MIN", &payload).unwrap();
        assert_eq!(response.candles.len(), 1);
        assert_eq!(response.volumes, vec![100.0]);
        assert_eq!(response.candles[0].timestamp, 1704067200);
        assert_eq!(response.candles[0].ohlc, [1.0, 2.0, 0.5, 1.5]);
    }

    #[test]
    fn test_every_record_yields_candle_and_volume() {
        let payload = json!([
            {"time": 1704067200, "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 10.0},
            {"time": 1704067500, "open": 1.5, "high": 2.5, "low": 1.0, "close": 2.0, "volume": 20.0},
            {"time": 1704067800, "open": 2.0, "high": 3.0, "low": 1.5, "close": 2.5, "volume": 30.0}
        ]);

        let response = normalize_records("SOL", "5MIN", &payload).unwrap();
        assert_eq!(response.candles.len(), 3);
        assert_eq!(response.volumes.len(), 3);
    }

    #[test]
    fn test_empty_array_is_not_an_error() {
        let response = normalize_records("BTC", "5MIN", &json!([])).unwrap();
        assert!(response.candles.is_empty());
        assert!(response.volumes.is_empty());
    }

    #[test]
    fn test_string_open_fails_the_batch() {
        let payload = json!([
            {
                "time_period_start": "2024-01-01T00:00:00Z",
                "price_open": "1",
                "price_high": 2.0,
                "price_low": 0.5,
                "price_close": 1.5,
                "volume_traded": 100.0
            }
        ]);

        let err = normalize_records("BTC", "5MIN", &payload).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRecordFormat(_)));
    }

    #[test]
    fn test_missing_close_fails_the_batch() {
        let payload = json!([
            {"time": 1704067200, "open": 1.0, "high": 2.0, "low": 0.5, "volume": 10.0}
        ]);

        let err = normalize_records("SOL", "1MIN", &payload).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRecordFormat(_)));
    }

    #[test]
    fn test_mixed_epoch_magnitudes_share_one_scale() {
        let payload = json!([
            {"time": 1704067200, "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 10.0},
            {"time": 1704067500000_i64, "open": 1.5, "high": 2.5, "low": 1.0, "close": 2.0, "volume": 20.0}
        ]);

        let response = normalize_records("SOL", "5MIN", &payload).unwrap();
        assert_eq!(response.candles[0].timestamp, 1704067200);
        assert_eq!(response.candles[1].timestamp, 1704067500);
    }

    #[test]
    fn test_unparseable_timestamp_drops_only_that_record() {
        let payload = json!([
            {"time_period_start": "garbage", "price_open": 1.0, "price_high": 2.0, "price_low": 0.5, "price_close": 1.5, "volume_traded": 10.0},
            {"time_period_start": "2024-01-01T00:05:00Z", "price_open": 1.5, "price_high": 2.5, "price_low": 1.0, "price_close": 2.0, "volume_traded": 20.0}
        ]);

        let response = normalize_records("BTC", "5MIN", &payload).unwrap();
        assert_eq!(response.candles.len(), 1);
        assert_eq!(response.volumes, vec![20.0]);
    }

    #[test]
    fn test_candles_sorted_ascending() {
        let payload = json!([
            {"time_period_start": "2024-01-01T00:10:00Z", "price_open": 3.0, "price_high": 4.0, "price_low": 2.5, "price_close": 3.5, "volume_traded": 30.0},
            {"time_period_start": "2024-01-01T00:00:00Z", "price_open": 1.0, "price_high": 2.0, "price_low": 0.5, "price_close": 1.5, "volume_traded": 10.0}
        ]);

        let response = normalize_records("BTC", "5MIN", &payload).unwrap();
        assert_eq!(response.candles[0].timestamp, 1704067200);
        assert_eq!(response.candles[1].timestamp, 1704067800);
        // Volumes follow their candles through the sort.
        assert_eq!(response.volumes, vec![10.0, 30.0]);
    }
}
