//! Date-keyed map extraction
//!
//! Covers providers that answer with a metadata block plus a time-series
//! object keyed by ISO-8601 date strings. Inner records use the upstream's
//! numbered field names; each required field is looked up by name, never by
//! iteration position.

use super::dates::parse_rfc3339;
use super::{assemble, CanonicalResponse};
use crate::providers::ProviderError;
use serde_json::{Map, Value};

const META_KEY: &str = "Meta Data";
const META_TOKEN_NAME: &str = "3. Digital Currency Name";
const META_INTERVAL: &str = "7. Interval";

// Required key set for one series entry.
const OPEN_KEY: &str = "1. open";
const HIGH_KEY: &str = "2. high";
const LOW_KEY: &str = "3. low";
const CLOSE_KEY: &str = "4. close";
const VOLUME_KEY: &str = "5. volume";

pub(super) fn normalize_series(
    token: &str,
    interval: &str,
    payload: &Value,
) -> Result<CanonicalResponse, ProviderError> {
    let root = payload.as_object().ok_or_else(|| {
        ProviderError::MalformedPayload("expected a top-level time-series object".to_string())
    })?;

    let meta = root.get(META_KEY).and_then(Value::as_object).ok_or_else(|| {
        ProviderError::MalformedPayload("`Meta Data` missing in response".to_string())
    })?;
    let token_name = meta_string(meta, META_TOKEN_NAME).unwrap_or_else(|| token.to_string());
    let series_interval = meta_string(meta, META_INTERVAL).unwrap_or_else(|| interval.to_string());

    let series_key = format!("Time Series Crypto ({series_interval})");
    let series = root.get(&series_key).and_then(Value::as_object).ok_or_else(|| {
        ProviderError::MalformedPayload(format!("`{series_key}` missing in response"))
    })?;

    let mut rows = Vec::with_capacity(series.len());
    for (date, entry) in series {
        // Keys that are not valid dates are skipped, not errors.
        let Some(timestamp) = parse_rfc3339(date) else {
            continue;
        };
        let record = entry.as_object().ok_or_else(|| {
            ProviderError::InvalidRecordFormat(format!("entry for `{date}` is not an object"))
        })?;

        let ohlc = [
            required_numeric(record, OPEN_KEY)?,
            required_numeric(record, HIGH_KEY)?,
            required_numeric(record, LOW_KEY)?,
            required_numeric(record, CLOSE_KEY)?,
        ];
        let volume = required_numeric(record, VOLUME_KEY)?;
        rows.push((timestamp, ohlc, volume));
    }

    Ok(assemble(&token_name, &series_interval, rows))
}

fn meta_string(meta: &Map<String, Value>, key: &str) -> Option<String> {
    meta.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Named lookup of a required numeric field. The upstream quotes its numbers,
/// so numeric strings are accepted alongside JSON numbers.
fn required_numeric(record: &Map<String, Value>, key: &str) -> Result<f64, ProviderError> {
    let value = record.get(key).ok_or_else(|| {
        ProviderError::InvalidRecordFormat(format!("missing `{key}` field"))
    })?;

    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ProviderError::InvalidRecordFormat(format!("field `{key}` is not numeric")))
}
