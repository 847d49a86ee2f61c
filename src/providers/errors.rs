//! Provider error types

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("upstream responded {code}: {reason}")]
    UpstreamUnavailable { reason: String, code: u16 },

    #[error("network timeout")]
    Timeout,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("invalid record format: {0}")]
    InvalidRecordFormat(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The upstream call itself failed.
    Transport,
    /// The upstream answered but the body violated its contract.
    Payload,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UpstreamUnavailable { .. } | Self::Timeout | Self::Connection(_) => {
                ErrorKind::Transport
            }
            Self::MalformedPayload(_) | Self::InvalidRecordFormat(_) => ErrorKind::Payload,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedPayload(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

/// Status line captured from a non-2xx upstream response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorStatus {
    pub reason: String,
    pub code: u16,
}

impl From<ErrorStatus> for ProviderError {
    fn from(status: ErrorStatus) -> Self {
        Self::UpstreamUnavailable {
            reason: status.reason,
            code: status.code,
        }
    }
}
