//! Errors returned by forge reads.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure of a single forge request.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The forge accepted the request but is still computing statistics.
    #[error("contributor statistics are still being computed")]
    StatsPending,

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("GitHub API rate limit exceeded (resets {})", describe_reset(.reset))]
    RateLimited { reset: Option<DateTime<Utc>> },

    #[error("GitHub API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ForgeError {
    /// Whether the error only means "ask again later".
    pub fn is_pending(&self) -> bool {
        matches!(self, ForgeError::StatsPending)
    }
}

pub(crate) fn describe_reset(reset: &Option<DateTime<Utc>>) -> String {
    match reset {
        Some(at) => format!("at {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => "at an unknown time".to_string(),
    }
}
