//! Error types for docket-stats

use thiserror::Error;

/// Result type for docket-stats operations
pub type Result<T> = std::result::Result<T, DocketStatsError>;

/// Error types that can occur while gathering docket statistics
#[derive(Debug, Error)]
pub enum DocketStatsError {
    /// Missing or invalid configuration (e.g. no API key)
    #[error("{0}")]
    Config(String),

    /// The record API answered with a non-success status
    #[error("{status} for url: {url}")]
    Api {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },

    /// Transport-level HTTP failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The record API returned a body that is not the expected JSON
    #[error("invalid API response: {0}")]
    Json(#[from] serde_json::Error),

    /// Object store enumeration failed
    #[error("object listing failed: {0}")]
    Listing(String),
}

impl DocketStatsError {
    /// Response body of an upstream API error, if any was returned.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            DocketStatsError::Api { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }

    /// Lines the CLI writes to stderr before exiting with status 1.
    ///
    /// Upstream status errors are reported as HTTP errors followed by the
    /// response body; everything else as a plain error.
    pub fn stderr_lines(&self) -> Vec<String> {
        match self {
            DocketStatsError::Api { .. } => {
                let mut lines = vec![format!("HTTP error: {self}")];
                if let Some(body) = self.response_body() {
                    lines.push(body.to_string());
                }
                lines
            }
            _ => vec![format!("Error: {self}")],
        }
    }
}
