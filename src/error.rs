//! Error types for the Freqtrade bridge
//!
//! Client-side failures are typed so the tool layer can tell a dead
//! connection apart from a bot that answered with an error.

use thiserror::Error;

/// Errors raised while talking to the Freqtrade REST API
#[derive(Error, Debug)]
pub enum FreqtradeError {
    #[error("cannot reach Freqtrade API: {0}")]
    Connection(String),

    #[error("request to Freqtrade API timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("unexpected response from Freqtrade API: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid API url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FreqtradeError {
    /// Network or timeout class failure, as opposed to an answer we did not like.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, FreqtradeError::Connection(_) | FreqtradeError::Timeout(_))
    }

    /// Builds an `Http` error from a non-2xx response body. Freqtrade puts
    /// the human readable reason under `detail`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("detail")
                    .or_else(|| v.get("error"))
                    .and_then(|d| d.as_str().map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().to_string());
        FreqtradeError::Http { status, message }
    }
}

impl From<reqwest::Error> for FreqtradeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FreqtradeError::Timeout(err.to_string())
        } else if err.is_connect() {
            FreqtradeError::Connection(err.to_string())
        } else if err.is_decode() {
            FreqtradeError::Decode(err.to_string())
        } else {
            FreqtradeError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FreqtradeError {
    fn from(err: serde_json::Error) -> Self {
        FreqtradeError::Decode(err.to_string())
    }
}

/// Startup configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors raised before a tool or prompt runs: the request itself is wrong.
/// These surface as JSON-RPC errors, unlike tool failures.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Invalid arguments for {name}: {reason}")]
    InvalidArguments { name: String, reason: String },
}

/// Recognizes the message Freqtrade returns from `forceexit` even though the
/// position was closed.
pub fn is_spurious_exit_error(message: &str) -> bool {
    message.to_lowercase().contains("invalid argument")
}

/// Recognizes the duplicate-entry message from `forceenter`.
pub fn is_already_open_error(message: &str) -> bool {
    message.to_lowercase().contains("already open")
}
