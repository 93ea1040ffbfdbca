//! API error types.

use serde::Deserialize;
use thiserror::Error;

/// Shown for transport failures, where the underlying error means nothing to users.
pub const NETWORK_MESSAGE: &str =
    "Could not reach the server. Check your connection and try again.";

/// Shown when the server reports an error without a message.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors returned by the API client and everything built on it.
///
/// `Clone` so a single in-flight result can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Request exceeded the client timeout
    #[error("Request timed out")]
    Timeout,
    /// Server unreachable or connection dropped
    #[error("Network error: {0}")]
    Network(String),
    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },
    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),
    /// Operation needs a signed-in user
    #[error("Not signed in")]
    Unauthorized,
    /// A lookup chain had nothing to try
    #[error("No lookup strategy configured")]
    NoStrategy,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Builds an error from a non-success response body.
    ///
    /// Uses the body's `message` when present, else a generic message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_MESSAGE.to_string());
        ApiError::Api { status, message }
    }

    /// The string to show users.
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Timeout | ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Decode(_) | ApiError::NoStrategy => GENERIC_MESSAGE.to_string(),
            ApiError::Validation(message) => message.clone(),
            ApiError::Unauthorized => "Please sign in first.".to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
