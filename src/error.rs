//! Error Types
//!
//! Error taxonomy for the chat core: provider/transport failures, storage
//! failures, and synchronous validation failures.

use thiserror::Error;

/// Main error type for promptdesk operations
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration errors (bad data directory, invalid header values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential set failed validation (empty, or a key without the
    /// expected prefix)
    #[error("Credential error: {0}")]
    Credentials(String),

    /// HTTP request failed before a response was received
    #[error("Request failed: {0}")]
    Request(String),

    /// Provider returned a non-success status
    #[error("Provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    /// Response body was missing or malformed
    #[error("Response error: {0}")]
    Response(String),

    /// Authentication failed (invalid API key or invalid user credentials)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The provider call exceeded the configured upper bound
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// A flat-file store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Human-readable form validation failure; returned to the caller,
    /// never logged
    #[error("{0}")]
    Validation(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout(err.to_string())
        } else if err.is_connect() {
            ChatError::Request(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            ChatError::Response(format!("Failed to decode response: {}", err))
        } else {
            ChatError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Response(format!("JSON parsing error: {}", err))
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::Storage(err.to_string())
    }
}

/// Result type alias for promptdesk operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// User-facing hint derived from a provider failure.
///
/// Presentation code keys off these to suggest a fix. Classification is by
/// substring inspection of the error text; the three status markers are the
/// only recognized failure subkinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorHint {
    /// Key has no remaining credits (402 / "Payment Required")
    PaymentRequired,
    /// Key rejected (401 / "Unauthorized")
    InvalidKey,
    /// Too many requests (429 / "rate limit")
    RateLimited,
    /// Anything else
    Other,
}

impl ErrorHint {
    /// Classify an error message by its recognized substrings.
    pub fn classify(message: &str) -> Self {
        if message.contains("402") || message.contains("Payment Required") {
            ErrorHint::PaymentRequired
        } else if message.contains("401") || message.contains("Unauthorized") {
            ErrorHint::InvalidKey
        } else if message.contains("429") || message.to_lowercase().contains("rate limit") {
            ErrorHint::RateLimited
        } else {
            ErrorHint::Other
        }
    }

    /// Classify directly from a [`ChatError`].
    pub fn for_error(err: &ChatError) -> Self {
        Self::classify(&err.to_string())
    }
}
