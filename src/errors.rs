/*!
 * Error types for the yasrai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to an oracle provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The request succeeded but the completion text is not JSON
    #[error("Completion is not a JSON answer: {0}")]
    InvalidCompletion(String),
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching error kind
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Whether a client may retry the request that produced this error
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Errors that can occur while loading or saving subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Underlying file system failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither UTF-8 nor the fallback encoding could decode the file
    #[error("Cannot decode {path:?} as UTF-8 or {encoding}")]
    Decode {
        /// File that failed to decode
        path: PathBuf,
        /// Name of the fallback encoding that was tried
        encoding: String,
    },

    /// Encoding label not known to the encoder
    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// The content is not a usable SRT document
    #[error("Invalid SRT content: {0}")]
    Parse(String),
}

/// Errors that end a reconciliation loop
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The oracle call itself failed
    #[error("Oracle request failed: {0}")]
    Provider(ProviderError),

    /// The oracle answered with JSON that does not match the response contract
    #[error("Malformed oracle payload: {0}")]
    MalformedPayload(String),

    /// A correspondence pair referenced an index outside the current window
    #[error("Oracle referenced {side} index {index}, window holds 1..={window_len}")]
    IndexOutOfWindow {
        /// Which list the index belongs to ("reference" or "source")
        side: &'static str,
        /// The offending 1-based local index
        index: i64,
        /// Number of cues exposed on that side
        window_len: usize,
    },

    /// More translated strings than cues in the window
    #[error("Oracle returned {returned} translations for a window of {window_len} cues")]
    TooManyTranslations {
        /// Number of strings returned
        returned: usize,
        /// Number of cues exposed
        window_len: usize,
    },

    /// Window size / overlap combination that cannot make progress
    #[error("Invalid window configuration: {0}")]
    InvalidWindow(String),
}

// A completion that is not JSON broke the contract, the transport worked
impl From<ProviderError> for ReconcileError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::InvalidCompletion(detail) => Self::MalformedPayload(detail),
            other => Self::Provider(other),
        }
    }
}

impl ReconcileError {
    /// True when the oracle transport failed, false for contract violations
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the reconciliation engine
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
