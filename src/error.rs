//! Error types for the Moonshot SDK

use thiserror::Error;

use crate::classify::ClassifiedError;

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Main error type for SDK operations
#[derive(Error, Debug)]
pub enum SdkError {
    /// A request parameter is out of range, or the message list is empty.
    /// Always raised before any network call.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Non-success status from the service, classified against the catalog
    #[error("{0}")]
    Remote(ClassifiedError),

    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request cancelled")]
    Cancelled,

    /// The service answered with an unexpected shape
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SdkError::Timeout
        } else if e.is_connect() {
            SdkError::Connection(e.to_string())
        } else {
            SdkError::Transport(e)
        }
    }
}

impl SdkError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The SDK itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::Remote(e) => e.code == 429 || e.code >= 500,
            SdkError::Transport(e) => e.is_timeout() || e.is_connect(),
            SdkError::Timeout | SdkError::Connection(_) => true,
            _ => false,
        }
    }

    /// The classified remote error, if this is one
    pub fn remote(&self) -> Option<&ClassifiedError> {
        match self {
            SdkError::Remote(e) => Some(e),
            _ => None,
        }
    }

    /// Short category tag, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            SdkError::Validation { .. } => "validation",
            SdkError::UnsupportedFeature(_) => "unsupported_feature",
            SdkError::Remote(_) => "remote",
            SdkError::Transport(_) | SdkError::Timeout | SdkError::Connection(_) => "transport",
            SdkError::Cancelled => "cancelled",
            SdkError::Parse(_) | SdkError::Json(_) => "parse",
            SdkError::Url(_) | SdkError::Config(_) => "config",
        }
    }
}

impl From<ClassifiedError> for SdkError {
    fn from(e: ClassifiedError) -> Self {
        SdkError::Remote(e)
    }
}
