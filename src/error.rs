//! Error types for remote API calls

use reqwest::StatusCode;

/// Result type alias for remote API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the Synthetics and NerdGraph clients
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested entity does not exist on the remote service
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The service answered with a non-success status code
    #[error("unexpected response status {status}: {message}")]
    UnexpectedStatus { status: StatusCode, message: String },

    /// A configured endpoint is not usable as a base URL
    #[error("invalid endpoint url `{0}`")]
    InvalidUrl(String),

    /// The API key cannot be sent as a header value
    #[error("api key contains characters that are not allowed in a header")]
    InvalidApiKey,

    /// A create call succeeded but the response did not carry an identity
    #[error("response did not contain an identifier")]
    MissingId,

    /// NerdGraph reported errors in the response body
    #[error("graphql errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// Body could not be decoded into the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}
