//! Error types for the delivery layer.

use thiserror::Error;

/// Result type for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Errors raised while building, resolving or fetching resources.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// An entry names a content type that is neither cached nor fetchable.
    #[error("content type `{0}` is not available and no fetcher is configured")]
    UnresolvedContentType(String),

    /// Only `Asset` and `Entry` links can be resolved.
    #[error("cannot resolve links of type `{0}`")]
    UnsupportedLinkType(String),

    /// The link target is not built, not included and cannot be fetched.
    #[error("cannot resolve link {0}")]
    UnresolvedLink(String),

    /// A resource belongs to a different space than the client.
    #[error("resource belongs to space `{found}`, expected `{expected}`")]
    SpaceMismatch { expected: String, found: String },

    /// The document does not have the shape of an API response.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error envelope.
    #[error("API error {status} ({id}): {message}")]
    Api {
        status: u16,
        id: String,
        message: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("cache error: {0}")]
    Cache(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Model(#[from] contentful_model::ModelError),

    #[error(transparent)]
    Types(#[from] contentful_types::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeliveryError {
    /// Returns true if this error represents a 429 rate-limit response.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            DeliveryError::RateLimited { .. } => true,
            DeliveryError::Api { status, .. } => *status == 429,
            DeliveryError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            _ => false,
        }
    }

    /// Returns the retry-after duration if this is a rate-limit error.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            DeliveryError::RateLimited { retry_after_secs } => {
                Some(std::time::Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }
}
