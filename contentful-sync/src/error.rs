//! Error types for the sync layer.

use contentful_delivery::DeliveryError;
use thiserror::Error;

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur during a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The operation is not available for this session (e.g. resuming a
    /// preview sync).
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The sync envelope or a page URL was malformed.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Returns true if the failure came from API rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SyncError::Delivery(e) if e.is_rate_limited())
    }
}
