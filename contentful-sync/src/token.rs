//! Resumable sync cursors.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fmt;

const SYNC_TOKEN_PARAM: &str = "sync_token";

/// An opaque cursor into the sync protocol.
///
/// The token embeds the filter of the initial sync that produced it. It is
/// serializable so callers can persist it between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncToken {
    value: String,
    #[serde(default)]
    preview: bool,
}

impl SyncToken {
    pub fn new(value: impl Into<String>, preview: bool) -> Self {
        Self {
            value: value.into(),
            preview,
        }
    }

    /// Extracts the token from a `nextSyncUrl` or `nextPageUrl`.
    pub fn from_url(url: &str, preview: bool) -> Result<Self> {
        let query = url
            .split_once('?')
            .map(|(_, query)| query)
            .ok_or_else(|| SyncError::Protocol(format!("sync url has no query: {url}")))?;

        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key != SYNC_TOKEN_PARAM {
                continue;
            }
            let value = urlencoding::decode(value)
                .map_err(|e| SyncError::Protocol(format!("invalid sync token encoding: {e}")))?;
            if value.is_empty() {
                break;
            }
            return Ok(Self::new(value, preview));
        }
        Err(SyncError::Protocol(format!("sync url carries no token: {url}")))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// True if the token came from a preview-mode sync.
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        vec![(SYNC_TOKEN_PARAM.to_string(), self.value.clone())]
    }
}

impl fmt::Display for SyncToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
