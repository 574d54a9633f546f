//! Restrictions for an initial sync.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which resources an initial sync returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyncType {
    #[default]
    #[serde(rename = "all")]
    All,
    Asset,
    Entry,
    Deletion,
    DeletedAsset,
    DeletedEntry,
}

impl SyncType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SyncType::All => "all",
            SyncType::Asset => "Asset",
            SyncType::Entry => "Entry",
            SyncType::Deletion => "Deletion",
            SyncType::DeletedAsset => "DeletedAsset",
            SyncType::DeletedEntry => "DeletedEntry",
        }
    }
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SyncType::All),
            "Asset" => Ok(SyncType::Asset),
            "Entry" => Ok(SyncType::Entry),
            "Deletion" => Ok(SyncType::Deletion),
            "DeletedAsset" => Ok(SyncType::DeletedAsset),
            "DeletedEntry" => Ok(SyncType::DeletedEntry),
            other => Err(SyncError::Protocol(format!("unknown sync type `{other}`"))),
        }
    }
}

/// Filter applied to an initial sync. Resumed syncs inherit it from the
/// token and take no filter of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncFilter {
    pub sync_type: SyncType,
    pub content_type: Option<String>,
}

impl SyncFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn of_type(mut self, sync_type: SyncType) -> Self {
        self.sync_type = sync_type;
        self
    }

    /// Restricts the sync to entries of one content type.
    #[must_use]
    pub fn content_type(mut self, content_type_id: impl Into<String>) -> Self {
        self.content_type = Some(content_type_id.into());
        self
    }

    /// The effective type: a content type restriction implies entries.
    pub fn effective_type(&self) -> SyncType {
        if self.content_type.is_some() {
            SyncType::Entry
        } else {
            self.sync_type
        }
    }

    /// Parameters of the initial sync request.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("initial".to_string(), "true".to_string())];
        let sync_type = self.effective_type();
        if sync_type != SyncType::All {
            params.push(("type".to_string(), sync_type.to_string()));
        }
        if let Some(content_type) = &self.content_type {
            params.push(("content_type".to_string(), content_type.clone()));
        }
        params
    }
}
