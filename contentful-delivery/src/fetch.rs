//! The fetch collaborator consumed by the builder, resolver and sync manager.

use crate::error::DeliveryResult;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// The kinds of resource the delivery API serves by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Space,
    ContentType,
    Entry,
    Asset,
}

impl ResourceKind {
    /// Path segment of the collection endpoint. The space is the root.
    pub const fn path_segment(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Space => None,
            ResourceKind::ContentType => Some("content_types"),
            ResourceKind::Entry => Some("entries"),
            ResourceKind::Asset => Some("assets"),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Space => "Space",
            ResourceKind::ContentType => "ContentType",
            ResourceKind::Entry => "Entry",
            ResourceKind::Asset => "Asset",
        };
        f.write_str(name)
    }
}

/// Source of raw API documents.
///
/// Implementations own transport concerns (auth, timeouts, retries) and
/// must return documents in the delivery API's JSON shape.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches one resource. `locale` of `None` lets the API pick the
    /// default locale; `"*"` requests all locales.
    async fn get_by_id(
        &self,
        kind: ResourceKind,
        id: &str,
        locale: Option<&str>,
    ) -> DeliveryResult<Value>;

    /// Fetches a collection with flat query parameters.
    async fn get_collection(
        &self,
        kind: ResourceKind,
        params: &[(String, String)],
    ) -> DeliveryResult<Value>;

    /// Issues a sync request with flat query parameters.
    async fn get_sync(&self, params: &[(String, String)]) -> DeliveryResult<Value>;
}
