//! Read-through metadata cache for spaces and content types.
//!
//! The builder only reads from the cache. Population is left to warming
//! tools, which write the raw API documents under the keys produced by
//! [`CacheKeys`].

mod file;
mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use crate::error::DeliveryResult;
use async_trait::async_trait;
use serde_json::Value;

/// A key → raw JSON store.
#[async_trait]
pub trait MetadataCache: Send + Sync {
    /// Returns the cached document, or `None` on a miss.
    async fn get(&self, key: &str) -> DeliveryResult<Option<Value>>;

    async fn set(&self, key: &str, value: &Value) -> DeliveryResult<()>;

    /// Drops every entry.
    async fn clear(&self) -> DeliveryResult<()>;
}

/// Generates cache keys for one space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    space_id: String,
}

impl CacheKeys {
    pub fn new(space_id: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
        }
    }

    pub fn space(&self) -> String {
        format!("contentful.{}.space", self.space_id)
    }

    pub fn content_type(&self, content_type_id: &str) -> String {
        format!("contentful.{}.content_type.{content_type_id}", self.space_id)
    }
}

/// A cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl MetadataCache for NullCache {
    async fn get(&self, _key: &str) -> DeliveryResult<Option<Value>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &Value) -> DeliveryResult<()> {
        Ok(())
    }

    async fn clear(&self) -> DeliveryResult<()> {
        Ok(())
    }
}
