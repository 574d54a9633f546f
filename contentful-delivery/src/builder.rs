//! Turns raw API documents into the typed resource graph.

use crate::cache::{CacheKeys, MetadataCache};
use crate::error::{DeliveryError, DeliveryResult};
use crate::fetch::{Fetcher, ResourceKind};
use crate::identity::IdentityCache;
use contentful_model::{
    Asset, ContentType, DeletedResource, Document, Entry, Resource, ResourceArray, Space,
};
use contentful_types::{Link, LinkType, ResourceType, SystemProperties};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Raw bodies of linked resources delivered in `includes`, keyed by link.
///
/// Documents stay available after the response that carried them, so links
/// of previously returned resources can still be resolved without a fetch.
#[derive(Debug, Default)]
pub struct IncludedTable {
    documents: HashMap<Link, Value>,
}

impl IncludedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the `includes.Entry` and `includes.Asset` sections of an array
    /// response.
    pub fn absorb(&mut self, includes: &Value) -> DeliveryResult<usize> {
        let mut added = 0;
        for (section, link_type) in [("Entry", LinkType::Entry), ("Asset", LinkType::Asset)] {
            let Some(documents) = includes.get(section).and_then(Value::as_array) else {
                continue;
            };
            for document in documents {
                let id = document
                    .pointer("/sys/id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        DeliveryError::MalformedDocument(format!(
                            "included {section} without sys.id"
                        ))
                    })?;
                self.documents
                    .insert(Link::new(id, link_type.clone()), document.clone());
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn get(&self, link: &Link) -> Option<&Value> {
        self.documents.get(link)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

/// Builds resources and registers them in the identity cache.
///
/// Cloning is cheap; clones share the identity cache and included table.
#[derive(Clone)]
pub struct ResourceBuilder {
    space_id: String,
    keys: CacheKeys,
    identity: Arc<IdentityCache>,
    metadata: Arc<dyn MetadataCache>,
    fetcher: Option<Arc<dyn Fetcher>>,
    included: Arc<RwLock<IncludedTable>>,
}

impl ResourceBuilder {
    pub fn new(
        space_id: impl Into<String>,
        identity: Arc<IdentityCache>,
        metadata: Arc<dyn MetadataCache>,
    ) -> Self {
        let space_id = space_id.into();
        Self {
            keys: CacheKeys::new(space_id.clone()),
            space_id,
            identity,
            metadata,
            fetcher: None,
            included: Arc::new(RwLock::new(IncludedTable::new())),
        }
    }

    /// Lets the builder fetch content types it has not seen yet.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn identity(&self) -> &Arc<IdentityCache> {
        &self.identity
    }

    pub fn fetcher(&self) -> Option<&Arc<dyn Fetcher>> {
        self.fetcher.as_ref()
    }

    pub fn metadata_cache(&self) -> &Arc<dyn MetadataCache> {
        &self.metadata
    }

    /// Builds one raw document: a single resource or an `Array` envelope.
    pub async fn build(&self, raw: &Value) -> DeliveryResult<Document> {
        match resource_type_of(raw)? {
            ResourceType::Array => {
                if let Some(includes) = raw.get("includes") {
                    let added = self.included.write().await.absorb(includes)?;
                    debug!("absorbed {} included resources", added);
                }
                let items = raw
                    .get("items")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                Ok(Document::Array(ResourceArray {
                    items: self.build_batch(items).await?,
                    total: count(raw, "total", items.len()),
                    skip: count(raw, "skip", 0),
                    limit: count(raw, "limit", items.len()),
                }))
            }
            _ => {
                let mut built = self.build_batch(std::slice::from_ref(raw)).await?;
                built
                    .pop()
                    .map(Document::Resource)
                    .ok_or_else(|| DeliveryError::MalformedDocument("empty build".into()))
            }
        }
    }

    /// Builds a sequence of documents, preserving order.
    ///
    /// Every document is built before any is registered: if one fails,
    /// the identity cache is left untouched by the batch.
    pub async fn build_batch(&self, raw: &[Value]) -> DeliveryResult<Vec<Resource>> {
        let staged = self.stage_batch(raw).await?;
        Ok(self.register(staged).await)
    }

    /// Builds a sequence of documents without registering them.
    ///
    /// Hand the result to [`register`](Self::register) once every batch of
    /// a larger unit has built. Content types fetched just in time are
    /// registered immediately.
    pub async fn stage_batch(&self, raw: &[Value]) -> DeliveryResult<Vec<Resource>> {
        let mut staged_types: HashMap<String, Arc<ContentType>> = HashMap::new();
        let mut staged = Vec::with_capacity(raw.len());

        for document in raw {
            let resource = self.build_unregistered(document, &staged_types).await?;
            if let Resource::ContentType(content_type) = &resource {
                staged_types.insert(content_type.id().to_string(), content_type.clone());
            }
            staged.push(resource);
        }
        Ok(staged)
    }

    /// Registers staged resources in order and returns the canonical
    /// instances.
    pub async fn register(&self, staged: Vec<Resource>) -> Vec<Resource> {
        self.identity.register_all(staged).await
    }

    /// Builds a resource from the included table, if it holds the link.
    pub async fn build_included(&self, link: &Link) -> DeliveryResult<Option<Resource>> {
        let raw = self.included.read().await.get(link).cloned();
        match raw {
            Some(raw) => {
                debug!("building {} from included table", link);
                Ok(self.build_batch(std::slice::from_ref(&raw)).await?.pop())
            }
            None => Ok(None),
        }
    }

    /// Returns a content type from the identity cache or the metadata cache.
    pub async fn cached_content_type(&self, id: &str) -> DeliveryResult<Option<Arc<ContentType>>> {
        if let Some(content_type) = self.identity.content_type(id).await {
            return Ok(Some(content_type));
        }
        match self.metadata.get(&self.keys.content_type(id)).await? {
            Some(raw) => {
                debug!("content type {} read from metadata cache", id);
                let content_type = self.register_content_type(&raw).await?;
                Ok(Some(content_type))
            }
            None => Ok(None),
        }
    }

    /// Returns the space from the identity cache or the metadata cache.
    pub async fn cached_space(&self) -> DeliveryResult<Option<Arc<Space>>> {
        if let Some(space) = self.identity.space().await {
            return Ok(Some(space));
        }
        match self.metadata.get(&self.keys.space()).await? {
            Some(raw) => {
                debug!("space {} read from metadata cache", self.space_id);
                let space = Space::from_json(&raw)?;
                self.check_space(space.id())?;
                match self.identity.register(Resource::Space(Arc::new(space))).await {
                    Resource::Space(space) => Ok(Some(space)),
                    _ => Ok(None),
                }
            }
            None => Ok(None),
        }
    }

    /// Forgets every included document.
    pub async fn clear_included(&self) {
        self.included.write().await.clear();
    }

    async fn build_unregistered(
        &self,
        raw: &Value,
        staged_types: &HashMap<String, Arc<ContentType>>,
    ) -> DeliveryResult<Resource> {
        let sys = SystemProperties::from_json(sys_of(raw)?)?;
        if let Some(space) = sys.space() {
            self.check_space(space.id())?;
        }

        let resource = match sys.resource_type() {
            ResourceType::Space => {
                self.check_space(sys.id())?;
                Resource::Space(Arc::new(Space::from_json(raw)?))
            }
            ResourceType::ContentType => Resource::ContentType(Arc::new(ContentType::from_json(raw)?)),
            ResourceType::Asset => Resource::Asset(Arc::new(Asset::from_json(raw)?)),
            ResourceType::Entry => {
                let content_type_id = sys
                    .content_type()
                    .map(|link| link.id().to_string())
                    .ok_or_else(|| {
                        DeliveryError::MalformedDocument(format!(
                            "entry `{}` has no sys.contentType",
                            sys.id()
                        ))
                    })?;
                let content_type = match staged_types.get(&content_type_id) {
                    Some(content_type) => content_type.clone(),
                    None => self.content_type_for(&content_type_id).await?,
                };
                let entry = Entry::from_json(raw, content_type)?;
                for diagnostic in &entry.diagnostics {
                    warn!("entry {}: {}", entry.id(), diagnostic);
                }
                Resource::Entry(Arc::new(entry))
            }
            ResourceType::DeletedEntry => Resource::DeletedEntry(DeletedResource::from_json(raw)?),
            ResourceType::DeletedAsset => Resource::DeletedAsset(DeletedResource::from_json(raw)?),
            ResourceType::DeletedContentType => {
                Resource::DeletedContentType(DeletedResource::from_json(raw)?)
            }
            other @ (ResourceType::Array | ResourceType::Link) => {
                return Err(DeliveryError::MalformedDocument(format!(
                    "`{other}` is not a buildable resource"
                )));
            }
        };
        Ok(resource)
    }

    /// Content type of an entry: identity cache, then metadata cache, then
    /// a just-in-time fetch when a fetcher is configured.
    async fn content_type_for(&self, id: &str) -> DeliveryResult<Arc<ContentType>> {
        if let Some(content_type) = self.cached_content_type(id).await? {
            return Ok(content_type);
        }
        let Some(fetcher) = &self.fetcher else {
            return Err(DeliveryError::UnresolvedContentType(id.to_string()));
        };
        debug!("fetching content type {}", id);
        let raw = fetcher.get_by_id(ResourceKind::ContentType, id, None).await?;
        self.register_content_type(&raw).await
    }

    async fn register_content_type(&self, raw: &Value) -> DeliveryResult<Arc<ContentType>> {
        let content_type = ContentType::from_json(raw)?;
        if let Some(space) = content_type.sys.space() {
            self.check_space(space.id())?;
        }
        match self
            .identity
            .register(Resource::ContentType(Arc::new(content_type)))
            .await
        {
            Resource::ContentType(content_type) => Ok(content_type),
            other => Err(DeliveryError::MalformedDocument(format!(
                "expected a content type, got `{}`",
                other.resource_type()
            ))),
        }
    }

    fn check_space(&self, found: &str) -> DeliveryResult<()> {
        if found != self.space_id {
            return Err(DeliveryError::SpaceMismatch {
                expected: self.space_id.clone(),
                found: found.to_string(),
            });
        }
        Ok(())
    }
}

fn sys_of(raw: &Value) -> DeliveryResult<&Value> {
    raw.get("sys")
        .ok_or_else(|| DeliveryError::MalformedDocument("document has no sys block".into()))
}

fn resource_type_of(raw: &Value) -> DeliveryResult<ResourceType> {
    let tag = sys_of(raw)?
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| DeliveryError::MalformedDocument("document has no sys.type".into()))?;
    Ok(tag.parse()?)
}

fn count(raw: &Value, key: &str, default: usize) -> u64 {
    raw.get(key)
        .and_then(Value::as_u64)
        .unwrap_or(default as u64)
}
