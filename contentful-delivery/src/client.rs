//! The delivery client: configuration, collaborators and read-through access.

use crate::builder::ResourceBuilder;
use crate::cache::{MetadataCache, NullCache};
use crate::config::ClientConfig;
use crate::error::{DeliveryError, DeliveryResult};
use crate::fetch::{Fetcher, ResourceKind};
use crate::http::HttpFetcher;
use crate::identity::IdentityCache;
use crate::query::Query;
use crate::resolver::{LinkResolver, Resolver};
use async_trait::async_trait;
use contentful_model::{
    Asset, ContentType, Document, Entry, Resource, ResourceArray, Space,
};
use contentful_types::Link;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Read access to one space of the delivery or preview API.
///
/// The client owns one identity cache for its whole lifetime. Spaces and
/// content types are read through identity cache, metadata cache and
/// network in that order; entries and assets requested at the top level
/// always go to the network, while link resolution re-uses built instances.
pub struct Client {
    config: ClientConfig,
    fetcher: Arc<dyn Fetcher>,
    builder: ResourceBuilder,
    resolver: Resolver,
}

impl Client {
    /// Creates a client talking HTTP to the configured API host.
    pub fn new(config: ClientConfig) -> DeliveryResult<Self> {
        let fetcher = Arc::new(HttpFetcher::new(&config)?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates a client on top of any fetch collaborator.
    pub fn with_fetcher(config: ClientConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let identity = Arc::new(IdentityCache::new());
        Self::assemble(config, fetcher, identity, Arc::new(NullCache))
    }

    /// Replaces the metadata cache consulted for spaces and content types.
    #[must_use]
    pub fn with_metadata_cache(self, metadata: Arc<dyn MetadataCache>) -> Self {
        let identity = self.builder.identity().clone();
        Self::assemble(self.config, self.fetcher, identity, metadata)
    }

    fn assemble(
        config: ClientConfig,
        fetcher: Arc<dyn Fetcher>,
        identity: Arc<IdentityCache>,
        metadata: Arc<dyn MetadataCache>,
    ) -> Self {
        let builder = ResourceBuilder::new(config.space_id.clone(), identity, metadata)
            .with_fetcher(fetcher.clone());
        let resolver =
            Resolver::new(builder.clone()).with_default_locale(config.default_locale.clone());
        Self {
            config,
            fetcher,
            builder,
            resolver,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn space_id(&self) -> &str {
        &self.config.space_id
    }

    pub fn is_preview(&self) -> bool {
        self.config.preview
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        &self.fetcher
    }

    pub fn builder(&self) -> &ResourceBuilder {
        &self.builder
    }

    pub fn identity(&self) -> &Arc<IdentityCache> {
        self.builder.identity()
    }

    pub async fn get_space(&self) -> DeliveryResult<Arc<Space>> {
        if let Some(space) = self.builder.cached_space().await? {
            return Ok(space);
        }
        let raw = self
            .fetcher
            .get_by_id(ResourceKind::Space, &self.config.space_id, None)
            .await?;
        match self.builder.build(&raw).await?.into_resource() {
            Some(Resource::Space(space)) => {
                info!("loaded space {} with {} locales", space.id(), space.locales.locales().len());
                Ok(space)
            }
            _ => Err(unexpected("Space")),
        }
    }

    pub async fn get_content_type(&self, id: &str) -> DeliveryResult<Arc<ContentType>> {
        if let Some(content_type) = self.builder.cached_content_type(id).await? {
            return Ok(content_type);
        }
        let raw = self
            .fetcher
            .get_by_id(ResourceKind::ContentType, id, None)
            .await?;
        match self.builder.build(&raw).await?.into_resource() {
            Some(Resource::ContentType(content_type)) => Ok(content_type),
            _ => Err(unexpected("ContentType")),
        }
    }

    pub async fn get_content_types(&self, query: Option<&Query>) -> DeliveryResult<ResourceArray> {
        let params = query.map(Query::to_params).unwrap_or_default();
        self.collection(ResourceKind::ContentType, &params).await
    }

    pub async fn get_entry(&self, id: &str, locale: Option<&str>) -> DeliveryResult<Arc<Entry>> {
        let locale = locale.or(self.config.default_locale.as_deref());
        let raw = self.fetcher.get_by_id(ResourceKind::Entry, id, locale).await?;
        match self.builder.build(&raw).await?.into_resource() {
            Some(Resource::Entry(entry)) => Ok(entry),
            _ => Err(unexpected("Entry")),
        }
    }

    pub async fn get_entries(&self, query: &Query) -> DeliveryResult<ResourceArray> {
        let params = self.params_with_locale(query);
        self.collection(ResourceKind::Entry, &params).await
    }

    pub async fn get_asset(&self, id: &str, locale: Option<&str>) -> DeliveryResult<Arc<Asset>> {
        let locale = locale.or(self.config.default_locale.as_deref());
        let raw = self.fetcher.get_by_id(ResourceKind::Asset, id, locale).await?;
        match self.builder.build(&raw).await?.into_resource() {
            Some(Resource::Asset(asset)) => Ok(asset),
            _ => Err(unexpected("Asset")),
        }
    }

    pub async fn get_assets(&self, query: &Query) -> DeliveryResult<ResourceArray> {
        let params = self.params_with_locale(query);
        self.collection(ResourceKind::Asset, &params).await
    }

    /// Resolves a link to its shared instance.
    pub async fn resolve_link(&self, link: &Link, locale: Option<&str>) -> DeliveryResult<Resource> {
        self.resolver.resolve(link, locale).await
    }

    /// Rebuilds resources from previously serialized API JSON.
    pub async fn revive_json(&self, json: &str) -> DeliveryResult<Document> {
        let raw: Value = serde_json::from_str(json)?;
        self.builder.build(&raw).await
    }

    /// Drops every built instance and included document. The metadata
    /// cache is left alone.
    pub async fn clear_cache(&self) {
        self.builder.identity().clear().await;
        self.builder.clear_included().await;
        debug!("cleared identity cache for space {}", self.config.space_id);
    }

    fn params_with_locale(&self, query: &Query) -> Vec<(String, String)> {
        match (&self.config.default_locale, query.get_locale()) {
            (Some(locale), None) => query.clone().locale(locale.clone()).to_params(),
            _ => query.to_params(),
        }
    }

    async fn collection(
        &self,
        kind: ResourceKind,
        params: &[(String, String)],
    ) -> DeliveryResult<ResourceArray> {
        let raw = self.fetcher.get_collection(kind, params).await?;
        self.builder
            .build(&raw)
            .await?
            .into_array()
            .ok_or_else(|| unexpected("Array"))
    }
}

#[async_trait]
impl LinkResolver for Client {
    async fn resolve(&self, link: &Link, locale: Option<&str>) -> DeliveryResult<Resource> {
        self.resolve_link(link, locale).await
    }
}

fn unexpected(expected: &str) -> DeliveryError {
    DeliveryError::MalformedDocument(format!("expected a {expected} document"))
}
