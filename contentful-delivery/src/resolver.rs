//! Lazy link resolution.

use crate::builder::ResourceBuilder;
use crate::error::{DeliveryError, DeliveryResult};
use crate::fetch::ResourceKind;
use crate::identity::LocaleScope;
use async_trait::async_trait;
use contentful_model::{Document, Resource};
use contentful_types::{Link, LinkType};
use tracing::debug;

/// Resolves links to shared resource instances on first access.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    async fn resolve(&self, link: &Link, locale: Option<&str>) -> DeliveryResult<Resource>;
}

/// Resolves through the identity cache, then the included table, then the
/// builder's fetcher. Results are memoized per link and locale.
#[derive(Clone)]
pub struct Resolver {
    builder: ResourceBuilder,
    default_locale: Option<String>,
}

impl Resolver {
    pub fn new(builder: ResourceBuilder) -> Self {
        Self {
            builder,
            default_locale: None,
        }
    }

    /// Locale used when `resolve` is called without one.
    #[must_use]
    pub fn with_default_locale(mut self, locale: Option<String>) -> Self {
        self.default_locale = locale;
        self
    }

    pub fn builder(&self) -> &ResourceBuilder {
        &self.builder
    }

    async fn locate(&self, link: &Link, locale: Option<&str>) -> DeliveryResult<Resource> {
        let identity = self.builder.identity();
        if let Some(found) = identity.lookup(link, &LocaleScope::requested(locale)).await {
            return Ok(found);
        }

        if let Some(built) = self.builder.build_included(link).await? {
            return Ok(built);
        }

        let Some(fetcher) = self.builder.fetcher() else {
            return Err(DeliveryError::UnresolvedLink(link.to_string()));
        };
        let kind = match link.link_type() {
            LinkType::Entry => ResourceKind::Entry,
            _ => ResourceKind::Asset,
        };
        debug!("fetching {} to resolve link", link);
        let raw = fetcher.get_by_id(kind, link.id(), locale).await?;
        match self.builder.build(&raw).await? {
            Document::Resource(resource) if resource.id() == link.id() => Ok(resource),
            _ => Err(DeliveryError::UnresolvedLink(link.to_string())),
        }
    }
}

#[async_trait]
impl LinkResolver for Resolver {
    async fn resolve(&self, link: &Link, locale: Option<&str>) -> DeliveryResult<Resource> {
        if !matches!(link.link_type(), LinkType::Entry | LinkType::Asset) {
            return Err(DeliveryError::UnsupportedLinkType(
                link.link_type().to_string(),
            ));
        }
        let locale = locale.or(self.default_locale.as_deref());

        let identity = self.builder.identity();
        if let Some(resolved) = identity.resolution(link, locale).await {
            return Ok(resolved);
        }

        let resolved = self.locate(link, locale).await?;
        identity
            .remember_resolution(link, locale, resolved.clone())
            .await;
        Ok(resolved)
    }
}
