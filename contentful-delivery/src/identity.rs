//! Identity cache: one shared instance per resource id and locale scope.
//!
//! Resources are registered only after they are fully built, so another
//! caller never observes a half-populated entry. Cycles between entries
//! terminate because links stay unresolved at build time and resolution
//! finds already-registered instances here first.

use contentful_model::{Asset, ContentType, Entry, Resource, Space};
use contentful_types::{Link, LinkType, ResourceType, SystemProperties};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// The set of locales a built resource carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocaleScope {
    /// Every locale of the space (`locale=*` or sync responses).
    All,
    /// A response rendered in one locale.
    Single(String),
}

impl LocaleScope {
    /// Scope of a built resource, taken from `sys.locale`.
    pub fn of(sys: &SystemProperties) -> Self {
        match sys.locale() {
            Some(locale) => LocaleScope::Single(locale.to_string()),
            None => LocaleScope::All,
        }
    }

    /// Scope matching a requested locale. `None` and `"*"` mean all locales.
    pub fn requested(locale: Option<&str>) -> Self {
        match locale {
            None | Some("*") => LocaleScope::All,
            Some(locale) => LocaleScope::Single(locale.to_string()),
        }
    }
}

type ScopedKey = (String, LocaleScope);

#[derive(Default)]
struct Instances {
    space: Option<Arc<Space>>,
    content_types: HashMap<String, Arc<ContentType>>,
    entries: HashMap<ScopedKey, Arc<Entry>>,
    assets: HashMap<ScopedKey, Arc<Asset>>,
    resolved: HashMap<(Link, Option<String>), Resource>,
}

impl Instances {
    fn register(&mut self, resource: Resource) -> Resource {
        match resource {
            Resource::Space(space) => {
                let canonical = match self.space.clone() {
                    Some(existing) if !is_newer(&space.sys, &existing.sys) => existing,
                    _ => {
                        self.space = Some(space.clone());
                        space
                    }
                };
                Resource::Space(canonical)
            }
            Resource::ContentType(content_type) => {
                let id = content_type.id().to_string();
                let canonical = match self.content_types.get(&id).cloned() {
                    Some(existing) if !is_newer(&content_type.sys, &existing.sys) => existing,
                    _ => {
                        self.content_types.insert(id, content_type.clone());
                        content_type
                    }
                };
                Resource::ContentType(canonical)
            }
            Resource::Entry(entry) => {
                let key = (entry.id().to_string(), LocaleScope::of(&entry.sys));
                let canonical = match self.entries.get(&key).cloned() {
                    Some(existing) if !is_newer(&entry.sys, &existing.sys) => existing,
                    replaced => {
                        if replaced.is_some() {
                            self.forget_resolutions(&LinkType::Entry, &key.0);
                        }
                        self.entries.insert(key, entry.clone());
                        entry
                    }
                };
                Resource::Entry(canonical)
            }
            Resource::Asset(asset) => {
                let key = (asset.id().to_string(), LocaleScope::of(&asset.sys));
                let canonical = match self.assets.get(&key).cloned() {
                    Some(existing) if !is_newer(&asset.sys, &existing.sys) => existing,
                    replaced => {
                        if replaced.is_some() {
                            self.forget_resolutions(&LinkType::Asset, &key.0);
                        }
                        self.assets.insert(key, asset.clone());
                        asset
                    }
                };
                Resource::Asset(canonical)
            }
            Resource::DeletedEntry(_)
            | Resource::DeletedAsset(_)
            | Resource::DeletedContentType(_) => {
                self.evict(resource.resource_type(), resource.id());
                resource
            }
        }
    }

    fn evict(&mut self, resource_type: ResourceType, id: &str) {
        match resource_type {
            ResourceType::Entry | ResourceType::DeletedEntry => {
                self.entries.retain(|(entry_id, _), _| entry_id != id);
                self.forget_resolutions(&LinkType::Entry, id);
            }
            ResourceType::Asset | ResourceType::DeletedAsset => {
                self.assets.retain(|(asset_id, _), _| asset_id != id);
                self.forget_resolutions(&LinkType::Asset, id);
            }
            ResourceType::ContentType | ResourceType::DeletedContentType => {
                self.content_types.remove(id);
            }
            _ => {}
        }
    }

    fn forget_resolutions(&mut self, link_type: &LinkType, id: &str) {
        self.resolved
            .retain(|(link, _), _| !(link.link_type() == link_type && link.id() == id));
    }
}

fn find_scoped<T>(
    instances: &HashMap<ScopedKey, Arc<T>>,
    id: &str,
    scope: &LocaleScope,
    default_locale: Option<&str>,
) -> Option<Arc<T>> {
    if let Some(found) = instances.get(&(id.to_string(), scope.clone())) {
        return Some(found.clone());
    }
    if let LocaleScope::Single(_) = scope {
        return instances.get(&(id.to_string(), LocaleScope::All)).cloned();
    }

    let mut candidates = instances
        .iter()
        .filter(|((instance_id, _), _)| instance_id == id)
        .collect::<Vec<_>>();
    if candidates.len() == 1 {
        return candidates.pop().map(|(_, instance)| instance.clone());
    }
    let default_scope = LocaleScope::Single(default_locale?.to_string());
    candidates
        .into_iter()
        .find(|((_, instance_scope), _)| *instance_scope == default_scope)
        .map(|(_, instance)| instance.clone())
}

fn is_newer(candidate: &SystemProperties, existing: &SystemProperties) -> bool {
    candidate.revision().unwrap_or(0) > existing.revision().unwrap_or(0)
}

/// Canonical instances of every resource built through one client.
///
/// Lives as long as the client and is emptied only by [`IdentityCache::clear`].
#[derive(Default)]
pub struct IdentityCache {
    inner: RwLock<Instances>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn space(&self) -> Option<Arc<Space>> {
        self.inner.read().await.space.clone()
    }

    pub async fn content_type(&self, id: &str) -> Option<Arc<ContentType>> {
        self.inner.read().await.content_types.get(id).cloned()
    }

    /// Finds a built entry or asset.
    ///
    /// A single-locale request also accepts an instance carrying all
    /// locales. An all-locales request falls back to a single-locale
    /// instance when it is the only one for the id, or when it is rendered
    /// in the space's default locale.
    pub async fn lookup(&self, link: &Link, scope: &LocaleScope) -> Option<Resource> {
        let inner = self.inner.read().await;
        let default_locale = inner
            .space
            .as_ref()
            .map(|space| space.default_locale().id.clone());
        let default_locale = default_locale.as_deref();
        match link.link_type() {
            LinkType::Entry => find_scoped(&inner.entries, link.id(), scope, default_locale)
                .map(Resource::Entry),
            LinkType::Asset => find_scoped(&inner.assets, link.id(), scope, default_locale)
                .map(Resource::Asset),
            _ => None,
        }
    }

    /// Registers a fully built resource and returns the canonical instance.
    ///
    /// An instance already registered under the same key wins unless the
    /// new one carries a strictly higher revision. Deleted stubs evict the
    /// resource they name.
    pub async fn register(&self, resource: Resource) -> Resource {
        self.inner.write().await.register(resource)
    }

    /// Registers a batch under one lock, preserving order.
    pub async fn register_all(&self, resources: Vec<Resource>) -> Vec<Resource> {
        let mut inner = self.inner.write().await;
        let registered: Vec<Resource> = resources
            .into_iter()
            .map(|resource| inner.register(resource))
            .collect();
        debug!("registered {} resources", registered.len());
        registered
    }

    pub async fn resolution(&self, link: &Link, locale: Option<&str>) -> Option<Resource> {
        self.inner
            .read()
            .await
            .resolved
            .get(&(link.clone(), locale.map(str::to_string)))
            .cloned()
    }

    pub async fn remember_resolution(&self, link: &Link, locale: Option<&str>, resource: Resource) {
        self.inner
            .write()
            .await
            .resolved
            .insert((link.clone(), locale.map(str::to_string)), resource);
    }

    /// Removes every instance of the resource with this id.
    pub async fn evict(&self, resource_type: ResourceType, id: &str) {
        self.inner.write().await.evict(resource_type, id);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = Instances::default();
    }

    /// Number of registered resources.
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        usize::from(inner.space.is_some())
            + inner.content_types.len()
            + inner.entries.len()
            + inner.assets.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
