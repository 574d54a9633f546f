#![allow(dead_code)]

use async_trait::async_trait;
use contentful_delivery::{DeliveryError, DeliveryResult, Fetcher, ResourceKind};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const SPACE_ID: &str = "cfexampleapi";

/// In-memory fetcher serving canned documents and counting requests.
#[derive(Default)]
pub struct MockFetcher {
    documents: Mutex<HashMap<(ResourceKind, String), Value>>,
    collections: Mutex<HashMap<ResourceKind, Value>>,
    by_id_calls: AtomicUsize,
    requests: Mutex<Vec<(ResourceKind, Vec<(String, String)>)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, kind: ResourceKind, id: &str, document: Value) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert((kind, id.to_string()), document);
        self
    }

    pub fn with_collection(self, kind: ResourceKind, document: Value) -> Self {
        self.collections.lock().unwrap().insert(kind, document);
        self
    }

    pub fn by_id_calls(&self) -> usize {
        self.by_id_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(ResourceKind, Vec<(String, String)>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn get_by_id(
        &self,
        kind: ResourceKind,
        id: &str,
        locale: Option<&str>,
    ) -> DeliveryResult<Value> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        let params = locale
            .map(|l| vec![("locale".to_string(), l.to_string())])
            .unwrap_or_default();
        self.requests.lock().unwrap().push((kind, params));
        self.documents
            .lock()
            .unwrap()
            .get(&(kind, id.to_string()))
            .cloned()
            .ok_or_else(|| DeliveryError::NotFound(format!("{kind} {id}")))
    }

    async fn get_collection(
        &self,
        kind: ResourceKind,
        params: &[(String, String)],
    ) -> DeliveryResult<Value> {
        self.requests.lock().unwrap().push((kind, params.to_vec()));
        self.collections
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .ok_or_else(|| DeliveryError::NotFound(format!("{kind} collection")))
    }

    async fn get_sync(&self, _params: &[(String, String)]) -> DeliveryResult<Value> {
        Err(DeliveryError::NotFound("sync".into()))
    }
}

// ── Fixtures ────────────────────────────────────────────────────

pub fn space_json() -> Value {
    json!({
        "sys": { "type": "Space", "id": SPACE_ID },
        "name": "Contentful Example API",
        "locales": [
            { "code": "en-US", "default": true, "name": "English" },
            { "code": "tlh", "default": false, "name": "Klingon", "fallbackCode": "en-US" }
        ]
    })
}

fn space_link() -> Value {
    json!({ "sys": { "type": "Link", "linkType": "Space", "id": SPACE_ID } })
}

pub fn cat_type_json() -> Value {
    json!({
        "sys": { "type": "ContentType", "id": "cat", "space": space_link(), "revision": 1 },
        "name": "Cat",
        "displayField": "name",
        "fields": [
            { "id": "name", "name": "Name", "type": "Text", "required": true, "localized": true },
            { "id": "lives", "name": "Lives", "type": "Integer" },
            { "id": "bestFriend", "name": "Best Friend", "type": "Link", "linkType": "Entry" },
            { "id": "image", "name": "Image", "type": "Link", "linkType": "Asset" }
        ]
    })
}

/// A multi-locale cat entry whose best friend is `friend`.
pub fn cat_json(id: &str, name: &str, friend: Option<&str>, revision: u64) -> Value {
    let mut fields = json!({
        "name": { "en-US": name },
        "lives": { "en-US": 9 }
    });
    if let Some(friend) = friend {
        fields["bestFriend"] =
            json!({ "en-US": { "sys": { "type": "Link", "linkType": "Entry", "id": friend } } });
    }
    json!({
        "sys": {
            "type": "Entry",
            "id": id,
            "space": space_link(),
            "contentType": { "sys": { "type": "Link", "linkType": "ContentType", "id": "cat" } },
            "revision": revision
        },
        "fields": fields
    })
}

/// A cat entry rendered for one locale: plain field values and `sys.locale`.
pub fn cat_json_in(locale: &str, id: &str, name: &str, friend: Option<&str>, revision: u64) -> Value {
    let mut raw = cat_json(id, name, friend, revision);
    raw["sys"]["locale"] = json!(locale);
    let fields = raw["fields"].as_object_mut().map(std::mem::take).unwrap_or_default();
    raw["fields"] = fields
        .into_iter()
        .map(|(field, per_locale)| (field, per_locale["en-US"].clone()))
        .collect();
    raw
}

pub fn nyancat_asset_json() -> Value {
    json!({
        "sys": { "type": "Asset", "id": "nyancat", "space": space_link(), "revision": 1 },
        "fields": {
            "title": { "en-US": "Nyan Cat" },
            "file": {
                "en-US": {
                    "fileName": "Nyan_cat_250px_frame.png",
                    "contentType": "image/png",
                    "details": { "image": { "width": 250, "height": 250 }, "size": 12273 },
                    "url": "//images.contentful.com/cfexampleapi/nyancat.png"
                }
            }
        }
    })
}

pub fn array_json(items: Vec<Value>, included_entries: Vec<Value>) -> Value {
    json!({
        "sys": { "type": "Array" },
        "total": items.len(),
        "skip": 0,
        "limit": 100,
        "items": items,
        "includes": { "Entry": included_entries }
    })
}
