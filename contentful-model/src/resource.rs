//! The built resource graph: resources, deleted stubs and list envelopes.

use crate::asset::Asset;
use crate::content_type::{ContentType, field_or_null};
use crate::entry::Entry;
use crate::error::ModelResult;
use crate::space::Space;
use contentful_types::{ResourceType, SystemProperties};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;

/// A tombstone delivered by delta sync. Only `sys` is ever present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedResource {
    pub sys: SystemProperties,
}

impl DeletedResource {
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        Ok(Self {
            sys: SystemProperties::from_json(field_or_null(value, "sys"))?,
        })
    }

    pub fn id(&self) -> &str {
        self.sys.id()
    }
}

/// Any built resource. Live resources are shared with the identity cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Space(Arc<Space>),
    ContentType(Arc<ContentType>),
    Entry(Arc<Entry>),
    Asset(Arc<Asset>),
    DeletedEntry(DeletedResource),
    DeletedAsset(DeletedResource),
    DeletedContentType(DeletedResource),
}

impl Resource {
    pub fn sys(&self) -> &SystemProperties {
        match self {
            Resource::Space(space) => &space.sys,
            Resource::ContentType(content_type) => &content_type.sys,
            Resource::Entry(entry) => &entry.sys,
            Resource::Asset(asset) => &asset.sys,
            Resource::DeletedEntry(stub)
            | Resource::DeletedAsset(stub)
            | Resource::DeletedContentType(stub) => &stub.sys,
        }
    }

    pub fn id(&self) -> &str {
        self.sys().id()
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            Resource::Space(_) => ResourceType::Space,
            Resource::ContentType(_) => ResourceType::ContentType,
            Resource::Entry(_) => ResourceType::Entry,
            Resource::Asset(_) => ResourceType::Asset,
            Resource::DeletedEntry(_) => ResourceType::DeletedEntry,
            Resource::DeletedAsset(_) => ResourceType::DeletedAsset,
            Resource::DeletedContentType(_) => ResourceType::DeletedContentType,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.resource_type().is_deleted()
    }

    pub fn as_space(&self) -> Option<&Arc<Space>> {
        match self {
            Resource::Space(space) => Some(space),
            _ => None,
        }
    }

    pub fn as_content_type(&self) -> Option<&Arc<ContentType>> {
        match self {
            Resource::ContentType(content_type) => Some(content_type),
            _ => None,
        }
    }

    pub fn as_entry(&self) -> Option<&Arc<Entry>> {
        match self {
            Resource::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&Arc<Asset>> {
        match self {
            Resource::Asset(asset) => Some(asset),
            _ => None,
        }
    }

    pub fn as_deleted(&self) -> Option<&DeletedResource> {
        match self {
            Resource::DeletedEntry(stub)
            | Resource::DeletedAsset(stub)
            | Resource::DeletedContentType(stub) => Some(stub),
            _ => None,
        }
    }

    /// True when both values are the same shared instance.
    pub fn ptr_eq(&self, other: &Resource) -> bool {
        match (self, other) {
            (Resource::Space(a), Resource::Space(b)) => Arc::ptr_eq(a, b),
            (Resource::ContentType(a), Resource::ContentType(b)) => Arc::ptr_eq(a, b),
            (Resource::Entry(a), Resource::Entry(b)) => Arc::ptr_eq(a, b),
            (Resource::Asset(a), Resource::Asset(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Resource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Resource::Space(space) => space.serialize(serializer),
            Resource::ContentType(content_type) => content_type.serialize(serializer),
            Resource::Entry(entry) => entry.serialize(serializer),
            Resource::Asset(asset) => asset.serialize(serializer),
            Resource::DeletedEntry(stub)
            | Resource::DeletedAsset(stub)
            | Resource::DeletedContentType(stub) => stub.serialize(serializer),
        }
    }
}

/// The envelope of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceArray {
    pub items: Vec<Resource>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

impl ResourceArray {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a ResourceArray {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for ResourceArray {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("sys", &serde_json::json!({ "type": "Array" }))?;
        map.serialize_entry("total", &self.total)?;
        map.serialize_entry("skip", &self.skip)?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry("items", &self.items)?;
        map.end()
    }
}

/// The result of building one raw document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Resource(Resource),
    Array(ResourceArray),
}

impl Document {
    pub fn into_resource(self) -> Option<Resource> {
        match self {
            Document::Resource(resource) => Some(resource),
            Document::Array(_) => None,
        }
    }

    pub fn into_array(self) -> Option<ResourceArray> {
        match self {
            Document::Array(array) => Some(array),
            Document::Resource(_) => None,
        }
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Document::Resource(resource) => resource.serialize(serializer),
            Document::Array(array) => array.serialize(serializer),
        }
    }
}
