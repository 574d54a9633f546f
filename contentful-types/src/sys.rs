//! Resource metadata (`sys`) and the resource type discriminator.

use crate::link::Link;
use crate::timestamp;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The `sys.type` tag of a raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Array,
    Space,
    ContentType,
    Entry,
    Asset,
    DeletedEntry,
    DeletedAsset,
    DeletedContentType,
    Link,
}

impl ResourceType {
    /// Returns the wire name of the resource type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Array => "Array",
            ResourceType::Space => "Space",
            ResourceType::ContentType => "ContentType",
            ResourceType::Entry => "Entry",
            ResourceType::Asset => "Asset",
            ResourceType::DeletedEntry => "DeletedEntry",
            ResourceType::DeletedAsset => "DeletedAsset",
            ResourceType::DeletedContentType => "DeletedContentType",
            ResourceType::Link => "Link",
        }
    }

    /// Returns true for the tombstone types produced by delta sync.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(
            self,
            ResourceType::DeletedEntry
                | ResourceType::DeletedAsset
                | ResourceType::DeletedContentType
        )
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Array" => Ok(ResourceType::Array),
            "Space" => Ok(ResourceType::Space),
            "ContentType" => Ok(ResourceType::ContentType),
            "Entry" => Ok(ResourceType::Entry),
            "Asset" => Ok(ResourceType::Asset),
            "DeletedEntry" => Ok(ResourceType::DeletedEntry),
            "DeletedAsset" => Ok(ResourceType::DeletedAsset),
            "DeletedContentType" => Ok(ResourceType::DeletedContentType),
            "Link" => Ok(ResourceType::Link),
            other => Err(Error::UnknownResourceType(other.to_string())),
        }
    }
}

impl Serialize for ResourceType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResourceType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Metadata attached to every resource.
///
/// Immutable once constructed. `space` and `content_type` are kept as links;
/// the objects they name are looked up through the identity cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemProperties {
    id: String,
    #[serde(rename = "type")]
    resource_type: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    space: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    revision: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    deleted_at: Option<DateTime<Utc>>,
}

impl SystemProperties {
    /// Creates a minimal `sys` block.
    pub fn new(id: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            id: id.into(),
            resource_type,
            space: None,
            content_type: None,
            revision: None,
            locale: None,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    /// Decodes the `sys` block of a raw document.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        Ok(SystemProperties::deserialize(value)?)
    }

    #[must_use]
    pub fn with_space(mut self, space_id: impl Into<String>) -> Self {
        self.space = Some(Link::new(space_id, crate::LinkType::Space));
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type_id: impl Into<String>) -> Self {
        self.content_type = Some(Link::new(content_type_id, crate::LinkType::ContentType));
        self
    }

    #[must_use]
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = Some(revision);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    #[must_use]
    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    #[must_use]
    pub fn with_deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(at);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Link to the space the resource belongs to.
    pub fn space(&self) -> Option<&Link> {
        self.space.as_ref()
    }

    /// Link to the content type of an entry.
    pub fn content_type(&self) -> Option<&Link> {
        self.content_type.as_ref()
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    /// The locale a single-locale response was rendered in.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}
