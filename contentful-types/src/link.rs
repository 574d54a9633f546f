//! Typed references between resources.
//!
//! A link never owns its target. On the wire it is a `sys` block of type
//! `Link`:
//!
//! ```json
//! { "sys": { "type": "Link", "linkType": "Entry", "id": "nyancat" } }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The kind of resource a link points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkType {
    Asset,
    Entry,
    Space,
    ContentType,
    /// Any link type this client does not model (e.g. `Environment`).
    Other(String),
}

impl LinkType {
    /// Returns the wire name of the link type.
    pub fn as_str(&self) -> &str {
        match self {
            LinkType::Asset => "Asset",
            LinkType::Entry => "Entry",
            LinkType::Space => "Space",
            LinkType::ContentType => "ContentType",
            LinkType::Other(name) => name,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "Asset" => LinkType::Asset,
            "Entry" => LinkType::Entry,
            "Space" => LinkType::Space,
            "ContentType" => LinkType::ContentType,
            other => LinkType::Other(other.to_string()),
        })
    }
}

impl From<&str> for LinkType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(link_type) => link_type,
            Err(never) => match never {},
        }
    }
}

/// An unresolved reference to another resource by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    id: String,
    link_type: LinkType,
}

impl Link {
    /// Creates a link to the resource with the given id and type.
    pub fn new(id: impl Into<String>, link_type: LinkType) -> Self {
        Self {
            id: id.into(),
            link_type,
        }
    }

    /// Decodes a link from its raw JSON representation.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        Link::deserialize(value).map_err(|e| Error::MalformedLink(e.to_string()))
    }

    /// Returns the id of the linked resource.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the type of the linked resource.
    pub fn link_type(&self) -> &LinkType {
        &self.link_type
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.link_type, self.id)
    }
}

#[derive(Serialize, Deserialize)]
struct LinkEnvelope {
    sys: LinkSys,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkSys {
    #[serde(rename = "type")]
    kind: String,
    link_type: String,
    id: String,
}

impl Serialize for Link {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        LinkEnvelope {
            sys: LinkSys {
                kind: "Link".to_string(),
                link_type: self.link_type.to_string(),
                id: self.id.clone(),
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let envelope = LinkEnvelope::deserialize(deserializer)?;
        if envelope.sys.kind != "Link" {
            return Err(serde::de::Error::custom(format!(
                "expected sys.type `Link`, got `{}`",
                envelope.sys.kind
            )));
        }
        Ok(Link::new(
            envelope.sys.id,
            LinkType::from(envelope.sys.link_type.as_str()),
        ))
    }
}
