//! Content types: the schema that drives entry field coercion.

use crate::error::{ModelError, ModelResult};
use contentful_types::{LinkType, SystemProperties};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The declared type of a content type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Symbol,
    Text,
    Integer,
    Number,
    Date,
    Boolean,
    Link,
    Array,
    Object,
    Location,
}

impl FieldType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::Symbol => "Symbol",
            FieldType::Text => "Text",
            FieldType::Integer => "Integer",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
            FieldType::Boolean => "Boolean",
            FieldType::Link => "Link",
            FieldType::Array => "Array",
            FieldType::Object => "Object",
            FieldType::Location => "Location",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "Symbol" => Ok(FieldType::Symbol),
            "Text" => Ok(FieldType::Text),
            "Integer" => Ok(FieldType::Integer),
            "Number" => Ok(FieldType::Number),
            "Date" => Ok(FieldType::Date),
            "Boolean" => Ok(FieldType::Boolean),
            "Link" => Ok(FieldType::Link),
            "Array" => Ok(FieldType::Array),
            "Object" => Ok(FieldType::Object),
            "Location" => Ok(FieldType::Location),
            other => Err(ModelError::Schema(format!("unknown field type `{other}`"))),
        }
    }
}

/// One field of a content type.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentTypeField {
    pub id: String,
    pub name: String,
    pub field_type: FieldType,
    /// Target type of a `Link` field.
    pub link_type: Option<LinkType>,
    /// Element type of an `Array` field.
    pub items_type: Option<FieldType>,
    /// Target type of the links in an `Array` of `Link`.
    pub items_link_type: Option<LinkType>,
    pub required: bool,
    pub localized: bool,
    pub disabled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    link_type: Option<String>,
    #[serde(default)]
    items: Option<RawItems>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    localized: bool,
    #[serde(default)]
    disabled: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItems {
    #[serde(rename = "type", default)]
    item_type: Option<String>,
    #[serde(default)]
    link_type: Option<String>,
}

impl ContentTypeField {
    /// Creates a plain, optional, non-localized field.
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            link_type: None,
            items_type: None,
            items_link_type: None,
            required: false,
            localized: false,
            disabled: false,
        }
    }

    /// Maps a raw field definition, enforcing that links name their target
    /// and arrays name their element type.
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        let raw = RawField::deserialize(value)
            .map_err(|e| ModelError::Schema(format!("malformed field definition: {e}")))?;
        let field_type: FieldType = raw.field_type.parse()?;

        let link_type = raw.link_type.as_deref().map(LinkType::from);
        if field_type == FieldType::Link && link_type.is_none() {
            return Err(ModelError::Schema(format!(
                "link field `{}` has no linkType",
                raw.id
            )));
        }

        let (items_type, items_link_type) = match (field_type, raw.items) {
            (FieldType::Array, None) => {
                return Err(ModelError::Schema(format!(
                    "array field `{}` has no items definition",
                    raw.id
                )));
            }
            (FieldType::Array, Some(items)) => {
                let item_type: FieldType = items
                    .item_type
                    .as_deref()
                    .ok_or_else(|| {
                        ModelError::Schema(format!("array field `{}` has no items.type", raw.id))
                    })?
                    .parse()?;
                let item_link = items.link_type.as_deref().map(LinkType::from);
                if item_type == FieldType::Link && item_link.is_none() {
                    return Err(ModelError::Schema(format!(
                        "array field `{}` links items without items.linkType",
                        raw.id
                    )));
                }
                (Some(item_type), item_link)
            }
            _ => (None, None),
        };

        Ok(Self {
            name: raw.name.unwrap_or_else(|| raw.id.clone()),
            id: raw.id,
            field_type,
            link_type,
            items_type,
            items_link_type,
            required: raw.required,
            localized: raw.localized,
            disabled: raw.disabled,
        })
    }

    #[must_use]
    pub fn link_to(mut self, link_type: LinkType) -> Self {
        self.link_type = Some(link_type);
        self
    }

    #[must_use]
    pub fn array_of(mut self, items_type: FieldType, items_link_type: Option<LinkType>) -> Self {
        self.items_type = Some(items_type);
        self.items_link_type = items_link_type;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl Serialize for ContentTypeField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", self.field_type.as_str())?;
        map.serialize_entry("required", &self.required)?;
        map.serialize_entry("localized", &self.localized)?;
        if let Some(link_type) = &self.link_type {
            map.serialize_entry("linkType", link_type.as_str())?;
        }
        if let (FieldType::Array, Some(items_type)) = (self.field_type, self.items_type) {
            let mut items = serde_json::Map::new();
            items.insert("type".into(), Value::from(items_type.as_str()));
            if let (FieldType::Link, Some(link_type)) = (items_type, &self.items_link_type) {
                items.insert("linkType".into(), Value::from(link_type.as_str()));
            }
            map.serialize_entry("items", &items)?;
        }
        if self.disabled {
            map.serialize_entry("disabled", &true)?;
        }
        map.end()
    }
}

/// A content type definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    pub sys: SystemProperties,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    pub fields: Vec<ContentTypeField>,
}

impl ContentType {
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        let sys = SystemProperties::from_json(field_or_null(value, "sys"))?;
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::Schema(format!("content type `{}` has no name", sys.id())))?
            .to_string();
        let fields = value
            .get("fields")
            .and_then(Value::as_array)
            .map(|raw| {
                raw.iter()
                    .map(ContentTypeField::from_json)
                    .collect::<ModelResult<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            name,
            description: value
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            display_field: value
                .get("displayField")
                .and_then(Value::as_str)
                .map(str::to_string),
            fields,
            sys,
        })
    }

    pub fn id(&self) -> &str {
        self.sys.id()
    }

    pub fn field(&self, id: &str) -> Option<&ContentTypeField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// The field used as the entry title, if one is configured.
    pub fn display_field(&self) -> Option<&ContentTypeField> {
        self.display_field.as_deref().and_then(|id| self.field(id))
    }
}

pub(crate) fn field_or_null<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&Value::Null)
}
