//! Typed entry field values and schema-driven coercion.

use crate::content_type::{ContentTypeField, FieldType};
use crate::error::{ModelError, ModelResult};
use chrono::{DateTime, Utc};
use contentful_types::{Link, LinkType, timestamp};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A coerced entry field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Symbol(String),
    Text(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Location { lat: f64, lon: f64 },
    /// Unresolved reference; resolve through a link resolver on access.
    Link(Link),
    Array(Vec<FieldValue>),
    /// Untyped JSON retained as-is.
    Object(Value),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Symbol(s) | FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            FieldValue::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Value> {
        match self {
            FieldValue::Object(value) => Some(value),
            _ => None,
        }
    }

    /// All links held by this value, in order.
    pub fn links(&self) -> Vec<&Link> {
        match self {
            FieldValue::Link(link) => vec![link],
            FieldValue::Array(items) => items.iter().flat_map(FieldValue::links).collect(),
            _ => Vec::new(),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Symbol(s) | FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Boolean(b) => serializer.serialize_bool(*b),
            FieldValue::Date(d) => serializer.serialize_str(&timestamp::format(d)),
            FieldValue::Location { lat, lon } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("lat", lat)?;
                map.serialize_entry("lon", lon)?;
                map.end()
            }
            FieldValue::Link(link) => link.serialize(serializer),
            FieldValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Object(value) => value.serialize(serializer),
        }
    }
}

/// Coerces a raw JSON value according to its field definition.
///
/// Returns `Ok(None)` for `null`, which the API uses for cleared values.
pub fn coerce(field: &ContentTypeField, raw: &Value) -> ModelResult<Option<FieldValue>> {
    if raw.is_null() {
        return Ok(None);
    }
    coerce_as(
        field,
        field.field_type,
        field.link_type.as_ref(),
        raw,
    )
    .map(Some)
}

fn coerce_as(
    field: &ContentTypeField,
    field_type: FieldType,
    link_type: Option<&LinkType>,
    raw: &Value,
) -> ModelResult<FieldValue> {
    let id = field.id.as_str();
    match field_type {
        FieldType::Symbol => expect_str(id, raw).map(FieldValue::Symbol),
        FieldType::Text => expect_str(id, raw).map(FieldValue::Text),
        FieldType::Integer => coerce_integer(id, raw).map(FieldValue::Integer),
        FieldType::Number => coerce_number(id, raw).map(FieldValue::Number),
        FieldType::Boolean => raw
            .as_bool()
            .map(FieldValue::Boolean)
            .ok_or_else(|| ModelError::coercion(id, format!("expected a boolean, got {raw}"))),
        FieldType::Date => {
            let text = raw
                .as_str()
                .ok_or_else(|| ModelError::coercion(id, format!("expected a date, got {raw}")))?;
            timestamp::parse(text)
                .map(FieldValue::Date)
                .map_err(|_| ModelError::coercion(id, format!("invalid date `{text}`")))
        }
        FieldType::Location => {
            let lat = raw.get("lat").and_then(Value::as_f64);
            let lon = raw.get("lon").and_then(Value::as_f64);
            match (lat, lon) {
                (Some(lat), Some(lon)) => Ok(FieldValue::Location { lat, lon }),
                _ => Err(ModelError::coercion(id, "expected an object with lat and lon")),
            }
        }
        FieldType::Link => {
            let link = Link::from_json(raw).map_err(|e| ModelError::coercion(id, e.to_string()))?;
            if let Some(expected) = link_type
                && link.link_type() != expected
            {
                return Err(ModelError::coercion(
                    id,
                    format!("expected a link to {expected}, got {}", link.link_type()),
                ));
            }
            Ok(FieldValue::Link(link))
        }
        FieldType::Array => {
            let items_type = field
                .items_type
                .ok_or_else(|| ModelError::Schema(format!("array field `{id}` has no items type")))?;
            if items_type == FieldType::Array {
                return Err(ModelError::Schema(format!(
                    "array field `{id}` declares nested arrays"
                )));
            }
            let items = raw
                .as_array()
                .ok_or_else(|| ModelError::coercion(id, format!("expected an array, got {raw}")))?;
            items
                .iter()
                .map(|item| coerce_as(field, items_type, field.items_link_type.as_ref(), item))
                .collect::<ModelResult<Vec<_>>>()
                .map(FieldValue::Array)
        }
        FieldType::Object => Ok(FieldValue::Object(raw.clone())),
    }
}

fn expect_str(id: &str, raw: &Value) -> ModelResult<String> {
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| ModelError::coercion(id, format!("expected a string, got {raw}")))
}

fn coerce_integer(id: &str, raw: &Value) -> ModelResult<i64> {
    if let Some(i) = raw.as_i64() {
        return Ok(i);
    }
    if let Some(f) = raw.as_f64()
        && f.fract() == 0.0
        && f.is_finite()
    {
        return Ok(f as i64);
    }
    if let Some(parsed) = raw.as_str().and_then(|s| s.trim().parse::<i64>().ok()) {
        return Ok(parsed);
    }
    Err(ModelError::coercion(id, format!("expected an integer, got {raw}")))
}

fn coerce_number(id: &str, raw: &Value) -> ModelResult<f64> {
    if let Some(f) = raw.as_f64() {
        return Ok(f);
    }
    if let Some(parsed) = raw.as_str().and_then(|s| s.trim().parse::<f64>().ok()) {
        return Ok(parsed);
    }
    Err(ModelError::coercion(id, format!("expected a number, got {raw}")))
}
