//! Dynamically typed entries.

use crate::content_type::{ContentType, field_or_null};
use crate::error::{ModelError, ModelResult};
use crate::field::{FieldValue, coerce};
use crate::locale::{LocaleTable, Localized, normalize_fields};
use contentful_types::{Link, SystemProperties};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Non-fatal schema drift found while building an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The document carries a field its content type does not declare.
    /// The value is dropped.
    UnknownField { field: String },
    /// A required field has no value in any locale.
    MissingRequiredField { field: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownField { field } => write!(f, "unknown field `{field}`"),
            Diagnostic::MissingRequiredField { field } => {
                write!(f, "required field `{field}` is missing")
            }
        }
    }
}

/// An entry whose fields were coerced through its content type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub sys: SystemProperties,
    #[serde(skip)]
    pub content_type: Arc<ContentType>,
    pub fields: BTreeMap<String, Localized<FieldValue>>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Entry {
    /// Builds an entry from a raw document and its content type.
    ///
    /// Disabled fields are skipped. Fields the content type does not know and
    /// required fields without a value are reported as diagnostics.
    pub fn from_json(value: &Value, content_type: Arc<ContentType>) -> ModelResult<Self> {
        let sys = SystemProperties::from_json(field_or_null(value, "sys"))?;
        if let Some(link) = sys.content_type()
            && link.id() != content_type.id()
        {
            return Err(ModelError::Schema(format!(
                "entry `{}` is of content type `{}`, not `{}`",
                sys.id(),
                link.id(),
                content_type.id()
            )));
        }

        let raw_fields = match value.get("fields") {
            Some(Value::Object(fields)) => normalize_fields(fields, sys.locale())?,
            _ => BTreeMap::new(),
        };

        let mut fields = BTreeMap::new();
        let mut diagnostics = Vec::new();
        for (field_id, per_locale) in raw_fields {
            let Some(definition) = content_type.field(&field_id) else {
                diagnostics.push(Diagnostic::UnknownField { field: field_id });
                continue;
            };
            if definition.disabled {
                continue;
            }

            let mut coerced = Localized::new();
            for (locale, raw) in per_locale {
                if let Some(value) = coerce(definition, &raw)? {
                    coerced.insert(locale, value);
                }
            }
            if !coerced.is_empty() {
                fields.insert(field_id, coerced);
            }
        }

        for definition in &content_type.fields {
            if definition.required && !definition.disabled && !fields.contains_key(&definition.id) {
                diagnostics.push(Diagnostic::MissingRequiredField {
                    field: definition.id.clone(),
                });
            }
        }

        Ok(Self {
            sys,
            content_type,
            fields,
            diagnostics,
        })
    }

    pub fn id(&self) -> &str {
        self.sys.id()
    }

    /// Reads a field in the requested locale, walking the fallback chain.
    ///
    /// Without a requested locale, an entry rendered for a single locale is
    /// read in that locale. Non-localized fields come from the default
    /// locale, or from the rendered locale of a single-locale entry. The
    /// requested locale is validated either way.
    pub fn field(
        &self,
        locales: &LocaleTable,
        id: &str,
        locale: Option<&str>,
    ) -> ModelResult<Option<&FieldValue>> {
        locales.resolve(locale)?;
        let Some(values) = self.fields.get(id) else {
            return Ok(None);
        };
        let rendered = self.sys.locale().filter(|code| locales.contains(code));
        let localized = self
            .content_type
            .field(id)
            .is_none_or(|definition| definition.localized);
        if localized {
            locales.value_for(values, locale.or(rendered))
        } else {
            Ok(locales
                .value_for(values, None)?
                .or_else(|| self.sys.locale().and_then(|code| values.get(code))))
        }
    }

    /// The value of the content type's display field.
    pub fn title(&self, locales: &LocaleTable, locale: Option<&str>) -> ModelResult<Option<&str>> {
        match &self.content_type.display_field {
            Some(id) => Ok(self.field(locales, id, locale)?.and_then(FieldValue::as_str)),
            None => Ok(None),
        }
    }

    /// Every link held by any field in any locale.
    pub fn links(&self) -> Vec<&Link> {
        self.fields
            .values()
            .flat_map(|per_locale| per_locale.values())
            .flat_map(FieldValue::links)
            .collect()
    }
}
