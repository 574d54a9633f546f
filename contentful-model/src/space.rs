use crate::content_type::field_or_null;
use crate::error::{ModelError, ModelResult};
use crate::locale::{Locale, LocaleTable};
use contentful_types::SystemProperties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A space and its locale table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Space {
    pub sys: SystemProperties,
    pub name: String,
    pub locales: LocaleTable,
}

impl Space {
    pub fn new(sys: SystemProperties, name: impl Into<String>, locales: LocaleTable) -> Self {
        Self {
            sys,
            name: name.into(),
            locales,
        }
    }

    /// Decodes a raw `Space` document. A space without a default locale is
    /// a schema error.
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        let sys = SystemProperties::from_json(field_or_null(value, "sys"))?;
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let locales = match value.get("locales") {
            Some(raw) => Vec::<Locale>::deserialize(raw)
                .map_err(|e| ModelError::Schema(format!("malformed locale list: {e}")))?,
            None => Vec::new(),
        };
        Ok(Self::new(sys, name, LocaleTable::new(locales)?))
    }

    pub fn id(&self) -> &str {
        self.sys.id()
    }

    pub fn default_locale(&self) -> &Locale {
        self.locales.default_locale()
    }
}
