//! Locales, the per-space locale table, and fallback lookup.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Values keyed by locale code.
pub type Localized<T> = BTreeMap<String, T>;

/// A locale configured for a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    #[serde(rename = "code")]
    pub id: String,
    pub name: String,
    #[serde(rename = "fallbackCode", default, skip_serializing_if = "Option::is_none")]
    pub fallback_id: Option<String>,
    #[serde(rename = "default", default)]
    pub is_default: bool,
}

impl Locale {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        fallback_id: Option<&str>,
        is_default: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fallback_id: fallback_id.map(str::to_string),
            is_default,
        }
    }
}

/// The ordered locales of a space.
///
/// Construction guarantees exactly one default locale, unique ids, and
/// fallback chains that only name known locales and never loop.
///
/// A chain is not required to reach the default locale. A locale without a
/// fallback ends its own chain, and lookups along it report absence once
/// the chain is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTable {
    locales: Vec<Locale>,
    default_index: usize,
}

impl LocaleTable {
    pub fn new(locales: Vec<Locale>) -> ModelResult<Self> {
        let mut defaults = locales.iter().enumerate().filter(|(_, l)| l.is_default);
        let default_index = match (defaults.next(), defaults.next()) {
            (Some((index, _)), None) => index,
            (None, _) => return Err(ModelError::Schema("space has no default locale".into())),
            (Some(_), Some(_)) => {
                return Err(ModelError::Schema(
                    "space has more than one default locale".into(),
                ));
            }
        };

        for (index, locale) in locales.iter().enumerate() {
            if locales[..index].iter().any(|l| l.id == locale.id) {
                return Err(ModelError::Schema(format!(
                    "locale `{}` is declared twice",
                    locale.id
                )));
            }
        }

        let table = Self {
            locales,
            default_index,
        };

        for locale in &table.locales {
            let mut current = locale;
            let mut hops = 0;
            while let Some(next) = current.fallback_id.as_deref() {
                current = table.get(next).ok_or_else(|| {
                    ModelError::Schema(format!(
                        "locale `{}` falls back to unknown locale `{next}`",
                        current.id
                    ))
                })?;
                hops += 1;
                if hops > table.locales.len() {
                    return Err(ModelError::Schema(format!(
                        "fallback chain of locale `{}` loops",
                        locale.id
                    )));
                }
            }
        }

        Ok(table)
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn default_locale(&self) -> &Locale {
        &self.locales[self.default_index]
    }

    pub fn get(&self, id: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Resolves a requested locale, defaulting to the space's default locale.
    pub fn resolve(&self, requested: Option<&str>) -> ModelResult<&Locale> {
        match requested {
            None => Ok(self.default_locale()),
            Some(id) => self.get(id).ok_or_else(|| ModelError::UnknownLocale {
                locale: id.to_string(),
                available: self
                    .locales
                    .iter()
                    .map(|l| l.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// The locales consulted for `requested`, in lookup order.
    pub fn fallback_chain(&self, requested: Option<&str>) -> ModelResult<Vec<&str>> {
        let mut current = self.resolve(requested)?;
        let mut chain = vec![current.id.as_str()];
        while let Some(next) = current.fallback_id.as_deref().and_then(|id| self.get(id)) {
            chain.push(next.id.as_str());
            current = next;
        }
        Ok(chain)
    }

    /// Returns the value for `requested`, walking the fallback chain when the
    /// map has no entry for it. Absence is not an error; an unknown locale is.
    pub fn value_for<'a, T>(
        &self,
        map: &'a Localized<T>,
        requested: Option<&str>,
    ) -> ModelResult<Option<&'a T>> {
        Ok(self
            .fallback_chain(requested)?
            .into_iter()
            .find_map(|id| map.get(id)))
    }
}

impl Serialize for LocaleTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.locales.serialize(serializer)
    }
}

/// Turns the raw `fields` object of a document into field → locale → value.
///
/// Responses rendered for a single locale carry plain values and name the
/// locale in `sys.locale`; those are wrapped into one-entry maps.
pub fn normalize_fields(
    fields: &Map<String, Value>,
    locale: Option<&str>,
) -> ModelResult<BTreeMap<String, Localized<Value>>> {
    let mut normalized = BTreeMap::new();
    for (field_id, raw) in fields {
        let per_locale = match locale {
            Some(locale) => Localized::from([(locale.to_string(), raw.clone())]),
            None => match raw {
                Value::Object(map) => map
                    .iter()
                    .map(|(code, value)| (code.clone(), value.clone()))
                    .collect(),
                _ => {
                    return Err(ModelError::coercion(
                        field_id,
                        "expected an object keyed by locale",
                    ));
                }
            },
        };
        normalized.insert(field_id.clone(), per_locale);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_fallback_is_schema_error() {
        let err = LocaleTable::new(vec![
            Locale::new("en-US", "English", None, true),
            Locale::new("de-DE", "German", Some("fr-FR"), false),
        ])
        .unwrap_err();
        assert!(matches!(err, ModelError::Schema(_)));
    }
}
