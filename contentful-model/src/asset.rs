//! Assets and their per-locale files.

use crate::content_type::field_or_null;
use crate::error::{ModelError, ModelResult};
use crate::image::ImageOptions;
use crate::locale::{LocaleTable, Localized, normalize_fields};
use contentful_types::SystemProperties;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub file_name: String,
    pub content_type: String,
    /// Protocol-relative URL as delivered by the API.
    pub url: String,
    pub size: u64,
}

impl File {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        url: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            url: url.into(),
            size,
        }
    }
}

/// An image file with known dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file: File,
    pub width: u32,
    pub height: u32,
}

impl ImageFile {
    pub fn new(file: File, width: u32, height: u32) -> Self {
        Self {
            file,
            width,
            height,
        }
    }

    /// The image URL, with transformation options appended when given.
    pub fn url(&self, options: Option<&ImageOptions>) -> String {
        match options {
            Some(options) => format!("{}?{}", self.file.url, options.query_string()),
            None => self.file.url.clone(),
        }
    }
}

/// The file attached to an asset in one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetFile {
    File(File),
    Image(ImageFile),
}

impl AssetFile {
    fn inner(&self) -> &File {
        match self {
            AssetFile::File(file) => file,
            AssetFile::Image(image) => &image.file,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.inner().file_name
    }

    pub fn content_type(&self) -> &str {
        &self.inner().content_type
    }

    pub fn url(&self) -> &str {
        &self.inner().url
    }

    pub fn size(&self) -> u64 {
        self.inner().size
    }

    pub fn as_image(&self) -> Option<&ImageFile> {
        match self {
            AssetFile::Image(image) => Some(image),
            AssetFile::File(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    file_name: String,
    content_type: String,
    url: String,
    #[serde(default)]
    details: RawDetails,
}

#[derive(Deserialize, Default)]
struct RawDetails {
    #[serde(default)]
    size: u64,
    #[serde(default)]
    image: Option<RawImage>,
}

#[derive(Deserialize)]
struct RawImage {
    width: u32,
    height: u32,
}

impl AssetFile {
    /// Decodes a raw file object. Image metadata is only honoured for image
    /// MIME types.
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        let raw = RawFile::deserialize(value)
            .map_err(|e| ModelError::coercion("file", e.to_string()))?;
        let file = File::new(raw.file_name, raw.content_type, raw.url, raw.details.size);
        Ok(match raw.details.image {
            Some(image) if file.content_type.starts_with("image/") => {
                AssetFile::Image(ImageFile::new(file, image.width, image.height))
            }
            _ => AssetFile::File(file),
        })
    }
}

impl Serialize for AssetFile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let file = self.inner();
        let mut details = serde_json::Map::new();
        details.insert("size".into(), Value::from(file.size));
        if let AssetFile::Image(image) = self {
            details.insert(
                "image".into(),
                serde_json::json!({ "width": image.width, "height": image.height }),
            );
        }

        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("fileName", &file.file_name)?;
        map.serialize_entry("contentType", &file.content_type)?;
        map.serialize_entry("details", &details)?;
        map.serialize_entry("url", &file.url)?;
        map.end()
    }
}

/// A media asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub sys: SystemProperties,
    pub title: Localized<String>,
    pub description: Localized<String>,
    pub file: Localized<AssetFile>,
}

impl Asset {
    pub fn new(sys: SystemProperties) -> Self {
        Self {
            sys,
            title: Localized::new(),
            description: Localized::new(),
            file: Localized::new(),
        }
    }

    /// Decodes a raw `Asset` document. Locales without a value are left out
    /// of the per-locale maps.
    pub fn from_json(value: &Value) -> ModelResult<Self> {
        let sys = SystemProperties::from_json(field_or_null(value, "sys"))?;
        let fields = match value.get("fields") {
            Some(Value::Object(fields)) => normalize_fields(fields, sys.locale())?,
            _ => Default::default(),
        };

        let mut asset = Asset::new(sys);
        for (field_id, per_locale) in fields {
            for (locale, raw) in per_locale {
                if raw.is_null() {
                    continue;
                }
                match field_id.as_str() {
                    "title" => {
                        asset.title.insert(locale, expect_text(&field_id, &raw)?);
                    }
                    "description" => {
                        asset.description.insert(locale, expect_text(&field_id, &raw)?);
                    }
                    "file" => {
                        asset.file.insert(locale, AssetFile::from_json(&raw)?);
                    }
                    _ => {}
                }
            }
        }
        Ok(asset)
    }

    pub fn id(&self) -> &str {
        self.sys.id()
    }

    pub fn title(&self, locales: &LocaleTable, locale: Option<&str>) -> ModelResult<Option<&str>> {
        Ok(locales.value_for(&self.title, locale)?.map(String::as_str))
    }

    pub fn description(
        &self,
        locales: &LocaleTable,
        locale: Option<&str>,
    ) -> ModelResult<Option<&str>> {
        Ok(locales
            .value_for(&self.description, locale)?
            .map(String::as_str))
    }

    pub fn file(&self, locales: &LocaleTable, locale: Option<&str>) -> ModelResult<Option<&AssetFile>> {
        locales.value_for(&self.file, locale)
    }
}

fn expect_text(field: &str, raw: &Value) -> ModelResult<String> {
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| ModelError::coercion(field, format!("expected a string, got {raw}")))
}

impl Serialize for Asset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut fields = serde_json::Map::new();
        if !self.title.is_empty() {
            fields.insert(
                "title".into(),
                serde_json::to_value(&self.title).map_err(serde::ser::Error::custom)?,
            );
        }
        if !self.description.is_empty() {
            fields.insert(
                "description".into(),
                serde_json::to_value(&self.description).map_err(serde::ser::Error::custom)?,
            );
        }
        if !self.file.is_empty() {
            fields.insert(
                "file".into(),
                serde_json::to_value(&self.file).map_err(serde::ser::Error::custom)?,
            );
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("fields", &fields)?;
        map.serialize_entry("sys", &self.sys)?;
        map.end()
    }
}
