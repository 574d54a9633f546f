//! Typed content model for the delivery client.
//!
//! Raw API documents are decoded into [`Space`], [`ContentType`], [`Entry`]
//! and [`Asset`] values. Entries are dynamically typed: their fields are
//! coerced through the [`ContentTypeField`] definitions of their content
//! type into [`FieldValue`]s. Links between resources stay unresolved
//! [`contentful_types::Link`]s; resolving them is the job of the delivery
//! layer.
//!
//! Localized values are read through a [`LocaleTable`], which walks the
//! fallback chain of the requested locale.

pub mod asset;
pub mod content_type;
pub mod entry;
pub mod error;
pub mod field;
pub mod image;
pub mod locale;
pub mod resource;
pub mod space;

pub use asset::{Asset, AssetFile, File, ImageFile};
pub use content_type::{ContentType, ContentTypeField, FieldType};
pub use entry::{Diagnostic, Entry};
pub use error::{ModelError, ModelResult};
pub use field::{FieldValue, coerce};
pub use image::{ImageFormat, ImageOptions, ResizeFit, ResizeFocus};
pub use locale::{Locale, LocaleTable, Localized, normalize_fields};
pub use resource::{DeletedResource, Document, Resource, ResourceArray};
pub use space::Space;
