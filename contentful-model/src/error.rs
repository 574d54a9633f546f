//! Error types for the content model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while decoding or reading the content model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Malformed or incomplete content type, space or locale definition.
    #[error("schema error: {0}")]
    Schema(String),

    /// A raw field value does not match its declared type.
    #[error("cannot coerce field `{field}`: {reason}")]
    FieldCoercion { field: String, reason: String },

    /// The locale is not part of the space's locale table.
    #[error("unknown locale `{locale}`, available locales are {available}")]
    UnknownLocale { locale: String, available: String },

    /// An image transformation option is out of range.
    #[error("invalid image option: {0}")]
    InvalidImageOption(String),

    #[error(transparent)]
    Types(#[from] contentful_types::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn coercion(field: &str, reason: impl Into<String>) -> Self {
        ModelError::FieldCoercion {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
