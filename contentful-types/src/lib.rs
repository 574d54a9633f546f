//! Core type definitions for the Contentful delivery client.
//!
//! This crate defines the resource-agnostic building blocks shared by the
//! model, delivery and sync layers:
//! - [`SystemProperties`], the `sys` block attached to every resource
//! - [`Link`], a typed reference to another resource by id
//! - [`ResourceType`], the `sys.type` discriminator of raw documents
//! - [`timestamp`], parsing and formatting in the API's JSON representation
//!
//! Nothing in here knows about content types or locales; those live in
//! `contentful-model`.

mod link;
mod sys;
pub mod timestamp;

pub use link::{Link, LinkType};
pub use sys::{ResourceType, SystemProperties};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding core types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("malformed link: {0}")]
    MalformedLink(String),
}
