//! Delivery layer: builds the typed resource graph from API documents.
//!
//! The [`ResourceBuilder`] turns raw JSON into [`contentful_model`] values,
//! registering each one in the client's [`IdentityCache`] so every resource
//! exists exactly once. Links stay unresolved until a [`LinkResolver`] is
//! asked for them; the [`Resolver`] looks in the identity cache, then in the
//! `includes` of earlier responses, and finally fetches through a
//! [`Fetcher`].
//!
//! [`Client`] wires these together over [`HttpFetcher`].

pub mod builder;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod identity;
pub mod query;
pub mod resolver;

pub use builder::{IncludedTable, ResourceBuilder};
pub use cache::{CacheKeys, FileCache, MemoryCache, MetadataCache, NullCache};
pub use client::Client;
pub use config::{ClientConfig, DELIVERY_API_URL, PREVIEW_API_URL};
pub use error::{DeliveryError, DeliveryResult};
pub use fetch::{Fetcher, ResourceKind};
pub use http::HttpFetcher;
pub use identity::{IdentityCache, LocaleScope};
pub use query::{Operator, Query, QueryValue};
pub use resolver::{LinkResolver, Resolver};
