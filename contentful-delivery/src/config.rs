//! Client configuration.

use serde::{Deserialize, Serialize};

/// Host of the published-content API.
pub const DELIVERY_API_URL: &str = "https://cdn.contentful.com";

/// Host of the draft-content API.
pub const PREVIEW_API_URL: &str = "https://preview.contentful.com";

/// Configuration for a delivery [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Delivery or preview API access token.
    pub access_token: String,
    /// Id of the space the client reads from.
    pub space_id: String,
    /// Read drafts from the preview API.
    pub preview: bool,
    /// Locale used when a call names none. `None` lets the API pick the
    /// space default; `"*"` requests all locales.
    pub default_locale: Option<String>,
    /// Overrides the API host (e.g. a mock server in tests).
    pub base_url: Option<String>,
    /// HTTP request timeout.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            space_id: String::new(),
            preview: false,
            default_locale: None,
            base_url: None,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>, space_id: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            space_id: space_id.into(),
            ..Default::default()
        }
    }

    /// The API host requests are sent to.
    pub fn api_base_url(&self) -> &str {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/'),
            None if self.preview => PREVIEW_API_URL,
            None => DELIVERY_API_URL,
        }
    }
}
