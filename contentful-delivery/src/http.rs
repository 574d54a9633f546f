//! HTTP fetcher for the delivery and preview APIs.

use crate::config::ClientConfig;
use crate::error::{DeliveryError, DeliveryResult};
use crate::fetch::{Fetcher, ResourceKind};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const RATE_LIMIT_RESET_HEADER: &str = "X-Contentful-RateLimit-Reset";

/// Error envelope returned by the API.
#[derive(Debug, Deserialize)]
struct ApiError {
    sys: ApiErrorSys,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorSys {
    id: String,
}

/// [`Fetcher`] backed by `reqwest`.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    space_id: String,
    access_token: String,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> DeliveryResult<Self> {
        if config.space_id.is_empty() {
            return Err(DeliveryError::Config("space id must not be empty".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DeliveryError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url().to_string(),
            space_id: config.space_id.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn space_url(&self) -> String {
        format!(
            "{}/spaces/{}",
            self.base_url,
            urlencoding::encode(&self.space_id)
        )
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        match kind.path_segment() {
            Some(segment) => format!("{}/{segment}", self.space_url()),
            None => self.space_url(),
        }
    }

    async fn get(&self, url: String, params: &[(String, String)]) -> DeliveryResult<Value> {
        debug!("GET {} ({} params)", url, params.len());

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(params)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| DeliveryError::MalformedDocument(format!("invalid JSON from {url}: {e}")))
    }

    async fn error_from(response: Response) -> DeliveryError {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1);
            return DeliveryError::RateLimited { retry_after_secs };
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiError>(&body) {
            Ok(error) => match error.sys.id.as_str() {
                "NotFound" => DeliveryError::NotFound(error.message),
                "InvalidQuery" | "BadRequest" => DeliveryError::InvalidQuery(error.message),
                _ => DeliveryError::Api {
                    status: status.as_u16(),
                    id: error.sys.id,
                    message: error.message,
                },
            },
            Err(_) if status == StatusCode::NOT_FOUND => DeliveryError::NotFound(body),
            Err(_) => DeliveryError::Api {
                status: status.as_u16(),
                id: String::new(),
                message: body,
            },
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_by_id(
        &self,
        kind: ResourceKind,
        id: &str,
        locale: Option<&str>,
    ) -> DeliveryResult<Value> {
        let url = match kind {
            ResourceKind::Space => self.space_url(),
            _ => format!("{}/{}", self.collection_url(kind), urlencoding::encode(id)),
        };
        let params: Vec<(String, String)> = locale
            .filter(|_| kind != ResourceKind::Space)
            .map(|locale| vec![("locale".to_string(), locale.to_string())])
            .unwrap_or_default();
        self.get(url, &params).await
    }

    async fn get_collection(
        &self,
        kind: ResourceKind,
        params: &[(String, String)],
    ) -> DeliveryResult<Value> {
        self.get(self.collection_url(kind), params).await
    }

    async fn get_sync(&self, params: &[(String, String)]) -> DeliveryResult<Value> {
        self.get(format!("{}/sync", self.space_url()), params).await
    }
}
