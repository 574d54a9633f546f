//! The sync state machine.
//!
//! A pass starts with an initial request (or a resumed token), follows
//! `nextPageUrl` until a response carries `nextSyncUrl`, and returns every
//! page's items as one [`SyncResult`]. Items are built through the client's
//! [`ResourceBuilder`], so they share instances with the rest of the graph.

use crate::error::{Result, SyncError};
use crate::filter::SyncFilter;
use crate::result::SyncResult;
use crate::token::SyncToken;
use contentful_delivery::{Client, Fetcher, ResourceBuilder};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Where the manager is in the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No pass has completed yet.
    #[default]
    Initial,
    /// A pass is following page URLs.
    Paging { resumed: bool },
    /// The last pass completed with this token.
    Idle(SyncToken),
}

/// Drives initial and resumed sync passes for one space.
pub struct SyncManager {
    fetcher: Arc<dyn Fetcher>,
    builder: ResourceBuilder,
    preview: bool,
    state: RwLock<SyncState>,
    pass: Mutex<()>,
}

impl SyncManager {
    pub fn new(fetcher: Arc<dyn Fetcher>, builder: ResourceBuilder, preview: bool) -> Self {
        Self {
            fetcher,
            builder,
            preview,
            state: RwLock::new(SyncState::Initial),
            pass: Mutex::new(()),
        }
    }

    /// A manager sharing the client's fetcher and identity cache.
    pub fn from_client(client: &Client) -> Self {
        Self::new(
            client.fetcher().clone(),
            client.builder().clone(),
            client.is_preview(),
        )
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub async fn state(&self) -> SyncState {
        self.state.read().await.clone()
    }

    /// Runs an initial sync pass.
    pub async fn start_sync(&self, filter: Option<&SyncFilter>) -> Result<SyncResult> {
        let params = filter.cloned().unwrap_or_default().to_params();
        let _pass = self.pass.lock().await;
        info!(
            "starting initial sync of space {} ({})",
            self.builder.space_id(),
            if self.preview { "preview" } else { "delivery" }
        );
        self.run_pass(params, false).await
    }

    /// Runs a delta pass from a token returned by an earlier pass.
    ///
    /// The token already embeds the filter of the initial sync. Items are
    /// registered in the identity cache only after the last page built, so
    /// a failed pass leaves the cache as it was.
    pub async fn resume_sync(&self, token: &SyncToken) -> Result<SyncResult> {
        if self.preview || token.is_preview() {
            return Err(SyncError::UnsupportedOperation(
                "preview sync supports only the initial pass".into(),
            ));
        }
        let _pass = self.pass.lock().await;
        info!("resuming sync of space {}", self.builder.space_id());
        self.run_pass(token.to_params(), true).await
    }

    /// Fetches a single page without following `nextPageUrl` and without
    /// touching the manager state.
    pub async fn page(&self, token: &SyncToken) -> Result<SyncResult> {
        let mut page = self.fetch_page(&token.to_params()).await?;
        page.items = self.builder.register(page.items).await;
        Ok(page)
    }

    async fn run_pass(&self, params: Vec<(String, String)>, resumed: bool) -> Result<SyncResult> {
        let previous = {
            let mut state = self.state.write().await;
            std::mem::replace(&mut *state, SyncState::Paging { resumed })
        };

        match self.follow_pages(params).await {
            Ok(result) => {
                if let Some(token) = &result.next_sync_token {
                    *self.state.write().await = SyncState::Idle(token.clone());
                }
                Ok(result)
            }
            Err(e) => {
                *self.state.write().await = previous;
                Err(e)
            }
        }
    }

    async fn follow_pages(&self, params: Vec<(String, String)>) -> Result<SyncResult> {
        let mut result = self.fetch_page(&params).await?;
        let mut pages = 1;

        while let Some(token) = result.next_page_token.clone() {
            let page = self.fetch_page(&token.to_params()).await?;
            result.extend(page);
            pages += 1;
        }
        result.items = self.builder.register(result.items).await;

        info!(
            "sync pass complete: {} items over {} pages",
            result.len(),
            pages
        );
        Ok(result)
    }

    /// Fetches and builds one page. The items are not registered yet.
    async fn fetch_page(&self, params: &[(String, String)]) -> Result<SyncResult> {
        let raw = self.fetcher.get_sync(params).await?;

        let items = raw
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| SyncError::Protocol("sync response has no items".into()))?;
        let next_page = next_url(&raw, "nextPageUrl")?;
        let next_sync = next_url(&raw, "nextSyncUrl")?;

        let (next_page_token, next_sync_token) = match (next_page, next_sync) {
            (Some(url), None) => (Some(SyncToken::from_url(url, self.preview)?), None),
            (None, Some(url)) => (None, Some(SyncToken::from_url(url, self.preview)?)),
            (Some(_), Some(_)) => {
                return Err(SyncError::Protocol(
                    "sync response has both nextPageUrl and nextSyncUrl".into(),
                ));
            }
            (None, None) => {
                return Err(SyncError::Protocol(
                    "sync response has neither nextPageUrl nor nextSyncUrl".into(),
                ));
            }
        };

        let items = self.builder.stage_batch(items).await?;
        debug!("sync page with {} items", items.len());

        Ok(SyncResult {
            items,
            next_page_token,
            next_sync_token,
        })
    }
}

fn next_url<'a>(raw: &'a Value, key: &str) -> Result<Option<&'a str>> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(url)) => Ok(Some(url)),
        Some(_) => Err(SyncError::Protocol(format!("{key} is not a string"))),
    }
}
