//! The delta batch returned by a sync pass.

use crate::token::SyncToken;
use contentful_model::{Asset, Entry, Resource};
use std::sync::Arc;

/// Items of one sync pass, in response order across pages.
///
/// Live entries and assets are creates or updates; the caller upserts them
/// by id. Deleted stubs are tombstones; the caller removes by id.
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    pub items: Vec<Resource>,
    /// Set on a single page that is not the last of its pass.
    pub next_page_token: Option<SyncToken>,
    /// Set once the pass is complete.
    pub next_sync_token: Option<SyncToken>,
}

impl SyncResult {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if the pass has ended and a resumable token is available.
    pub fn is_complete(&self) -> bool {
        self.next_sync_token.is_some()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<Entry>> {
        self.items.iter().filter_map(Resource::as_entry)
    }

    pub fn assets(&self) -> impl Iterator<Item = &Arc<Asset>> {
        self.items.iter().filter_map(Resource::as_asset)
    }

    /// Tombstones of deleted entries, assets and content types.
    pub fn deleted(&self) -> impl Iterator<Item = &Resource> {
        self.items.iter().filter(|item| item.is_deleted())
    }

    /// Appends the next page of the same pass.
    pub(crate) fn extend(&mut self, page: SyncResult) {
        self.items.extend(page.items);
        self.next_page_token = page.next_page_token;
        self.next_sync_token = page.next_sync_token;
    }
}
