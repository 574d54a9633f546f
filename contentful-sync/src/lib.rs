//! Delta synchronization for the delivery API.
//!
//! A [`SyncManager`] runs an initial sync, optionally restricted by a
//! [`SyncFilter`], and then resumes from the [`SyncToken`] each pass
//! returns. Each pass yields one [`SyncResult`] holding the items of every
//! page in order: live entries and assets to upsert and deleted stubs to
//! remove.
//!
//! # Example
//!
//! ```no_run
//! use contentful_delivery::{Client, ClientConfig};
//! use contentful_sync::{SyncFilter, SyncManager, SyncType};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::new("b4c0n73n7fu1", "cfexampleapi"))?;
//! let manager = SyncManager::from_client(&client);
//!
//! let filter = SyncFilter::new().of_type(SyncType::Entry);
//! let initial = manager.start_sync(Some(&filter)).await?;
//! if let Some(token) = &initial.next_sync_token {
//!     let delta = manager.resume_sync(token).await?;
//!     println!("{} changes", delta.len());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub mod filter;
pub mod manager;
pub mod result;
pub mod token;

pub use error::{Result, SyncError};
pub use filter::{SyncFilter, SyncType};
pub use manager::{SyncManager, SyncState};
pub use result::SyncResult;
pub use token::SyncToken;
