pub mod linkedin;

use anyhow::Result;
use async_trait::async_trait;

/// One entry observed in a feed snapshot.
///
/// `ordinal` is the item's position within the snapshot that produced it;
/// it is only meaningful against that snapshot and must not be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub ordinal: usize,
    /// Stable identity, when the surface exposes one.
    pub id: Option<String>,
    /// Normalized visible text; empty when the item carries none.
    pub content: String,
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Snapshot the currently rendered items, oldest known ordering first.
    async fn poll(&mut self) -> Result<Vec<FeedItem>>;

    /// Try to grow the feed. `Ok(false)` means no more items exist.
    async fn expand(&mut self) -> Result<bool>;

    /// Bring the item at `ordinal` into view. Best effort.
    async fn focus(&mut self, ordinal: usize) -> Result<()>;

    /// Return the feed to a known-good state after a fault.
    async fn reset(&mut self) -> Result<()>;
}
