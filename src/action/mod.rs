pub mod commenter;

use anyhow::Result;
use async_trait::async_trait;

use crate::feed::FeedItem;

#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Act on one item. `Ok(true)` means the action landed, `Ok(false)` means
    /// the item was skipped this pass; `Err` is a fault that needs recovery.
    async fn act(&mut self, item: &FeedItem) -> Result<bool>;
}
