//! Resumable traversal over a paginated feed.
//!
//! One pass scans the current snapshot in feed order. After every successful
//! action the snapshot is discarded and re-polled, because acting mutates the
//! page underneath us. The persisted cursor lets the next run pick up right
//! after the last item acted on.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::action::ActionExecutor;
use crate::config::RunConfig;
use crate::feed::FeedSource;

use super::cursor::CursorStore;
use super::recovery::{RecoveryAction, RecoveryPolicy};

pub struct TraversalEngine {
    feed: Box<dyn FeedSource>,
    executor: Box<dyn ActionExecutor>,
    store: Box<dyn CursorStore>,
    recovery: RecoveryPolicy,
    target: u32,
    pause: Duration,
}

impl TraversalEngine {
    pub fn new(
        feed: Box<dyn FeedSource>,
        executor: Box<dyn ActionExecutor>,
        store: Box<dyn CursorStore>,
        config: &RunConfig,
    ) -> Self {
        Self {
            feed,
            executor,
            store,
            recovery: RecoveryPolicy::new(config.max_faults),
            target: config.target_count,
            pause: Duration::from_millis(config.pause_ms),
        }
    }

    /// Walk the feed until `target_count` actions have landed or the feed
    /// runs out. Returns how many actions landed.
    ///
    /// Items seen before the persisted cursor are scanned but not touched;
    /// items without an id are never tracked and may be attempted again on a
    /// later pass.
    pub async fn run(&mut self) -> Result<u32> {
        let cursor = self.store.load().context("loading the resume cursor")?;
        let mut skipping = cursor.is_some();
        match &cursor {
            Some(id) => info!(cursor = %id, "resuming after the last handled post"),
            None => info!("no cursor found, starting from the top of the feed"),
        }

        let mut processed: HashSet<String> = HashSet::new();
        let mut acted: u32 = 0;

        'poll: while acted < self.target {
            let items = match self.feed.poll().await {
                Ok(items) => items,
                Err(error) => {
                    self.recover("polling the feed", error).await?;
                    continue 'poll;
                }
            };

            for item in &items {
                if skipping {
                    if let (Some(id), Some(cursor)) = (&item.id, &cursor) {
                        if id == cursor {
                            skipping = false;
                            // The cursor item itself is never re-acted on.
                            info!(cursor = %id, "resume point found, acting on newer posts");
                            continue;
                        }
                    }
                    debug!(ordinal = item.ordinal, "before the resume point, passing over");
                    continue;
                }

                if let Some(id) = &item.id {
                    if processed.contains(id) {
                        debug!(post_id = %id, "already handled this run");
                        continue;
                    }
                }

                if let Err(error) = self.feed.focus(item.ordinal).await {
                    debug!(ordinal = item.ordinal, %error, "focus failed");
                }

                match self.executor.act(item).await {
                    Ok(true) => {
                        acted += 1;
                        self.recovery.record_success();
                        if let Some(id) = &item.id {
                            processed.insert(id.clone());
                            self.store
                                .save(id)
                                .context("persisting the resume cursor")?;
                        }
                        info!(acted, target = self.target, post_id = ?item.id, "item handled");
                        tokio::time::sleep(self.pause).await;
                        // The page shifted under us; rescan from the top.
                        continue 'poll;
                    }
                    Ok(false) => {
                        warn!(ordinal = item.ordinal, "action failed, moving to the next item");
                    }
                    Err(error) => {
                        self.recover("acting on a post", error).await?;
                        continue 'poll;
                    }
                }
            }

            match self.feed.expand().await {
                Ok(true) => {}
                Ok(false) => {
                    info!(acted, "feed exhausted");
                    break;
                }
                Err(error) => {
                    self.recover("expanding the feed", error).await?;
                }
            }
        }

        Ok(acted)
    }

    /// Handle a fault: reset the feed and resume, or give up once the cap of
    /// consecutive faults is hit. A failing reset counts as another fault.
    async fn recover(&mut self, stage: &str, error: anyhow::Error) -> Result<()> {
        let mut stage = stage.to_string();
        let mut last = error;
        loop {
            warn!(%stage, "fault: {last:#}");
            if self.recovery.record_fault() == RecoveryAction::GiveUp {
                anyhow::bail!(
                    "giving up after {} consecutive faults (last while {stage}): {last:#}",
                    self.recovery.faults()
                );
            }
            match self.feed.reset().await {
                Ok(()) => return Ok(()),
                Err(error) => {
                    stage = "resetting the feed".to_string();
                    last = error;
                }
            }
        }
    }
}
