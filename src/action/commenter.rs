//! Drives LinkedIn's comment UI for a single post.
//!
//! Every step that can fail because the page changed under us returns
//! `Ok(false)` so the engine moves on; only protocol-level failures bubble
//! up as faults.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Element;
use tracing::{info, warn};

use super::ActionExecutor;
use crate::browser::{js_bool, Driver};
use crate::feed::FeedItem;
use crate::linkedin::{click_submit_js, nth_post, COMMENT_BUTTON, COMMENT_EDITOR};
use crate::llm::gemini::comment_prompt;
use crate::llm::TextGenerator;

/// How long the comment editor gets to appear after the button click.
const EDITOR_WAIT: Duration = Duration::from_secs(10);
/// How long the submit button gets to become clickable.
const SUBMIT_WAIT: Duration = Duration::from_secs(30);
const ACT_POLL_MS: u64 = 250;

pub struct LinkedInCommenter {
    driver: Driver,
    generator: Box<dyn TextGenerator>,
    settle: Duration,
    dry_run: bool,
}

impl LinkedInCommenter {
    pub fn new(
        driver: Driver,
        generator: Box<dyn TextGenerator>,
        settle_ms: u64,
        dry_run: bool,
    ) -> Self {
        Self {
            driver,
            generator,
            settle: Duration::from_millis(settle_ms),
            dry_run,
        }
    }

    async fn wait_for_editor(&self, post: &Element) -> Option<Element> {
        let deadline = Instant::now() + EDITOR_WAIT;
        loop {
            if let Ok(editor) = post.find_element(COMMENT_EDITOR).await {
                return Some(editor);
            }
            if Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(ACT_POLL_MS)).await;
        }
    }

    async fn click_submit(&self, post: &Element) -> Result<bool> {
        let script = click_submit_js();
        let deadline = Instant::now() + SUBMIT_WAIT;
        loop {
            if js_bool(post, &script).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(ACT_POLL_MS)).await;
        }
    }
}

#[async_trait]
impl ActionExecutor for LinkedInCommenter {
    async fn act(&mut self, item: &FeedItem) -> Result<bool> {
        if item.content.is_empty() {
            warn!(ordinal = item.ordinal, "post has no readable text, skipping");
            return Ok(false);
        }

        // Let the scroll settle before driving the post's controls.
        tokio::time::sleep(self.settle).await;

        let Some(post) = nth_post(&self.driver, item.ordinal)
            .await
            .context("re-locating the post")?
        else {
            warn!(ordinal = item.ordinal, "post vanished from the feed");
            return Ok(false);
        };

        let prompt = comment_prompt(&item.content);
        let comment = match self.generator.generate(&prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!(post_id = ?item.id, "generation returned no text");
                return Ok(false);
            }
            Err(error) => {
                warn!(post_id = ?item.id, %error, "generation failed");
                return Ok(false);
            }
        };

        if self.dry_run {
            info!(post_id = ?item.id, comment = %comment, "DRY RUN: would post comment");
            return Ok(true);
        }

        let Ok(button) = post.find_element(COMMENT_BUTTON).await else {
            warn!(post_id = ?item.id, "comment button not found");
            return Ok(false);
        };
        button.click().await.context("clicking the comment button")?;

        let Some(editor) = self.wait_for_editor(&post).await else {
            warn!(post_id = ?item.id, "comment box did not open");
            return Ok(false);
        };
        editor.click().await.context("focusing the comment box")?;
        editor
            .type_str(&comment)
            .await
            .context("typing the comment")?;

        if !self.click_submit(&post).await? {
            warn!(post_id = ?item.id, "submit button never appeared");
            return Ok(false);
        }

        info!(post_id = ?item.id, comment = %comment, "comment posted");
        Ok(true)
    }
}
