//! LinkedIn home feed scraped from the live DOM.
//!
//! Posts are re-read on every poll; element handles are never held across
//! polls because LinkedIn recycles DOM nodes as the feed virtualizes.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::Element;
use tracing::{debug, info};

use super::{FeedItem, FeedSource};
use crate::browser::{js_bool, Driver};
use crate::linkedin::{
    click_show_more_js, nth_post, FEED_URL, POST, POST_ID_HEADER, POST_TEXT_FRAGMENTS,
    SCROLL_INTO_VIEW_JS,
};

/// How long to keep looking for a "show more" control before treating the
/// feed as fully loaded.
const SHOW_MORE_WAIT: Duration = Duration::from_secs(10);
const SHOW_MORE_POLL_MS: u64 = 500;

pub struct LinkedInFeed {
    driver: Driver,
}

impl LinkedInFeed {
    pub fn new(driver: Driver) -> Self {
        Self { driver }
    }

    async fn read_item(&self, ordinal: usize, post: &Element) -> Result<FeedItem> {
        // Some update kinds render without the hidden header; their id is
        // simply unobservable.
        let id = match post.find_element(POST_ID_HEADER).await {
            Ok(header) => header
                .inner_text()
                .await?
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            Err(_) => None,
        };

        let mut fragments = Vec::new();
        for node in post.find_elements(POST_TEXT_FRAGMENTS).await? {
            if let Some(text) = node.inner_text().await? {
                let text = normalize_content(&text);
                if !text.is_empty() {
                    fragments.push(text);
                }
            }
        }

        Ok(FeedItem {
            ordinal,
            id,
            content: fragments.join(" "),
        })
    }
}

#[async_trait]
impl FeedSource for LinkedInFeed {
    async fn poll(&mut self) -> Result<Vec<FeedItem>> {
        self.driver
            .wait_for(POST)
            .await
            .context("waiting for feed posts to render")?;
        let posts = self.driver.page().find_elements(POST).await?;
        let mut items = Vec::with_capacity(posts.len());
        for (ordinal, post) in posts.iter().enumerate() {
            items.push(self.read_item(ordinal, post).await?);
        }
        debug!(count = items.len(), "feed snapshot taken");
        Ok(items)
    }

    async fn expand(&mut self) -> Result<bool> {
        let script = click_show_more_js();
        let deadline = Instant::now() + SHOW_MORE_WAIT;
        loop {
            if self.driver.eval_bool(&script).await? {
                info!("loading more posts");
                return Ok(true);
            }
            if Instant::now() >= deadline {
                info!("no more posts available");
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(SHOW_MORE_POLL_MS)).await;
        }
    }

    async fn focus(&mut self, ordinal: usize) -> Result<()> {
        // Best effort; never treated as a fault.
        match nth_post(&self.driver, ordinal).await {
            Ok(Some(post)) => {
                if let Err(error) = js_bool(&post, SCROLL_INTO_VIEW_JS).await {
                    debug!(ordinal, %error, "scroll-into-view failed");
                }
            }
            Ok(None) => debug!(ordinal, "post not present to scroll to"),
            Err(error) => debug!(ordinal, %error, "post lookup for scroll failed"),
        }
        Ok(())
    }

    async fn reset(&mut self) -> Result<()> {
        info!("returning to the feed root");
        self.driver
            .navigate(FEED_URL)
            .await
            .context("navigating back to the feed")
    }
}

/// Drop `#tag` tokens and collapse runs of whitespace to single spaces.
pub fn normalize_content(raw: &str) -> String {
    let stripped = strip_hashtags(raw);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_hashtags(raw: &str) -> String {
    fn tag_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '#' && chars.peek().copied().is_some_and(tag_char) {
            while chars.peek().copied().is_some_and(tag_char) {
                chars.next();
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trailing_hashtags() {
        assert_eq!(
            normalize_content("Big news today #hiring #rust2024"),
            "Big news today"
        );
    }

    #[test]
    fn test_strips_embedded_hashtag_cleanly() {
        assert_eq!(normalize_content("launching #beta today"), "launching today");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            normalize_content("  spread \n across\t\tlines  "),
            "spread across lines"
        );
    }

    #[test]
    fn test_tag_body_allows_digits_and_underscores() {
        assert_eq!(normalize_content("x #a_b1 y"), "x y");
    }

    #[test]
    fn test_lone_hash_is_kept() {
        assert_eq!(normalize_content("issue # 42"), "issue # 42");
    }

    #[test]
    fn test_non_ascii_after_hash_is_kept() {
        assert_eq!(normalize_content("hello #日本"), "hello #日本");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_content(""), "");
    }
}
