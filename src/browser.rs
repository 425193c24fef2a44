use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::BrowserSettings;

/// How often element waits re-query the page.
const WAIT_POLL_MS: u64 = 250;

/// Launch Chrome and spawn a task that drains its CDP event stream until
/// the browser goes away.
pub async fn launch(settings: &BrowserSettings) -> Result<(Browser, JoinHandle<()>)> {
    let mut builder = BrowserConfig::builder()
        .window_size(settings.window_width, settings.window_height);
    if !settings.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &settings.chrome_executable {
        builder = builder.chrome_executable(path);
    }
    let config = builder
        .build()
        .map_err(|e| anyhow!("building browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("launching Chrome (is a Chromium binary installed?)")?;

    let events = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    Ok((browser, events))
}

/// Thin wrapper over a single page exposing the handful of verbs the shell
/// needs: navigate, bounded waits, click, type, and JS evaluation.
#[derive(Clone)]
pub struct Driver {
    page: Page,
    wait_timeout: Duration,
}

impl Driver {
    pub fn new(page: Page, wait_timeout: Duration) -> Self {
        Self { page, wait_timeout }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate and wait for the load to finish, bounded by the configured
    /// timeout.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let nav = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, CdpError>(())
        };
        tokio::time::timeout(self.wait_timeout, nav)
            .await
            .map_err(|_| {
                anyhow!(
                    "navigation to {url} timed out after {}ms",
                    self.wait_timeout.as_millis()
                )
            })?
            .with_context(|| format!("navigating to {url}"))?;
        debug!(url, "navigation complete");
        Ok(())
    }

    /// Wait for an in-flight navigation (e.g. after submitting a form).
    pub async fn wait_for_navigation(&self) -> Result<()> {
        tokio::time::timeout(self.wait_timeout, self.page.wait_for_navigation())
            .await
            .map_err(|_| {
                anyhow!(
                    "navigation timed out after {}ms",
                    self.wait_timeout.as_millis()
                )
            })?
            .context("waiting for navigation")?;
        Ok(())
    }

    /// Wait for a selector to match, polling up to the configured timeout.
    pub async fn wait_for(&self, selector: &str) -> Result<Element> {
        self.wait_for_within(selector, self.wait_timeout).await
    }

    pub async fn wait_for_within(&self, selector: &str, timeout: Duration) -> Result<Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                bail!(
                    "timed out after {}ms waiting for '{selector}'",
                    timeout.as_millis()
                );
            }
            tokio::time::sleep(Duration::from_millis(WAIT_POLL_MS)).await;
        }
    }

    pub async fn click(&self, selector: &str) -> Result<()> {
        let element = self.wait_for(selector).await?;
        element
            .click()
            .await
            .with_context(|| format!("clicking '{selector}'"))?;
        Ok(())
    }

    pub async fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        let element = self.wait_for(selector).await?;
        element
            .click()
            .await
            .with_context(|| format!("focusing '{selector}'"))?;
        element
            .type_str(text)
            .await
            .with_context(|| format!("typing into '{selector}'"))?;
        Ok(())
    }

    /// Evaluate a page-level JS expression expected to yield a boolean.
    pub async fn eval_bool(&self, expression: &str) -> Result<bool> {
        let result = self
            .page
            .evaluate(expression)
            .await
            .context("evaluating page expression")?;
        Ok(result.value().and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

/// Run a zero-argument JS function with `this` bound to the element and
/// read back a boolean result.
pub async fn js_bool(element: &Element, function: &str) -> Result<bool> {
    let returns = element.call_js_fn(function, false).await?;
    Ok(returns
        .result
        .value
        .as_ref()
        .and_then(|v| v.as_bool())
        .unwrap_or(false))
}
