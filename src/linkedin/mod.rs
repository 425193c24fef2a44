//! LinkedIn surface map: the URLs, selectors, and page scripts the
//! automation shell drives. Everything platform-specific lives here or in
//! the modules below; the traversal engine never sees any of it.

pub mod session;

use anyhow::Result;
use chromiumoxide::Element;

use crate::browser::Driver;

pub const LOGIN_URL: &str = "https://www.linkedin.com/login";
pub const FEED_URL: &str = "https://www.linkedin.com/feed/";

pub const USERNAME_INPUT: &str = "#username";
pub const PASSWORD_INPUT: &str = "#password";
pub const LOGIN_SUBMIT: &str = "button[type=\"submit\"]";
pub const FEED_CONTAINER: &str = "#voyager-feed";

pub const POST: &str = ".feed-shared-update-v2";
pub const POST_ID_HEADER: &str = "h2.visually-hidden";
pub const POST_TEXT_FRAGMENTS: &str =
    ".feed-shared-update-v2__description-wrapper .feed-shared-inline-show-more-text";
pub const COMMENT_BUTTON: &str = "button[id^=\"feed-shared-social-action-bar-comment-\"]";
pub const COMMENT_EDITOR: &str = ".ql-editor";

/// Visible label on a comment box's submit button.
pub const SUBMIT_LABEL: &str = "Comment";
/// Visible label on the feed's pagination button.
pub const SHOW_MORE_LABEL: &str = "Show more feed updates";

/// Smooth-scroll an element to the viewport center (`this` = the element).
pub const SCROLL_INTO_VIEW_JS: &str =
    "function() { this.scrollIntoView({ behavior: 'smooth', block: 'center' }); return true; }";

/// Page expression that clicks the pagination button when present.
pub fn click_show_more_js() -> String {
    format!(
        r#"(() => {{
  for (const span of document.querySelectorAll('span')) {{
    if (span.textContent.trim() === '{SHOW_MORE_LABEL}') {{
      const button = span.closest('button');
      if (button) {{ button.click(); return true; }}
    }}
  }}
  return false;
}})()"#
    )
}

/// Element function that clicks the comment box's submit button. The button
/// carries no stable id; it is found by its visible label inside the box's
/// action bar (`this` = the post element).
pub fn click_submit_js() -> String {
    format!(
        r#"function() {{
  for (const bar of this.querySelectorAll('div.display-flex.align-items-center')) {{
    for (const span of bar.querySelectorAll('span')) {{
      if (span.textContent.trim() === '{SUBMIT_LABEL}') {{
        const button = span.closest('button');
        if (button) {{ button.click(); return true; }}
      }}
    }}
  }}
  return false;
}}"#
    )
}

/// Re-locate the nth post in the current feed snapshot. Posts are re-queried
/// on every use; element handles are never held across traversal steps.
pub async fn nth_post(driver: &Driver, ordinal: usize) -> Result<Option<Element>> {
    let mut posts = driver.page().find_elements(POST).await?;
    if ordinal < posts.len() {
        Ok(Some(posts.swap_remove(ordinal)))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_more_script_embeds_label() {
        let js = click_show_more_js();
        assert!(js.contains(SHOW_MORE_LABEL));
        assert!(js.starts_with("(() =>"));
    }

    #[test]
    fn test_submit_script_embeds_label() {
        let js = click_submit_js();
        assert!(js.contains(SUBMIT_LABEL));
        assert!(js.contains("closest('button')"));
    }
}
