//! Interactive browser abstraction.
//!
//! The crawl drives a real browser for anything rendered client-side
//! (collection listings, the pagination control) and reads the rendered DOM
//! back as HTML. [`BrowserContext`] is the seam: the Chromium driver
//! implements it for real runs, tests script it in memory.

#[cfg(feature = "browser")]
pub mod chromium;
pub mod dom;

use async_trait::async_trait;
use kmt_archive::types::BrowserCookie;

/// Errors raised by a browser context.
#[derive(thiserror::Error, Debug)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("script execution failed: {0}")]
    Script(String),
    #[error("failed to read page: {0}")]
    Dom(String),
    /// The element addressed by a previous snapshot is no longer on the page.
    #[error("stale element: anchor #{0} no longer matches")]
    StaleElement(usize),
}

/// A single interactive browser tab.
///
/// Element handles never outlive a call: callers read the page with
/// [`content`](Self::content), pick elements out of that snapshot by their
/// document-order index, and address them by index again when acting.
#[async_trait]
pub trait BrowserContext: Send + Sync {
    /// Loads `url` in the tab and waits for the document to be ready.
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// URL of the currently loaded document.
    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Serialized HTML of the rendered DOM.
    async fn content(&self) -> Result<String, BrowserError>;

    /// Cookies currently held by the browser session.
    async fn cookies(&self) -> Result<Vec<BrowserCookie>, BrowserError>;

    /// Activates the `index`-th `<a>` element of the document by script.
    ///
    /// `expected_text` must still be contained in that anchor's text,
    /// otherwise the page changed since it was read and
    /// [`BrowserError::StaleElement`] is returned.
    async fn click_anchor(&mut self, index: usize, expected_text: &str)
        -> Result<(), BrowserError>;

    /// Releases the browser. Further calls may fail.
    async fn close(&mut self) -> Result<(), BrowserError>;
}
