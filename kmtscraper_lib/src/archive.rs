//! Discovery of collections on the archive root.

use std::time::Duration;

use kmt_archive::types::CollectionRef;
use tracing::info;

use crate::browser::{dom, BrowserContext, BrowserError};
use crate::config::CrawlConfig;

/// Lists the "reaction data" collections linked from the archive root.
#[derive(Debug, Clone)]
pub struct ArchiveLister {
    archive_url: String,
    settle: Duration,
}

impl ArchiveLister {
    pub fn new(archive_url: impl Into<String>, settle: Duration) -> Self {
        Self {
            archive_url: archive_url.into(),
            settle,
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.archive_url(), config.archive_settle)
    }

    /// Collection URLs in document order. The root renders its whole list on
    /// one page, so there is nothing to paginate here.
    pub async fn list<B>(&self, browser: &mut B) -> Result<Vec<CollectionRef>, BrowserError>
    where
        B: BrowserContext + ?Sized,
    {
        browser.navigate(&self.archive_url).await?;
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let html = browser.content().await?;
        let page_url = browser
            .current_url()
            .await
            .unwrap_or_else(|_| self.archive_url.clone());
        let collections = dom::collection_links(&html, &page_url)?;
        info!("Found {} reaction data collections", collections.len());
        Ok(collections)
    }
}
