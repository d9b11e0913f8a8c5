//! Orchestrates a full archive run.

use kmt_archive::types::{ArchiveResult, CollectionRef};
use kmt_archive::Client;
use tracing::{info, warn};

use crate::archive::ArchiveLister;
use crate::browser::BrowserContext;
use crate::config::CrawlConfig;
use crate::error::ScraperError;
use crate::paginate::CollectionPaginator;
use crate::progress::CrawlProgress;

/// Owns the browser and the lightweight client for one run and hands them
/// to the lister and the paginator in turn.
///
/// The browser is only released by [`close`](Self::close); callers must
/// call it on every exit path.
pub struct Pipeline<B> {
    browser: B,
    client: Client,
    config: CrawlConfig,
}

impl<B: BrowserContext> Pipeline<B> {
    /// Builds the lightweight client from `config` and takes over `browser`.
    pub fn new(browser: B, config: CrawlConfig) -> Result<Self, ScraperError> {
        let client = config.client()?;
        Ok(Self::with_client(browser, client, config))
    }

    pub fn with_client(browser: B, client: Client, config: CrawlConfig) -> Self {
        Self {
            browser,
            client,
            config,
        }
    }

    /// Collections linked from the archive root. Failing to load the root
    /// is fatal for the run.
    pub async fn list_collections(&mut self) -> Result<Vec<CollectionRef>, ScraperError> {
        let lister = ArchiveLister::from_config(&self.config);
        Ok(lister.list(&mut self.browser).await?)
    }

    /// Crawls `collections` one after another into a single result.
    ///
    /// A collection whose start page cannot be loaded is recorded with no
    /// records and the run moves on.
    pub async fn crawl(
        &mut self,
        collections: &[CollectionRef],
        progress: &dyn CrawlProgress,
    ) -> ArchiveResult {
        let total = collections.len();
        let mut result = ArchiveResult::new();
        let mut paginator = CollectionPaginator::new(&mut self.browser, &self.client, &self.config);

        for (i, collection) in collections.iter().enumerate() {
            let index = i + 1;
            info!("[{}/{}] Processing {}", index, total, collection);
            progress.collection_started(index, total, collection);

            let records = match paginator.crawl(collection, progress).await {
                Ok(crawl) => crawl.records,
                Err(e) => {
                    warn!("Skipping collection {}: {}", collection, e);
                    Vec::new()
                }
            };

            progress.collection_finished(index, collection, records.len());
            result.insert(collection.clone(), records);
        }

        info!(
            "Crawled {} collections, {} records",
            result.len(),
            result.total_records()
        );
        result
    }

    /// Releases the browser. Safe to call more than once.
    pub async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
    }

    /// Gives the browser back, e.g. to inspect a scripted one in tests.
    pub fn into_browser(self) -> B {
        self.browser
    }
}
