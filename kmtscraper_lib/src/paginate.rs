//! Walks one collection's paginated listing of detail links.

use std::fmt;
use std::time::Duration;

use kmt_archive::types::ReactionRecord;
use kmt_archive::Client;
use tracing::{debug, info, warn};

use crate::bridge::sync_session;
use crate::browser::{dom, BrowserContext, BrowserError};
use crate::config::CrawlConfig;
use crate::progress::CrawlProgress;
use crate::resolve::DetailResolver;

/// Why a collection crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The current page listed no "Details" links.
    NoDetailLinks,
    /// The current page has no "Next" control.
    NoNextControl,
    /// The last "Next" control sits in a disabled container.
    NextDisabled,
    /// Reading the page or activating "Next" failed.
    PaginationFailed,
    /// The configured page cap was reached.
    PageCap,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NoDetailLinks => "no detail links on page",
            Self::NoNextControl => "no next control",
            Self::NextDisabled => "next control disabled",
            Self::PaginationFailed => "pagination failed",
            Self::PageCap => "page cap reached",
        };
        f.write_str(reason)
    }
}

/// Outcome of crawling one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionCrawl {
    /// Records in page order, then link order within a page.
    pub records: Vec<ReactionRecord>,
    /// Pages scanned, counting the page that ended the crawl.
    pub pages: u32,
    pub stop: StopReason,
}

/// Drives the browser through a collection, page by page.
///
/// Each page is read fresh after it loads: detail links from one rendering
/// are never reused after the page changes.
pub struct CollectionPaginator<'a, B: ?Sized> {
    browser: &'a mut B,
    client: &'a Client,
    resolver: DetailResolver<'a>,
    page_settle: Duration,
    max_pages: Option<u32>,
}

impl<'a, B> CollectionPaginator<'a, B>
where
    B: BrowserContext + ?Sized,
{
    pub fn new(browser: &'a mut B, client: &'a Client, config: &CrawlConfig) -> Self {
        Self {
            browser,
            client,
            resolver: DetailResolver::new(client),
            page_settle: config.page_settle,
            max_pages: config.max_pages,
        }
    }

    /// Crawls `collection` from its first page until the listing runs out.
    ///
    /// Only failing to load the start page is an error. Anything that goes
    /// wrong later ends the crawl with the records gathered so far.
    pub async fn crawl(
        &mut self,
        collection: &str,
        progress: &dyn CrawlProgress,
    ) -> Result<CollectionCrawl, BrowserError> {
        self.browser.navigate(collection).await?;
        sync_session(&*self.browser, self.client).await;

        let mut records = Vec::new();
        let mut page: u32 = 1;

        let stop = loop {
            let links = match self.scan_page(collection).await {
                Ok(links) => links,
                Err(e) => {
                    warn!("Could not scan page {} of {}: {}", page, collection, e);
                    break StopReason::PaginationFailed;
                }
            };
            if links.is_empty() {
                debug!("No detail links on page {} of {}", page, collection);
                break StopReason::NoDetailLinks;
            }

            info!("Page {}: scanning {} reactions", page, links.len());
            progress.page_scanned(page, links.len());

            for link in &links {
                match self.resolver.resolve(link).await {
                    Some(record) => {
                        progress.record_resolved(&record);
                        records.push(record);
                    }
                    None => {
                        debug!("No record for {}", link);
                        progress.record_skipped(link);
                    }
                }
            }

            if self.max_pages.is_some_and(|cap| page >= cap) {
                break StopReason::PageCap;
            }

            match self.advance().await {
                Ok(()) => page += 1,
                Err(reason) => break reason,
            }
        };

        info!(
            "Collection {} done after {} page(s), {} records ({})",
            collection,
            page,
            records.len(),
            stop
        );
        Ok(CollectionCrawl {
            records,
            pages: page,
            stop,
        })
    }

    /// Detail links of the page currently shown.
    async fn scan_page(&self, collection: &str) -> Result<Vec<String>, BrowserError> {
        let html = self.browser.content().await?;
        let page_url = self
            .browser
            .current_url()
            .await
            .unwrap_or_else(|_| collection.to_string());
        dom::detail_links(&html, &page_url)
    }

    /// Activates the page's "Next" control and waits for the re-render.
    async fn advance(&mut self) -> Result<(), StopReason> {
        let html = self.browser.content().await.map_err(|e| {
            warn!("Could not read page for pagination: {}", e);
            StopReason::PaginationFailed
        })?;
        let control = match dom::next_control(&html) {
            Ok(Some(control)) => control,
            Ok(None) => return Err(StopReason::NoNextControl),
            Err(e) => {
                warn!("Could not locate next control: {}", e);
                return Err(StopReason::PaginationFailed);
            }
        };
        if control.disabled {
            return Err(StopReason::NextDisabled);
        }

        self.browser
            .click_anchor(control.anchor.index, dom::NEXT_LABEL)
            .await
            .map_err(|e| {
                warn!("Could not activate next control: {}", e);
                StopReason::PaginationFailed
            })?;
        if !self.page_settle.is_zero() {
            tokio::time::sleep(self.page_settle).await;
        }
        Ok(())
    }
}
