//! Crawl progress notifications.

use kmt_archive::types::{CollectionRef, ReactionRecord};

/// Observer for crawl milestones, e.g. to drive a progress display.
///
/// All methods default to doing nothing.
pub trait CrawlProgress: Send + Sync {
    /// A collection crawl is starting. `index` is 1-based.
    fn collection_started(&self, _index: usize, _total: usize, _collection: &CollectionRef) {}

    /// A listing page yielded `links` detail links.
    fn page_scanned(&self, _page: u32, _links: usize) {}

    /// A detail page resolved into a record.
    fn record_resolved(&self, _record: &ReactionRecord) {}

    /// A detail page produced nothing.
    fn record_skipped(&self, _detail_url: &str) {}

    /// A collection crawl finished with `records` records.
    fn collection_finished(&self, _index: usize, _collection: &CollectionRef, _records: usize) {}
}

/// Progress observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl CrawlProgress for NoProgress {}
