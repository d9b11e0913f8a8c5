//! Crawl layer for the reaction archive: browser-driven listing and
//! pagination, HTTP resolution of detail pages, and tolerant extraction of
//! their XML payloads.
//!
//! Builds on the `kmt_archive` site client, which it re-exports.

pub mod archive;
pub mod bridge;
pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod paginate;
pub mod pipeline;
pub mod progress;
pub mod resolve;
pub mod validation;

pub use kmt_archive;
pub use kmt_archive::types;
pub use kmt_archive::{Client, FetchConfig, RetryConfig};

pub use archive::ArchiveLister;
pub use bridge::sync_session;
#[cfg(feature = "browser")]
pub use browser::chromium::{ChromiumBrowser, ChromiumOptions};
pub use browser::{BrowserContext, BrowserError};
pub use config::CrawlConfig;
pub use error::ScraperError;
pub use extract::extract;
pub use paginate::{CollectionCrawl, CollectionPaginator, StopReason};
pub use pipeline::Pipeline;
pub use progress::{CrawlProgress, NoProgress};
pub use resolve::DetailResolver;
