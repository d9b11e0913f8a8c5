//! Crawl configuration: defaults, overridable from the environment.

use std::path::PathBuf;
use std::time::Duration;

use kmt_archive::{Client, FetchConfig, RetryConfig, DEFAULT_BASE_URL};

#[cfg(feature = "browser")]
use crate::browser::chromium::ChromiumOptions;

/// Everything the pipeline needs to know before it starts.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Archive host; root-relative XML links are joined to it.
    pub base_url: String,
    /// Path of the archive root listing the collections.
    pub archive_path: String,
    pub fetch: FetchConfig,
    /// Wait after loading the archive root before reading it.
    pub archive_settle: Duration,
    /// Wait after activating "Next" before reading the new page.
    pub page_settle: Duration,
    /// Optional cap on listing pages per collection.
    pub max_pages: Option<u32>,
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            archive_path: "/archive".to_string(),
            fetch: FetchConfig::default(),
            archive_settle: Duration::from_secs(2),
            page_settle: Duration::from_millis(500),
            max_pages: None,
            headless: false,
            chrome_path: None,
        }
    }
}

impl CrawlConfig {
    /// Defaults overridden by `KMT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `KMT_*` key.
    /// Unparseable values fall back to the default.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let u64_var = |key: &str| lookup(key).and_then(|val| val.trim().parse::<u64>().ok());

        Self {
            base_url: lookup("KMT_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            archive_path: lookup("KMT_ARCHIVE_PATH").unwrap_or(defaults.archive_path),
            fetch: FetchConfig {
                timeout: u64_var("KMT_REQUEST_TIMEOUT_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.fetch.timeout),
                retry: RetryConfig {
                    max_retries: u64_var("KMT_RETRY_MAX")
                        .and_then(|n| u32::try_from(n).ok())
                        .unwrap_or(defaults.fetch.retry.max_retries),
                    backoff_factor: u64_var("KMT_RETRY_BACKOFF_MS")
                        .map(Duration::from_millis)
                        .unwrap_or(defaults.fetch.retry.backoff_factor),
                },
            },
            archive_settle: u64_var("KMT_ARCHIVE_SETTLE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.archive_settle),
            page_settle: u64_var("KMT_PAGE_SETTLE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.page_settle),
            max_pages: defaults.max_pages,
            headless: lookup("KMT_HEADLESS")
                .and_then(|val| parse_bool(&val))
                .unwrap_or(defaults.headless),
            chrome_path: lookup("KMT_CHROME_PATH").map(PathBuf::from),
        }
    }

    /// Absolute URL of the archive root.
    pub fn archive_url(&self) -> String {
        format!("{}{}", self.base_url, self.archive_path)
    }

    /// Builds the lightweight client for this configuration.
    pub fn client(&self) -> Result<Client, kmt_archive::Error> {
        Client::with_config(&self.base_url, self.fetch.clone())
    }

    #[cfg(feature = "browser")]
    pub fn chromium_options(&self) -> ChromiumOptions {
        ChromiumOptions {
            headless: self.headless,
            executable: self.chrome_path.clone(),
            ..ChromiumOptions::default()
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
