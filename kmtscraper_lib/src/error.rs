//! Error types for the crawl layer.

use std::fmt;

use crate::browser::BrowserError;

/// Errors that can end a crawl step, wrapping site client and browser
/// failures and adding serialization, I/O and input validation failures.
///
/// Per-record failures never become a `ScraperError`; they are absorbed
/// where they happen and only drop the affected record.
#[derive(Debug)]
pub enum ScraperError {
    /// The lightweight client could not be built or failed outright.
    Api(kmt_archive::Error),
    /// The interactive browser failed to start or to load a page.
    Browser(BrowserError),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// Reading or writing a local file failed.
    Io(std::io::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for ScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "Archive client error: {}", e),
            Self::Browser(e) => write!(f, "Browser error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ScraperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Browser(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<kmt_archive::Error> for ScraperError {
    fn from(e: kmt_archive::Error) -> Self {
        Self::Api(e)
    }
}

impl From<BrowserError> for ScraperError {
    fn from(e: BrowserError) -> Self {
        Self::Browser(e)
    }
}

impl From<serde_json::Error> for ScraperError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<std::io::Error> for ScraperError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
