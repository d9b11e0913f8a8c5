use url::Url;

use crate::error::ScraperError;

/// How many collections to crawl, after bounding by what the archive lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionLimit {
    pub count: usize,
    /// The request exceeded the number of available collections.
    pub clamped: bool,
}

/// Bound a positive request to the available collection count.
pub fn clamp_limit(requested: usize, available: usize) -> Result<CollectionLimit, ScraperError> {
    if requested == 0 {
        return Err(ScraperError::InvalidInput(
            "limit must be a positive number".to_string(),
        ));
    }
    Ok(CollectionLimit {
        count: requested.min(available),
        clamped: requested > available,
    })
}

/// Validate an operator answer to "how many collections?".
///
/// Non-numeric and non-positive answers are rejected so the caller can ask
/// again; answers above `available` are clamped.
pub fn validate_limit(input: &str, available: usize) -> Result<CollectionLimit, ScraperError> {
    let trimmed = input.trim();
    let requested: i64 = trimmed.parse().map_err(|_| {
        ScraperError::InvalidInput(format!("'{}' is not a valid number", trimmed))
    })?;
    if requested <= 0 {
        return Err(ScraperError::InvalidInput(
            "limit must be a positive number".to_string(),
        ));
    }
    let requested = usize::try_from(requested).unwrap_or(usize::MAX);
    clamp_limit(requested, available)
}

/// Validate the per-collection page cap (must be >= 1).
pub fn validate_max_pages(max_pages: u32) -> Result<u32, ScraperError> {
    if max_pages < 1 {
        return Err(ScraperError::InvalidInput(
            "max-pages must be >= 1".to_string(),
        ));
    }
    Ok(max_pages)
}

/// Validate a detail page URL given on the command line: absolute http(s).
pub fn validate_detail_url(input: &str) -> Result<String, ScraperError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| ScraperError::InvalidInput(format!("invalid URL '{}': {}", trimmed, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(ScraperError::InvalidInput(format!(
            "unsupported URL scheme '{}', expected http or https",
            other
        ))),
    }
}
