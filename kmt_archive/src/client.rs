//! Lightweight HTTP client for the reaction archive.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;

use crate::{
    cookies::SessionCookieStore, types::BrowserCookie, user_agent::get_user_agent, Error,
};

/// Production archive host.
pub const DEFAULT_BASE_URL: &str = "https://kmt.vander-lingen.nl";

/// Statuses that are retried: transient server-side failures only.
const RETRYABLE_STATUSES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Retry budget for transient server errors.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base of the exponential backoff; retry `n` waits `backoff_factor * 2^(n-1)`.
    pub backoff_factor: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_millis(500),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (1-based).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(30);
        self.backoff_factor.saturating_mul(1u32 << shift)
    }
}

/// Per-request settings for the lightweight client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
        }
    }
}

/// HTTP client for archive pages and XML payloads.
///
/// Sends a browser-like user agent and whatever cookies the shared
/// [`SessionCookieStore`] currently holds, so requests ride on the same
/// authenticated session as the interactive browser once its cookies have
/// been copied in.
pub struct Client {
    /// Base URL of the archive. Defaults to `https://kmt.vander-lingen.nl`.
    base_url: String,
    http: reqwest::Client,
    cookies: Arc<SessionCookieStore>,
    retry: RetryConfig,
}

impl Client {
    /// Creates a client pointing at the production archive.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(DEFAULT_BASE_URL, FetchConfig::default())
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_config(base_url, FetchConfig::default())
    }

    pub fn with_config(base_url: &str, config: FetchConfig) -> Result<Self, Error> {
        let cookies = Arc::new(SessionCookieStore::new());
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(config.timeout)
            .cookie_provider(Arc::clone(&cookies))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::ClientBuild(e.to_string())
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            cookies,
            retry: config.retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cookie store backing every request this client sends.
    pub fn cookies(&self) -> &SessionCookieStore {
        &self.cookies
    }

    /// Replaces the whole session with the given browser cookies.
    pub fn replace_cookies(&self, cookies: &[BrowserCookie]) {
        self.cookies.replace_all(cookies);
    }

    /// Turns an href found on an archive page into a fetchable URL.
    ///
    /// Root-relative paths are joined to the base URL; anything else is
    /// returned unchanged.
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            href.to_string()
        }
    }

    /// Fetches `url` as text, or `None` when it is unavailable for any reason.
    ///
    /// Failures are logged and absorbed; callers skip the resource.
    pub async fn get(&self, url: &str) -> Option<String> {
        match self.fetch_text(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", url, e);
                None
            }
        }
    }

    /// Fetches `url` as text, retrying transient server errors.
    ///
    /// Network-level failures and client errors are returned immediately.
    pub async fn fetch_text(&self, url: &str) -> Result<String, Error> {
        let mut retry = 0u32;
        loop {
            tracing::debug!("GET {} (attempt {})", url, retry + 1);
            let resp = self
                .http
                .get(url)
                .header("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
                .header("accept-language", "en-US,en;q=0.9")
                .send()
                .await
                .map_err(|e| {
                    tracing::error!("Failed to get resource {}: {}", url, e);
                    Error::RequestFailed
                })?;

            let status = resp.status();
            if status.is_success() {
                return resp.text().await.map_err(|e| {
                    tracing::error!("Failed to read response body: {}", e);
                    Error::RequestFailed
                });
            }

            if RETRYABLE_STATUSES.contains(&status) {
                if retry >= self.retry.max_retries {
                    return Err(Error::RetriesExhausted {
                        status: status.as_u16(),
                        attempts: retry + 1,
                    });
                }
                retry += 1;
                let delay = self.retry.delay_for_retry(retry);
                tracing::warn!(
                    "{} returned {} (retry {}/{}), retrying in {:.1}s",
                    url,
                    status,
                    retry,
                    self.retry.max_retries,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
