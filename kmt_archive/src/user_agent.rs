//! Browser-like identification for requests made outside the browser.

/// Desktop Chrome user agent sent with every lightweight request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub fn get_user_agent() -> &'static str {
    USER_AGENT
}
