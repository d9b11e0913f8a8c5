//! Cookies as reported by the interactive browser.

use serde::{Deserialize, Serialize};

/// A cookie read from the browser session, used to seed the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
}
