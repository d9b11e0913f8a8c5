//! Cookie store shared between the HTTP client and the browser session.

use std::sync::RwLock;

use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use url::Url;

use crate::types::BrowserCookie;

/// Name/value cookie store with no domain scoping.
///
/// The archive lives on a single domain, so every held cookie is sent with
/// every request. Unlike `reqwest::cookie::Jar`, the whole set can be
/// replaced at once, which is what keeping the client in step with a browser
/// session requires.
#[derive(Debug, Default)]
pub struct SessionCookieStore {
    cookies: RwLock<Vec<(String, String)>>,
}

impl SessionCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every held cookie, then installs `cookies` in order.
    ///
    /// A later cookie with the same name as an earlier one overwrites it.
    pub fn replace_all(&self, cookies: &[BrowserCookie]) {
        let mut held = self.cookies.write().unwrap_or_else(|e| e.into_inner());
        held.clear();
        for cookie in cookies {
            upsert(&mut held, &cookie.name, &cookie.value);
        }
    }

    /// Inserts or overwrites a single cookie.
    pub fn set(&self, name: &str, value: &str) {
        let mut held = self.cookies.write().unwrap_or_else(|e| e.into_inner());
        upsert(&mut held, name, value);
    }

    pub fn clear(&self) {
        self.cookies
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Returns the held cookies as `(name, value)` pairs in insertion order.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.cookies
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.cookies.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn header_value(&self) -> Option<HeaderValue> {
        let held = self.cookies.read().unwrap_or_else(|e| e.into_inner());
        if held.is_empty() {
            return None;
        }
        let joined = held
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&joined).ok()
    }
}

impl CookieStore for SessionCookieStore {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        for header in cookie_headers {
            let Ok(raw) = header.to_str() else {
                continue;
            };
            if let Some((name, value)) = parse_set_cookie(raw) {
                self.set(name, value);
            }
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        self.header_value()
    }
}

fn upsert(held: &mut Vec<(String, String)>, name: &str, value: &str) {
    match held.iter_mut().find(|(existing, _)| existing == name) {
        Some(entry) => entry.1 = value.to_string(),
        None => held.push((name.to_string(), value.to_string())),
    }
}

/// Extracts the leading `name=value` pair of a `Set-Cookie` header.
fn parse_set_cookie(raw: &str) -> Option<(&str, &str)> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, value.trim()))
}
