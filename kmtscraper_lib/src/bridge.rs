//! Copies the browser session into the lightweight HTTP client.

use kmt_archive::Client;

use crate::browser::BrowserContext;

/// Replaces the client's cookies with the ones the browser currently holds.
///
/// Called after each navigation that may have refreshed session tokens. A
/// browser with no cookies leaves the client with an empty session, which is
/// valid for pages that need no authentication. If the browser cannot report
/// its cookies the client session is emptied as well, so stale tokens are
/// never replayed. Returns the number of cookies installed.
pub async fn sync_session<B>(browser: &B, client: &Client) -> usize
where
    B: BrowserContext + ?Sized,
{
    match browser.cookies().await {
        Ok(cookies) => {
            client.replace_cookies(&cookies);
            tracing::debug!("Session synced with {} browser cookies", cookies.len());
            cookies.len()
        }
        Err(e) => {
            tracing::warn!("Could not read browser cookies, clearing session: {}", e);
            client.cookies().clear();
            0
        }
    }
}
