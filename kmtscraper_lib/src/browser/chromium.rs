//! Chromium-backed browser context using chromiumoxide (CDP).

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use kmt_archive::types::BrowserCookie;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowserContext, BrowserError};

/// Launch options for the interactive browser.
#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    /// Run without a window. The archive crawl runs visibly by default.
    pub headless: bool,
    /// Explicit Chrome/Chromium binary; auto-detected when `None`.
    pub executable: Option<PathBuf>,
    /// Upper bound on a single navigation.
    pub navigation_timeout: Duration,
}

impl Default for ChromiumOptions {
    fn default() -> Self {
        Self {
            headless: false,
            executable: None,
            navigation_timeout: Duration::from_secs(60),
        }
    }
}

/// Find a Chrome or Chromium binary.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("KMT_CHROME_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for cmd in [
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
    ] {
        if let Ok(path) = which::which(cmd) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Resolves once the document is parsed (`DOMContentLoaded`), without
/// waiting for images, frames and other subresources.
const WAIT_FOR_DOM_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState !== 'loading') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
        }
    })
"#;

/// Pause between ready-state checks while the new document has no script
/// context yet.
const DOM_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One Chromium process with a single tab.
pub struct ChromiumBrowser {
    browser: Option<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumBrowser {
    /// Launches Chromium and opens a blank tab.
    pub async fn launch(options: &ChromiumOptions) -> Result<Self, BrowserError> {
        let chrome_path = match options.executable.clone() {
            Some(path) => path,
            None => find_chromium().ok_or_else(|| {
                BrowserError::Launch(
                    "Chrome/Chromium not found; install it or set KMT_CHROME_PATH".to_string(),
                )
            })?,
        };
        info!(
            "Launching browser {} (headless={})",
            chrome_path.display(),
            options.headless
        );

        let mut builder = BrowserConfig::builder().chrome_executable(chrome_path);
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--start-maximized")
            .arg("--log-level=3")
            .arg("--blink-settings=imagesEnabled=false")
            .arg("--disable-plugins")
            .arg("--disable-popup-blocking")
            .build()
            .map_err(|e| BrowserError::Launch(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Launch(format!("failed to open tab: {e}")))?;

        Ok(Self {
            browser: Some(browser),
            page,
            handler,
            navigation_timeout: options.navigation_timeout,
        })
    }

    /// Starts a navigation without waiting for the `load` event.
    ///
    /// `Page.navigate` returns once the new document is committed; a
    /// network-level failure comes back as `errorText`.
    async fn start_navigation(&self, url: &str) -> Result<(), String> {
        let response = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| e.to_string())?;
        match response.result.error_text.as_deref() {
            Some(error) if !error.is_empty() => Err(error.to_string()),
            _ => Ok(()),
        }
    }

    /// Waits for `DOMContentLoaded` on the committed document.
    ///
    /// Evaluation can fail while the old execution context is torn down, so
    /// it is retried until the caller's timeout expires.
    async fn wait_for_dom(&self) {
        loop {
            match self.page.evaluate(WAIT_FOR_DOM_SCRIPT).await {
                Ok(result) => {
                    let state: String = result
                        .into_value()
                        .unwrap_or_else(|_| "unknown".to_string());
                    debug!("Page ready state: {}", state);
                    return;
                }
                Err(e) => {
                    debug!("Document not scriptable yet: {}", e);
                    tokio::time::sleep(DOM_POLL_INTERVAL).await;
                }
            }
        }
    }
}

#[async_trait]
impl BrowserContext for ChromiumBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!("Navigating to {}", url);
        let navigation = tokio::time::timeout(self.navigation_timeout, async {
            self.start_navigation(url).await?;
            self.wait_for_dom().await;
            Ok::<(), String>(())
        })
        .await;
        match navigation {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason,
            }),
            Err(_) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {:?}", self.navigation_timeout),
            }),
        }
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        self.page
            .url()
            .await
            .map_err(|e| BrowserError::Dom(e.to_string()))
            .map(Option::unwrap_or_default)
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Dom(e.to_string()))
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>, BrowserError> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .map_err(|e| BrowserError::Script(format!("failed to read cookies: {e}")))?;
        debug!("Got {} cookies from browser", cookies.len());
        Ok(cookies
            .into_iter()
            .map(|c| BrowserCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
                secure: c.secure,
                http_only: c.http_only,
            })
            .collect())
    }

    async fn click_anchor(
        &mut self,
        index: usize,
        expected_text: &str,
    ) -> Result<(), BrowserError> {
        // `index` comes from the parsed snapshot; see `dom::anchors` for when
        // it can differ from the live node list.
        let expected = serde_json::to_string(expected_text)
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        let script = format!(
            r#"(() => {{
                const anchor = document.querySelectorAll('a')[{index}];
                if (!anchor || !anchor.textContent.includes({expected})) {{
                    return false;
                }}
                anchor.click();
                return true;
            }})()"#
        );
        let clicked: bool = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?
            .into_value()
            .map_err(|e| BrowserError::Script(format!("unexpected click result: {e:?}")))?;
        if clicked {
            Ok(())
        } else {
            Err(BrowserError::StaleElement(index))
        }
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };
        info!("Closing browser");
        if let Err(e) = browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        if let Err(e) = browser.wait().await {
            warn!("Failed waiting for browser exit: {}", e);
        }
        self.handler.abort();
        Ok(())
    }
}
