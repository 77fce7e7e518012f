//! Real browser control over the Chrome `DevTools` Protocol.
//!
//! Only compiled with the `browser` feature. The strategy-to-JavaScript
//! compilation lives here, not in the locator layer: the core stays
//! engine-agnostic and this adapter owns everything CDP-specific.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{EngineKind, RunConfig};
use crate::driver::{Engine, PageDriver};
use crate::locator::{AriaRole, Strategy};
use crate::page::PageHandle;
use crate::result::{ConducirError, ConducirResult};

/// Engine launching one Chromium-family browser process
#[derive(Debug)]
pub struct CdpEngine {
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl CdpEngine {
    /// Launch a browser for the given run configuration
    ///
    /// # Errors
    ///
    /// Returns an error for non-Chromium engine kinds or when the browser
    /// cannot be launched.
    pub async fn launch(config: &RunConfig) -> ConducirResult<Self> {
        if config.engine != EngineKind::Chromium {
            return Err(ConducirError::BrowserLaunch {
                message: format!(
                    "the CDP engine only drives chromium-family browsers, not {}",
                    config.engine
                ),
            });
        }

        let mut builder = CdpConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        if std::env::var("CI").is_ok_and(|v| !v.is_empty()) {
            builder = builder.no_sandbox();
        }
        if let Ok(path) = std::env::var("CHROMIUM_PATH") {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|e| ConducirError::BrowserLaunch {
                message: e.to_string(),
            })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ConducirError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // drive the CDP event loop until the browser goes away
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }
}

#[async_trait]
impl Engine for CdpEngine {
    async fn new_page(&self) -> ConducirResult<PageHandle> {
        let browser = self.inner.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ConducirError::PageError {
                message: e.to_string(),
            })?;
        Ok(PageHandle::new(Arc::new(CdpDriver {
            page: Arc::new(Mutex::new(page)),
        })))
    }

    async fn shutdown(&self) -> ConducirResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| ConducirError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// Driver over one CDP page
#[derive(Debug)]
pub struct CdpDriver {
    page: Arc<Mutex<CdpPage>>,
}

impl CdpDriver {
    async fn eval<T: serde::de::DeserializeOwned>(&self, expr: String) -> ConducirResult<T> {
        let page = self.page.lock().await;
        let result = page
            .evaluate(expr)
            .await
            .map_err(|e| ConducirError::PageError {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| ConducirError::PageError {
            message: e.to_string(),
        })
    }

    /// Evaluate an element operation; `false` means the match list changed
    /// between resolution and the operation
    async fn eval_on_element(
        &self,
        strategy: &Strategy,
        index: usize,
        op: &str,
    ) -> ConducirResult<()> {
        let expr = format!(
            "(() => {{ const els = {}; const el = els[{index}]; if (!el) return false; {op} return true; }})()",
            js_match_array(strategy)
        );
        if self.eval::<bool>(expr).await? {
            Ok(())
        } else {
            Err(ConducirError::PageError {
                message: format!("stale element: {strategy} has no match at index {index}"),
            })
        }
    }
}

#[async_trait]
impl PageDriver for CdpDriver {
    async fn goto(&self, url: &str) -> ConducirResult<()> {
        let page = self.page.lock().await;
        page.goto(url)
            .await
            .map_err(|e| ConducirError::Navigation {
                destination: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> ConducirResult<String> {
        self.eval("window.location.href".to_string()).await
    }

    async fn count(&self, strategy: &Strategy) -> ConducirResult<usize> {
        self.eval(format!("{}.length", js_match_array(strategy))).await
    }

    async fn is_visible(&self, strategy: &Strategy, index: usize) -> ConducirResult<bool> {
        let expr = format!(
            "(() => {{ const el = {}[{index}]; return !!el && !!(el.offsetParent || el.getClientRects().length); }})()",
            js_match_array(strategy)
        );
        self.eval(expr).await
    }

    async fn click(&self, strategy: &Strategy, index: usize) -> ConducirResult<()> {
        self.eval_on_element(strategy, index, "el.click();").await
    }

    async fn fill(&self, strategy: &Strategy, index: usize, text: &str) -> ConducirResult<()> {
        // use the prototype setter so framework change detection fires
        let op = format!(
            "el.focus(); \
             const desc = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value'); \
             if (desc && desc.set) {{ desc.set.call(el, {text}); }} else {{ el.value = {text}; }} \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); \
             el.dispatchEvent(new Event('change', {{bubbles: true}}));",
            text = js_string(text)
        );
        self.eval_on_element(strategy, index, &op).await
    }

    async fn scroll_into_view(&self, strategy: &Strategy, index: usize) -> ConducirResult<()> {
        self.eval_on_element(strategy, index, "el.scrollIntoView({block: 'center'});")
            .await
    }

    async fn read_text(&self, strategy: &Strategy, index: usize) -> ConducirResult<String> {
        let expr = format!(
            "(() => {{ const el = {}[{index}]; return el ? (el.textContent || '') : null; }})()",
            js_match_array(strategy)
        );
        self.eval::<Option<String>>(expr)
            .await?
            .ok_or_else(|| ConducirError::PageError {
                message: format!("stale element: {strategy} has no match at index {index}"),
            })
    }

    async fn read_attribute(
        &self,
        strategy: &Strategy,
        index: usize,
        name: &str,
    ) -> ConducirResult<Option<String>> {
        let expr = format!(
            "(() => {{ const el = {}[{index}]; return el ? el.getAttribute({}) : null; }})()",
            js_match_array(strategy),
            js_string(name)
        );
        self.eval(expr).await
    }

    async fn screenshot(&self) -> ConducirResult<Vec<u8>> {
        let page = self.page.lock().await;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let screenshot = page
            .execute(params)
            .await
            .map_err(|e| ConducirError::PageError {
                message: e.to_string(),
            })?;

        use base64::Engine as _;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| ConducirError::PageError {
                message: e.to_string(),
            })
    }

    async fn close(&self) -> ConducirResult<()> {
        let page = self.page.lock().await.clone();
        page.close().await.map_err(|e| ConducirError::PageError {
            message: e.to_string(),
        })?;
        Ok(())
    }
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Compile a strategy to a JavaScript expression yielding the match array
/// in document order
fn js_match_array(strategy: &Strategy) -> String {
    match strategy {
        Strategy::Role { role, name } => {
            let selector = match role {
                AriaRole::Button => "button, [role=\"button\"]",
                AriaRole::Link => "a[href], [role=\"link\"]",
                AriaRole::Textbox => "input, textarea, [role=\"textbox\"]",
            };
            format!(
                "Array.from(document.querySelectorAll('{selector}')).filter(el => \
                 ((el.getAttribute('aria-label') || el.placeholder || el.textContent || '').trim() === {}.trim()))",
                js_string(name)
            )
        }
        Strategy::Placeholder(placeholder) => format!(
            "Array.from(document.querySelectorAll('input, textarea')).filter(el => el.placeholder === {})",
            js_string(placeholder)
        ),
        Strategy::Text(text) => format!(
            "Array.from(document.querySelectorAll('*')).filter(el => el.children.length === 0 && el.textContent === {})",
            js_string(text)
        ),
        Strategy::Path { xpath, .. } => format!(
            "(() => {{ const r = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
             const a = []; for (let i = 0; i < r.snapshotLength; i++) a.push(r.snapshotItem(i)); return a; }})()",
            js_string(xpath)
        ),
    }
}
