//! Page handles: one per scenario, exclusively owned.
//!
//! A [`PageHandle`] is a cheap clone over a shared driver plus a closed flag.
//! Page objects keep clones of the handle for their whole lifetime; when the
//! owning scenario tears the page down, every clone starts failing with
//! [`ConducirError::PageClosed`], so nothing can outlive its scenario.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::driver::PageDriver;
use crate::locator::{AriaRole, Locator, Strategy};
use crate::result::{ConducirError, ConducirResult};
use crate::wait::WaitOptions;

/// Handle to one live page, bound to the scenario that created it
#[derive(Clone)]
pub struct PageHandle {
    driver: Arc<dyn PageDriver>,
    closed: Arc<AtomicBool>,
    base_url: Option<String>,
    options: WaitOptions,
}

impl fmt::Debug for PageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageHandle")
            .field("driver", &self.driver)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PageHandle {
    /// Wrap a driver in a fresh handle
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            closed: Arc::new(AtomicBool::new(false)),
            base_url: None,
            options: WaitOptions::default(),
        }
    }

    /// Set the base URL that relative `goto` targets are joined against
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the default wait options inherited by locators
    #[must_use]
    pub const fn with_options(mut self, options: WaitOptions) -> Self {
        self.options = options;
        self
    }

    /// Default wait options for locators bound to this handle
    #[must_use]
    pub const fn options(&self) -> WaitOptions {
        self.options
    }

    pub(crate) fn ensure_open(&self) -> ConducirResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(ConducirError::PageClosed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    /// Whether the owning scenario has already torn this page down
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Navigate to a URL. Relative targets are joined to the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is closed or navigation fails.
    pub async fn goto(&self, url: &str) -> ConducirResult<()> {
        self.ensure_open()?;
        let target = self.absolute(url);
        tracing::debug!(url = %target, "goto");
        self.driver.goto(&target).await
    }

    /// Current page URL
    ///
    /// # Errors
    ///
    /// Returns an error if the page is closed.
    pub async fn current_url(&self) -> ConducirResult<String> {
        self.ensure_open()?;
        self.driver.current_url().await
    }

    /// Capture a screenshot of the page
    ///
    /// # Errors
    ///
    /// Returns an error if the page is closed or capture fails.
    pub async fn screenshot(&self) -> ConducirResult<Vec<u8>> {
        self.ensure_open()?;
        self.driver.screenshot().await
    }

    /// Bind a locator for an arbitrary strategy
    #[must_use]
    pub fn locate(&self, strategy: Strategy) -> Locator {
        Locator::bind(self, strategy)
    }

    /// Bind a locator by accessible role and name
    #[must_use]
    pub fn by_role(&self, role: AriaRole, name: impl Into<String>) -> Locator {
        self.locate(Strategy::role(role, name))
    }

    /// Bind a locator by placeholder text
    #[must_use]
    pub fn by_placeholder(&self, placeholder: impl Into<String>) -> Locator {
        self.locate(Strategy::placeholder(placeholder))
    }

    /// Bind a locator by exact visible text
    #[must_use]
    pub fn by_text(&self, text: impl Into<String>) -> Locator {
        self.locate(Strategy::text(text))
    }

    /// Bind a locator by structural path
    #[must_use]
    pub fn by_path(&self, xpath: impl Into<String>) -> Locator {
        self.locate(Strategy::path(xpath))
    }

    /// Bind a locator by structural path with a 1-based positional index
    #[must_use]
    pub fn by_path_nth(&self, xpath: impl Into<String>, nth: usize) -> Locator {
        self.locate(Strategy::path_nth(xpath, nth))
    }

    /// Tear the page down. Every clone of this handle becomes unusable.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to release the page; the handle
    /// is marked closed regardless.
    pub async fn close(&self) -> ConducirResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::debug!("closing page");
        self.driver.close().await
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("about:") {
            return url.to_string();
        }
        match &self.base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/')),
            None => url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimDriver;

    fn handle() -> PageHandle {
        PageHandle::new(Arc::new(SimDriver::new()))
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_relative_url_joined_to_base() {
            let page = handle().with_base_url("https://playground.bondaracademy.com/");
            assert_eq!(
                page.absolute("/pages/iot-dashboard"),
                "https://playground.bondaracademy.com/pages/iot-dashboard"
            );
        }

        #[test]
        fn test_absolute_url_untouched() {
            let page = handle().with_base_url("https://playground.bondaracademy.com");
            assert_eq!(
                page.absolute("https://example.com/x"),
                "https://example.com/x"
            );
        }

        #[test]
        fn test_relative_url_without_base() {
            let page = handle();
            assert_eq!(page.absolute("/pages/x"), "/pages/x");
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[tokio::test]
        async fn test_close_marks_every_clone() {
            let page = handle();
            let clone = page.clone();
            assert!(!clone.is_closed());

            page.close().await.unwrap();
            assert!(clone.is_closed());
            assert!(matches!(
                clone.current_url().await,
                Err(ConducirError::PageClosed)
            ));
        }

        #[tokio::test]
        async fn test_double_close_is_idempotent() {
            let page = handle();
            page.close().await.unwrap();
            assert!(page.close().await.is_ok());
        }

        #[tokio::test]
        async fn test_goto_after_close_fails() {
            let page = handle();
            page.close().await.unwrap();
            assert!(matches!(
                page.goto("/pages/iot-dashboard").await,
                Err(ConducirError::PageClosed)
            ));
        }
    }
}
