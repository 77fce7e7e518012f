//! Locator abstraction: declarative element selection with auto-waiting.
//!
//! A [`Locator`] is constructed once, at page-object binding time, and
//! performs no document work until an action or read is invoked on it.
//! Resolution waits until the target is actionable (present and visible),
//! then performs exactly one interaction through the driver.
//!
//! Strategies that assume uniqueness (role, placeholder, text, and paths
//! without an explicit position) fail fast with an ambiguity error when the
//! document contains more than one match. Structurally repeated widgets are
//! disambiguated with an explicit 1-based `nth` on the path, never by
//! silently acting on the first hit.

use std::fmt;

use crate::page::PageHandle;
use crate::result::{ConducirError, ConducirResult};
use crate::wait::{Deadline, WaitOptions};

/// Accessible roles understood by the role strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    /// Buttons and elements with `role="button"`
    Button,
    /// Anchors with an href and elements with `role="link"`
    Link,
    /// Text inputs, textareas, and elements with `role="textbox"`
    Textbox,
}

impl AriaRole {
    /// The ARIA role string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Link => "link",
            Self::Textbox => "textbox",
        }
    }
}

impl fmt::Display for AriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Selection strategy for locating elements
///
/// Ordered by robustness: accessible role and name survive markup churn
/// best, placeholder and visible text next, structural paths last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Accessible role plus accessible name
    Role {
        /// The ARIA role
        role: AriaRole,
        /// The accessible name, matched exactly after trimming
        name: String,
    },
    /// Placeholder text, matched exactly
    Placeholder(String),
    /// Visible text content, matched exactly (whitespace preserved)
    Text(String),
    /// Structural path with optional positional disambiguation
    Path {
        /// XPath-style structural path
        xpath: String,
        /// 1-based index among matches; `None` asserts uniqueness
        nth: Option<usize>,
    },
}

impl Strategy {
    /// Create a role strategy
    #[must_use]
    pub fn role(role: AriaRole, name: impl Into<String>) -> Self {
        Self::Role {
            role,
            name: name.into(),
        }
    }

    /// Create a placeholder strategy
    #[must_use]
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder(text.into())
    }

    /// Create a visible-text strategy
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a structural-path strategy asserting uniqueness
    #[must_use]
    pub fn path(xpath: impl Into<String>) -> Self {
        Self::Path {
            xpath: xpath.into(),
            nth: None,
        }
    }

    /// Create a structural-path strategy with a 1-based positional index
    #[must_use]
    pub fn path_nth(xpath: impl Into<String>, nth: usize) -> Self {
        debug_assert!(nth >= 1, "positions are 1-based");
        Self::Path {
            xpath: xpath.into(),
            nth: Some(nth),
        }
    }

    /// Whether this strategy asserts a unique match
    #[must_use]
    pub const fn assumes_unique(&self) -> bool {
        !matches!(self, Self::Path { nth: Some(_), .. })
    }

    /// Zero-based index of the element this strategy targets
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Path { nth: Some(n), .. } => *n - 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role { role, name } => write!(f, "role {role} {name:?}"),
            Self::Placeholder(p) => write!(f, "placeholder {p:?}"),
            Self::Text(t) => write!(f, "text {t:?}"),
            Self::Path { xpath, nth: None } => write!(f, "path {xpath:?}"),
            Self::Path {
                xpath,
                nth: Some(n),
            } => write!(f, "path ({xpath:?})[{n}]"),
        }
    }
}

/// A lazily-resolved reference to an element on one page
#[derive(Debug, Clone)]
pub struct Locator {
    page: PageHandle,
    strategy: Strategy,
    options: WaitOptions,
}

impl Locator {
    /// Bind a locator to a page. Performs no document work.
    #[must_use]
    pub fn bind(page: &PageHandle, strategy: Strategy) -> Self {
        Self {
            page: page.clone(),
            strategy,
            options: page.options(),
        }
    }

    /// Override the resolution timeout for this locator
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.options = self.options.with_timeout(timeout_ms);
        self
    }

    /// The selection strategy this locator was bound with
    #[must_use]
    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Wait until the target is actionable, returning its match index.
    ///
    /// Ambiguity under a uniqueness-assuming strategy fails immediately;
    /// waiting out the timeout would only act on the wrong widget later.
    async fn resolve(&self) -> ConducirResult<usize> {
        self.page.ensure_open()?;
        let driver = self.page.driver();
        let index = self.strategy.index();
        let deadline = Deadline::new(self.options);

        loop {
            self.page.ensure_open()?;
            let count = driver.count(&self.strategy).await?;
            if self.strategy.assumes_unique() && count > 1 {
                return Err(ConducirError::AmbiguousMatch {
                    strategy: self.strategy.to_string(),
                    count,
                });
            }
            if count > index && driver.is_visible(&self.strategy, index).await? {
                return Ok(index);
            }
            if deadline.expired() {
                tracing::debug!(strategy = %self.strategy, "resolution timed out");
                return Err(ConducirError::ElementNotFound {
                    strategy: self.strategy.to_string(),
                    timeout_ms: deadline.timeout_ms(),
                });
            }
            deadline.tick().await;
        }
    }

    /// Click the element
    ///
    /// # Errors
    ///
    /// Fails if the element never becomes actionable or the click fails.
    pub async fn click(&self) -> ConducirResult<()> {
        let index = self.resolve().await?;
        tracing::debug!(strategy = %self.strategy, "click");
        self.page.driver().click(&self.strategy, index).await
    }

    /// Replace the element's value with the given text
    ///
    /// # Errors
    ///
    /// Fails if the element never becomes actionable or is not fillable.
    pub async fn fill(&self, text: &str) -> ConducirResult<()> {
        let index = self.resolve().await?;
        tracing::debug!(strategy = %self.strategy, "fill");
        self.page.driver().fill(&self.strategy, index, text).await
    }

    /// Scroll the element into the viewport
    ///
    /// # Errors
    ///
    /// Fails if the element never becomes actionable.
    pub async fn scroll_into_view(&self) -> ConducirResult<()> {
        let index = self.resolve().await?;
        self.page
            .driver()
            .scroll_into_view(&self.strategy, index)
            .await
    }

    /// Rendered text of the element, trimmed
    ///
    /// # Errors
    ///
    /// Fails if the element never becomes actionable.
    pub async fn inner_text(&self) -> ConducirResult<String> {
        Ok(self.text_content().await?.trim().to_string())
    }

    /// Raw text content of the element
    ///
    /// # Errors
    ///
    /// Fails if the element never becomes actionable.
    pub async fn text_content(&self) -> ConducirResult<String> {
        let index = self.resolve().await?;
        self.page.driver().read_text(&self.strategy, index).await
    }

    /// Attribute value, `None` when the attribute is absent
    ///
    /// # Errors
    ///
    /// Fails if the element never becomes actionable.
    pub async fn attribute(&self, name: &str) -> ConducirResult<Option<String>> {
        let index = self.resolve().await?;
        self.page
            .driver()
            .read_attribute(&self.strategy, index, name)
            .await
    }

    /// Number of elements currently matching, without waiting
    ///
    /// # Errors
    ///
    /// Fails if the page is closed or the query fails.
    pub async fn count(&self) -> ConducirResult<usize> {
        self.page.ensure_open()?;
        self.page.driver().count(&self.strategy).await
    }

    /// Whether a matching element is currently visible, without waiting
    ///
    /// # Errors
    ///
    /// Fails if the page is closed or the query fails.
    pub async fn is_visible(&self) -> ConducirResult<bool> {
        self.page.ensure_open()?;
        let driver = self.page.driver();
        let index = self.strategy.index();
        if driver.count(&self.strategy).await? <= index {
            return Ok(false);
        }
        driver.is_visible(&self.strategy, index).await
    }
}

/// Assertion builder for a locator.
///
/// Every assertion resolves the locator to a concrete value before
/// comparing. There is no way to assert on the handle itself; a locator has
/// no boolean meaning, only its resolved content does.
#[derive(Debug)]
pub struct Expect<'a> {
    locator: &'a Locator,
}

impl Expect<'_> {
    /// Assert the element's trimmed text equals `expected`
    ///
    /// # Errors
    ///
    /// Fails with an assertion error on mismatch, or with the underlying
    /// resolution error when the element never appears.
    pub async fn to_have_text(&self, expected: &str) -> ConducirResult<()> {
        let actual = self.locator.inner_text().await?;
        if actual == expected {
            Ok(())
        } else {
            Err(ConducirError::assertion(expected, actual))
        }
    }

    /// Assert the element's text contains `expected`
    ///
    /// # Errors
    ///
    /// Fails with an assertion error on mismatch.
    pub async fn to_contain_text(&self, expected: &str) -> ConducirResult<()> {
        let actual = self.locator.inner_text().await?;
        if actual.contains(expected) {
            Ok(())
        } else {
            Err(ConducirError::assertion(
                format!("text containing {expected:?}"),
                actual,
            ))
        }
    }

    /// Assert the element becomes visible within the timeout
    ///
    /// # Errors
    ///
    /// Fails with the resolution error when the element never appears.
    pub async fn to_be_visible(&self) -> ConducirResult<()> {
        self.locator.resolve().await.map(|_| ())
    }

    /// Assert the current match count equals `expected`
    ///
    /// # Errors
    ///
    /// Fails with an assertion error on mismatch.
    pub async fn to_have_count(&self, expected: usize) -> ConducirResult<()> {
        let actual = self.locator.count().await?;
        if actual == expected {
            Ok(())
        } else {
            Err(ConducirError::assertion(
                expected.to_string(),
                actual.to_string(),
            ))
        }
    }
}

/// Create an assertion builder for a locator
#[must_use]
pub const fn expect(locator: &Locator) -> Expect<'_> {
    Expect { locator }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod strategy_tests {
        use super::*;

        #[test]
        fn test_role_strategy() {
            let s = Strategy::role(AriaRole::Textbox, "First Name");
            assert!(s.assumes_unique());
            assert_eq!(s.index(), 0);
            assert!(s.to_string().contains("textbox"));
            assert!(s.to_string().contains("First Name"));
        }

        #[test]
        fn test_path_without_position_assumes_unique() {
            let s = Strategy::path("//nb-option[text()=' Dark']");
            assert!(s.assumes_unique());
        }

        #[test]
        fn test_path_with_position_is_disambiguated() {
            let s = Strategy::path_nth("//input[@placeholder='Email']", 4);
            assert!(!s.assumes_unique());
            assert_eq!(s.index(), 3);
        }

        #[test]
        fn test_display_includes_position() {
            let s = Strategy::path_nth("//button[@type='submit']", 5);
            assert!(s.to_string().contains("[5]"));
        }

        #[test]
        fn test_role_as_str() {
            assert_eq!(AriaRole::Button.as_str(), "button");
            assert_eq!(AriaRole::Link.as_str(), "link");
            assert_eq!(AriaRole::Textbox.as_str(), "textbox");
        }
    }

    mod resolution_tests {
        use super::*;
        use crate::sim::sim_page;

        #[tokio::test]
        async fn test_binding_performs_no_queries() {
            let (page, driver) = sim_page();
            let _a = page.by_placeholder("Email");
            let _b = page.by_role(AriaRole::Link, "Forms");
            let _c = page.by_path_nth("//button[@type='submit']", 5);
            assert_eq!(driver.query_count(), 0);
        }

        #[tokio::test]
        async fn test_duplicate_placeholder_fails_ambiguous() {
            let (page, _driver) = sim_page();
            page.goto("/pages/forms/layouts").await.unwrap();

            let err = page
                .by_placeholder("Email")
                .with_timeout(200)
                .click()
                .await
                .unwrap_err();
            assert!(err.is_ambiguous_match());
        }

        #[tokio::test]
        async fn test_explicit_position_selects_among_duplicates() {
            let (page, _driver) = sim_page();
            page.goto("/pages/forms/layouts").await.unwrap();

            let block_email = page.by_path_nth("//input[@placeholder='Email']", 4);
            block_email.fill("depanbelakangnama@gmail.com").await.unwrap();
            assert_eq!(
                block_email.attribute("value").await.unwrap().as_deref(),
                Some("depanbelakangnama@gmail.com")
            );
        }

        #[tokio::test]
        async fn test_missing_element_times_out_not_found() {
            let (page, _driver) = sim_page();
            page.goto("/pages/forms/layouts").await.unwrap();

            let err = page
                .by_text("No Such Widget")
                .with_timeout(120)
                .click()
                .await
                .unwrap_err();
            assert!(err.is_element_not_found());
        }

        #[tokio::test]
        async fn test_ambiguity_fails_without_waiting_out_timeout() {
            let (page, _driver) = sim_page();
            page.goto("/pages/forms/layouts").await.unwrap();

            let started = std::time::Instant::now();
            let err = page
                .by_placeholder("Email")
                .with_timeout(10_000)
                .click()
                .await
                .unwrap_err();
            assert!(err.is_ambiguous_match());
            assert!(started.elapsed() < std::time::Duration::from_secs(5));
        }
    }

    mod expect_tests {
        use super::*;
        use crate::sim::sim_page;

        #[tokio::test]
        async fn test_to_have_text_mismatch_reports_both_sides() {
            let (page, _driver) = sim_page();
            page.goto("/pages/forms/layouts").await.unwrap();

            let title = page.by_path("//nb-card-header[text()='Inline form']");
            let err = expect(&title).to_have_text("Block form").await.unwrap_err();
            match err {
                ConducirError::Assertion { expected, actual } => {
                    assert_eq!(expected, "Block form");
                    assert_eq!(actual, "Inline form");
                }
                other => panic!("expected assertion error, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_to_have_count() {
            let (page, _driver) = sim_page();
            page.goto("/pages/forms/layouts").await.unwrap();

            let emails = page.by_path("//input[@placeholder='Email']");
            expect(&emails).to_have_count(4).await.unwrap();
        }
    }
}
