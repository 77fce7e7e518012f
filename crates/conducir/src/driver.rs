//! Engine-facing traits: the complete primitive set the core may use.
//!
//! The page-object layer never talks to a browser directly. Everything flows
//! through [`PageDriver`], so the underlying engine (CDP, a simulated page,
//! anything else that can query and poke a document) stays swappable. An
//! [`Engine`] hands out one isolated driver per scenario.

use async_trait::async_trait;
use std::fmt;

use crate::locator::Strategy;
use crate::page::PageHandle;
use crate::result::ConducirResult;

/// Primitive operations against one live page.
///
/// `index` parameters are zero-based positions within the strategy's match
/// list in document order. Drivers perform no waiting of their own; the
/// locator layer owns actionability polling and calls these primitives only
/// once a target has been resolved.
#[async_trait]
pub trait PageDriver: fmt::Debug + Send + Sync {
    /// Navigate the page to an absolute URL
    async fn goto(&self, url: &str) -> ConducirResult<()>;

    /// Current page URL
    async fn current_url(&self) -> ConducirResult<String>;

    /// Number of elements matching the strategy, in document order
    async fn count(&self, strategy: &Strategy) -> ConducirResult<usize>;

    /// Whether the nth match is visible
    async fn is_visible(&self, strategy: &Strategy, index: usize) -> ConducirResult<bool>;

    /// Click the nth match
    async fn click(&self, strategy: &Strategy, index: usize) -> ConducirResult<()>;

    /// Replace the nth match's value with the given text
    async fn fill(&self, strategy: &Strategy, index: usize, text: &str) -> ConducirResult<()>;

    /// Scroll the nth match into the viewport
    async fn scroll_into_view(&self, strategy: &Strategy, index: usize) -> ConducirResult<()>;

    /// Text content of the nth match
    async fn read_text(&self, strategy: &Strategy, index: usize) -> ConducirResult<String>;

    /// Attribute value of the nth match, `None` when absent
    async fn read_attribute(
        &self,
        strategy: &Strategy,
        index: usize,
        name: &str,
    ) -> ConducirResult<Option<String>>;

    /// Capture a screenshot of the page, PNG-encoded. Engines without a
    /// rendering surface return an empty buffer.
    async fn screenshot(&self) -> ConducirResult<Vec<u8>>;

    /// Release the underlying page
    async fn close(&self) -> ConducirResult<()>;
}

/// A browser-like engine that creates isolated pages.
#[async_trait]
pub trait Engine: fmt::Debug + Send + Sync {
    /// Open a fresh page. Each scenario gets its own; pages are never shared.
    async fn new_page(&self) -> ConducirResult<PageHandle>;

    /// Shut the engine down, releasing every remaining page
    async fn shutdown(&self) -> ConducirResult<()>;
}
