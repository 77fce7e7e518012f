//! Page object binding.
//!
//! A page object bundles the locators for one logical screen behind
//! intention-revealing operations. Binding is eager for declarations and
//! lazy for resolution: `bind` builds every locator up front but touches
//! nothing in the document. Page objects never reach into each other's
//! locators; sequencing across screens belongs to the scenario.

use crate::page::PageHandle;

/// A named bundle of locators and operations bound to exactly one page.
///
/// # Example
///
/// ```ignore
/// struct LoginPage {
///     username: Locator,
///     password: Locator,
///     submit: Locator,
/// }
///
/// impl PageObject for LoginPage {
///     const NAME: &'static str = "login";
///
///     fn bind(page: &PageHandle) -> Self {
///         Self {
///             username: page.by_role(AriaRole::Textbox, "Username"),
///             password: page.by_role(AriaRole::Textbox, "Password"),
///             submit: page.by_role(AriaRole::Button, "Log in"),
///         }
///     }
/// }
/// ```
pub trait PageObject: Sized {
    /// Fixture name this page object is registered and requested under
    const NAME: &'static str;

    /// Bind every locator against the given page handle.
    ///
    /// Must not perform any document interaction; the handle is only
    /// captured for later resolution.
    fn bind(page: &PageHandle) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{AriaRole, Locator};
    use crate::sim::sim_page;

    struct ProbePage {
        search: Locator,
    }

    impl PageObject for ProbePage {
        const NAME: &'static str = "probe";

        fn bind(page: &PageHandle) -> Self {
            Self {
                search: page.by_role(AriaRole::Textbox, "Search"),
            }
        }
    }

    #[tokio::test]
    async fn test_bind_touches_nothing() {
        let (page, driver) = sim_page();
        let probe = ProbePage::bind(&page);
        assert_eq!(driver.query_count(), 0);
        // the locator is live afterwards
        page.goto("/pages/tables/tree-grid").await.unwrap();
        probe.search.fill("cov").await.unwrap();
        assert!(driver.query_count() > 0);
    }
}
