//! The dashboard header, home of the theme selector.

use crate::locator::Locator;
use crate::page::PageHandle;
use crate::page_object::PageObject;
use crate::result::{ConducirError, ConducirResult};

/// Header widgets shared by every screen of the playground
#[derive(Debug)]
pub struct DashboardPage {
    theme_dropdown: Locator,
    dark_theme_option: Locator,
}

impl PageObject for DashboardPage {
    const NAME: &'static str = "dashboard";

    fn bind(page: &PageHandle) -> Self {
        Self {
            // the theme dropdown is the first of several identical select buttons
            theme_dropdown: page.by_path_nth("//button[@class='select-button']", 1),
            dark_theme_option: page.by_path("//nb-option[text()=' Dark']"),
        }
    }
}

impl DashboardPage {
    /// Switch the playground to the dark theme
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when the dropdown or option cannot
    /// be driven.
    pub async fn select_dark_theme(&self) -> ConducirResult<()> {
        const OP: &str = "select dark theme";
        self.theme_dropdown
            .click()
            .await
            .map_err(|e| ConducirError::interaction(OP, e))?;
        self.dark_theme_option
            .click()
            .await
            .map_err(|e| ConducirError::interaction(OP, e))?;
        Ok(())
    }
}
