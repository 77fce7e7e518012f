//! The Tree Grid screen: collapsible rows of name/size/kind cells.

use crate::locator::{AriaRole, Locator};
use crate::page::PageHandle;
use crate::page_object::PageObject;
use crate::result::{ConducirError, ConducirResult};

/// The Tables / Tree Grid screen
#[derive(Debug)]
pub struct TreeGridPage {
    search_field: Locator,

    // row Projects //
    projects_toggle: Locator,
    projects_name_cell: Locator,
    projects_size_cell: Locator,
    projects_kind_cell: Locator,

    // row Reports //
    reports_toggle: Locator,

    // row Other //
    other_toggle: Locator,
}

impl PageObject for TreeGridPage {
    const NAME: &'static str = "tree-grid";

    fn bind(page: &PageHandle) -> Self {
        let toggle = "//nb-tree-grid-row//button[@aria-label='Toggle Expand/Collapse']";
        Self {
            search_field: page.by_role(AriaRole::Textbox, "Search"),

            // row Projects //
            projects_toggle: page.by_path_nth(toggle, 1),
            projects_name_cell: page
                .by_path("//td[@role='gridcell' and contains(text(),'project-1.doc')]"),
            projects_size_cell: page.by_path_nth("//td[@role='gridcell']", 5),
            projects_kind_cell: page.by_path_nth("//td[@role='gridcell']", 6),

            // row Reports //
            reports_toggle: page.by_path_nth(toggle, 2),

            // row Other //
            other_toggle: page.by_path_nth(toggle, 3),
        }
    }
}

impl TreeGridPage {
    /// Expand the Projects row, exposing its child rows
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when the toggle cannot be driven.
    pub async fn expand_projects_row(&self) -> ConducirResult<()> {
        self.projects_toggle
            .click()
            .await
            .map_err(|e| ConducirError::interaction("expand projects row", e))
    }

    /// Collapse the Projects row again
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when the toggle cannot be driven.
    pub async fn collapse_projects_row(&self) -> ConducirResult<()> {
        self.projects_toggle
            .click()
            .await
            .map_err(|e| ConducirError::interaction("collapse projects row", e))
    }

    /// Name cell of the first project child row
    ///
    /// # Errors
    ///
    /// Fails when the row is collapsed or missing.
    pub async fn project_name(&self) -> ConducirResult<String> {
        let name = self.projects_name_cell.inner_text().await?;
        tracing::debug!(name = %name, "project name");
        Ok(name)
    }

    /// Size cell of the first project child row
    ///
    /// # Errors
    ///
    /// Fails when the row is collapsed or missing.
    pub async fn project_size(&self) -> ConducirResult<String> {
        let size = self.projects_size_cell.inner_text().await?;
        tracing::debug!(size = %size, "project size");
        Ok(size)
    }

    /// Kind cell of the first project child row
    ///
    /// # Errors
    ///
    /// Fails when the row is collapsed or missing.
    pub async fn project_kind(&self) -> ConducirResult<String> {
        let kind = self.projects_kind_cell.inner_text().await?;
        tracing::debug!(kind = %kind, "project kind");
        Ok(kind)
    }

    /// Expand the Reports row
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when the toggle cannot be driven.
    pub async fn toggle_reports_row(&self) -> ConducirResult<()> {
        self.reports_toggle
            .click()
            .await
            .map_err(|e| ConducirError::interaction("toggle reports row", e))
    }

    /// Expand the Other row
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when the toggle cannot be driven.
    pub async fn toggle_other_row(&self) -> ConducirResult<()> {
        self.other_toggle
            .click()
            .await
            .map_err(|e| ConducirError::interaction("toggle other row", e))
    }

    /// Type into the grid's search filter
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when the field cannot be driven.
    pub async fn search(&self, term: &str) -> ConducirResult<()> {
        self.search_field
            .fill(term)
            .await
            .map_err(|e| ConducirError::interaction("search tree grid", e))
    }
}
