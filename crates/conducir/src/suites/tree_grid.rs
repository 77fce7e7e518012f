//! Tree Grid scenarios.

use crate::fixture::FixtureContext;
use crate::pages::{DashboardPage, TreeGridPage};
use crate::result::{ConducirError, ConducirResult};
use crate::runner::{Scenario, ScenarioSuite};

const TREE_GRID_URL: &str = "/pages/tables/tree-grid";

/// Scenarios covering the tree grid table
#[must_use]
pub fn suite() -> ScenarioSuite {
    let mut suite =
        ScenarioSuite::new("tree grid").with_before_each(|ctx| Box::pin(preamble(ctx)));
    suite.add(Scenario::new(
        "expand projects row and read project cells",
        |ctx| Box::pin(read_project_cells(ctx)),
    ));
    suite
}

async fn preamble(ctx: &FixtureContext) -> ConducirResult<()> {
    ctx.page().goto(TREE_GRID_URL).await?;
    let dashboard = ctx.page_object::<DashboardPage>().await?;
    dashboard.select_dark_theme().await?;
    Ok(())
}

async fn read_project_cells(ctx: &FixtureContext) -> ConducirResult<()> {
    let grid = ctx.page_object::<TreeGridPage>().await?;
    grid.expand_projects_row().await?;

    let name = grid.project_name().await?;
    if name != "project-1.doc" {
        return Err(ConducirError::assertion("project-1.doc", name));
    }
    let size = grid.project_size().await?;
    if size.is_empty() {
        return Err(ConducirError::assertion("a size cell", "empty cell"));
    }
    let kind = grid.project_kind().await?;
    if kind.is_empty() {
        return Err(ConducirError::assertion("a kind cell", "empty cell"));
    }
    Ok(())
}
