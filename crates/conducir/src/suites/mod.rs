//! Scenario suites driving the demo playground.
//!
//! Each suite mirrors one user journey: a shared preamble brings the page
//! into position, then scenarios request page objects from the fixture scope
//! and drive them. Suites never manipulate locators directly.

mod date_picker;
mod form_layouts;
mod health_check;
mod tree_grid;

pub use date_picker::suite as date_picker_suite;
pub use form_layouts::suite as form_layouts_suite;
pub use health_check::suite as health_check_suite;
pub use tree_grid::suite as tree_grid_suite;

use futures::future::BoxFuture;

use crate::fixture::{FixtureContext, FixtureRegistry};
use crate::pages::{DashboardPage, DatePickerPage, FormLayoutsPage, TreeGridPage};
use crate::result::ConducirResult;
use crate::runner::ScenarioSuite;

/// The playground's dashboard entry route
pub(crate) const DASHBOARD_URL: &str = "/pages/iot-dashboard";

/// Registry with every page object the suites request, plus the
/// cross-cutting diagnostics hook applied to all scenarios
#[must_use]
pub fn registry() -> FixtureRegistry {
    let mut registry = FixtureRegistry::new();
    registry.register_page::<DashboardPage>();
    registry.register_page::<FormLayoutsPage>();
    registry.register_page::<DatePickerPage>();
    registry.register_page::<TreeGridPage>();
    registry.add_hook("announce-scenario", |ctx| Box::pin(announce(ctx)));
    registry
}

/// Every suite, in the order CI runs them
#[must_use]
pub fn all() -> Vec<ScenarioSuite> {
    vec![
        form_layouts_suite(),
        date_picker_suite(),
        tree_grid_suite(),
        health_check_suite(),
    ]
}

fn announce(ctx: &FixtureContext) -> BoxFuture<'_, ConducirResult<()>> {
    Box::pin(async move {
        tracing::info!(scenario = ctx.scenario(), "starting scenario");
        Ok(())
    })
}
