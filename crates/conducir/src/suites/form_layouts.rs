//! Form Layouts scenarios.

use crate::data::TestData;
use crate::fixture::FixtureContext;
use crate::pages::{DashboardPage, DatePickerPage, FormLayoutsPage};
use crate::result::{ConducirError, ConducirResult};
use crate::runner::{Scenario, ScenarioSuite};
use crate::suites::DASHBOARD_URL;

/// Scenarios covering all five form layouts
#[must_use]
pub fn suite() -> ScenarioSuite {
    let mut suite =
        ScenarioSuite::new("form layouts").with_before_each(|ctx| Box::pin(preamble(ctx)));
    suite.add(Scenario::new("fill in inline form", |ctx| {
        Box::pin(fill_inline_form(ctx))
    }));
    suite.add(Scenario::new("fill in using grid form", |ctx| {
        Box::pin(fill_grid_form(ctx))
    }));
    suite.add(Scenario::new("fill in basic form", |ctx| {
        Box::pin(fill_basic_form(ctx))
    }));
    suite.add(Scenario::new("fill in without label form", |ctx| {
        Box::pin(fill_without_label_form(ctx))
    }));
    suite.add(Scenario::new("fill in block form", |ctx| {
        Box::pin(fill_block_form(ctx))
    }));
    suite.add(Scenario::new("extract datepicker title text", |ctx| {
        Box::pin(extract_title_text(ctx))
    }));
    suite
}

async fn preamble(ctx: &FixtureContext) -> ConducirResult<()> {
    ctx.page().goto(DASHBOARD_URL).await?;
    let dashboard = ctx.page_object::<DashboardPage>().await?;
    dashboard.select_dark_theme().await?;
    let forms = ctx.page_object::<FormLayoutsPage>().await?;
    forms.open_forms_menu().await?;
    forms.open_form_layouts().await?;
    Ok(())
}

async fn fill_inline_form(ctx: &FixtureContext) -> ConducirResult<()> {
    let data = TestData::get();
    let forms = ctx.page_object::<FormLayoutsPage>().await?;
    forms.fill_inline_form(data.user_name, data.email).await
}

async fn fill_grid_form(ctx: &FixtureContext) -> ConducirResult<()> {
    let data = TestData::get();
    let forms = ctx.page_object::<FormLayoutsPage>().await?;
    forms
        .fill_grid_form(data.secondary_email, data.password)
        .await
}

async fn fill_basic_form(ctx: &FixtureContext) -> ConducirResult<()> {
    let data = TestData::get();
    let forms = ctx.page_object::<FormLayoutsPage>().await?;
    forms
        .fill_basic_form(data.basic_email, data.basic_password)
        .await
}

async fn fill_without_label_form(ctx: &FixtureContext) -> ConducirResult<()> {
    let data = TestData::get();
    let forms = ctx.page_object::<FormLayoutsPage>().await?;
    forms
        .fill_without_label_form(data.recipients, data.subject, data.message)
        .await
}

async fn fill_block_form(ctx: &FixtureContext) -> ConducirResult<()> {
    let data = TestData::get();
    let forms = ctx.page_object::<FormLayoutsPage>().await?;
    forms
        .fill_block_form(data.first_name, data.last_name, data.block_email, data.website)
        .await?;
    if forms.block_form_submitted().await? {
        Ok(())
    } else {
        Err(ConducirError::assertion(
            "block form submitted",
            "form still pristine",
        ))
    }
}

async fn extract_title_text(ctx: &FixtureContext) -> ConducirResult<()> {
    let picker = ctx.page_object::<DatePickerPage>().await?;
    picker.open_datepicker_menu().await?;
    let title = picker.common_picker_title().await?;
    tracing::debug!(title = %title, "datepicker card");
    if title == "Common Datepicker" {
        Ok(())
    } else {
        Err(ConducirError::assertion("Common Datepicker", title))
    }
}
