//! Datepicker scenarios.

use crate::data::TestData;
use crate::fixture::FixtureContext;
use crate::pages::{DashboardPage, DatePickerPage, FormLayoutsPage};
use crate::result::{ConducirError, ConducirResult};
use crate::runner::{Scenario, ScenarioSuite};
use crate::suites::DASHBOARD_URL;

/// Scenarios covering the three datepickers
#[must_use]
pub fn suite() -> ScenarioSuite {
    let mut suite =
        ScenarioSuite::new("date picker").with_before_each(|ctx| Box::pin(preamble(ctx)));
    suite.add(Scenario::new("assert all datepicker titles", |ctx| {
        Box::pin(assert_all_titles(ctx))
    }));
    suite.add(Scenario::new("select date in common datepicker", |ctx| {
        Box::pin(select_common_date(ctx))
    }));
    suite.add(Scenario::new("select date range", |ctx| {
        Box::pin(select_date_range(ctx))
    }));
    suite.add(Scenario::new(
        "select date in min max datepicker",
        |ctx| Box::pin(select_min_max_date(ctx)),
    ));
    suite
}

async fn preamble(ctx: &FixtureContext) -> ConducirResult<()> {
    ctx.page().goto(DASHBOARD_URL).await?;
    let dashboard = ctx.page_object::<DashboardPage>().await?;
    dashboard.select_dark_theme().await?;
    let forms = ctx.page_object::<FormLayoutsPage>().await?;
    forms.open_forms_menu().await?;
    let picker = ctx.page_object::<DatePickerPage>().await?;
    picker.open_datepicker_menu().await?;
    Ok(())
}

async fn assert_all_titles(ctx: &FixtureContext) -> ConducirResult<()> {
    let picker = ctx.page_object::<DatePickerPage>().await?;
    check_title(picker.common_picker_title().await?, "Common Datepicker")?;
    check_title(picker.range_picker_title().await?, "Datepicker With Range")?;
    check_title(
        picker.min_max_picker_title().await?,
        "Datepicker With Disabled Min Max Values",
    )
}

fn check_title(actual: String, expected: &str) -> ConducirResult<()> {
    tracing::debug!(title = %actual, "datepicker card");
    if actual == expected {
        Ok(())
    } else {
        Err(ConducirError::assertion(expected, actual))
    }
}

async fn select_common_date(ctx: &FixtureContext) -> ConducirResult<()> {
    let data = TestData::get();
    let picker = ctx.page_object::<DatePickerPage>().await?;
    let selected = picker.select_common_date(data.common_date).await?;
    if selected.is_empty() {
        Err(ConducirError::assertion("a selected day cell", "no selection"))
    } else {
        Ok(())
    }
}

async fn select_date_range(ctx: &FixtureContext) -> ConducirResult<()> {
    let data = TestData::get();
    let picker = ctx.page_object::<DatePickerPage>().await?;
    picker
        .select_date_range(data.range_start_day, data.range_end_day)
        .await?;

    // both boundary cells must be visually marked
    for day in [data.range_start_day, data.range_end_day] {
        if !picker.range_day_selected(day).await? {
            return Err(ConducirError::assertion(
                format!("day {day} marked selected"),
                "unmarked cell",
            ));
        }
    }
    Ok(())
}

async fn select_min_max_date(ctx: &FixtureContext) -> ConducirResult<()> {
    let data = TestData::get();
    let picker = ctx.page_object::<DatePickerPage>().await?;
    picker.select_min_max_date(data.min_max_day).await
}
