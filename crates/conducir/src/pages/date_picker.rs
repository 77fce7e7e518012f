//! The Datepicker screen: three pickers with different calendars.
//!
//! The day-cell locators are built inside the operations because their
//! structural paths are parameterized by the requested day. Selecting a day
//! the calendar does not offer is a resolution failure, never a silent no-op.

use crate::locator::{expect, AriaRole, Locator};
use crate::page::PageHandle;
use crate::page_object::PageObject;
use crate::result::{ConducirError, ConducirResult};

/// The Forms / Datepicker screen
#[derive(Debug)]
pub struct DatePickerPage {
    page: PageHandle,
    datepicker_menu: Locator,

    // common date picker //
    common_title: Locator,
    common_input: Locator,
    common_selected_cell: Locator,

    // date picker with range //
    range_title: Locator,
    range_input: Locator,

    // date picker with disabled min max values //
    min_max_title: Locator,
    min_max_input: Locator,
}

impl PageObject for DatePickerPage {
    const NAME: &'static str = "date-picker";

    fn bind(page: &PageHandle) -> Self {
        Self {
            page: page.clone(),
            datepicker_menu: page.by_role(AriaRole::Link, "Datepicker"),

            // common date picker //
            common_title: page.by_path("//nb-card-header[text()='Common Datepicker']"),
            common_input: page.by_role(AriaRole::Textbox, "Form Picker"),
            common_selected_cell: page
                .by_path("//nb-calendar-day-cell[contains(@class, 'selected day-cell')]"),

            // date picker with range //
            range_title: page.by_path("//nb-card-header[text()='Datepicker With Range']"),
            range_input: page.by_placeholder("Range Picker"),

            // date picker with disabled min max values //
            min_max_title: page
                .by_path("//nb-card-header[text()='Datepicker With Disabled Min Max Values']"),
            min_max_input: page.by_role(AriaRole::Textbox, "Min Max Picker"),
        }
    }
}

impl DatePickerPage {
    /// Navigate to the Datepicker screen
    ///
    /// # Errors
    ///
    /// Fails with a navigation error when the screen is not reached.
    pub async fn open_datepicker_menu(&self) -> ConducirResult<()> {
        self.datepicker_menu
            .click()
            .await
            .map_err(|e| ConducirError::interaction("open datepicker menu", e))?;
        expect(&self.common_title)
            .to_be_visible()
            .await
            .map_err(|e| ConducirError::Navigation {
                destination: "Datepicker".to_string(),
                message: e.to_string(),
            })
    }

    /// Title of the common picker card
    ///
    /// # Errors
    ///
    /// Fails when the card header cannot be read.
    pub async fn common_picker_title(&self) -> ConducirResult<String> {
        self.common_title.inner_text().await
    }

    /// Title of the range picker card
    ///
    /// # Errors
    ///
    /// Fails when the card header cannot be read.
    pub async fn range_picker_title(&self) -> ConducirResult<String> {
        self.range_title.inner_text().await
    }

    /// Title of the min/max picker card
    ///
    /// # Errors
    ///
    /// Fails when the card header cannot be read.
    pub async fn min_max_picker_title(&self) -> ConducirResult<String> {
        self.min_max_title.inner_text().await
    }

    /// Type a date into the common picker and click the selected day cell.
    /// Returns the selected cell's text.
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when the calendar never marks a day.
    pub async fn select_common_date(&self, date: &str) -> ConducirResult<String> {
        const OP: &str = "select common date";
        let wrap = |e| ConducirError::interaction(OP, e);
        self.common_input.fill(date).await.map_err(wrap)?;
        let selected = self.common_selected_cell.inner_text().await.map_err(wrap)?;
        tracing::debug!(selected = %selected, "common date");
        self.common_selected_cell.click().await.map_err(wrap)?;
        Ok(selected)
    }

    /// Select a start and end day on the range picker
    ///
    /// # Errors
    ///
    /// Fails with an interaction error; a day the calendar does not offer
    /// surfaces as a missing-element cause.
    pub async fn select_date_range(&self, start_day: &str, end_day: &str) -> ConducirResult<()> {
        const OP: &str = "select date range";
        let wrap = |e| ConducirError::interaction(OP, e);
        self.range_input.click().await.map_err(wrap)?;
        self.range_day_cell(start_day).click().await.map_err(wrap)?;
        tracing::debug!(day = start_day, "range start");
        self.range_day_cell(end_day).click().await.map_err(wrap)?;
        tracing::debug!(day = end_day, "range end");
        Ok(())
    }

    /// Whether a range day cell is visually marked selected
    ///
    /// # Errors
    ///
    /// Fails when the calendar cannot be queried.
    pub async fn range_day_selected(&self, day: &str) -> ConducirResult<bool> {
        let marked = self.page.by_path(format!(
            "//nb-calendar-range-day-cell[contains(@class, 'selected')]//div[text()='{day}']"
        ));
        Ok(marked.count().await? > 0)
    }

    /// Select a day on the picker with disabled min/max values
    ///
    /// # Errors
    ///
    /// Fails with an interaction error; a day outside the enabled window
    /// surfaces as a missing-element cause.
    pub async fn select_min_max_date(&self, day: &str) -> ConducirResult<()> {
        const OP: &str = "select min max date";
        let wrap = |e| ConducirError::interaction(OP, e);
        self.min_max_input.click().await.map_err(wrap)?;
        self.min_max_day_cell(day).click().await.map_err(wrap)?;
        tracing::debug!(day, "min max date");
        Ok(())
    }

    fn range_day_cell(&self, day: &str) -> Locator {
        self.page.by_path(format!(
            "//nb-calendar-range-day-cell[contains(@class, 'range-cell day-cell ng')]//div[text()='{day}']"
        ))
    }

    fn min_max_day_cell(&self, day: &str) -> Locator {
        self.page.by_path(format!(
            "//nb-calendar-day-cell[contains(@class, 'day-cell ng-star-inserted')]//div[contains(text(),'{day}')]"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TestData;
    use crate::page::PageHandle;
    use crate::sim::sim_page;
    use crate::wait::WaitOptions;

    async fn on_datepicker() -> (PageHandle, DatePickerPage) {
        let (page, _driver) = sim_page();
        // short resolution timeout keeps the failure tests quick
        let page = page.with_options(WaitOptions::new().with_timeout(300));
        page.goto("/pages/iot-dashboard").await.unwrap();

        let forms = crate::pages::FormLayoutsPage::bind(&page);
        forms.open_forms_menu().await.unwrap();
        let picker = DatePickerPage::bind(&page);
        picker.open_datepicker_menu().await.unwrap();
        (page, picker)
    }

    #[tokio::test]
    async fn test_all_three_titles() {
        let (_page, picker) = on_datepicker().await;
        assert_eq!(
            picker.common_picker_title().await.unwrap(),
            "Common Datepicker"
        );
        assert_eq!(
            picker.range_picker_title().await.unwrap(),
            "Datepicker With Range"
        );
        assert_eq!(
            picker.min_max_picker_title().await.unwrap(),
            "Datepicker With Disabled Min Max Values"
        );
    }

    #[tokio::test]
    async fn test_select_common_date() {
        let (_page, picker) = on_datepicker().await;
        let data = TestData::get();
        let selected = picker.select_common_date(data.common_date).await.unwrap();
        assert_eq!(selected, "31");
    }

    #[tokio::test]
    async fn test_select_date_range_marks_both_bounds() {
        let (_page, picker) = on_datepicker().await;
        let data = TestData::get();

        picker
            .select_date_range(data.range_start_day, data.range_end_day)
            .await
            .unwrap();
        assert!(picker.range_day_selected("1").await.unwrap());
        assert!(picker.range_day_selected("31").await.unwrap());
        assert!(!picker.range_day_selected("15").await.unwrap());
    }

    #[tokio::test]
    async fn test_out_of_range_day_is_missing_not_a_noop() {
        let (_page, picker) = on_datepicker().await;

        let err = picker.select_date_range("1", "32").await.unwrap_err();
        assert!(err.is_element_not_found());
        // the failed attempt must not have marked an end bound
        assert!(!picker.range_day_selected("32").await.unwrap());
    }

    #[tokio::test]
    async fn test_min_max_window() {
        let (_page, picker) = on_datepicker().await;
        let data = TestData::get();

        picker.select_min_max_date(data.min_max_day).await.unwrap();

        // a day outside the enabled window never renders a cell
        let err = picker.select_min_max_date("12").await.unwrap_err();
        assert!(err.is_element_not_found());
    }
}
