//! The Form Layouts screen: five forms, several of them structurally
//! identical, which is why the positional indices below are deliberate.

use crate::locator::{expect, AriaRole, Locator};
use crate::page::PageHandle;
use crate::page_object::PageObject;
use crate::result::{ConducirError, ConducirResult};

/// The Forms / Form Layouts screen
#[derive(Debug)]
pub struct FormLayoutsPage {
    forms_menu: Locator,
    form_layouts_menu: Locator,
    inline_form_title: Locator,

    // inline form //
    name_input: Locator,
    email_input: Locator,
    inline_checkbox: Locator,
    inline_submit: Locator,

    // using the grid //
    grid_email: Locator,
    grid_password: Locator,
    grid_option_one: Locator,
    grid_sign_in: Locator,

    // basic form //
    basic_email: Locator,
    basic_password: Locator,
    basic_checkbox: Locator,
    basic_submit: Locator,

    // form without labels //
    recipients: Locator,
    subject: Locator,
    message: Locator,
    send_button: Locator,

    // block form //
    first_name: Locator,
    last_name: Locator,
    block_email: Locator,
    website: Locator,
    block_submit: Locator,
    block_form: Locator,
}

impl PageObject for FormLayoutsPage {
    const NAME: &'static str = "form-layouts";

    fn bind(page: &PageHandle) -> Self {
        Self {
            forms_menu: page.by_role(AriaRole::Link, "Forms"),
            form_layouts_menu: page.by_role(AriaRole::Link, "Form Layouts"),
            inline_form_title: page.by_path("//nb-card-header[text()='Inline form']"),

            // inline form //
            name_input: page.by_role(AriaRole::Textbox, "Jane Doe"),
            email_input: page.by_path_nth("//input[@placeholder='Email']", 1),
            inline_checkbox: page.by_path_nth("//span[@class='custom-checkbox']", 1),
            inline_submit: page.by_path_nth("//button[@status='primary' and @type='submit']", 1),

            // using the grid //
            grid_email: page.by_path("//input[@id='inputEmail1']"),
            grid_password: page.by_path("//input[@id='inputPassword2']"),
            grid_option_one: page.by_path("//span[contains(text(), 'Option 1')]"),
            grid_sign_in: page.by_path_nth("//button[@status='primary' and @type='submit']", 2),

            // basic form //
            basic_email: page.by_path("//input[@id='exampleInputEmail1']"),
            basic_password: page.by_path("//input[@id='exampleInputPassword1']"),
            basic_checkbox: page.by_path("//span[text()='Check me out']"),
            basic_submit: page.by_path("//button[@status='danger' and @type='submit']"),

            // form without labels //
            recipients: page.by_role(AriaRole::Textbox, "Recipients"),
            subject: page.by_role(AriaRole::Textbox, "Subject"),
            message: page.by_role(AriaRole::Textbox, "Message"),
            send_button: page.by_role(AriaRole::Button, "SEND"),

            // block form //
            first_name: page.by_role(AriaRole::Textbox, "First Name"),
            last_name: page.by_role(AriaRole::Textbox, "Last Name"),
            block_email: page.by_path_nth("//input[@placeholder='Email']", 4),
            website: page.by_role(AriaRole::Textbox, "Website"),
            block_submit: page.by_path_nth("//button[@type='submit']", 5),
            block_form: page.by_path_nth("//form", 5),
        }
    }
}

impl FormLayoutsPage {
    /// Expand the Forms group in the side menu
    ///
    /// # Errors
    ///
    /// Fails with a navigation error when the group does not expand.
    pub async fn open_forms_menu(&self) -> ConducirResult<()> {
        self.forms_menu
            .click()
            .await
            .map_err(|e| ConducirError::interaction("open forms menu", e))?;
        expect(&self.form_layouts_menu)
            .to_be_visible()
            .await
            .map_err(|e| ConducirError::Navigation {
                destination: "Forms menu".to_string(),
                message: e.to_string(),
            })
    }

    /// Navigate to the Form Layouts screen
    ///
    /// # Errors
    ///
    /// Fails with a navigation error when the screen is not reached.
    pub async fn open_form_layouts(&self) -> ConducirResult<()> {
        self.form_layouts_menu
            .click()
            .await
            .map_err(|e| ConducirError::interaction("open form layouts", e))?;
        expect(&self.inline_form_title)
            .to_be_visible()
            .await
            .map_err(|e| ConducirError::Navigation {
                destination: "Form Layouts".to_string(),
                message: e.to_string(),
            })
    }

    /// Fill and submit the inline form
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when any sub-step cannot complete.
    pub async fn fill_inline_form(&self, name: &str, email: &str) -> ConducirResult<()> {
        const OP: &str = "fill inline form";
        let wrap = |e| ConducirError::interaction(OP, e);
        self.name_input.fill(name).await.map_err(wrap)?;
        self.email_input.fill(email).await.map_err(wrap)?;
        self.inline_checkbox.click().await.map_err(wrap)?;
        self.inline_submit.click().await.map_err(wrap)?;
        Ok(())
    }

    /// Fill and submit the grid form
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when any sub-step cannot complete.
    pub async fn fill_grid_form(&self, email: &str, password: &str) -> ConducirResult<()> {
        const OP: &str = "fill grid form";
        let wrap = |e| ConducirError::interaction(OP, e);
        self.grid_email.fill(email).await.map_err(wrap)?;
        self.grid_password.fill(password).await.map_err(wrap)?;
        self.grid_option_one.scroll_into_view().await.map_err(wrap)?;
        self.grid_option_one.click().await.map_err(wrap)?;
        self.grid_sign_in.click().await.map_err(wrap)?;
        Ok(())
    }

    /// Fill and submit the basic form
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when any sub-step cannot complete.
    pub async fn fill_basic_form(&self, email: &str, password: &str) -> ConducirResult<()> {
        const OP: &str = "fill basic form";
        let wrap = |e| ConducirError::interaction(OP, e);
        self.basic_email.fill(email).await.map_err(wrap)?;
        self.basic_password.fill(password).await.map_err(wrap)?;
        self.basic_checkbox.click().await.map_err(wrap)?;
        self.basic_submit.click().await.map_err(wrap)?;
        Ok(())
    }

    /// Fill and submit the form without labels
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when any sub-step cannot complete.
    pub async fn fill_without_label_form(
        &self,
        recipients: &str,
        subject: &str,
        message: &str,
    ) -> ConducirResult<()> {
        const OP: &str = "fill without-label form";
        let wrap = |e| ConducirError::interaction(OP, e);
        self.send_button.scroll_into_view().await.map_err(wrap)?;
        self.recipients.fill(recipients).await.map_err(wrap)?;
        self.subject.fill(subject).await.map_err(wrap)?;
        self.message.fill(message).await.map_err(wrap)?;
        self.send_button.click().await.map_err(wrap)?;
        Ok(())
    }

    /// Fill and submit the block form
    ///
    /// # Errors
    ///
    /// Fails with an interaction error when any sub-step cannot complete.
    pub async fn fill_block_form(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        website: &str,
    ) -> ConducirResult<()> {
        const OP: &str = "fill block form";
        let wrap = |e| ConducirError::interaction(OP, e);
        self.first_name.fill(first_name).await.map_err(wrap)?;
        self.last_name.fill(last_name).await.map_err(wrap)?;
        self.block_email.fill(email).await.map_err(wrap)?;
        self.website.fill(website).await.map_err(wrap)?;
        self.block_submit.click().await.map_err(wrap)?;
        Ok(())
    }

    /// Whether the block form has been submitted
    ///
    /// # Errors
    ///
    /// Fails when the form cannot be read.
    pub async fn block_form_submitted(&self) -> ConducirResult<bool> {
        let classes = self.block_form.attribute("class").await?;
        Ok(classes.is_some_and(|c| c.contains("ng-submitted")))
    }
}
