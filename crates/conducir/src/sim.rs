//! Simulated playground engine.
//!
//! An in-memory rendition of the IoT-dashboard demo application implementing
//! the same engine-facing traits as a real browser. The page is rendered
//! immediate-mode from a small state machine: every driver call re-renders
//! the node list, so interactions observe exactly the state their clicks and
//! fills produced.
//!
//! The rendition deliberately keeps the demo app's awkward corners: repeated
//! widgets that force positional disambiguation (four inputs share the
//! `Email` placeholder), theme options behind a dropdown, calendar cells that
//! only exist while their picker is open, and tree-grid child rows that stay
//! in the document but invisible while collapsed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::driver::{Engine, PageDriver};
use crate::locator::{AriaRole, Strategy};
use crate::page::PageHandle;
use crate::result::{ConducirError, ConducirResult};

// =============================================================================
// STRUCTURAL PATH MATCHING
// =============================================================================

/// Predicate inside one path step
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pred {
    AttrEquals(String, String),
    TextEquals(String),
    TextContains(String),
    ClassContains(String),
}

/// One `//tag[preds]` step of a structural path
#[derive(Debug, Clone)]
struct Step {
    tag: String,
    preds: Vec<Pred>,
}

fn parse_quoted(s: &str) -> Option<String> {
    s.trim()
        .strip_prefix('\'')?
        .strip_suffix('\'')
        .map(str::to_string)
}

fn parse_clause(clause: &str) -> Option<Pred> {
    let clause = clause.trim();
    if let Some(rest) = clause.strip_prefix("contains(") {
        let rest = rest.strip_suffix(')')?;
        let (subject, value) = rest.split_once(',')?;
        let value = parse_quoted(value)?;
        return match subject.trim() {
            "text()" => Some(Pred::TextContains(value)),
            "@class" => Some(Pred::ClassContains(value)),
            _ => None,
        };
    }
    if let Some(rest) = clause.strip_prefix("text()=") {
        return Some(Pred::TextEquals(parse_quoted(rest)?));
    }
    if let Some(rest) = clause.strip_prefix('@') {
        let (name, value) = rest.split_once('=')?;
        return Some(Pred::AttrEquals(name.trim().to_string(), parse_quoted(value)?));
    }
    None
}

/// Parse the subset of XPath the suites use: one or two `//tag[pred and pred]`
/// steps. Anything else is rejected so typos surface as page errors instead
/// of silently matching nothing.
fn parse_path(xpath: &str) -> Option<Vec<Step>> {
    let mut steps = Vec::new();
    for segment in xpath.split("//").filter(|s| !s.is_empty()) {
        let (tag, preds) = match segment.find('[') {
            Some(open) => {
                let close = segment.rfind(']')?;
                let body = &segment[open + 1..close];
                let mut preds = Vec::new();
                for clause in body.split(" and ") {
                    preds.push(parse_clause(clause)?);
                }
                (&segment[..open], preds)
            }
            None => (segment, Vec::new()),
        };
        steps.push(Step {
            tag: tag.trim().to_string(),
            preds,
        });
    }
    if steps.is_empty() || steps.len() > 2 {
        return None;
    }
    Some(steps)
}

// =============================================================================
// RENDERED NODES
// =============================================================================

/// Parent element metadata, enough for two-step paths
#[derive(Debug, Clone)]
struct Parent {
    tag: &'static str,
    classes: String,
}

/// Transitions a click can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    None,
    OpenThemeMenu,
    ChooseTheme(&'static str),
    ToggleFormsMenu,
    Navigate(Route),
    ToggleCheckbox(usize),
    SelectRadio,
    SubmitForm(usize),
    OpenRangePicker,
    OpenMinMaxPicker,
    PickCommonDay(u8),
    PickRangeDay(u8),
    PickMinMaxDay(u8),
    ToggleTreeRow(usize),
}

/// Fillable fields of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    InlineName,
    InlineEmail,
    GridEmail,
    GridPassword,
    Recipients,
    Subject,
    Message,
    BasicEmail,
    BasicPassword,
    FirstName,
    LastName,
    BlockEmail,
    Website,
    CommonPicker,
    Search,
}

/// One rendered element
#[derive(Debug, Clone)]
struct Node {
    tag: &'static str,
    classes: String,
    attrs: Vec<(&'static str, String)>,
    text: String,
    visible: bool,
    parent: Option<Parent>,
    click: Effect,
    fill: Option<Field>,
}

impl Node {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: String::new(),
            attrs: Vec::new(),
            text: String::new(),
            visible: true,
            parent: None,
            click: Effect::None,
            fill: None,
        }
    }

    fn class(mut self, classes: impl Into<String>) -> Self {
        self.classes = classes.into();
        self
    }

    fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    fn parent(mut self, tag: &'static str, classes: impl Into<String>) -> Self {
        self.parent = Some(Parent {
            tag,
            classes: classes.into(),
        });
        self
    }

    fn click(mut self, effect: Effect) -> Self {
        self.click = effect;
        self
    }

    fn fill(mut self, field: Field) -> Self {
        self.fill = Some(field);
        self
    }

    fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            return Some(self.classes.clone());
        }
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
    }

    fn implicit_role(&self) -> Option<AriaRole> {
        match self.tag {
            "a" => Some(AriaRole::Link),
            "button" => Some(AriaRole::Button),
            "input" | "textarea" => Some(AriaRole::Textbox),
            _ => None,
        }
    }

    fn accessible_name(&self) -> String {
        if let Some(label) = self.attribute("aria-label") {
            return label;
        }
        if let Some(placeholder) = self.attribute("placeholder") {
            return placeholder;
        }
        self.text.trim().to_string()
    }

    fn matches_step(&self, step: &Step) -> bool {
        if step.tag != "*" && step.tag != self.tag {
            return false;
        }
        step.preds.iter().all(|pred| match pred {
            Pred::AttrEquals(name, value) => self.attribute(name).as_deref() == Some(value),
            Pred::TextEquals(value) => self.text == *value,
            Pred::TextContains(value) => self.text.contains(value),
            Pred::ClassContains(value) => self.classes.contains(value.as_str()),
        })
    }

    fn parent_matches(&self, step: &Step) -> bool {
        let Some(parent) = &self.parent else {
            return false;
        };
        if step.tag != "*" && step.tag != parent.tag {
            return false;
        }
        step.preds.iter().all(|pred| match pred {
            Pred::ClassContains(value) => parent.classes.contains(value.as_str()),
            Pred::AttrEquals(name, value) => name == "class" && parent.classes == *value,
            Pred::TextEquals(_) | Pred::TextContains(_) => false,
        })
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Screens of the demo app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Route {
    #[default]
    Dashboard,
    FormLayouts,
    Datepicker,
    TreeGrid,
}

/// The demo application's state machine
#[derive(Debug, Default)]
struct App {
    url: String,
    route: Route,
    theme: &'static str,
    theme_menu_open: bool,
    forms_expanded: bool,
    values: HashMap<Field, String>,
    checkboxes: [bool; 2],
    radio_selected: bool,
    submitted: [bool; 5],
    common_open: bool,
    common_selected: Option<u8>,
    range_open: bool,
    range_start: Option<u8>,
    range_end: Option<u8>,
    min_max_open: bool,
    min_max_selected: Option<u8>,
    tree_expanded: [bool; 3],
}

impl App {
    fn fresh(url: &str) -> Self {
        let route = if url.contains("tables/tree-grid") {
            Route::TreeGrid
        } else if url.contains("forms/layouts") {
            Route::FormLayouts
        } else if url.contains("forms/datepicker") {
            Route::Datepicker
        } else {
            Route::Dashboard
        };
        Self {
            url: url.to_string(),
            route,
            theme: "Light",
            ..Self::default()
        }
    }

    fn navigate(&mut self, route: Route) {
        self.route = route;
        self.theme_menu_open = false;
        self.common_open = false;
        self.range_open = false;
        self.min_max_open = false;
        self.url = match route {
            Route::Dashboard => "/pages/iot-dashboard".to_string(),
            Route::FormLayouts => "/pages/forms/layouts".to_string(),
            Route::Datepicker => "/pages/forms/datepicker".to_string(),
            Route::TreeGrid => "/pages/tables/tree-grid".to_string(),
        };
    }

    fn apply_click(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::OpenThemeMenu => self.theme_menu_open = !self.theme_menu_open,
            Effect::ChooseTheme(theme) => {
                self.theme = theme.trim_start_matches(' ');
                self.theme_menu_open = false;
            }
            Effect::ToggleFormsMenu => self.forms_expanded = !self.forms_expanded,
            Effect::Navigate(route) => self.navigate(route),
            Effect::ToggleCheckbox(i) => self.checkboxes[i] = !self.checkboxes[i],
            Effect::SelectRadio => self.radio_selected = true,
            Effect::SubmitForm(i) => self.submitted[i] = true,
            Effect::OpenRangePicker => {
                self.range_open = true;
                self.common_open = false;
                self.min_max_open = false;
            }
            Effect::OpenMinMaxPicker => {
                self.min_max_open = true;
                self.common_open = false;
                self.range_open = false;
            }
            Effect::PickCommonDay(day) => self.common_selected = Some(day),
            Effect::PickRangeDay(day) => {
                if self.range_start.is_none() {
                    self.range_start = Some(day);
                } else if self.range_end.is_none() {
                    self.range_end = Some(day);
                } else {
                    self.range_start = Some(day);
                    self.range_end = None;
                }
            }
            Effect::PickMinMaxDay(day) => self.min_max_selected = Some(day),
            Effect::ToggleTreeRow(i) => self.tree_expanded[i] = !self.tree_expanded[i],
        }
    }

    fn apply_fill(&mut self, field: Field, text: &str) {
        let _ = self.values.insert(field, text.to_string());
        if field == Field::CommonPicker {
            self.common_open = true;
            self.range_open = false;
            self.min_max_open = false;
            self.common_selected = parse_day(text);
        }
    }

    // ------------------------------------------------------------------
    // rendering
    // ------------------------------------------------------------------

    fn render(&self) -> Vec<Node> {
        let mut nodes = Vec::new();
        self.render_chrome(&mut nodes);
        match self.route {
            Route::Dashboard => {}
            Route::FormLayouts => self.render_form_layouts(&mut nodes),
            Route::Datepicker => self.render_datepicker(&mut nodes),
            Route::TreeGrid => self.render_tree_grid(&mut nodes),
        }
        nodes
    }

    fn render_chrome(&self, nodes: &mut Vec<Node>) {
        // sidebar
        nodes.push(
            Node::new("a")
                .text("IoT Dashboard")
                .click(Effect::Navigate(Route::Dashboard)),
        );
        nodes.push(Node::new("a").text("Forms").click(Effect::ToggleFormsMenu));
        nodes.push(
            Node::new("a")
                .text("Form Layouts")
                .visible(self.forms_expanded)
                .click(Effect::Navigate(Route::FormLayouts)),
        );
        nodes.push(
            Node::new("a")
                .text("Datepicker")
                .visible(self.forms_expanded)
                .click(Effect::Navigate(Route::Datepicker)),
        );

        // header selects: the theme dropdown is the first of several
        // structurally identical select buttons
        nodes.push(
            Node::new("button")
                .class("select-button")
                .text(self.theme)
                .click(Effect::OpenThemeMenu),
        );
        nodes.push(Node::new("button").class("select-button").text("Management"));
        for theme in [" Light", " Dark", " Cosmic", " Corporate"] {
            nodes.push(
                Node::new("nb-option")
                    .text(theme)
                    .visible(self.theme_menu_open)
                    .click(Effect::ChooseTheme(theme)),
            );
        }
    }

    fn value(&self, field: Field) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    fn input(&self, field: Field, placeholder: &'static str) -> Node {
        Node::new("input")
            .attr("placeholder", placeholder)
            .attr("value", self.value(field))
            .fill(field)
    }

    fn form_class(&self, index: usize) -> String {
        if self.submitted[index] {
            "ng-pristine ng-valid ng-submitted".to_string()
        } else {
            "ng-pristine ng-valid".to_string()
        }
    }

    fn render_form_layouts(&self, nodes: &mut Vec<Node>) {
        // inline form
        nodes.push(Node::new("nb-card-header").text("Inline form"));
        nodes.push(Node::new("form").class(self.form_class(0)));
        nodes.push(self.input(Field::InlineName, "Jane Doe"));
        nodes.push(self.input(Field::InlineEmail, "Email"));
        nodes.push(
            Node::new("span")
                .class("custom-checkbox")
                .click(Effect::ToggleCheckbox(0)),
        );
        nodes.push(
            Node::new("button")
                .attr("status", "primary")
                .attr("type", "submit")
                .text("Submit")
                .click(Effect::SubmitForm(0)),
        );

        // using the grid
        nodes.push(Node::new("nb-card-header").text("Using the Grid"));
        nodes.push(Node::new("form").class(self.form_class(1)));
        nodes.push(
            self.input(Field::GridEmail, "Email")
                .attr("id", "inputEmail1"),
        );
        nodes.push(
            self.input(Field::GridPassword, "Password")
                .attr("id", "inputPassword2"),
        );
        nodes.push(Node::new("span").text("Option 1").click(Effect::SelectRadio));
        nodes.push(Node::new("span").text("Option 2"));
        nodes.push(
            Node::new("button")
                .attr("status", "primary")
                .attr("type", "submit")
                .text("Sign in")
                .click(Effect::SubmitForm(1)),
        );

        // form without labels
        nodes.push(Node::new("nb-card-header").text("Form without labels"));
        nodes.push(Node::new("form").class(self.form_class(2)));
        nodes.push(self.input(Field::Recipients, "Recipients"));
        nodes.push(self.input(Field::Subject, "Subject"));
        nodes.push({
            let mut message = self.input(Field::Message, "Message");
            message.tag = "textarea";
            message
        });
        nodes.push(
            Node::new("button")
                .attr("status", "primary")
                .attr("type", "submit")
                .text("SEND")
                .click(Effect::SubmitForm(2)),
        );

        // basic form
        nodes.push(Node::new("nb-card-header").text("Basic form"));
        nodes.push(Node::new("form").class(self.form_class(3)));
        nodes.push(
            self.input(Field::BasicEmail, "Email")
                .attr("id", "exampleInputEmail1"),
        );
        nodes.push(
            self.input(Field::BasicPassword, "Password")
                .attr("id", "exampleInputPassword1"),
        );
        nodes.push(
            Node::new("span")
                .class("custom-checkbox")
                .text("Check me out")
                .click(Effect::ToggleCheckbox(1)),
        );
        nodes.push(
            Node::new("button")
                .attr("status", "danger")
                .attr("type", "submit")
                .text("Submit")
                .click(Effect::SubmitForm(3)),
        );

        // block form
        nodes.push(Node::new("nb-card-header").text("Block form"));
        nodes.push(Node::new("form").class(self.form_class(4)));
        nodes.push(self.input(Field::FirstName, "First Name"));
        nodes.push(self.input(Field::LastName, "Last Name"));
        nodes.push(self.input(Field::BlockEmail, "Email"));
        nodes.push(self.input(Field::Website, "Website"));
        nodes.push(
            Node::new("button")
                .attr("status", "primary")
                .attr("type", "submit")
                .text("Submit")
                .click(Effect::SubmitForm(4)),
        );
    }

    fn render_datepicker(&self, nodes: &mut Vec<Node>) {
        nodes.push(Node::new("nb-card-header").text("Common Datepicker"));
        nodes.push(self.input(Field::CommonPicker, "Form Picker"));
        if self.common_open {
            for day in 1..=31_u8 {
                let selected = self.common_selected == Some(day);
                let classes = if selected {
                    "selected day-cell ng-star-inserted"
                } else {
                    "day-cell ng-star-inserted"
                };
                nodes.push(
                    Node::new("nb-calendar-day-cell")
                        .class(classes)
                        .text(day.to_string())
                        .click(Effect::PickCommonDay(day)),
                );
            }
        }

        nodes.push(Node::new("nb-card-header").text("Datepicker With Range"));
        nodes.push(
            Node::new("input")
                .attr("placeholder", "Range Picker")
                .click(Effect::OpenRangePicker),
        );
        if self.range_open {
            for day in 1..=31_u8 {
                let mut classes = String::new();
                if self.range_start == Some(day) {
                    classes.push_str("selected start ");
                }
                if self.range_end == Some(day) {
                    classes.push_str("selected end ");
                }
                classes.push_str("range-cell day-cell ng-star-inserted");
                nodes.push(
                    Node::new("nb-calendar-range-day-cell")
                        .class(classes.clone())
                        .text(day.to_string())
                        .click(Effect::PickRangeDay(day)),
                );
                nodes.push(
                    Node::new("div")
                        .text(day.to_string())
                        .parent("nb-calendar-range-day-cell", classes)
                        .click(Effect::PickRangeDay(day)),
                );
            }
        }

        nodes.push(Node::new("nb-card-header").text("Datepicker With Disabled Min Max Values"));
        nodes.push(
            Node::new("input")
                .attr("placeholder", "Min Max Picker")
                .click(Effect::OpenMinMaxPicker),
        );
        if self.min_max_open {
            // only the enabled window between min and max renders day cells
            for day in 25..=31_u8 {
                let mut classes = String::new();
                if self.min_max_selected == Some(day) {
                    classes.push_str("selected ");
                }
                classes.push_str("day-cell ng-star-inserted");
                nodes.push(
                    Node::new("nb-calendar-day-cell")
                        .class(classes.clone())
                        .text(day.to_string())
                        .click(Effect::PickMinMaxDay(day)),
                );
                nodes.push(
                    Node::new("div")
                        .text(day.to_string())
                        .parent("nb-calendar-day-cell", classes)
                        .click(Effect::PickMinMaxDay(day)),
                );
            }
        }
    }

    fn render_tree_grid(&self, nodes: &mut Vec<Node>) {
        nodes.push(self.input(Field::Search, "Search"));

        let rows: [(&str, &str, &str); 3] = [
            ("Projects", "", "dir"),
            ("Reports", "", "dir"),
            ("Other", "", "dir"),
        ];
        for (i, (name, size, kind)) in rows.iter().enumerate() {
            nodes.push(
                Node::new("button")
                    .attr("aria-label", "Toggle Expand/Collapse")
                    .parent("nb-tree-grid-row", "")
                    .click(Effect::ToggleTreeRow(i)),
            );
            nodes.push(Node::new("td").attr("role", "gridcell").text(*name));
            nodes.push(Node::new("td").attr("role", "gridcell").text(*size));
            nodes.push(Node::new("td").attr("role", "gridcell").text(*kind));

            // child rows stay in the document while collapsed, just hidden
            if i == 0 {
                let expanded = self.tree_expanded[0];
                for cell in ["project-1.doc", "1.8 MB", "doc"] {
                    nodes.push(
                        Node::new("td")
                            .attr("role", "gridcell")
                            .text(cell)
                            .visible(expanded),
                    );
                }
            }
        }
    }
}

fn parse_day(text: &str) -> Option<u8> {
    text.split(|c: char| c == ' ' || c == ',')
        .filter(|token| !token.is_empty())
        .find_map(|token| token.parse::<u8>().ok())
        .filter(|day| (1..=31).contains(day))
}

// =============================================================================
// DRIVER AND ENGINE
// =============================================================================

/// Driver over one simulated page
#[derive(Debug)]
pub struct SimDriver {
    app: Mutex<App>,
    queries: AtomicUsize,
    closed: AtomicBool,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a driver over a blank page
    #[must_use]
    pub fn new() -> Self {
        Self {
            app: Mutex::new(App::fresh("about:blank")),
            queries: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of driver calls made so far; locator binding must not move it
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn guard(&self) -> ConducirResult<MutexGuard<'_, App>> {
        let _ = self.queries.fetch_add(1, Ordering::SeqCst);
        if self.closed.load(Ordering::SeqCst) {
            return Err(ConducirError::PageClosed);
        }
        Ok(self.app.lock().expect("sim state poisoned"))
    }

    fn matches(nodes: &[Node], strategy: &Strategy) -> ConducirResult<Vec<usize>> {
        match strategy {
            Strategy::Role { role, name } => Ok(nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| {
                    n.implicit_role() == Some(*role) && n.accessible_name() == name.trim()
                })
                .map(|(i, _)| i)
                .collect()),
            Strategy::Placeholder(placeholder) => Ok(nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.attribute("placeholder").as_deref() == Some(placeholder))
                .map(|(i, _)| i)
                .collect()),
            Strategy::Text(text) => Ok(nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.text == *text)
                .map(|(i, _)| i)
                .collect()),
            Strategy::Path { xpath, .. } => {
                let steps = parse_path(xpath).ok_or_else(|| ConducirError::PageError {
                    message: format!("unsupported structural path: {xpath}"),
                })?;
                Ok(nodes
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| match steps.as_slice() {
                        [only] => n.matches_step(only),
                        [parent, child] => n.matches_step(child) && n.parent_matches(parent),
                        _ => false,
                    })
                    .map(|(i, _)| i)
                    .collect())
            }
        }
    }

    fn nth<'a>(
        nodes: &'a [Node],
        strategy: &Strategy,
        index: usize,
    ) -> ConducirResult<&'a Node> {
        let matched = Self::matches(nodes, strategy)?;
        matched
            .get(index)
            .map(|i| &nodes[*i])
            .ok_or_else(|| ConducirError::PageError {
                message: format!("stale element: {strategy} has no match at index {index}"),
            })
    }
}

#[async_trait]
impl PageDriver for SimDriver {
    async fn goto(&self, url: &str) -> ConducirResult<()> {
        let mut app = self.guard()?;
        *app = App::fresh(url);
        Ok(())
    }

    async fn current_url(&self) -> ConducirResult<String> {
        Ok(self.guard()?.url.clone())
    }

    async fn count(&self, strategy: &Strategy) -> ConducirResult<usize> {
        let app = self.guard()?;
        Ok(Self::matches(&app.render(), strategy)?.len())
    }

    async fn is_visible(&self, strategy: &Strategy, index: usize) -> ConducirResult<bool> {
        let app = self.guard()?;
        let nodes = app.render();
        Ok(Self::nth(&nodes, strategy, index)?.visible)
    }

    async fn click(&self, strategy: &Strategy, index: usize) -> ConducirResult<()> {
        let mut app = self.guard()?;
        let effect = {
            let nodes = app.render();
            Self::nth(&nodes, strategy, index)?.click
        };
        app.apply_click(effect);
        Ok(())
    }

    async fn fill(&self, strategy: &Strategy, index: usize, text: &str) -> ConducirResult<()> {
        let mut app = self.guard()?;
        let field = {
            let nodes = app.render();
            Self::nth(&nodes, strategy, index)?.fill
        };
        match field {
            Some(field) => {
                app.apply_fill(field, text);
                Ok(())
            }
            None => Err(ConducirError::PageError {
                message: format!("{strategy} is not fillable"),
            }),
        }
    }

    async fn scroll_into_view(&self, strategy: &Strategy, index: usize) -> ConducirResult<()> {
        let app = self.guard()?;
        let nodes = app.render();
        let _ = Self::nth(&nodes, strategy, index)?;
        Ok(())
    }

    async fn read_text(&self, strategy: &Strategy, index: usize) -> ConducirResult<String> {
        let app = self.guard()?;
        let nodes = app.render();
        Ok(Self::nth(&nodes, strategy, index)?.text.clone())
    }

    async fn read_attribute(
        &self,
        strategy: &Strategy,
        index: usize,
        name: &str,
    ) -> ConducirResult<Option<String>> {
        let app = self.guard()?;
        let nodes = app.render();
        Ok(Self::nth(&nodes, strategy, index)?.attribute(name))
    }

    async fn screenshot(&self) -> ConducirResult<Vec<u8>> {
        let _guard = self.guard()?;
        Ok(Vec::new())
    }

    async fn close(&self) -> ConducirResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Engine handing out isolated simulated pages
#[derive(Debug, Default)]
pub struct SimEngine;

impl SimEngine {
    /// Create a simulated engine
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Engine for SimEngine {
    async fn new_page(&self) -> ConducirResult<PageHandle> {
        Ok(PageHandle::new(Arc::new(SimDriver::new())))
    }

    async fn shutdown(&self) -> ConducirResult<()> {
        Ok(())
    }
}

/// A fresh simulated page plus its driver, for direct inspection in tests
#[must_use]
pub fn sim_page() -> (PageHandle, Arc<SimDriver>) {
    let driver = Arc::new(SimDriver::new());
    (PageHandle::new(Arc::clone(&driver) as Arc<dyn PageDriver>), driver)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod path_parser_tests {
        use super::*;

        #[test]
        fn test_single_step_attr() {
            let steps = parse_path("//button[@class='select-button']").unwrap();
            assert_eq!(steps.len(), 1);
            assert_eq!(steps[0].tag, "button");
            assert_eq!(
                steps[0].preds[0],
                Pred::AttrEquals("class".to_string(), "select-button".to_string())
            );
        }

        #[test]
        fn test_conjunction() {
            let steps = parse_path("//button[@status='primary' and @type='submit']").unwrap();
            assert_eq!(steps[0].preds.len(), 2);
        }

        #[test]
        fn test_text_equals_preserves_whitespace() {
            let steps = parse_path("//nb-option[text()=' Dark']").unwrap();
            assert_eq!(steps[0].preds[0], Pred::TextEquals(" Dark".to_string()));
        }

        #[test]
        fn test_contains_text_and_class() {
            let steps =
                parse_path("//td[@role='gridcell' and contains(text(),'project-1.doc')]").unwrap();
            assert_eq!(steps[0].preds.len(), 2);

            let steps =
                parse_path("//nb-calendar-day-cell[contains(@class, 'selected day-cell')]")
                    .unwrap();
            assert_eq!(
                steps[0].preds[0],
                Pred::ClassContains("selected day-cell".to_string())
            );
        }

        #[test]
        fn test_two_step_path() {
            let steps = parse_path(
                "//nb-calendar-range-day-cell[contains(@class, 'range-cell day-cell ng')]//div[text()='1']",
            )
            .unwrap();
            assert_eq!(steps.len(), 2);
            assert_eq!(steps[1].tag, "div");
        }

        #[test]
        fn test_garbage_rejected() {
            assert!(parse_path("//div[following-sibling::span]").is_none());
            assert!(parse_path("").is_none());
        }
    }

    mod app_tests {
        use super::*;

        #[test]
        fn test_goto_selects_route() {
            assert_eq!(
                App::fresh("https://playground.bondaracademy.com/pages/iot-dashboard").route,
                Route::Dashboard
            );
            assert_eq!(
                App::fresh("https://playground.bondaracademy.com/pages/tables/tree-grid").route,
                Route::TreeGrid
            );
        }

        #[test]
        fn test_email_placeholder_is_structurally_repeated() {
            let app = App::fresh("/pages/forms/layouts");
            let nodes = app.render();
            let emails = SimDriver::matches(&nodes, &Strategy::placeholder("Email")).unwrap();
            assert_eq!(emails.len(), 4);
        }

        #[test]
        fn test_theme_options_hidden_until_dropdown_opens() {
            let mut app = App::fresh("/pages/iot-dashboard");
            let dark = Strategy::path("//nb-option[text()=' Dark']");

            let nodes = app.render();
            let matched = SimDriver::matches(&nodes, &dark).unwrap();
            assert_eq!(matched.len(), 1);
            assert!(!nodes[matched[0]].visible);

            app.apply_click(Effect::OpenThemeMenu);
            let nodes = app.render();
            let matched = SimDriver::matches(&nodes, &dark).unwrap();
            assert!(nodes[matched[0]].visible);
        }

        #[test]
        fn test_submit_marks_form() {
            let mut app = App::fresh("/pages/forms/layouts");
            app.apply_click(Effect::SubmitForm(4));
            let nodes = app.render();
            let forms = SimDriver::matches(&nodes, &Strategy::path("//form")).unwrap();
            assert_eq!(forms.len(), 5);
            assert!(nodes[forms[4]].classes.contains("ng-submitted"));
            assert!(!nodes[forms[0]].classes.contains("ng-submitted"));
        }

        #[test]
        fn test_collapsed_child_cells_are_invisible_but_present() {
            let mut app = App::fresh("/pages/tables/tree-grid");
            let name_cell =
                Strategy::path("//td[@role='gridcell' and contains(text(),'project-1.doc')]");

            let nodes = app.render();
            let matched = SimDriver::matches(&nodes, &name_cell).unwrap();
            assert_eq!(matched.len(), 1);
            assert!(!nodes[matched[0]].visible);

            app.apply_click(Effect::ToggleTreeRow(0));
            let nodes = app.render();
            let matched = SimDriver::matches(&nodes, &name_cell).unwrap();
            assert!(nodes[matched[0]].visible);
        }

        #[test]
        fn test_range_selection_marks_both_bounds() {
            let mut app = App::fresh("/pages/forms/datepicker");
            app.apply_click(Effect::OpenRangePicker);
            app.apply_click(Effect::PickRangeDay(1));
            app.apply_click(Effect::PickRangeDay(31));

            let nodes = app.render();
            for day in ["1", "31"] {
                let selected = SimDriver::matches(
                    &nodes,
                    &Strategy::path(format!(
                        "//nb-calendar-range-day-cell[contains(@class, 'selected')]//div[text()='{day}']"
                    )),
                )
                .unwrap();
                assert_eq!(selected.len(), 1, "day {day} must be marked selected");
            }
        }

        #[test]
        fn test_common_picker_fill_selects_day() {
            let mut app = App::fresh("/pages/forms/datepicker");
            app.apply_fill(Field::CommonPicker, "Dec 31, 2025");
            assert!(app.common_open);
            assert_eq!(app.common_selected, Some(31));
        }

        #[test]
        fn test_parse_day() {
            assert_eq!(parse_day("Dec 31, 2025"), Some(31));
            assert_eq!(parse_day("Jun 1, 2026"), Some(1));
            assert_eq!(parse_day("no digits"), None);
        }
    }

    mod driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_fill_rejects_non_fillable_targets() {
            let driver = SimDriver::new();
            driver.goto("/pages/forms/layouts").await.unwrap();
            let strategy = Strategy::path("//nb-card-header[text()='Inline form']");
            let err = driver.fill(&strategy, 0, "x").await.unwrap_err();
            assert!(matches!(err, ConducirError::PageError { .. }));
        }

        #[tokio::test]
        async fn test_closed_driver_rejects_calls() {
            let driver = SimDriver::new();
            driver.close().await.unwrap();
            assert!(matches!(
                driver.current_url().await,
                Err(ConducirError::PageClosed)
            ));
        }

        #[tokio::test]
        async fn test_engine_pages_are_isolated() {
            let engine = SimEngine::new();
            let a = engine.new_page().await.unwrap();
            let b = engine.new_page().await.unwrap();
            a.goto("/pages/forms/layouts").await.unwrap();
            assert_eq!(b.current_url().await.unwrap(), "about:blank");
        }
    }
}
