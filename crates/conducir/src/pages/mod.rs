//! Page objects for the IoT-dashboard demo playground.
//!
//! One object per logical screen. Each binds its locators eagerly at
//! construction and exposes intention-revealing operations; none reaches
//! into another object's locators. Sequencing across screens belongs to the
//! scenarios.

mod dashboard;
mod date_picker;
mod form_layouts;
mod tree_grid;

pub use dashboard::DashboardPage;
pub use date_picker::DatePickerPage;
pub use form_layouts::FormLayoutsPage;
pub use tree_grid::TreeGridPage;
