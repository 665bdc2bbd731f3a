//! Screen state and rendering

pub mod detail;
pub mod filters;
pub mod list_screen;
pub mod overview;

pub use filters::FilterForm;
pub use list_screen::{ListControls, ListScreen};
pub use overview::Overview;
