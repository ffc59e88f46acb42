//! Console front end: prompts for filters, prints reports and raw-row tables,
//! and renders one-shot results as JSON.

pub mod json;
pub mod prompt;
pub mod render;
pub mod table_view;

pub use prompt::ConsolePrompter;
pub use render::ConsoleRenderer;
