//! TUI module for the language learning app.

mod app;
pub mod theme;
mod widgets;

pub use app::App;
pub use widgets::truncate;
