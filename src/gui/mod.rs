//! GUI module - User interface components

mod app;
mod file_panel;

pub use app::ConvertEaseApp;
pub use file_panel::{FilePanel, FilePanelAction};
