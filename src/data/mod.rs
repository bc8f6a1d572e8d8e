//! Data module - file parsing and cleaning

mod cleaner;
mod parser;

pub use cleaner::{CleanError, TableCleaner};
pub use parser::{ParseError, TableParser};
