//! Stats module - descriptive statistics

mod summary;

pub use summary::{ColumnSummary, TableSummarizer, TableSummary};
