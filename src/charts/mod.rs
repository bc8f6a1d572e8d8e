//! Charts module - series building and rendering

mod plotter;
mod series;

pub use plotter::ChartPlotter;
pub use series::{ChartKind, ChartOutcome, ChartSeries, TableVisualizer, HISTOGRAM_BINS};
