//! Chart Series Module
//! Maps a chart kind and a numeric column to plottable (x, y) pairs.

use crate::data::TableCleaner;
use crate::stats::TableSummarizer;
use polars::prelude::*;

/// Histogram bucket count over observed min..max.
pub const HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Histogram];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Histogram => "Histogram",
        }
    }
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::Bar
    }
}

/// A renderable series for one numeric column.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub column: String,
    pub points: Vec<[f64; 2]>,
    /// Bar width for histogram rendering; `None` for bar/line charts.
    pub bin_width: Option<f64>,
}

/// Outcome of a chart request. A table without numeric columns is an expected
/// empty state, surfaced as a warning rather than an error.
#[derive(Debug, Clone)]
pub enum ChartOutcome {
    Series(ChartSeries),
    NoNumericColumns,
}

/// Builds chart series from a table without mutating it.
pub struct TableVisualizer;

impl TableVisualizer {
    pub fn build_series(df: &DataFrame, kind: ChartKind, column: &str) -> ChartOutcome {
        let numeric = TableCleaner::numeric_columns(df);
        if numeric.is_empty() {
            return ChartOutcome::NoNumericColumns;
        }

        // The column selector only offers numeric columns; fall back to the
        // first one if the selection went stale after a projection.
        let column = if numeric.iter().any(|n| n == column) {
            column.to_string()
        } else {
            numeric[0].clone()
        };

        let series = match kind {
            ChartKind::Bar | ChartKind::Line => ChartSeries {
                kind,
                points: Self::row_points(df, &column),
                column,
                bin_width: None,
            },
            ChartKind::Histogram => {
                let values = TableSummarizer::column_values(df, &column);
                let (points, bin_width) = Self::histogram_points(&values);
                ChartSeries {
                    kind,
                    column,
                    points,
                    bin_width: Some(bin_width),
                }
            }
        };

        ChartOutcome::Series(series)
    }

    /// Column values in row order, paired with the row index. Missing cells
    /// are skipped but keep their index on the x-axis.
    fn row_points(df: &DataFrame, column: &str) -> Vec<[f64; 2]> {
        let Ok(col) = df.column(column) else {
            return Vec::new();
        };
        let Ok(casted) = col.cast(&DataType::Float64) else {
            return Vec::new();
        };
        let Ok(ca) = casted.f64() else {
            return Vec::new();
        };
        ca.into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
            .collect()
    }

    /// Bucket values into equal-width bins spanning observed min..max.
    /// Returns (bin-midpoint, count) pairs and the bin width.
    fn histogram_points(values: &[f64]) -> (Vec<[f64; 2]>, f64) {
        if values.is_empty() {
            return (Vec::new(), 1.0);
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = (max - min) / HISTOGRAM_BINS as f64;

        if width == 0.0 {
            // Constant column: a single bucket holds everything.
            return (vec![[min, values.len() as f64]], 1.0);
        }

        let mut counts = vec![0usize; HISTOGRAM_BINS];
        for &v in values {
            let idx = (((v - min) / width) as usize).min(HISTOGRAM_BINS - 1);
            counts[idx] += 1;
        }

        let points = counts
            .iter()
            .enumerate()
            .map(|(i, &c)| [min + (i as f64 + 0.5) * width, c as f64])
            .collect();

        (points, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_series_pairs_values_with_row_index() {
        let df = df!("v" => [10.0f64, 20.0, 30.0]).unwrap();
        let outcome = TableVisualizer::build_series(&df, ChartKind::Bar, "v");
        let ChartOutcome::Series(series) = outcome else {
            panic!("expected a series");
        };
        assert_eq!(series.points, vec![[0.0, 10.0], [1.0, 20.0], [2.0, 30.0]]);
    }

    #[test]
    fn missing_cells_keep_their_row_index() {
        let df = df!("v" => [Some(10.0f64), None, Some(30.0)]).unwrap();
        let ChartOutcome::Series(series) = TableVisualizer::build_series(&df, ChartKind::Line, "v")
        else {
            panic!("expected a series");
        };
        assert_eq!(series.points, vec![[0.0, 10.0], [2.0, 30.0]]);
    }

    #[test]
    fn table_without_numeric_columns_is_a_warning_state() {
        let df = df!("label" => ["a", "b"]).unwrap();
        let outcome = TableVisualizer::build_series(&df, ChartKind::Bar, "label");
        assert!(matches!(outcome, ChartOutcome::NoNumericColumns));
    }

    #[test]
    fn histogram_uses_twenty_equal_width_bins() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let df = df!("v" => values).unwrap();
        let ChartOutcome::Series(series) =
            TableVisualizer::build_series(&df, ChartKind::Histogram, "v")
        else {
            panic!("expected a series");
        };
        assert_eq!(series.points.len(), HISTOGRAM_BINS);
        let total: f64 = series.points.iter().map(|p| p[1]).sum();
        assert_eq!(total, 100.0);
        // 0..99 over 20 bins: width 4.95, first midpoint at 2.475.
        let width = series.bin_width.unwrap();
        assert!((width - 4.95).abs() < 1e-12);
        assert!((series.points[0][0] - 2.475).abs() < 1e-12);
    }

    #[test]
    fn histogram_ignores_non_finite_values() {
        let df = df!("v" => [1.0f64, f64::NAN, 3.0]).unwrap();
        let ChartOutcome::Series(series) =
            TableVisualizer::build_series(&df, ChartKind::Histogram, "v")
        else {
            panic!("expected a series");
        };
        let total: f64 = series.points.iter().map(|p| p[1]).sum();
        assert_eq!(total, 2.0);
        // Bins span the finite min..max, not a NaN-poisoned range.
        let width = series.bin_width.unwrap();
        assert!((width - 0.1).abs() < 1e-12);
    }

    #[test]
    fn constant_column_collapses_to_one_bucket() {
        let df = df!("v" => [5.0f64, 5.0, 5.0]).unwrap();
        let ChartOutcome::Series(series) =
            TableVisualizer::build_series(&df, ChartKind::Histogram, "v")
        else {
            panic!("expected a series");
        };
        assert_eq!(series.points, vec![[5.0, 3.0]]);
    }
}
