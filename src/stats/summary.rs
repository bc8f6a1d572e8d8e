//! Statistics Summary Module
//! Descriptive statistics per numeric column plus missing-value counts.

use crate::data::TableCleaner;
use polars::prelude::*;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            name: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Read-only summary of a whole table.
#[derive(Debug, Clone, Default)]
pub struct TableSummary {
    /// One entry per numeric column, in frame order.
    pub numeric: Vec<ColumnSummary>,
    /// Missing-cell count for every column, numeric or not.
    pub missing: Vec<(String, usize)>,
}

/// Computes descriptive statistics without mutating the table.
pub struct TableSummarizer;

impl TableSummarizer {
    pub fn describe(df: &DataFrame) -> TableSummary {
        let numeric = TableCleaner::numeric_columns(df)
            .into_iter()
            .map(|name| {
                let values = Self::column_values(df, &name);
                let mut summary = Self::describe_values(&values);
                summary.name = name;
                summary
            })
            .collect();

        let missing = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect();

        TableSummary { numeric, missing }
    }

    /// Non-missing, finite values of a column, cast to f64. NaN and infinite
    /// cells would poison means and histogram buckets, so they are dropped
    /// alongside nulls.
    pub fn column_values(df: &DataFrame, name: &str) -> Vec<f64> {
        let Ok(column) = df.column(name) else {
            return Vec::new();
        };
        let Ok(casted) = column.cast(&DataType::Float64) else {
            return Vec::new();
        };
        let Ok(ca) = casted.f64() else {
            return Vec::new();
        };
        ca.into_iter().flatten().filter(|v| v.is_finite()).collect()
    }

    fn describe_values(values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        ColumnSummary {
            name: String::new(),
            count: n,
            mean,
            std: variance.sqrt(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Percentile with linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}
