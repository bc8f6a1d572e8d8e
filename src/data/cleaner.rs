//! Table Cleaner Module
//! Pure cleaning transformations: deduplication, mean imputation, column projection.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

/// Stateless cleaning operations over a DataFrame. Each operation returns a
/// new frame and leaves its input untouched.
pub struct TableCleaner;

impl TableCleaner {
    /// Drop duplicate rows, comparing the full tuple of cell values. Keeps
    /// the first occurrence and preserves the relative order of survivors.
    pub fn remove_duplicates(df: &DataFrame) -> Result<DataFrame, CleanError> {
        let deduped = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;
        Ok(deduped)
    }

    /// Replace missing cells in every numeric column with that column's mean.
    /// Entirely-missing columns are left unchanged (their mean is null, so the
    /// fill is a no-op). Non-numeric columns are untouched.
    pub fn fill_missing_numeric(df: &DataFrame) -> Result<DataFrame, CleanError> {
        let numeric = Self::numeric_columns(df);
        if numeric.is_empty() {
            return Ok(df.clone());
        }

        let fills: Vec<Expr> = numeric
            .iter()
            .map(|name| col(name.as_str()).fill_null(col(name.as_str()).mean()))
            .collect();

        let filled = df.clone().lazy().with_columns(fills).collect()?;
        Ok(filled)
    }

    /// Restrict the frame to `selected` columns, in the order given. Fails
    /// before touching anything if a requested column is absent, so callers
    /// can keep their current table on error.
    pub fn project(df: &DataFrame, selected: &[String]) -> Result<DataFrame, CleanError> {
        for name in selected {
            if df.column(name).is_err() {
                return Err(CleanError::UnknownColumn(name.clone()));
            }
        }
        let projected = df.select(selected.iter().map(|s| s.as_str()))?;
        Ok(projected)
    }

    /// Names of all numeric columns, in frame order.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect()
    }
}
