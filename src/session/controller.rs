//! Session Controller Module
//! Holds every uploaded file's current table and user-selected options for
//! the lifetime of the session, and runs the pipeline stages per file.

use crate::charts::{ChartKind, ChartOutcome, TableVisualizer};
use crate::convert::{ConversionResult, ConvertError, TableSerializer, TargetFormat};
use crate::data::{CleanError, TableCleaner, TableParser};
use crate::stats::{TableSummarizer, TableSummary};
use polars::prelude::*;

/// Immutable upload payload. The name doubles as the session-wide key.
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }
}

/// Per-file pipeline state: the current table plus the widget-backed options
/// that drive cleaning, charting, and conversion.
pub struct FileSession {
    pub file: UploadedFile,
    table: Option<DataFrame>,
    /// Parse error text; set once at upload, cleared only by re-upload.
    pub error: Option<String>,
    /// Outcome line of the most recent operation.
    pub status: Option<String>,

    pub show_summary: bool,
    pub cleaning_enabled: bool,
    pub columns: Vec<String>,
    pub column_selected: Vec<bool>,
    pub chart_kind: ChartKind,
    pub chart_column: String,
    pub target: TargetFormat,
    /// Where the most recent conversion was saved, if any.
    pub last_saved: Option<std::path::PathBuf>,
}

impl FileSession {
    fn new(name: String, bytes: Vec<u8>) -> Self {
        let (table, error) = match TableParser::parse(&name, &bytes) {
            Ok(df) => (Some(df), None),
            Err(e) => {
                log::warn!("{e}");
                (None, Some(e.to_string()))
            }
        };

        let mut session = Self {
            file: UploadedFile { name, bytes },
            table,
            error,
            status: None,
            show_summary: false,
            cleaning_enabled: false,
            columns: Vec::new(),
            column_selected: Vec::new(),
            chart_kind: ChartKind::default(),
            chart_column: String::new(),
            target: TargetFormat::default(),
            last_saved: None,
        };
        session.refresh_columns();
        session
    }

    pub fn table(&self) -> Option<&DataFrame> {
        self.table.as_ref()
    }

    /// Sync the column widgets with the current table: the multi-select
    /// defaults to all columns, the chart column to the first numeric one.
    fn refresh_columns(&mut self) {
        let Some(df) = &self.table else {
            self.columns.clear();
            self.column_selected.clear();
            return;
        };

        self.columns = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.column_selected = vec![true; self.columns.len()];

        let numeric = TableCleaner::numeric_columns(df);
        if !numeric.iter().any(|n| n == &self.chart_column) {
            self.chart_column = numeric.first().cloned().unwrap_or_default();
        }
    }

    /// Column names currently checked in the multi-select, in column order.
    pub fn selected_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .zip(self.column_selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Re-applying a cleaning step always operates on the *current* table;
    /// there is no undo short of re-uploading the file.
    pub fn remove_duplicates(&mut self) {
        let Some(df) = &self.table else { return };
        let before = df.height();
        match TableCleaner::remove_duplicates(df) {
            Ok(cleaned) => {
                let after = cleaned.height();
                self.table = Some(cleaned);
                self.refresh_columns();
                log::info!("{}: removed {} duplicate rows", self.file.name, before - after);
                self.status = Some(format!("Duplicates removed ({} -> {} rows)", before, after));
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn fill_missing_numeric(&mut self) {
        let Some(df) = &self.table else { return };
        match TableCleaner::fill_missing_numeric(df) {
            Ok(filled) => {
                self.table = Some(filled);
                log::info!("{}: missing numeric values filled", self.file.name);
                self.status = Some("Missing values filled with column means".to_string());
            }
            Err(e) => self.fail(e),
        }
    }

    /// Project the table onto the checked columns. On failure the current
    /// table is retained unchanged.
    pub fn apply_selection(&mut self) {
        let Some(df) = &self.table else { return };
        let selected = self.selected_columns();
        match TableCleaner::project(df, &selected) {
            Ok(projected) => {
                self.table = Some(projected);
                self.refresh_columns();
                self.status = Some(format!("Kept {} columns", selected.len()));
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn summary(&self) -> Option<TableSummary> {
        self.table.as_ref().map(TableSummarizer::describe)
    }

    pub fn chart(&self) -> Option<ChartOutcome> {
        self.table
            .as_ref()
            .map(|df| TableVisualizer::build_series(df, self.chart_kind, &self.chart_column))
    }

    /// Encode the current table for download. Regenerated on every call.
    pub fn convert(&self) -> Option<Result<ConversionResult, ConvertError>> {
        self.table
            .as_ref()
            .map(|df| TableSerializer::serialize(df, self.target, &self.file.name))
    }

    fn fail(&mut self, e: CleanError) {
        log::warn!("{}: {e}", self.file.name);
        self.status = Some(format!("Error: {e}"));
    }
}

/// Ordered set of file sessions, keyed by file name in upload order.
#[derive(Default)]
pub struct SessionController {
    files: Vec<FileSession>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an upload. Re-uploading an existing name resets that file to
    /// freshly parsed state in place; new names append in upload order. A
    /// file that fails to parse still gets a session so the error can be
    /// shown without disturbing the rest of the batch.
    pub fn upload(&mut self, name: String, bytes: Vec<u8>) {
        log::info!("upload: {} ({} bytes)", name, bytes.len());
        let session = FileSession::new(name, bytes);
        match self.files.iter().position(|f| f.file.name == session.file.name) {
            Some(idx) => self.files[idx] = session,
            None => self.files.push(session),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.files.retain(|f| f.file.name != name);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FileSession> {
        self.files.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_csv(controller: &mut SessionController, name: &str, body: &str) {
        controller.upload(name.to_string(), body.as_bytes().to_vec());
    }

    fn session<'a>(controller: &'a mut SessionController, name: &str) -> &'a mut FileSession {
        controller
            .iter_mut()
            .find(|f| f.file.name == name)
            .expect("session exists")
    }

    #[test]
    fn bad_file_does_not_affect_the_rest_of_the_batch() {
        let mut controller = SessionController::new();
        upload_csv(&mut controller, "report.xyz", "a,b\n1,2\n");
        upload_csv(&mut controller, "good.csv", "a,b\n1,2\n");

        let bad = session(&mut controller, "report.xyz");
        assert!(bad.table().is_none());
        assert!(bad.error.as_deref().unwrap().contains(".xyz"));

        let good = session(&mut controller, "good.csv");
        assert_eq!(good.table().unwrap().height(), 1);
    }

    #[test]
    fn cleaning_steps_chain_on_the_current_table() {
        let mut controller = SessionController::new();
        upload_csv(&mut controller, "data.csv", "a,b\n1,2\n1,2\n3,4\n");
        let fs = session(&mut controller, "data.csv");

        fs.remove_duplicates();
        assert_eq!(fs.table().unwrap().height(), 2);

        // Re-applying on the deduped table is a no-op, not a reset.
        fs.fill_missing_numeric();
        fs.remove_duplicates();
        assert_eq!(fs.table().unwrap().height(), 2);
    }

    #[test]
    fn mean_imputation_fills_the_gap() {
        let mut controller = SessionController::new();
        upload_csv(&mut controller, "data.csv", "a,b\n1,x\n,y\n3,z\n");
        let fs = session(&mut controller, "data.csv");
        assert_eq!(fs.table().unwrap().column("a").unwrap().null_count(), 1);

        fs.fill_missing_numeric();
        let col = fs.table().unwrap().column("a").unwrap().clone();
        assert_eq!(col.null_count(), 0);
        let filled = col.cast(&DataType::Float64).unwrap();
        assert_eq!(filled.f64().unwrap().get(1), Some(2.0));
    }

    #[test]
    fn reupload_resets_to_freshly_parsed_state() {
        let mut controller = SessionController::new();
        upload_csv(&mut controller, "data.csv", "a\n1\n1\n");
        let fs = session(&mut controller, "data.csv");
        fs.remove_duplicates();
        assert_eq!(fs.table().unwrap().height(), 1);

        upload_csv(&mut controller, "data.csv", "a\n1\n1\n");
        let fs = session(&mut controller, "data.csv");
        assert_eq!(fs.table().unwrap().height(), 2);
    }

    #[test]
    fn stale_selection_keeps_the_prior_table() {
        let mut controller = SessionController::new();
        upload_csv(&mut controller, "data.csv", "a,b\n1,2\n");
        let fs = session(&mut controller, "data.csv");

        fs.columns.push("ghost".to_string());
        fs.column_selected.push(true);
        fs.apply_selection();

        assert!(fs.status.as_deref().unwrap().contains("ghost"));
        assert_eq!(fs.table().unwrap().width(), 2);
    }

    #[test]
    fn conversion_uses_the_current_table_state() {
        let mut controller = SessionController::new();
        upload_csv(&mut controller, "data.csv", "a,b\n1,2\n1,2\n3,4\n");
        let fs = session(&mut controller, "data.csv");
        fs.remove_duplicates();
        fs.target = TargetFormat::Excel;

        let result = fs.convert().unwrap().unwrap();
        assert_eq!(result.file_name, "data.xlsx");
        assert_eq!(
            result.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn chart_on_text_only_table_is_a_warning_not_an_error() {
        let mut controller = SessionController::new();
        upload_csv(&mut controller, "data.csv", "name\nalpha\nbeta\n");
        let fs = session(&mut controller, "data.csv");
        assert!(matches!(fs.chart(), Some(ChartOutcome::NoNumericColumns)));
    }

    #[test]
    fn remove_drops_only_the_named_file() {
        let mut controller = SessionController::new();
        upload_csv(&mut controller, "one.csv", "a\n1\n");
        upload_csv(&mut controller, "two.csv", "a\n2\n");
        controller.remove("one.csv");
        assert!(controller.iter_mut().all(|f| f.file.name == "two.csv"));
        assert!(!controller.is_empty());
    }
}
