//! File Panel Widget
//! One collapsible section per uploaded file: preview, summary, cleaning,
//! visualization, and conversion controls.

use crate::charts::{ChartKind, ChartOutcome, ChartPlotter};
use crate::convert::TargetFormat;
use crate::data::TableCleaner;
use crate::session::FileSession;
use crate::stats::TableSummary;
use egui::{Color32, ComboBox, RichText};
use polars::prelude::*;

const PREVIEW_ROWS: usize = 5;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 167, 69);
const WARNING_COLOR: Color32 = Color32::from_rgb(255, 193, 7);

/// Actions triggered by a file panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FilePanelAction {
    None,
    RemoveDuplicates,
    FillMissing,
    ApplySelection,
    Convert,
    OpenSaved,
}

/// Draws the interactive section for one file session.
pub struct FilePanel;

impl FilePanel {
    pub fn show(ui: &mut egui::Ui, fs: &mut FileSession) -> FilePanelAction {
        let mut action = FilePanelAction::None;

        ui.label(
            RichText::new(format!("📂 {}", fs.file.name))
                .size(16.0)
                .strong(),
        );
        ui.label(
            RichText::new(format!("📏 Size: {:.2} KB", fs.file.size_kb()))
                .size(11.0)
                .color(Color32::GRAY),
        );

        if let Some(error) = fs.error.clone() {
            ui.colored_label(ERROR_COLOR, error);
            return action;
        }

        ui.add_space(5.0);
        ui.label(RichText::new("📊 Data Preview").size(13.0).strong());
        if let Some(df) = fs.table() {
            Self::preview_grid(ui, df, &fs.file.name);
        }

        ui.add_space(8.0);
        ui.checkbox(&mut fs.show_summary, "Show data summary");
        if fs.show_summary {
            if let Some(summary) = fs.summary() {
                Self::summary_grid(ui, &summary, &fs.file.name);
            }
        }

        ui.add_space(8.0);
        ui.checkbox(&mut fs.cleaning_enabled, "🧹 Enable cleaning");
        if fs.cleaning_enabled {
            ui.horizontal(|ui| {
                if ui.button("🗑 Remove duplicates").clicked() {
                    action = FilePanelAction::RemoveDuplicates;
                }
                if ui.button("📊 Fill missing values").clicked() {
                    action = FilePanelAction::FillMissing;
                }
            });

            ui.add_space(5.0);
            ui.label("Columns to keep:");
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt(format!("cols_{}", fs.file.name))
                        .max_height(120.0)
                        .show(ui, |ui| {
                            for i in 0..fs.columns.len() {
                                if i < fs.column_selected.len() {
                                    let label = fs.columns[i].clone();
                                    ui.checkbox(&mut fs.column_selected[i], label);
                                }
                            }
                        });
                });
            if ui.small_button("Apply selection").clicked() {
                action = FilePanelAction::ApplySelection;
            }
        }

        ui.add_space(8.0);
        ui.label(RichText::new("📈 Data Visualization").size(13.0).strong());
        Self::chart_controls(ui, fs);

        ui.add_space(8.0);
        ui.label(RichText::new("🔄 File Conversion").size(13.0).strong());
        ui.horizontal(|ui| {
            for target in TargetFormat::ALL {
                ui.radio_value(&mut fs.target, target, target.label());
            }
            if ui.button("Convert").clicked() {
                action = FilePanelAction::Convert;
            }
        });

        if let Some(status) = &fs.status {
            let color = if status.contains("Error") {
                ERROR_COLOR
            } else {
                SUCCESS_COLOR
            };
            ui.horizontal(|ui| {
                ui.label(RichText::new(status).size(11.0).color(color));
                if fs.last_saved.is_some() && ui.small_button("📂 Open").clicked() {
                    action = FilePanelAction::OpenSaved;
                }
            });
        }

        action
    }

    /// First rows of the table as a striped grid.
    fn preview_grid(ui: &mut egui::Ui, df: &DataFrame, id_salt: &str) {
        egui::ScrollArea::horizontal()
            .id_salt(format!("preview_{id_salt}"))
            .show(ui, |ui| {
                egui::Grid::new(format!("preview_grid_{id_salt}"))
                    .striped(true)
                    .show(ui, |ui| {
                        for name in df.get_column_names() {
                            ui.label(RichText::new(name.to_string()).strong());
                        }
                        ui.end_row();

                        for i in 0..df.height().min(PREVIEW_ROWS) {
                            for column in df.get_columns() {
                                ui.label(Self::cell_text(column, i));
                            }
                            ui.end_row();
                        }
                    });
            });
        if df.height() > PREVIEW_ROWS {
            ui.label(
                RichText::new(format!("... {} rows total", df.height()))
                    .size(10.0)
                    .color(Color32::GRAY),
            );
        }
    }

    fn cell_text(column: &Column, row: usize) -> String {
        column
            .get(row)
            .ok()
            .filter(|v| !v.is_null())
            .map(|v| v.to_string().trim_matches('"').to_string())
            .unwrap_or_default()
    }

    fn summary_grid(ui: &mut egui::Ui, summary: &TableSummary, id_salt: &str) {
        if summary.numeric.is_empty() {
            ui.colored_label(WARNING_COLOR, "No numeric columns to describe.");
        } else {
            egui::Grid::new(format!("summary_{id_salt}"))
                .striped(true)
                .show(ui, |ui| {
                    for header in ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
                    {
                        ui.label(RichText::new(header).strong());
                    }
                    ui.end_row();

                    for s in &summary.numeric {
                        ui.label(&s.name);
                        ui.label(s.count.to_string());
                        for v in [s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max] {
                            ui.label(format!("{v:.3}"));
                        }
                        ui.end_row();
                    }
                });
        }

        ui.add_space(4.0);
        ui.label("Missing values per column:");
        egui::Grid::new(format!("missing_{id_salt}"))
            .striped(true)
            .show(ui, |ui| {
                for (name, count) in &summary.missing {
                    ui.label(name);
                    ui.label(count.to_string());
                    ui.end_row();
                }
            });
    }

    fn chart_controls(ui: &mut egui::Ui, fs: &mut FileSession) {
        let numeric = fs
            .table()
            .map(TableCleaner::numeric_columns)
            .unwrap_or_default();

        ui.horizontal(|ui| {
            ComboBox::from_id_salt(format!("chart_kind_{}", fs.file.name))
                .selected_text(fs.chart_kind.label())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut fs.chart_kind, kind, kind.label());
                    }
                });

            if !numeric.is_empty() {
                ComboBox::from_id_salt(format!("chart_col_{}", fs.file.name))
                    .selected_text(&fs.chart_column)
                    .show_ui(ui, |ui| {
                        for name in &numeric {
                            ui.selectable_value(&mut fs.chart_column, name.clone(), name);
                        }
                    });
            }
        });

        match fs.chart() {
            Some(ChartOutcome::Series(series)) => {
                ChartPlotter::show(ui, &series, &fs.file.name);
            }
            Some(ChartOutcome::NoNumericColumns) => {
                ui.colored_label(
                    WARNING_COLOR,
                    "No numeric columns available for visualization.",
                );
            }
            None => {}
        }
    }
}
