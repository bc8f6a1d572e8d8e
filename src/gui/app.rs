//! ConvertEase Main Application
//! Side panel for uploads, central panel with one section per file.

use crate::convert::ConversionResult;
use crate::gui::{FilePanel, FilePanelAction};
use crate::session::{FileSession, SessionController};
use anyhow::Context as _;
use egui::{Color32, RichText, SidePanel};
use std::path::Path;

/// Main application window.
pub struct ConvertEaseApp {
    session: SessionController,
}

impl ConvertEaseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            session: SessionController::new(),
        }
    }

    /// Pick files and register each one with the session. A file that fails
    /// to read or parse only affects its own entry.
    fn handle_upload(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Tabular files", &["csv", "xlsx"])
            .pick_files()
        else {
            return;
        };

        for path in paths {
            match Self::read_upload(&path) {
                Ok((name, bytes)) => self.session.upload(name, bytes),
                Err(e) => log::error!("{e:#}"),
            }
        }
    }

    fn read_upload(path: &Path) -> anyhow::Result<(String, Vec<u8>)> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok((name, bytes))
    }

    fn save_result(path: &Path, result: &ConversionResult) -> anyhow::Result<()> {
        std::fs::write(path, &result.bytes)
            .with_context(|| format!("failed to save {}", path.display()))?;
        Ok(())
    }

    /// Serialize the current table and let the user pick where to save it.
    fn handle_convert(fs: &mut FileSession) {
        let Some(result) = fs.convert() else { return };
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                log::warn!("{}: {e}", fs.file.name);
                fs.status = Some(format!("Error: {e}"));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&result.file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match Self::save_result(&path, &result) {
            Ok(()) => {
                log::info!(
                    "saved {} ({}, {} bytes)",
                    path.display(),
                    result.mime_type,
                    result.bytes.len()
                );
                fs.status = Some(format!("🚀 {} is ready!", result.file_name));
                fs.last_saved = Some(path);
            }
            Err(e) => fs.status = Some(format!("Error: {e:#}")),
        }
    }

    fn handle_open_saved(fs: &FileSession) {
        if let Some(path) = &fs.last_saved {
            if let Err(e) = open::that(path) {
                log::warn!("failed to open {}: {e}", path.display());
            }
        }
    }
}

impl eframe::App for ConvertEaseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut upload_clicked = false;
        let mut to_remove: Vec<String> = Vec::new();

        SidePanel::left("upload_panel")
            .min_width(220.0)
            .max_width(280.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("🔄 ConvertEase")
                            .size(22.0)
                            .color(Color32::from_rgb(100, 149, 237)),
                    );
                    ui.label(
                        RichText::new("CSV & Excel conversion")
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                });
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(5.0);

                if ui.button("📁 Upload CSV or Excel files").clicked() {
                    upload_clicked = true;
                }

                ui.add_space(10.0);
                for fs in self.session.iter_mut() {
                    ui.horizontal(|ui| {
                        if ui.small_button("✖").clicked() {
                            to_remove.push(fs.file.name.clone());
                        }
                        ui.label(RichText::new(&fs.file.name).size(12.0));
                    });
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("🔄 ConvertEase: Seamless CSV & Excel Conversion with Smart Insights! 📊");
            ui.add_space(8.0);

            if self.session.is_empty() {
                ui.label(
                    RichText::new("Upload files from the panel on the left to get started.")
                        .color(Color32::GRAY),
                );
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for fs in self.session.iter_mut() {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        let action = FilePanel::show(ui, fs);
                        match action {
                            FilePanelAction::RemoveDuplicates => fs.remove_duplicates(),
                            FilePanelAction::FillMissing => fs.fill_missing_numeric(),
                            FilePanelAction::ApplySelection => fs.apply_selection(),
                            FilePanelAction::Convert => Self::handle_convert(fs),
                            FilePanelAction::OpenSaved => Self::handle_open_saved(fs),
                            FilePanelAction::None => {}
                        }
                    });
                    ui.add_space(10.0);
                }
            });
        });

        if upload_clicked {
            self.handle_upload();
        }
        for name in to_remove {
            self.session.remove(&name);
        }
    }
}
