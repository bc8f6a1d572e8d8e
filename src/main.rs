//! ConvertEase - Seamless CSV & Excel Conversion with Smart Insights
//!
//! A Rust application for uploading tabular files, cleaning and visualizing
//! them, and converting them to CSV, Excel, or JSON Lines.

mod charts;
mod convert;
mod data;
mod gui;
mod session;
mod stats;

use eframe::egui;
use gui::ConvertEaseApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("ConvertEase"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "ConvertEase",
        options,
        Box::new(|cc| Ok(Box::new(ConvertEaseApp::new(cc)))),
    )
}
