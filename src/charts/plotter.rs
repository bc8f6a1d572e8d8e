//! Chart Plotter Module
//! Renders chart series with egui_plot.

use super::series::{ChartKind, ChartSeries};
use egui::Color32;
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints};

/// Accent colors per chart kind.
const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
const LINE_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(155, 89, 182); // Purple

/// Draws interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a series. `id_salt` keeps plot state separate per file.
    pub fn show(ui: &mut egui::Ui, series: &ChartSeries, id_salt: &str) {
        let plot = Plot::new(format!("chart_{}_{}", id_salt, series.column))
            .height(260.0)
            .allow_scroll(false)
            .x_axis_label(match series.kind {
                ChartKind::Histogram => series.column.clone(),
                _ => "Row".to_string(),
            })
            .y_axis_label(match series.kind {
                ChartKind::Histogram => "Count".to_string(),
                _ => series.column.clone(),
            });

        plot.show(ui, |plot_ui| match series.kind {
            ChartKind::Bar => {
                let bars: Vec<Bar> = series
                    .points
                    .iter()
                    .map(|&[x, y]| Bar::new(x, y).width(0.7).fill(BAR_COLOR))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&series.column));
            }
            ChartKind::Line => {
                let points: PlotPoints = series.points.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .color(LINE_COLOR)
                        .width(1.5)
                        .name(&series.column),
                );
            }
            ChartKind::Histogram => {
                let width = series.bin_width.unwrap_or(1.0);
                let bars: Vec<Bar> = series
                    .points
                    .iter()
                    .map(|&[x, y]| Bar::new(x, y).width(width).fill(HISTOGRAM_COLOR))
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&series.column));
            }
        });
    }
}
