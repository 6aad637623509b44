//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::{ChartData, ChartStyle};
use crate::stats::{BandThresholds, DescriptiveStats, SummaryMetrics};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

const BAR_GROUP_WIDTH: f64 = 0.8;

/// Draws dashboard charts and metric panels using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(rgb: (u8, u8, u8)) -> Color32 {
        Color32::from_rgb(rgb.0, rgb.1, rgb.2)
    }

    /// Draw a chart with categorical x labels.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData, height: f32) {
        if chart.is_empty() {
            ui.label(RichText::new("No months in this range").color(Color32::GRAY));
            return;
        }

        let x_labels = chart.x_labels.clone();

        Plot::new(format!("chart_{}", chart.id))
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| match chart.style {
                ChartStyle::Line => {
                    for series in &chart.series {
                        let color = Self::color(series.color);
                        let points: PlotPoints = series
                            .values
                            .iter()
                            .enumerate()
                            .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
                            .collect();
                        let markers: PlotPoints = series
                            .values
                            .iter()
                            .enumerate()
                            .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
                            .collect();

                        plot_ui.line(
                            Line::new(points)
                                .color(color)
                                .width(2.0)
                                .name(&series.name),
                        );
                        plot_ui.points(Points::new(markers).radius(3.0).color(color));
                    }
                }
                ChartStyle::Bars => {
                    let bar_width = BAR_GROUP_WIDTH / chart.series.len().max(1) as f64;
                    for (idx, series) in chart.series.iter().enumerate() {
                        let offset = chart.bar_offset(idx, bar_width);
                        let bars: Vec<Bar> = series
                            .values
                            .iter()
                            .enumerate()
                            .filter_map(|(i, v)| {
                                v.map(|v| {
                                    Bar::new(i as f64 + offset, v)
                                        .width(bar_width * 0.95)
                                        .name(format!("{} {}", chart.x_labels[i], series.name))
                                })
                            })
                            .collect();

                        plot_ui.bar_chart(
                            BarChart::new(bars)
                                .color(Self::color(series.color))
                                .name(&series.name),
                        );
                    }
                }
            });
    }

    /// Draw the three headline metrics side by side.
    pub fn draw_metrics(ui: &mut egui::Ui, metrics: Option<&SummaryMetrics>) {
        let cells = [
            ("Total Transaction", metrics.map(|m| m.total_transaction)),
            ("Total Casual Customers", metrics.map(|m| m.total_casual)),
            ("Total Registered Customers", metrics.map(|m| m.total_registered)),
        ];

        ui.columns(cells.len(), |columns| {
            for (col, (label, value)) in columns.iter_mut().zip(cells) {
                egui::Frame::none()
                    .fill(col.visuals().widgets.noninteractive.bg_fill)
                    .rounding(8.0)
                    .inner_margin(10.0)
                    .show(col, |ui| {
                        ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
                        let text = value
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        ui.label(RichText::new(text).size(26.0).strong());
                    });
            }
        });
    }

    /// Draw the descriptive statistics strip of the active view.
    pub fn draw_stats_table(ui: &mut egui::Ui, stats: &DescriptiveStats) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("view_stats_table")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Rows", "Total", "Mean", "Median", "Std", "Min", "Max"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        ui.label(RichText::new(stats.count.to_string()).size(11.0));
                        for value in [
                            stats.total,
                            stats.mean,
                            stats.median,
                            stats.std,
                            stats.min,
                            stats.max,
                        ] {
                            ui.label(RichText::new(format_stat(value)).size(11.0));
                        }
                        ui.end_row();
                    });
            });
    }

    /// Draw the band cut points of the cluster view.
    pub fn draw_thresholds(ui: &mut egui::Ui, thresholds: &BandThresholds) {
        let text = if thresholds.degenerate {
            format!(
                "Not enough spread across {} month(s): all months are Medium",
                thresholds.sample_size
            )
        } else {
            format!(
                "Low ≤ {:.1} < Medium ≤ {:.1} < High   (mean {:.1}, std {:.1}, {} months)",
                thresholds.mean,
                thresholds.high_cutoff(),
                thresholds.mean,
                thresholds.std_dev,
                thresholds.sample_size
            )
        };
        ui.label(RichText::new(text).size(12.0).color(Color32::GRAY));
    }
}

fn format_stat(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}", value)
    } else {
        "-".to_string()
    }
}
