//! Chart Viewer Widget
//! Central panel with headline metrics, view statistics and charts.

use crate::charts::{ChartData, ChartPlotter};
use crate::data::{DerivedView, ViewKind};
use crate::stats::{DescriptiveStats, StatsCalculator, SummaryMetrics};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 380.0;
const BAND_CHART_HEIGHT: f32 = 260.0;

/// Displays the result of the latest view computation.
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<DerivedView>,
    pub charts: Vec<ChartData>,
    pub stats: Option<DescriptiveStats>,
    pub metrics: Option<SummaryMetrics>,
    /// Reason shown instead of charts when the range has no data.
    pub no_data: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.view = None;
        self.charts.clear();
        self.stats = None;
        self.no_data = None;
    }

    /// Show a freshly computed view.
    pub fn set_view(&mut self, view: DerivedView) {
        self.charts = ChartData::from_view(&view);
        self.stats = Some(StatsCalculator::compute_descriptive_stats(&view.row_totals()));
        self.no_data = None;
        self.view = Some(view);
    }

    /// Replace charts with a "no data" notice.
    pub fn set_no_data(&mut self, reason: &str) {
        self.clear();
        self.no_data = Some(reason.to_string());
    }

    pub fn set_metrics(&mut self, metrics: Option<SummaryMetrics>) {
        self.metrics = metrics;
    }

    pub fn show(&mut self, view_kind: ViewKind, ui: &mut egui::Ui) {
        ui.heading("Dashboard");
        ui.add_space(8.0);
        ChartPlotter::draw_metrics(ui, self.metrics.as_ref());
        ui.add_space(CHART_SPACING);

        ui.label(RichText::new(view_kind.title()).size(18.0).strong());
        ui.add_space(8.0);

        if let Some(reason) = &self.no_data {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
                ui.label(RichText::new(reason).size(12.0).color(Color32::GRAY));
            });
            return;
        }

        let Some(view) = &self.view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        if let Some(stats) = &self.stats {
            ChartPlotter::draw_stats_table(ui, stats);
            ui.add_space(CHART_SPACING);
        }

        if let DerivedView::Cluster(result) = view {
            ChartPlotter::draw_thresholds(ui, &result.thresholds);
            ui.add_space(8.0);
        }

        let height = if self.charts.len() > 1 {
            BAND_CHART_HEIGHT
        } else {
            CHART_HEIGHT
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for chart in &self.charts {
                    if self.charts.len() > 1 {
                        ui.label(RichText::new(&chart.title).size(14.0).strong());
                    }
                    ChartPlotter::draw_chart(ui, chart, height);
                    ui.add_space(CHART_SPACING);
                }
            });
    }
}
