//! Dashboard Main Application
//! Main window with control panel and chart viewer.
//!
//! Every interaction recomputes the selected view synchronously from the
//! immutable dataset loaded at startup.

use crate::charts::StaticChartRenderer;
use crate::data::{export_csv, summary_metrics, Dataset, ExportError, ViewKind};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;

const PNG_WIDTH: u32 = 1400;
const PNG_PANEL_HEIGHT: u32 = 700;

/// Main application window.
pub struct DashboardApp {
    dataset: Dataset,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset: Dataset) -> Self {
        Self::with_dataset(dataset)
    }

    /// Build the app state without a window; used by `new` and tests.
    pub fn with_dataset(dataset: Dataset) -> Self {
        let mut app = Self {
            dataset,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.handle_view_changed();
        app
    }

    pub fn chart_viewer(&self) -> &ChartViewer {
        &self.chart_viewer
    }

    pub fn control_panel_mut(&mut self) -> &mut ControlPanel {
        &mut self.control_panel
    }

    /// Reset the range to the new view's table bounds, then recompute.
    pub fn handle_view_changed(&mut self) {
        let view = self.control_panel.settings.view;
        let table = self.dataset.table(view.source());
        tracing::info!("Selected {} ({} rows)", view.label(), table.len());
        self.control_panel.set_dates(table.dates());
        self.recompute();
    }

    /// Recompute metrics and the active view for the selected range.
    pub fn recompute(&mut self) {
        let view = self.control_panel.settings.view;

        let Some(range) = self.control_panel.selected_range() else {
            tracing::warn!("{} has no dates to select", view.label());
            self.chart_viewer.set_metrics(None);
            self.chart_viewer.set_no_data("The source table is empty");
            self.control_panel.export_enabled = false;
            return;
        };

        let metrics = match summary_metrics(&self.dataset, &range) {
            Ok((_, metrics)) => Some(metrics),
            Err(e) => {
                tracing::warn!("No daily totals for range: {}", e);
                None
            }
        };
        self.chart_viewer.set_metrics(metrics);

        match view.compute(&self.dataset, &range) {
            Ok(derived) => {
                self.chart_viewer.set_view(derived);
                self.control_panel.export_enabled = true;
                self.control_panel
                    .set_status(&format!("{} .. {}", range.start(), range.end()));
            }
            Err(e) => {
                tracing::warn!("No data for {}: {}", view.label(), e);
                self.chart_viewer.set_no_data(&e.to_string());
                self.control_panel.export_enabled = false;
                self.control_panel.set_status("No data for this range");
            }
        }
    }

    fn default_file_name(view: ViewKind, extension: &str) -> String {
        format!("{}_orders.{}", view.slug(), extension)
    }

    fn handle_export_csv(&mut self) {
        let Some(derived) = self.chart_viewer.view.as_ref() else {
            self.control_panel.set_status("No data to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(Self::default_file_name(derived.kind(), "csv"))
            .save_file()
        else {
            return; // User cancelled
        };

        match export_csv(derived, &path) {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Exported {}", path.display())),
            Err(e) => {
                tracing::error!("CSV export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_export_png(&mut self) {
        let Some(derived) = self.chart_viewer.view.as_ref() else {
            self.control_panel.set_status("No data to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(Self::default_file_name(derived.kind(), "png"))
            .save_file()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::render_png(
            &self.chart_viewer.charts,
            &path,
            PNG_WIDTH,
            PNG_PANEL_HEIGHT,
        )
        .map_err(|e| ExportError::Render(e.to_string()))
        {
            Ok(()) => self
                .control_panel
                .set_status(&format!("Exported {}", path.display())),
            Err(e) => {
                tracing::error!("PNG export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::ViewChanged => self.handle_view_changed(),
                        ControlPanelAction::RangeChanged => self.recompute(),
                        ControlPanelAction::ExportCsv => self.handle_export_csv(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        let view_kind = self.control_panel.settings.view;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(view_kind, ui);
        });
    }
}
