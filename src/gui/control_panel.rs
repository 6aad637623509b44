//! Control Panel Widget
//! Left side panel with the view selector, date range and export controls.

use crate::data::{DateRange, ViewKind};
use chrono::NaiveDate;
use egui::{Color32, ComboBox, RichText};

/// User selections driving the active view.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub view: ViewKind,
    pub start_idx: usize,
    pub end_idx: usize,
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    /// Distinct dates of the selected view's source table.
    pub dates: Vec<NaiveDate>,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            dates: Vec::new(),
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selectable dates and reset the range to their full span.
    pub fn set_dates(&mut self, dates: Vec<NaiveDate>) {
        self.settings.start_idx = 0;
        self.settings.end_idx = dates.len().saturating_sub(1);
        self.dates = dates;
    }

    /// Currently selected inclusive range, if the table has any dates.
    pub fn selected_range(&self) -> Option<DateRange> {
        let start = *self.dates.get(self.settings.start_idx)?;
        let end = *self.dates.get(self.settings.end_idx)?;
        DateRange::new(start, end).ok()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚲 Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Bike rental transactions").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== View Section =====
        ui.label(RichText::new("📊 Select data category").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("view_kind")
            .width(220.0)
            .selected_text(self.settings.view.label())
            .show_ui(ui, |ui| {
                for view in ViewKind::ALL {
                    if ui
                        .selectable_label(self.settings.view == view, view.label())
                        .clicked()
                        && self.settings.view != view
                    {
                        self.settings.view = view;
                        action = ControlPanelAction::ViewChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Range Section =====
        ui.label(RichText::new("📅 Range").size(14.0).strong());
        ui.add_space(5.0);

        if self.dates.is_empty() {
            ui.label(RichText::new("No dates in this table").color(Color32::GRAY));
        } else {
            let max_idx = self.dates.len() - 1;
            let label_width = 50.0;

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("From:"));
                let response = ui.add(
                    egui::Slider::new(&mut self.settings.start_idx, 0..=max_idx).show_value(false),
                );
                ui.label(self.dates[self.settings.start_idx].to_string());
                if response.changed() {
                    if self.settings.end_idx < self.settings.start_idx {
                        self.settings.end_idx = self.settings.start_idx;
                    }
                    action = ControlPanelAction::RangeChanged;
                }
            });

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("To:"));
                let response = ui.add(
                    egui::Slider::new(&mut self.settings.end_idx, 0..=max_idx).show_value(false),
                );
                ui.label(self.dates[self.settings.end_idx].to_string());
                if response.changed() {
                    if self.settings.start_idx > self.settings.end_idx {
                        self.settings.start_idx = self.settings.end_idx;
                    }
                    action = ControlPanelAction::RangeChanged;
                }
            });

            ui.add_space(5.0);
            if ui.small_button("Reset range").clicked() {
                self.settings.start_idx = 0;
                self.settings.end_idx = max_idx;
                action = ControlPanelAction::RangeChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let csv_button = egui::Button::new(RichText::new("💾 Export CSV").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(csv_button).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }

                ui.add_space(8.0);

                let png_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ViewChanged,
    RangeChanged,
    ExportCsv,
    ExportPng,
}
