//! Bike Rental Dashboard - transaction aggregates, statistics and charts
//!
//! Loads the rental tables once at startup and recomputes the selected view
//! for every date-range change.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logger;
pub mod report;
pub mod stats;

pub use config::{Command, DashboardConfig, ReportFormat};
pub use data::{DataLoader, Dataset, DateRange, DerivedView, InvalidInputError, StartupLoadError, ViewKind};
pub use gui::DashboardApp;
pub use report::ViewReport;
