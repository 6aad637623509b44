//! Bike Rental Dashboard
//!
//! Opens the interactive dashboard, or prints a single view with `report`.

use anyhow::Context;
use bikeshare_dashboard::data::export_csv;
use bikeshare_dashboard::logger;
use bikeshare_dashboard::{Command, DashboardApp, DashboardConfig, DataLoader, ViewReport};
use clap::Parser;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::parse();

    logger::init_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // Tables are loaded once; a missing or corrupt file is fatal.
    let loader = DataLoader::new(config.data_dir.clone());
    let dataset = match loader.load_dataset() {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::error!("Failed to load tables from {}: {}", loader.data_dir().display(), e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    match config.command {
        Some(Command::Report {
            view,
            start,
            end,
            format,
            export,
        }) => {
            let report = match ViewReport::build(&dataset, view, start, end) {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!("No data for {}: {}", view.label(), e);
                    eprintln!("No data: {}", e);
                    std::process::exit(2);
                }
            };

            println!("{}", report.render(format).context("Failed to render report")?);

            if let Some(path) = export {
                export_csv(&report.result, &path)
                    .with_context(|| format!("Failed to export {}", path.display()))?;
            }
            Ok(())
        }
        None => {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([1400.0, 850.0])
                    .with_min_inner_size([1000.0, 650.0])
                    .with_title("Bike Rental Dashboard"),
                ..Default::default()
            };

            eframe::run_native(
                "Bike Rental Dashboard",
                options,
                Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, dataset)))),
            )
            .map_err(|e| anyhow::anyhow!("Dashboard window failed: {}", e))
        }
    }
}
