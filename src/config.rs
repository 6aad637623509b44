//! Command-line configuration.

use crate::data::ViewKind;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DATA_DIR: &str = "dashboard/dataset";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Parser)]
#[command(name = "bikeshare-dashboard")]
#[command(about = "Bike rental transaction dashboard")]
pub struct DashboardConfig {
    /// Directory holding day.csv, monthly.csv, quarter.csv, cluster.csv,
    /// season.csv and weathersit.csv
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print one view's derived table instead of opening the window
    Report {
        /// monthly, quarter, season, weathersit or cluster
        #[arg(long, default_value = "monthly")]
        view: ViewKind,

        /// First day of the range (YYYY-MM-DD); defaults to the table start
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the range (YYYY-MM-DD); defaults to the table end
        #[arg(long)]
        end: Option<NaiveDate>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,

        /// Also write the derived table to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Table,
    Json,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data_dir".to_string(),
                reason: "Path cannot be empty".to_string(),
            });
        }

        if let Some(Command::Report {
            start: Some(start),
            end: Some(end),
            ..
        }) = &self.command
        {
            if start > end {
                return Err(ConfigError::InvalidValue {
                    field: "start".to_string(),
                    reason: format!("{} is after end {}", start, end),
                });
            }
        }

        Ok(())
    }
}
