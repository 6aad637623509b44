//! Derived table export via Polars.

use crate::data::DerivedView;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Chart rendering failed: {0}")]
    Render(String),
}

/// Write the view's derived table as CSV with a header row.
pub fn export_csv(view: &DerivedView, output_path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut df = view.to_dataframe()?;
    let mut file = File::create(output_path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;

    tracing::info!(
        "Exported {} rows of {} to {}",
        df.height(),
        view.kind().label(),
        output_path.display()
    );
    Ok(())
}
