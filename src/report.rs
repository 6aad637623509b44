//! Headless view reports for the `report` subcommand.

use crate::config::ReportFormat;
use crate::data::{summary_metrics, Dataset, DateRange, DerivedView, InvalidInputError, ViewKind};
use crate::stats::{DescriptiveStats, StatsCalculator, SummaryMetrics};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// Everything the dashboard shows for one view, without the charts.
#[derive(Debug, Clone, Serialize)]
pub struct ViewReport {
    pub title: &'static str,
    pub range: DateRange,
    pub metrics: Option<SummaryMetrics>,
    pub stats: DescriptiveStats,
    pub result: DerivedView,
}

impl ViewReport {
    /// Compute `view` over `[start, end]`; missing bounds default to the
    /// bounds of the view's source table.
    pub fn build(
        dataset: &Dataset,
        view: ViewKind,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, InvalidInputError> {
        let range = resolve_range(dataset, view, start, end)?;
        let result = view.compute(dataset, &range)?;
        let metrics = summary_metrics(dataset, &range).ok().map(|(_, m)| m);
        let stats = StatsCalculator::compute_descriptive_stats(&result.row_totals());

        Ok(Self {
            title: view.title(),
            range,
            metrics,
            stats,
            result,
        })
    }

    pub fn render(&self, format: ReportFormat) -> serde_json::Result<String> {
        match format {
            ReportFormat::Table => Ok(self.to_table_string()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    /// Plain-text rendering with aligned columns.
    pub fn to_table_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "Range: {} .. {}", self.range.start(), self.range.end());

        match &self.metrics {
            Some(m) => {
                let _ = writeln!(out, "Total Transaction: {}", m.total_transaction);
                let _ = writeln!(out, "Total Casual Customers: {}", m.total_casual);
                let _ = writeln!(out, "Total Registered Customers: {}", m.total_registered);
            }
            None => {
                let _ = writeln!(out, "Totals: no daily data in range");
            }
        }

        if let DerivedView::Cluster(result) = &self.result {
            let t = &result.thresholds;
            if t.degenerate {
                let _ = writeln!(out, "Bands: degenerate sample, all months Medium");
            } else {
                let _ = writeln!(
                    out,
                    "Bands: Low <= {:.1} < Medium <= {:.1} < High",
                    t.mean,
                    t.high_cutoff()
                );
            }
        }
        let _ = writeln!(out);

        let (headers, rows) = self.result.table();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let header_line: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<width$}", h, width = *w))
            .collect();
        let _ = writeln!(out, "{}", header_line.join("  ").trim_end());

        for row in &rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
                .collect();
            let _ = writeln!(out, "{}", line.join("  ").trim_end());
        }

        out
    }
}

fn resolve_range(
    dataset: &Dataset,
    view: ViewKind,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateRange, InvalidInputError> {
    let bounds = dataset.table(view.source()).date_bounds();
    let start = start.or(bounds.map(|(s, _)| s));
    let end = end.or(bounds.map(|(_, e)| e));
    match (start, end) {
        (Some(start), Some(end)) => DateRange::new(start, end),
        _ => Err(InvalidInputError::EmptyTable),
    }
}
