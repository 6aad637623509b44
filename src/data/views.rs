//! Dashboard Views Module
//! Maps a view selection to its source table and pipeline operation.

use crate::data::pipeline::{
    categorize_by_volume, daily_totals, monthly_totals, quarterly_totals, season_year_totals,
    weather_month_totals, DailyTotal, MonthlyTotal, QuarterlyTotal, SeasonYearTotal,
    VolumeCategorization, WeatherMonthTotal,
};
use crate::data::{filter_range, Dataset, DateRange, InvalidInputError, SourceKind, SourceTable};
use crate::stats::SummaryMetrics;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The five views offered by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ViewKind {
    #[default]
    Monthly,
    Quarter,
    Season,
    Weathersit,
    Cluster,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Monthly,
        ViewKind::Quarter,
        ViewKind::Season,
        ViewKind::Weathersit,
        ViewKind::Cluster,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Monthly => "Monthly Orders",
            ViewKind::Quarter => "Quarter Orders",
            ViewKind::Season => "Season Orders",
            ViewKind::Weathersit => "Weathersit Orders",
            ViewKind::Cluster => "Cluster Orders",
        }
    }

    /// Chart heading shown above the view.
    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Monthly => "Monthly Orders",
            ViewKind::Quarter => "Transactions by Customer Type each Quarter",
            ViewKind::Season => "Total Transactions per Season (Grouped by year)",
            ViewKind::Weathersit => "Total Transactions Grouped by weathersit (monthly)",
            ViewKind::Cluster => "Transaction segmentation",
        }
    }

    /// Short name used on the command line and in export file names.
    pub fn slug(self) -> &'static str {
        match self {
            ViewKind::Monthly => "monthly",
            ViewKind::Quarter => "quarter",
            ViewKind::Season => "season",
            ViewKind::Weathersit => "weathersit",
            ViewKind::Cluster => "cluster",
        }
    }

    pub fn source(self) -> SourceKind {
        match self {
            ViewKind::Monthly => SourceKind::Monthly,
            ViewKind::Quarter => SourceKind::Quarter,
            ViewKind::Season => SourceKind::Season,
            ViewKind::Weathersit => SourceKind::Weathersit,
            ViewKind::Cluster => SourceKind::Cluster,
        }
    }

    /// Filter the view's source table to `range` and aggregate it.
    pub fn compute(
        self,
        dataset: &Dataset,
        range: &DateRange,
    ) -> Result<DerivedView, InvalidInputError> {
        self.compute_from(dataset.table(self.source()), range)
    }

    pub fn compute_from(
        self,
        table: &SourceTable,
        range: &DateRange,
    ) -> Result<DerivedView, InvalidInputError> {
        let records = filter_range(table.records(), range)?;
        let view = match self {
            ViewKind::Monthly => DerivedView::Monthly(monthly_totals(&records)?),
            ViewKind::Quarter => DerivedView::Quarter(quarterly_totals(&records)?),
            ViewKind::Season => DerivedView::Season(season_year_totals(&records)?),
            ViewKind::Weathersit => DerivedView::Weathersit(weather_month_totals(&records)?),
            ViewKind::Cluster => DerivedView::Cluster(categorize_by_volume(&records)?),
        };
        tracing::info!(
            view = self.slug(),
            rows = view.row_count(),
            "Computed {} for {}..={}",
            self.label(),
            range.start(),
            range.end()
        );
        Ok(view)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ViewKind::ALL
            .into_iter()
            .find(|view| view.slug() == wanted || view.label().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = ViewKind::ALL.iter().map(|v| v.slug()).collect();
                format!("unknown view '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Output of one view computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "rows", rename_all = "snake_case")]
pub enum DerivedView {
    Monthly(Vec<MonthlyTotal>),
    Quarter(Vec<QuarterlyTotal>),
    Season(Vec<SeasonYearTotal>),
    Weathersit(Vec<WeatherMonthTotal>),
    Cluster(VolumeCategorization),
}

impl DerivedView {
    pub fn kind(&self) -> ViewKind {
        match self {
            DerivedView::Monthly(_) => ViewKind::Monthly,
            DerivedView::Quarter(_) => ViewKind::Quarter,
            DerivedView::Season(_) => ViewKind::Season,
            DerivedView::Weathersit(_) => ViewKind::Weathersit,
            DerivedView::Cluster(_) => ViewKind::Cluster,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            DerivedView::Monthly(rows) => rows.len(),
            DerivedView::Quarter(rows) => rows.len(),
            DerivedView::Season(rows) => rows.len(),
            DerivedView::Weathersit(rows) => rows.len(),
            DerivedView::Cluster(result) => result.months.len(),
        }
    }

    /// Per-row transaction totals, used for the statistics strip.
    pub fn row_totals(&self) -> Vec<f64> {
        match self {
            DerivedView::Monthly(rows) => rows.iter().map(|r| r.count as f64).collect(),
            DerivedView::Quarter(rows) => rows
                .iter()
                .map(|r| (r.casual + r.registered) as f64)
                .collect(),
            DerivedView::Season(rows) => rows.iter().map(|r| r.count as f64).collect(),
            DerivedView::Weathersit(rows) => rows.iter().map(|r| r.count as f64).collect(),
            DerivedView::Cluster(result) => {
                result.months.iter().map(|m| m.count as f64).collect()
            }
        }
    }

    /// Column names and string cells, in display order.
    pub fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        match self {
            DerivedView::Monthly(rows) => (
                vec!["dteday", "cnt"],
                rows.iter()
                    .map(|r| vec![r.month.label(), r.count.to_string()])
                    .collect(),
            ),
            DerivedView::Quarter(rows) => (
                vec!["dteday", "casual", "registered"],
                rows.iter()
                    .map(|r| {
                        vec![
                            r.quarter.label(),
                            r.casual.to_string(),
                            r.registered.to_string(),
                        ]
                    })
                    .collect(),
            ),
            DerivedView::Season(rows) => (
                vec!["dteday", "season", "cnt"],
                rows.iter()
                    .map(|r| {
                        vec![
                            r.year.label(),
                            r.season.label().to_string(),
                            r.count.to_string(),
                        ]
                    })
                    .collect(),
            ),
            DerivedView::Weathersit(rows) => (
                vec!["dteday", "weathersit", "cnt"],
                rows.iter()
                    .map(|r| {
                        vec![
                            r.month.label(),
                            r.weather_situation.label().to_string(),
                            r.count.to_string(),
                        ]
                    })
                    .collect(),
            ),
            DerivedView::Cluster(result) => (
                vec!["dteday", "cnt", "category"],
                result
                    .months
                    .iter()
                    .map(|m| {
                        vec![
                            m.month.label(),
                            m.count.to_string(),
                            m.band.label().to_string(),
                        ]
                    })
                    .collect(),
            ),
        }
    }

    /// Typed Polars frame of the view, for CSV export.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        match self {
            DerivedView::Monthly(rows) => DataFrame::new(vec![
                Column::new(
                    "dteday".into(),
                    rows.iter().map(|r| r.month.label()).collect::<Vec<_>>(),
                ),
                Column::new("cnt".into(), rows.iter().map(|r| r.count).collect::<Vec<_>>()),
            ]),
            DerivedView::Quarter(rows) => DataFrame::new(vec![
                Column::new(
                    "dteday".into(),
                    rows.iter().map(|r| r.quarter.label()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "casual".into(),
                    rows.iter().map(|r| r.casual).collect::<Vec<_>>(),
                ),
                Column::new(
                    "registered".into(),
                    rows.iter().map(|r| r.registered).collect::<Vec<_>>(),
                ),
            ]),
            DerivedView::Season(rows) => DataFrame::new(vec![
                Column::new(
                    "dteday".into(),
                    rows.iter().map(|r| r.year.label()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "season".into(),
                    rows.iter().map(|r| r.season.code() as u32).collect::<Vec<_>>(),
                ),
                Column::new("cnt".into(), rows.iter().map(|r| r.count).collect::<Vec<_>>()),
            ]),
            DerivedView::Weathersit(rows) => DataFrame::new(vec![
                Column::new(
                    "dteday".into(),
                    rows.iter().map(|r| r.month.label()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "weathersit".into(),
                    rows.iter()
                        .map(|r| r.weather_situation.code() as u32)
                        .collect::<Vec<_>>(),
                ),
                Column::new("cnt".into(), rows.iter().map(|r| r.count).collect::<Vec<_>>()),
            ]),
            DerivedView::Cluster(result) => DataFrame::new(vec![
                Column::new(
                    "dteday".into(),
                    result.months.iter().map(|m| m.month.label()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "cnt".into(),
                    result.months.iter().map(|m| m.count).collect::<Vec<_>>(),
                ),
                Column::new(
                    "category".into(),
                    result
                        .months
                        .iter()
                        .map(|m| m.band.label().to_string())
                        .collect::<Vec<_>>(),
                ),
            ]),
        }
    }
}

/// Headline totals from the day table over `range`.
pub fn summary_metrics(
    dataset: &Dataset,
    range: &DateRange,
) -> Result<(Vec<DailyTotal>, SummaryMetrics), InvalidInputError> {
    let records = filter_range(dataset.table(SourceKind::Day).records(), range)?;
    let daily = daily_totals(&records)?;
    let metrics = SummaryMetrics::from_daily(&daily);
    Ok((daily, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_kind_from_str() {
        assert_eq!("monthly".parse::<ViewKind>(), Ok(ViewKind::Monthly));
        assert_eq!("Cluster Orders".parse::<ViewKind>(), Ok(ViewKind::Cluster));
        assert_eq!(" WEATHERSIT ".parse::<ViewKind>(), Ok(ViewKind::Weathersit));
        assert!("daily".parse::<ViewKind>().is_err());
    }

    #[test]
    fn test_each_view_reads_its_own_table() {
        assert_eq!(ViewKind::Monthly.source(), SourceKind::Monthly);
        assert_eq!(ViewKind::Cluster.source(), SourceKind::Cluster);
        assert_eq!(ViewKind::Season.source().file_name(), "season.csv");
    }
}
