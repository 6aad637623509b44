//! Data module - Table loading, bucketing and aggregation

mod bucket;
mod export;
mod filter;
mod loader;
pub mod pipeline;
mod record;
mod views;

pub use bucket::{days_in_month, is_leap_year, quarter_of, Bucket, Granularity};
pub use export::{export_csv, ExportError};
pub use filter::{filter_range, DateRange, InvalidInputError};
pub use loader::{DataLoader, Dataset, SourceKind, SourceTable, StartupLoadError};
pub use pipeline::{
    categorize_by_volume, daily_totals, monthly_totals, quarterly_totals, season_year_totals,
    weather_month_totals, CategorizedMonth, DailyTotal, MonthlyTotal, QuarterlyTotal,
    SeasonYearTotal, VolumeCategorization, WeatherMonthTotal,
};
pub use record::{Season, TransactionRecord, WeatherSituation};
pub use views::{summary_metrics, DerivedView, ViewKind};
