//! CSV Data Loader Module
//! Reads the rental tables with Polars into immutable record tables.

use crate::data::{DateRange, Season, TransactionRecord, WeatherSituation};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DATE_COL: &str = "dteday";
pub const COUNT_COL: &str = "cnt";
pub const CASUAL_COL: &str = "casual";
pub const REGISTERED_COL: &str = "registered";
pub const SEASON_COL: &str = "season";
pub const WEATHER_COL: &str = "weathersit";

#[derive(Error, Debug)]
pub enum StartupLoadError {
    #[error("Missing input file: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Failed to load CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Missing column '{column}' in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("Invalid value in column '{column}' of {} at row {row}: {reason}", .path.display())]
    InvalidValue {
        path: PathBuf,
        column: String,
        row: usize,
        reason: String,
    },
}

/// The six tables read at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Day,
    Monthly,
    Quarter,
    Cluster,
    Season,
    Weathersit,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        SourceKind::Day,
        SourceKind::Monthly,
        SourceKind::Quarter,
        SourceKind::Cluster,
        SourceKind::Season,
        SourceKind::Weathersit,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SourceKind::Day => "day.csv",
            SourceKind::Monthly => "monthly.csv",
            SourceKind::Quarter => "quarter.csv",
            SourceKind::Cluster => "cluster.csv",
            SourceKind::Season => "season.csv",
            SourceKind::Weathersit => "weathersit.csv",
        }
    }
}

/// An immutable table of records sorted by date.
#[derive(Debug, Clone)]
pub struct SourceTable {
    name: String,
    records: Vec<TransactionRecord>,
}

impl SourceTable {
    pub fn new(name: impl Into<String>, mut records: Vec<TransactionRecord>) -> Self {
        records.sort_by_key(|record| record.date);
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest dates in the table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date, last.date))
    }

    /// Range covering the whole table.
    pub fn full_range(&self) -> Option<DateRange> {
        let (start, end) = self.date_bounds()?;
        DateRange::new(start, end).ok()
    }

    /// Distinct dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        dates.dedup();
        dates
    }
}

/// All startup tables, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Dataset {
    day: SourceTable,
    monthly: SourceTable,
    quarter: SourceTable,
    cluster: SourceTable,
    season: SourceTable,
    weathersit: SourceTable,
}

impl Dataset {
    pub fn new(
        day: SourceTable,
        monthly: SourceTable,
        quarter: SourceTable,
        cluster: SourceTable,
        season: SourceTable,
        weathersit: SourceTable,
    ) -> Self {
        Self {
            day,
            monthly,
            quarter,
            cluster,
            season,
            weathersit,
        }
    }

    pub fn table(&self, kind: SourceKind) -> &SourceTable {
        match kind {
            SourceKind::Day => &self.day,
            SourceKind::Monthly => &self.monthly,
            SourceKind::Quarter => &self.quarter,
            SourceKind::Cluster => &self.cluster,
            SourceKind::Season => &self.season,
            SourceKind::Weathersit => &self.weathersit,
        }
    }
}

/// Loads rental tables from a data directory.
pub struct DataLoader {
    data_dir: PathBuf,
}

impl DataLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load all six tables. Any missing or malformed file is fatal.
    pub fn load_dataset(&self) -> Result<Dataset, StartupLoadError> {
        Ok(Dataset::new(
            self.load_table(SourceKind::Day)?,
            self.load_table(SourceKind::Monthly)?,
            self.load_table(SourceKind::Quarter)?,
            self.load_table(SourceKind::Cluster)?,
            self.load_table(SourceKind::Season)?,
            self.load_table(SourceKind::Weathersit)?,
        ))
    }

    pub fn load_table(&self, kind: SourceKind) -> Result<SourceTable, StartupLoadError> {
        let path = self.data_dir.join(kind.file_name());
        let records = Self::load_records(&path)?;
        tracing::info!(
            "Loaded {} rows from {}",
            records.len(),
            path.display()
        );
        Ok(SourceTable::new(kind.file_name(), records))
    }

    /// Read a CSV file and convert every row to a [`TransactionRecord`].
    pub fn load_records(path: &Path) -> Result<Vec<TransactionRecord>, StartupLoadError> {
        if !path.is_file() {
            return Err(StartupLoadError::MissingFile(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| StartupLoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        Self::records_from_dataframe(&df, path)
    }

    /// Convert a loaded frame into records; `path` is only used in errors.
    pub fn records_from_dataframe(
        df: &DataFrame,
        path: &Path,
    ) -> Result<Vec<TransactionRecord>, StartupLoadError> {
        let dates = string_column(df, path, DATE_COL)?;
        let counts = integer_column(df, path, COUNT_COL)?;
        let casual = integer_column(df, path, CASUAL_COL)?;
        let registered = integer_column(df, path, REGISTERED_COL)?;
        let seasons = string_column(df, path, SEASON_COL)?;
        let weather = string_column(df, path, WEATHER_COL)?;

        let invalid = |column: &str, row: usize, reason: String| StartupLoadError::InvalidValue {
            path: path.to_path_buf(),
            column: column.to_string(),
            row,
            reason,
        };

        let mut records = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let raw_date = dates[row]
                .as_deref()
                .ok_or_else(|| invalid(DATE_COL, row, "empty date".to_string()))?;
            let date = parse_date(raw_date)
                .ok_or_else(|| invalid(DATE_COL, row, format!("unparseable date '{}'", raw_date)))?;

            let count = non_negative(counts[row])
                .ok_or_else(|| invalid(COUNT_COL, row, "expected a non-negative integer".into()))?;
            let casual_count = non_negative(casual[row])
                .ok_or_else(|| invalid(CASUAL_COL, row, "expected a non-negative integer".into()))?;
            let registered_count = non_negative(registered[row]).ok_or_else(|| {
                invalid(REGISTERED_COL, row, "expected a non-negative integer".into())
            })?;

            let raw_season = seasons[row].as_deref().unwrap_or_default();
            let season = Season::parse(raw_season)
                .ok_or_else(|| invalid(SEASON_COL, row, format!("unknown season '{}'", raw_season)))?;
            let raw_weather = weather[row].as_deref().unwrap_or_default();
            let weather_situation = WeatherSituation::parse(raw_weather).ok_or_else(|| {
                invalid(WEATHER_COL, row, format!("unknown weather situation '{}'", raw_weather))
            })?;

            records.push(TransactionRecord {
                date,
                count,
                casual_count,
                registered_count,
                season,
                weather_situation,
            });
        }

        Ok(records)
    }
}

/// Accepts `YYYY-MM-DD`, ignoring any trailing time component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

fn non_negative(value: Option<i64>) -> Option<u64> {
    value.and_then(|v| u64::try_from(v).ok())
}

fn column<'a>(df: &'a DataFrame, path: &Path, name: &str) -> Result<&'a Column, StartupLoadError> {
    df.column(name).map_err(|_| StartupLoadError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })
}

fn string_column(
    df: &DataFrame,
    path: &Path,
    name: &str,
) -> Result<Vec<Option<String>>, StartupLoadError> {
    let casted = column(df, path, name)?
        .cast(&DataType::String)
        .map_err(|source| StartupLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    let values = casted.str().map_err(|source| StartupLoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(values.into_iter().map(|v| v.map(str::to_string)).collect())
}

fn integer_column(
    df: &DataFrame,
    path: &Path,
    name: &str,
) -> Result<Vec<Option<i64>>, StartupLoadError> {
    let casted = column(df, path, name)?
        .cast(&DataType::Int64)
        .map_err(|source| StartupLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    let values = casted.i64().map_err(|source| StartupLoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(values.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_ignores_time_component() {
        let expected = NaiveDate::from_ymd_opt(2011, 1, 31);
        assert_eq!(parse_date("2011-01-31"), expected);
        assert_eq!(parse_date("2011-01-31 00:00:00"), expected);
        assert_eq!(parse_date("31/01/2011"), None);
    }

    #[test]
    fn test_non_negative_rejects_nulls_and_negatives() {
        assert_eq!(non_negative(Some(5)), Some(5));
        assert_eq!(non_negative(Some(-1)), None);
        assert_eq!(non_negative(None), None);
    }

    #[test]
    fn test_source_table_sorts_and_reports_bounds() {
        let make = |d| {
            TransactionRecord::new(
                NaiveDate::from_ymd_opt(2012, 6, d).unwrap(),
                1,
                1,
                Season::Summer,
                WeatherSituation::Clear,
            )
        };
        let table = SourceTable::new("day.csv", vec![make(9), make(2), make(5)]);
        let (start, end) = table.date_bounds().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2012, 6, 2).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2012, 6, 9).unwrap());
        assert_eq!(table.dates().len(), 3);

        let empty = SourceTable::new("empty.csv", Vec::new());
        assert!(empty.full_range().is_none());
    }
}
