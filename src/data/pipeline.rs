//! Aggregation Pipeline Module
//! Turns filtered transaction records into the derived tables behind each view.
//!
//! Every operation takes the records of an already-filtered range and fails
//! with [`InvalidInputError::EmptyTable`] when that slice is empty. Outputs
//! are fresh tables; nothing is cached between calls.

use crate::data::{
    Bucket, Granularity, InvalidInputError, Season, TransactionRecord, WeatherSituation,
};
use crate::stats::{BandThresholds, VolumeBand};
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// One row of the daily view; `total_transaction` is the renamed `count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_transaction: u64,
    pub casual: u64,
    pub registered: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: Bucket,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarterlyTotal {
    pub quarter: Bucket,
    pub casual: u64,
    pub registered: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonYearTotal {
    pub year: Bucket,
    pub season: Season,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherMonthTotal {
    pub month: Bucket,
    pub weather_situation: WeatherSituation,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedMonth {
    pub month: Bucket,
    pub count: u64,
    pub band: VolumeBand,
}

/// Monthly totals split into volume bands, with the thresholds used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeCategorization {
    pub thresholds: BandThresholds,
    pub months: Vec<CategorizedMonth>,
}

impl VolumeCategorization {
    /// Months of one band, in month order.
    pub fn band(&self, band: VolumeBand) -> impl Iterator<Item = &CategorizedMonth> {
        self.months.iter().filter(move |month| month.band == band)
    }
}

#[derive(Default, Clone, Copy)]
struct Sums {
    count: u64,
    casual: u64,
    registered: u64,
}

impl Sums {
    fn add(&mut self, record: &TransactionRecord) {
        self.count += record.count;
        self.casual += record.casual_count;
        self.registered += record.registered_count;
    }
}

fn ensure_not_empty<T>(records: &[T]) -> Result<(), InvalidInputError> {
    if records.is_empty() {
        return Err(InvalidInputError::EmptyTable);
    }
    Ok(())
}

/// Sum all count columns per key, keys ascending.
fn sum_by<T, K, F>(records: &[T], key: F) -> BTreeMap<K, Sums>
where
    T: Borrow<TransactionRecord>,
    K: Ord,
    F: Fn(&TransactionRecord) -> K,
{
    let mut groups: BTreeMap<K, Sums> = BTreeMap::new();
    for record in records.iter().map(Borrow::<TransactionRecord>::borrow) {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

pub fn daily_totals<T>(records: &[T]) -> Result<Vec<DailyTotal>, InvalidInputError>
where
    T: Borrow<TransactionRecord>,
{
    ensure_not_empty(records)?;

    let rows: Vec<DailyTotal> = sum_by(records, |r| r.date)
        .into_iter()
        .map(|(date, sums)| DailyTotal {
            date,
            total_transaction: sums.count,
            casual: sums.casual,
            registered: sums.registered,
        })
        .collect();

    tracing::debug!(rows = rows.len(), "Computed daily totals");
    Ok(rows)
}

pub fn monthly_totals<T>(records: &[T]) -> Result<Vec<MonthlyTotal>, InvalidInputError>
where
    T: Borrow<TransactionRecord>,
{
    ensure_not_empty(records)?;

    let rows: Vec<MonthlyTotal> = sum_by(records, |r| Bucket::of(r.date, Granularity::Month))
        .into_iter()
        .map(|(month, sums)| MonthlyTotal {
            month,
            count: sums.count,
        })
        .collect();

    tracing::debug!(rows = rows.len(), "Computed monthly totals");
    Ok(rows)
}

/// Casual and registered sums per quarter, kept as separate columns.
pub fn quarterly_totals<T>(records: &[T]) -> Result<Vec<QuarterlyTotal>, InvalidInputError>
where
    T: Borrow<TransactionRecord>,
{
    ensure_not_empty(records)?;

    let rows: Vec<QuarterlyTotal> =
        sum_by(records, |r| Bucket::of(r.date, Granularity::Quarter))
            .into_iter()
            .map(|(quarter, sums)| QuarterlyTotal {
                quarter,
                casual: sums.casual,
                registered: sums.registered,
            })
            .collect();

    tracing::debug!(rows = rows.len(), "Computed quarterly totals");
    Ok(rows)
}

/// Count per (year, season). Years ascend; seasons keep the order in which
/// they first appear within each year.
pub fn season_year_totals<T>(records: &[T]) -> Result<Vec<SeasonYearTotal>, InvalidInputError>
where
    T: Borrow<TransactionRecord>,
{
    ensure_not_empty(records)?;

    let mut years: BTreeMap<Bucket, Vec<(Season, u64)>> = BTreeMap::new();
    for record in records.iter().map(Borrow::<TransactionRecord>::borrow) {
        let seasons = years
            .entry(Bucket::of(record.date, Granularity::Year))
            .or_default();
        match seasons.iter_mut().find(|(season, _)| *season == record.season) {
            Some((_, count)) => *count += record.count,
            None => seasons.push((record.season, record.count)),
        }
    }

    let rows: Vec<SeasonYearTotal> = years
        .into_iter()
        .flat_map(|(year, seasons)| {
            seasons
                .into_iter()
                .map(move |(season, count)| SeasonYearTotal { year, season, count })
        })
        .collect();

    tracing::debug!(rows = rows.len(), "Computed season/year totals");
    Ok(rows)
}

pub fn weather_month_totals<T>(
    records: &[T],
) -> Result<Vec<WeatherMonthTotal>, InvalidInputError>
where
    T: Borrow<TransactionRecord>,
{
    ensure_not_empty(records)?;

    let rows: Vec<WeatherMonthTotal> = sum_by(records, |r| {
        (Bucket::of(r.date, Granularity::Month), r.weather_situation)
    })
    .into_iter()
    .map(|((month, weather_situation), sums)| WeatherMonthTotal {
        month,
        weather_situation,
        count: sums.count,
    })
    .collect();

    tracing::debug!(rows = rows.len(), "Computed weather/month totals");
    Ok(rows)
}

/// Monthly totals banded by the mean and standard deviation of the months
/// in `records`. Thresholds depend only on the records passed in.
pub fn categorize_by_volume<T>(records: &[T]) -> Result<VolumeCategorization, InvalidInputError>
where
    T: Borrow<TransactionRecord>,
{
    let monthly = monthly_totals(records)?;
    let values: Vec<f64> = monthly.iter().map(|m| m.count as f64).collect();
    let thresholds = BandThresholds::from_values(&values);

    let months: Vec<CategorizedMonth> = monthly
        .into_iter()
        .map(|m| CategorizedMonth {
            band: thresholds.classify(m.count as f64),
            month: m.month,
            count: m.count,
        })
        .collect();

    tracing::debug!(
        months = months.len(),
        mean = thresholds.mean,
        std_dev = thresholds.std_dev,
        degenerate = thresholds.degenerate,
        "Categorized months by volume"
    );
    Ok(VolumeCategorization { thresholds, months })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(y: i32, m: u32, d: u32, casual: u64, registered: u64) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            casual,
            registered,
            Season::Winter,
            WeatherSituation::Clear,
        )
    }

    #[test]
    fn test_every_operation_rejects_empty_input() {
        let empty: Vec<TransactionRecord> = Vec::new();
        assert_eq!(daily_totals(&empty), Err(InvalidInputError::EmptyTable));
        assert_eq!(monthly_totals(&empty), Err(InvalidInputError::EmptyTable));
        assert_eq!(quarterly_totals(&empty), Err(InvalidInputError::EmptyTable));
        assert_eq!(season_year_totals(&empty), Err(InvalidInputError::EmptyTable));
        assert_eq!(weather_month_totals(&empty), Err(InvalidInputError::EmptyTable));
        assert_eq!(categorize_by_volume(&empty), Err(InvalidInputError::EmptyTable));
    }

    #[test]
    fn test_monthly_totals_skip_missing_months() {
        let records = vec![
            record(2011, 1, 5, 1, 9),
            record(2011, 1, 6, 2, 8),
            record(2011, 3, 1, 5, 5),
        ];
        let monthly = monthly_totals(&records).unwrap();
        let labels: Vec<_> = monthly.iter().map(|m| m.month.label()).collect();
        assert_eq!(labels, vec!["2011-01", "2011-03"]);
        assert_eq!(monthly[0].count, 20);
        assert_eq!(monthly[1].count, 10);
    }

    #[test]
    fn test_daily_totals_are_sorted_by_date() {
        let records = vec![record(2011, 1, 3, 1, 1), record(2011, 1, 1, 2, 2)];
        let daily = daily_totals(&records).unwrap();
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(daily[0].total_transaction, 4);
    }

    #[test]
    fn test_categorization_reports_thresholds() {
        let records = vec![
            record(2011, 1, 1, 0, 10),
            record(2011, 2, 1, 0, 20),
            record(2011, 3, 1, 0, 30),
        ];
        let result = categorize_by_volume(&records).unwrap();
        assert!((result.thresholds.mean - 20.0).abs() < 1e-9);
        assert_eq!(result.band(VolumeBand::Low).count(), 2);
        assert_eq!(result.band(VolumeBand::Medium).count(), 1);
        assert_eq!(result.band(VolumeBand::High).count(), 0);
    }
}
