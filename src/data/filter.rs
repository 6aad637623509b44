//! Date-Range Filter Module
//! Inclusive date window applied before any aggregation.

use crate::data::TransactionRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Borrow;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("No records between {start} and {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
    #[error("Range start {start} is after range end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("No records to aggregate")]
    EmptyTable,
}

/// Inclusive `[start, end]` date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidInputError> {
        if start > end {
            return Err(InvalidInputError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Records dated inside `range`, in input order.
///
/// An empty result is an error so callers can show "no data" instead of an
/// empty chart.
pub fn filter_range<'a, T>(
    records: &'a [T],
    range: &DateRange,
) -> Result<Vec<&'a TransactionRecord>, InvalidInputError>
where
    T: Borrow<TransactionRecord>,
{
    let filtered: Vec<&TransactionRecord> = records
        .iter()
        .map(Borrow::<TransactionRecord>::borrow)
        .filter(|record| range.contains(record.date))
        .collect();

    if filtered.is_empty() {
        return Err(InvalidInputError::EmptyRange {
            start: range.start,
            end: range.end,
        });
    }

    tracing::trace!(
        kept = filtered.len(),
        total = records.len(),
        "Filtered records to {}..={}",
        range.start,
        range.end
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Season, WeatherSituation};

    fn record(day: u32) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2011, 3, day).unwrap(),
            10,
            20,
            Season::Spring,
            WeatherSituation::Clear,
        )
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let start = NaiveDate::from_ymd_opt(2011, 3, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2011, 3, 1).unwrap();
        assert_eq!(
            DateRange::new(start, end),
            Err(InvalidInputError::InvertedRange { start, end })
        );
        assert!(DateRange::new(start, start).is_ok());
    }

    #[test]
    fn test_filter_is_inclusive_on_both_ends() {
        let records: Vec<_> = (1..=10).map(record).collect();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2011, 3, 3).unwrap(),
            NaiveDate::from_ymd_opt(2011, 3, 6).unwrap(),
        )
        .unwrap();

        let kept = filter_range(&records, &range).unwrap();
        let days: Vec<_> = kept.iter().map(|r| r.date.format("%d").to_string()).collect();
        assert_eq!(days, vec!["03", "04", "05", "06"]);
    }

    #[test]
    fn test_filter_to_empty_window_is_an_error() {
        let records: Vec<_> = (1..=10).map(record).collect();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2012, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2012, 1, 31).unwrap(),
        )
        .unwrap();

        assert!(matches!(
            filter_range(&records, &range),
            Err(InvalidInputError::EmptyRange { .. })
        ));
    }
}
