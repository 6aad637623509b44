//! Date Bucketing Module
//! Calendar-aware grouping keys for day, month, quarter and year resampling.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Resampling granularity for a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Granularity {
    Day,
    Month,
    Quarter,
    Year,
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Calendar quarter (1-4) containing `month`.
pub fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

impl Granularity {
    /// First day of the bucket containing `date`.
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Month => date - Days::new(u64::from(date.day0())),
            Granularity::Quarter => {
                // Walk back over the preceding months of the quarter.
                let mut start = Granularity::Month.start_of(date);
                let mut month = date.month();
                while (month - 1) % 3 != 0 {
                    month -= 1;
                    start = start - Days::new(u64::from(days_in_month(date.year(), month)));
                }
                start
            }
            Granularity::Year => date - Days::new(u64::from(date.ordinal0())),
        }
    }

    /// Length in days of the bucket starting at `start`.
    fn span_days(self, start: NaiveDate) -> u64 {
        let year = start.year();
        match self {
            Granularity::Day => 1,
            Granularity::Month => u64::from(days_in_month(year, start.month())),
            Granularity::Quarter => (start.month()..start.month() + 3)
                .map(|month| u64::from(days_in_month(year, month)))
                .sum(),
            Granularity::Year => {
                if is_leap_year(year) {
                    366
                } else {
                    365
                }
            }
        }
    }
}

/// A resampled date bucket. Ordering follows the bucket start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bucket {
    granularity: Granularity,
    start: NaiveDate,
}

impl Bucket {
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        Self {
            granularity,
            start: granularity.start_of(date),
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day (inclusive) of the bucket.
    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(self.granularity.span_days(self.start) - 1)
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// Display label: `YYYY-MM-DD` for days, `YYYY-MM` for months, the end
    /// date for quarters and `YYYY` for years.
    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Day => self.start.format("%Y-%m-%d").to_string(),
            Granularity::Month => self.start.format("%Y-%m").to_string(),
            Granularity::Quarter => self.end().format("%Y-%m-%d").to_string(),
            Granularity::Year => self.start.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}
