//! Statistics Calculator Module
//! Volume band thresholds, headline metrics and descriptive statistics.

use crate::data::DailyTotal;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fmt;

/// Transaction volume band of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VolumeBand {
    Low,
    Medium,
    High,
}

impl VolumeBand {
    pub const ALL: [VolumeBand; 3] = [VolumeBand::Low, VolumeBand::Medium, VolumeBand::High];

    pub fn label(self) -> &'static str {
        match self {
            VolumeBand::Low => "Low Transaction",
            VolumeBand::Medium => "Medium Transaction",
            VolumeBand::High => "High Transaction",
        }
    }
}

impl fmt::Display for VolumeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean / standard deviation cut points for [`VolumeBand`].
///
/// Low: `count <= mean`. Medium: `mean < count <= mean + std_dev`.
/// High: `count > mean + std_dev`. A degenerate sample (fewer than two
/// values, or no spread) puts everything in Medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandThresholds {
    pub mean: f64,
    pub std_dev: f64,
    pub sample_size: usize,
    pub degenerate: bool,
}

impl BandThresholds {
    /// Thresholds from a sample of totals, using the sample (n-1) deviation.
    pub fn from_values(values: &[f64]) -> Self {
        let sample_size = values.len();
        let mean = if values.is_empty() {
            f64::NAN
        } else {
            values.iter().mean()
        };
        let std_dev = if sample_size > 1 {
            values.iter().std_dev()
        } else {
            f64::NAN
        };
        let degenerate = sample_size < 2 || !std_dev.is_finite() || std_dev <= 0.0;

        Self {
            mean,
            std_dev,
            sample_size,
            degenerate,
        }
    }

    /// Upper bound (inclusive) of the Medium band.
    pub fn high_cutoff(&self) -> f64 {
        self.mean + self.std_dev
    }

    pub fn classify(&self, value: f64) -> VolumeBand {
        if self.degenerate {
            VolumeBand::Medium
        } else if value <= self.mean {
            VolumeBand::Low
        } else if value <= self.high_cutoff() {
            VolumeBand::Medium
        } else {
            VolumeBand::High
        }
    }
}

/// Headline totals shown above every view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryMetrics {
    pub total_transaction: u64,
    pub total_casual: u64,
    pub total_registered: u64,
}

impl SummaryMetrics {
    pub fn from_daily(daily: &[DailyTotal]) -> Self {
        daily.iter().fold(Self::default(), |acc, day| Self {
            total_transaction: acc.total_transaction + day.total_transaction,
            total_casual: acc.total_casual + day.casual,
            total_registered: acc.total_registered + day.registered,
        })
    }
}

/// Descriptive statistics of one series of view values.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            total: 0.0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let std = if n > 1 { values.iter().std_dev() } else { 0.0 };

        DescriptiveStats {
            count: n,
            total: values.iter().sum(),
            mean: values.iter().mean(),
            median: Self::percentile(&sorted, 50.0),
            std,
            min: sorted[0],
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_use_sample_deviation() {
        let thresholds = BandThresholds::from_values(&[10.0, 20.0, 30.0]);
        assert!((thresholds.mean - 20.0).abs() < 1e-9);
        assert!((thresholds.std_dev - 10.0).abs() < 1e-9);
        assert!(!thresholds.degenerate);
    }

    #[test]
    fn test_classify_boundaries_are_inclusive_above() {
        let thresholds = BandThresholds::from_values(&[10.0, 20.0, 30.0]);
        assert_eq!(thresholds.classify(10.0), VolumeBand::Low);
        assert_eq!(thresholds.classify(20.0), VolumeBand::Low);
        assert_eq!(thresholds.classify(30.0), VolumeBand::Medium);
        assert_eq!(thresholds.classify(30.5), VolumeBand::High);
    }

    #[test]
    fn test_degenerate_samples_fall_in_medium() {
        let single = BandThresholds::from_values(&[42.0]);
        assert!(single.degenerate);
        assert_eq!(single.classify(42.0), VolumeBand::Medium);

        let flat = BandThresholds::from_values(&[5.0, 5.0, 5.0]);
        assert!(flat.degenerate);
        assert_eq!(flat.classify(5.0), VolumeBand::Medium);

        let empty = BandThresholds::from_values(&[]);
        assert!(empty.degenerate);
        assert_eq!(empty.sample_size, 0);
    }

    #[test]
    fn test_descriptive_stats() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.total, 10.0);
        assert!((stats.mean - 2.5).abs() < 1e-9);
        assert!((stats.median - 2.5).abs() < 1e-9);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);

        let empty = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 3.0);
        assert!((StatsCalculator::percentile(&sorted, 95.0) - 4.8).abs() < 1e-9);
    }
}
