//! Stats module - Band thresholds and summary statistics

mod calculator;

pub use calculator::{
    BandThresholds, DescriptiveStats, StatsCalculator, SummaryMetrics, VolumeBand,
};
