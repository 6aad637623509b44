//! Chart Data Module
//! Backend-neutral series built from a derived view.

use crate::data::DerivedView;
use crate::stats::VolumeBand;
use std::fmt;

/// Series colors as RGB triples, shared by the interactive and static charts.
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (255, 87, 34),   // Deep Orange
    (96, 125, 139),  // Blue Grey
];

pub fn series_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

pub fn band_color(band: VolumeBand) -> (u8, u8, u8) {
    match band {
        VolumeBand::Low => (52, 152, 219),
        VolumeBand::Medium => (243, 156, 18),
        VolumeBand::High => (46, 204, 113),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    Line,
    Bars,
}

/// One named series, aligned index-by-index with `ChartData::x_labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub color: (u8, u8, u8),
    pub values: Vec<Option<f64>>,
}

/// A single chart: categorical x axis, one or more series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub style: ChartStyle,
    pub x_labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Charts for a view. The cluster view yields one chart per band.
    pub fn from_view(view: &DerivedView) -> Vec<ChartData> {
        let title = view.kind().title().to_string();
        match view {
            DerivedView::Monthly(rows) => vec![ChartData {
                id: "monthly".to_string(),
                title,
                style: ChartStyle::Line,
                x_labels: rows.iter().map(|r| r.month.label()).collect(),
                series: vec![ChartSeries {
                    name: "cnt".to_string(),
                    color: series_color(0),
                    values: rows.iter().map(|r| Some(r.count as f64)).collect(),
                }],
            }],
            DerivedView::Quarter(rows) => vec![ChartData {
                id: "quarter".to_string(),
                title,
                style: ChartStyle::Bars,
                x_labels: rows.iter().map(|r| r.quarter.label()).collect(),
                series: vec![
                    ChartSeries {
                        name: "casual".to_string(),
                        color: series_color(0),
                        values: rows.iter().map(|r| Some(r.casual as f64)).collect(),
                    },
                    ChartSeries {
                        name: "registered".to_string(),
                        color: series_color(1),
                        values: rows.iter().map(|r| Some(r.registered as f64)).collect(),
                    },
                ],
            }],
            DerivedView::Season(rows) => {
                let cells: Vec<_> = rows
                    .iter()
                    .map(|r| (r.year.label(), r.season, r.count as f64))
                    .collect();
                let hues = encounter_order(rows.iter().map(|r| r.season));
                let (x_labels, series) = pivot(&cells, &hues);
                vec![ChartData {
                    id: "season".to_string(),
                    title,
                    style: ChartStyle::Bars,
                    x_labels,
                    series,
                }]
            }
            DerivedView::Weathersit(rows) => {
                let cells: Vec<_> = rows
                    .iter()
                    .map(|r| (r.month.label(), r.weather_situation, r.count as f64))
                    .collect();
                let mut hues = encounter_order(rows.iter().map(|r| r.weather_situation));
                hues.sort();
                let (x_labels, series) = pivot(&cells, &hues);
                vec![ChartData {
                    id: "weathersit".to_string(),
                    title,
                    style: ChartStyle::Bars,
                    x_labels,
                    series,
                }]
            }
            DerivedView::Cluster(result) => VolumeBand::ALL
                .iter()
                .map(|&band| {
                    let months: Vec<_> = result.band(band).collect();
                    ChartData {
                        id: format!("cluster_{:?}", band).to_lowercase(),
                        title: format!("{} (month)", band.label()),
                        style: ChartStyle::Bars,
                        x_labels: months.iter().map(|m| m.month.label()).collect(),
                        series: vec![ChartSeries {
                            name: "cnt".to_string(),
                            color: band_color(band),
                            values: months.iter().map(|m| Some(m.count as f64)).collect(),
                        }],
                    }
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x_labels.is_empty()
    }

    /// Largest value across all series, 0 when empty.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold(0.0, |acc: f64, &v| acc.max(v))
    }

    /// Horizontal offset of series `index` inside a group of bars of `width`.
    pub fn bar_offset(&self, index: usize, width: f64) -> f64 {
        let count = self.series.len().max(1) as f64;
        (index as f64 - (count - 1.0) / 2.0) * width
    }
}

fn encounter_order<H: PartialEq>(items: impl Iterator<Item = H>) -> Vec<H> {
    let mut order: Vec<H> = Vec::new();
    for item in items {
        if !order.contains(&item) {
            order.push(item);
        }
    }
    order
}

/// Pivot `(x, hue, value)` cells into one series per hue.
fn pivot<H>(cells: &[(String, H, f64)], hues: &[H]) -> (Vec<String>, Vec<ChartSeries>)
where
    H: Copy + PartialEq + fmt::Display,
{
    let x_labels = encounter_order(cells.iter().map(|(x, _, _)| x.clone()));

    let series = hues
        .iter()
        .enumerate()
        .map(|(idx, &hue)| {
            let mut values = vec![None; x_labels.len()];
            for (x, h, v) in cells {
                if *h == hue {
                    if let Some(pos) = x_labels.iter().position(|label| label == x) {
                        values[pos] = Some(*v);
                    }
                }
            }
            ChartSeries {
                name: hue.to_string(),
                color: series_color(idx),
                values,
            }
        })
        .collect();

    (x_labels, series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        categorize_by_volume, season_year_totals, Season, TransactionRecord, WeatherSituation,
    };
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, season: Season, registered: u64) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            0,
            registered,
            season,
            WeatherSituation::Clear,
        )
    }

    #[test]
    fn test_season_chart_pivots_years_by_season() {
        let records = vec![
            record(2011, 1, Season::Winter, 10),
            record(2011, 4, Season::Spring, 20),
            record(2012, 4, Season::Spring, 30),
        ];
        let view = DerivedView::Season(season_year_totals(&records).unwrap());
        let charts = ChartData::from_view(&view);
        assert_eq!(charts.len(), 1);

        let chart = &charts[0];
        assert_eq!(chart.x_labels, vec!["2011", "2012"]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "Winter");
        assert_eq!(chart.series[0].values, vec![Some(10.0), None]);
        assert_eq!(chart.series[1].values, vec![Some(20.0), Some(30.0)]);
        assert_eq!(chart.max_value(), 30.0);
    }

    #[test]
    fn test_cluster_view_yields_one_chart_per_band() {
        let records = vec![
            record(2011, 1, Season::Winter, 10),
            record(2011, 2, Season::Winter, 20),
            record(2011, 3, Season::Spring, 30),
        ];
        let view = DerivedView::Cluster(categorize_by_volume(&records).unwrap());
        let charts = ChartData::from_view(&view);
        let sizes: Vec<usize> = charts.iter().map(|c| c.x_labels.len()).collect();
        assert_eq!(sizes, vec![2, 1, 0]);
        assert!(charts[2].is_empty());
        assert_eq!(charts[0].id, "cluster_low");
    }

    #[test]
    fn test_bar_offsets_are_centered() {
        let chart = ChartData {
            id: "t".into(),
            title: "t".into(),
            style: ChartStyle::Bars,
            x_labels: vec!["a".into()],
            series: vec![
                ChartSeries { name: "x".into(), color: series_color(0), values: vec![Some(1.0)] },
                ChartSeries { name: "y".into(), color: series_color(1), values: vec![Some(2.0)] },
            ],
        };
        assert!((chart.bar_offset(0, 0.4) + 0.2).abs() < 1e-9);
        assert!((chart.bar_offset(1, 0.4) - 0.2).abs() < 1e-9);
    }
}
