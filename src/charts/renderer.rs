//! Static Chart Renderer
//! Renders the active view's charts to a PNG file with plotters.
//!
//! Charts are stacked vertically, one panel per chart, each with its own
//! caption, categorical x axis and legend.

use crate::charts::{ChartData, ChartStyle};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

const BAR_GROUP_WIDTH: f64 = 0.8;
const MAX_X_LABELS: usize = 24;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `charts` into one PNG; each chart gets `panel_height` pixels.
    pub fn render_png(
        charts: &[ChartData],
        output_path: &Path,
        width: u32,
        panel_height: u32,
    ) -> Result<(), Box<dyn Error>> {
        let panels = charts.len().max(1);
        let root = BitMapBackend::new(output_path, (width, panel_height * panels as u32))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let areas = root.split_evenly((panels, 1));
        for (area, chart) in areas.iter().zip(charts) {
            Self::draw_panel(area, chart)?;
        }

        root.present()?;
        tracing::info!(
            "Rendered {} chart(s) to {}",
            charts.len(),
            output_path.display()
        );
        Ok(())
    }

    fn draw_panel(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        chart: &ChartData,
    ) -> Result<(), Box<dyn Error>> {
        let n = chart.x_labels.len().max(1);
        let y_max = Self::y_upper_bound(chart.max_value());
        let labels = chart.x_labels.clone();

        let mut ctx = ChartBuilder::on(area)
            .caption(&chart.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(n.min(MAX_X_LABELS))
            .x_label_formatter(&|x| Self::label_at(&labels, *x))
            .y_label_formatter(&|y| format!("{:.0}", y))
            .draw()?;

        match chart.style {
            ChartStyle::Line => {
                for series in &chart.series {
                    let color = Self::rgb(series.color);
                    let points: Vec<(f64, f64)> = series
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
                        .collect();

                    ctx.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                        .label(series.name.as_str())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                    ctx.draw_series(
                        points
                            .into_iter()
                            .map(|p| Circle::new(p, 3, color.filled())),
                    )?;
                }
            }
            ChartStyle::Bars => {
                let bar_width = BAR_GROUP_WIDTH / chart.series.len().max(1) as f64;
                for (idx, series) in chart.series.iter().enumerate() {
                    let color = Self::rgb(series.color);
                    let offset = chart.bar_offset(idx, bar_width);
                    ctx.draw_series(series.values.iter().enumerate().filter_map(|(i, v)| {
                        v.map(|v| {
                            let left = i as f64 + offset - bar_width / 2.0;
                            Rectangle::new([(left, 0.0), (left + bar_width, v)], color.filled())
                        })
                    }))?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                    });
                }
            }
        }

        if !chart.series.is_empty() && !chart.is_empty() {
            ctx.configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        Ok(())
    }

    fn rgb(color: (u8, u8, u8)) -> RGBColor {
        RGBColor(color.0, color.1, color.2)
    }

    /// Label for an integer tick; blank between categories.
    fn label_at(labels: &[String], x: f64) -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Y axis top with headroom; never zero so an empty chart still draws.
    fn y_upper_bound(max_value: f64) -> f64 {
        if max_value > 0.0 {
            max_value * 1.1
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_at_only_labels_whole_ticks() {
        let labels = vec!["2011-01".to_string(), "2011-02".to_string()];
        assert_eq!(StaticChartRenderer::label_at(&labels, 1.0), "2011-02");
        assert_eq!(StaticChartRenderer::label_at(&labels, 0.5), "");
        assert_eq!(StaticChartRenderer::label_at(&labels, -1.0), "");
        assert_eq!(StaticChartRenderer::label_at(&labels, 7.0), "");
    }

    #[test]
    fn test_y_upper_bound_has_headroom() {
        assert!((StaticChartRenderer::y_upper_bound(100.0) - 110.0).abs() < 1e-9);
        assert_eq!(StaticChartRenderer::y_upper_bound(0.0), 1.0);
    }
}
