//! Charts module - Chart data and rendering

mod data;
mod plotter;
mod renderer;

pub use data::{band_color, series_color, ChartData, ChartSeries, ChartStyle, PALETTE};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
