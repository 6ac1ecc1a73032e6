//! Charts module - Static chart rendering

mod plotter;
mod renderer;

pub use plotter::{BarChart, ChartPlotter, Orientation, PlotError};
pub use renderer::{
    distribution_file_name, ChartRenderer, GEOGRAPHY_CHART, QUALITY_CHART, TIMING_CHART,
};
