//! Line charts of one sensor metric over time.
//!
//! [`ticks`] places the time axis labels, [`series`] turns measurements into
//! points, [`render`] draws the PNG.

pub mod font;
pub mod metric;
pub mod render;
pub mod series;
pub mod ticks;

pub use metric::Metric;
pub use render::{render_chart, ChartRenderer, RenderedChart};
pub use series::Series;
pub use ticks::{generate_ticks, generate_ticks_in, Tick};

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Unknown metric '{0}', expected 'temperature' or 'humidity'")]
    UnknownMetric(String),

    #[error("Chart rendering failed: {0}")]
    Render(String),
}
