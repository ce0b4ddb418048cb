use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{FixedOffset, Offset, Utc};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::FRAC_1_SQRT_2;
use std::path::Path;

use crate::chart::font::{self, FONT_FAMILY};
use crate::chart::metric::Metric;
use crate::chart::series::Series;
use crate::chart::ticks::{generate_ticks_in, Tick};
use crate::chart::ChartError;
use crate::sensors::Measurement;

/// Canvas is 8x4 inches at 96 DPI.
pub const DPI: u32 = 96;
pub const WIDTH: u32 = 8 * DPI;
pub const HEIGHT: u32 = 4 * DPI;

pub const BACKGROUND: RGBColor = RGBColor(5, 47, 74);
pub const LINE: RGBColor = RGBColor(7, 89, 133);
pub const FOREGROUND: RGBColor = RGBColor(255, 255, 255);
pub const GRID: RGBColor = RGBColor(220, 220, 220);

const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 100;
const Y_LABEL_AREA: u32 = 60;
const Y_LABELS: usize = 5;
const DASH: u32 = 5;
const TICK_LEN: i32 = 5;

/// Largest magnitude the value axis accepts.
pub const MAX_AXIS_VALUE: f64 = 1e300;

const LABEL_W: u32 = 96;
const LABEL_H: u32 = 32;
const LABEL_FONT_SIZE: u32 = 12;
const LABEL_LINE_HEIGHT: i32 = 14;

/// A rendered PNG together with the x ticks drawn on it.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub png: Vec<u8>,
    pub ticks: Vec<Tick>,
    pub width: u32,
    pub height: u32,
}

impl RenderedChart {
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    /// `data:image/png;base64,...`, ready for an `<img src>`.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    offset: FixedOffset,
    text: bool,
}

impl ChartRenderer {
    /// Renderer labelling times in `offset`. Registers the chart font on first
    /// use; without one, charts carry no text.
    #[must_use]
    pub fn new(offset: FixedOffset, font_path: Option<&Path>) -> Self {
        Self {
            offset,
            text: font::ensure_registered(font_path),
        }
    }

    #[must_use]
    pub fn draws_text(&self) -> bool {
        self.text
    }

    /// Draw `metric` of `measurements` as one connected line, in input order.
    ///
    /// An empty input gives an empty chart (background and axes only).
    ///
    /// # Errors
    ///
    /// `ChartError::Render` if drawing or PNG encoding fails.
    pub fn render(
        &self,
        measurements: &[Measurement],
        metric: Metric,
    ) -> Result<RenderedChart, ChartError> {
        let series = Series::from_measurements(measurements, metric);
        let ticks = series
            .time_domain()
            .map(|(min, max)| generate_ticks_in(min, max, self.offset))
            .unwrap_or_default();

        let mut canvas = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
        let anchors = self.draw_plot(&mut canvas, &series, &ticks, metric)?;

        if self.text {
            for (tick, anchor) in ticks.iter().zip(anchors) {
                draw_rotated_label(&mut canvas, anchor, &tick.label)?;
            }
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&canvas, WIDTH, HEIGHT, ExtendedColorType::Rgb8)
            .map_err(render_err)?;

        tracing::debug!(
            metric = %metric,
            points = series.points.len(),
            ticks = ticks.len(),
            bytes = png.len(),
            "chart_rendered"
        );

        Ok(RenderedChart {
            png,
            ticks,
            width: WIDTH,
            height: HEIGHT,
        })
    }

    /// Background, axes, gridlines and the data line. Returns the pixel
    /// position on the x axis of every tick.
    fn draw_plot(
        &self,
        canvas: &mut [u8],
        series: &Series,
        ticks: &[Tick],
        metric: Metric,
    ) -> Result<Vec<(i32, i32)>, ChartError> {
        let (x_min, x_max) = series.time_domain().map_or((0.0, 1.0), |(lo, hi)| widen(lo, hi));
        let (y_min, y_max) = value_axis(series)?;

        let root = BitMapBackend::with_buffer(canvas, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&BACKGROUND).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(if self.text { Y_LABEL_AREA } else { MARGIN })
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(render_err)?;

        {
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh()
                .x_labels(0)
                .axis_style(FOREGROUND.stroke_width(2));
            if self.text {
                mesh.y_labels(Y_LABELS)
                    .y_label_formatter(&format_value)
                    .label_style((FONT_FAMILY, 13).into_font().color(&FOREGROUND))
                    .y_desc(metric.axis_label())
                    .axis_desc_style((FONT_FAMILY, 15).into_font().color(&FOREGROUND));
            } else {
                mesh.y_labels(0);
            }
            mesh.draw().map_err(render_err)?;
        }

        let grid = GRID.stroke_width(1);
        for tick in ticks {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(tick.value, y_min), (tick.value, y_max)],
                    DASH,
                    DASH,
                    grid,
                ))
                .map_err(render_err)?;
        }
        for value in RangedCoordf64::from(y_min..y_max).key_points(Y_LABELS) {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(x_min, value), (x_max, value)],
                    DASH,
                    DASH,
                    grid,
                ))
                .map_err(render_err)?;
        }

        if !series.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    series.points.iter().copied(),
                    LINE.stroke_width(2),
                ))
                .map_err(render_err)?;
        }

        let anchors: Vec<(i32, i32)> = ticks
            .iter()
            .map(|t| chart.backend_coord(&(t.value, y_min)))
            .collect();

        for &(x, y) in &anchors {
            root.draw(&PathElement::new(
                vec![(x, y), (x, y + TICK_LEN)],
                FOREGROUND.stroke_width(2),
            ))
            .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
        Ok(anchors)
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(Utc.fix(), None)
    }
}

/// Render with UTC labels and the default font lookup.
///
/// # Errors
///
/// See [`ChartRenderer::render`].
pub fn render_chart(
    measurements: &[Measurement],
    metric: Metric,
) -> Result<RenderedChart, ChartError> {
    ChartRenderer::default().render(measurements, metric)
}

/// Draw `label` (one or more lines) into its own tile, then copy the tile onto
/// the canvas rotated 45° so the text ends just below `anchor`.
fn draw_rotated_label(
    canvas: &mut [u8],
    anchor: (i32, i32),
    label: &str,
) -> Result<(), ChartError> {
    let mut tile = vec![0u8; (LABEL_W * LABEL_H * 3) as usize];
    {
        let area = BitMapBackend::with_buffer(&mut tile, (LABEL_W, LABEL_H)).into_drawing_area();
        area.fill(&BACKGROUND).map_err(render_err)?;
        let style = (FONT_FAMILY, LABEL_FONT_SIZE)
            .into_font()
            .color(&FOREGROUND)
            .pos(Pos::new(HPos::Right, VPos::Top));
        for (i, line) in label.lines().enumerate() {
            area.draw(&Text::new(
                line,
                (LABEL_W as i32 - 2, 1 + i as i32 * LABEL_LINE_HEIGHT),
                style.clone(),
            ))
            .map_err(render_err)?;
        }
        area.present().map_err(render_err)?;
    }

    let background = [BACKGROUND.0, BACKGROUND.1, BACKGROUND.2];
    let (origin_x, origin_y) = (anchor.0, anchor.1 + TICK_LEN + 2);
    let reach = (LABEL_W + LABEL_H) as i32;
    let (w, h) = (i64::from(LABEL_W), i64::from(LABEL_H));

    // Inverse mapping: for each canvas pixel near the anchor, find the tile
    // pixel that lands on it. Tile origin is its top-right corner.
    for dy in -(LABEL_H as i32)..=reach {
        for dx in -reach..=(LABEL_H as i32) {
            let (fx, fy) = (f64::from(dx), f64::from(dy));
            let u = (fx - fy) * FRAC_1_SQRT_2;
            let v = (fx + fy) * FRAC_1_SQRT_2;
            let sx = (u + LABEL_W as f64).round() as i64;
            let sy = v.round() as i64;
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                continue;
            }
            let src = ((sy * w + sx) * 3) as usize;
            let pixel = &tile[src..src + 3];
            if pixel == background {
                continue;
            }

            let (tx, ty) = (origin_x + dx, origin_y + dy);
            if tx < 0 || ty < 0 || tx >= WIDTH as i32 || ty >= HEIGHT as i32 {
                continue;
            }
            let dst = ((ty as usize) * WIDTH as usize + tx as usize) * 3;
            canvas[dst..dst + 3].copy_from_slice(pixel);
        }
    }

    Ok(())
}

fn format_value(value: &f64) -> String {
    format!("{value:.1}")
}

/// Give a zero-width domain one second on each side.
fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) }
}

/// Padded value axis bounds, `0..1` for an empty series.
///
/// Bounds beyond [`MAX_AXIS_VALUE`] (or NaN/infinite ones) cannot be laid out
/// by the mesh and are rejected.
fn value_axis(series: &Series) -> Result<(f64, f64), ChartError> {
    let Some((lo, hi)) = series.value_range() else {
        return Ok((0.0, 1.0));
    };
    let (lo, hi) = pad(lo, hi);
    let plottable = |v: f64| v.is_finite() && v.abs() <= MAX_AXIS_VALUE;
    if plottable(lo) && plottable(hi) {
        Ok((lo, hi))
    } else {
        Err(ChartError::Render(format!(
            "values out of plottable range: {lo}..{hi}"
        )))
    }
}

/// 5% headroom above and below the values.
fn pad(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span > f64::EPSILON {
        (lo - span * 0.05, hi + span * 0.05)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn render_err(e: impl std::fmt::Display) -> ChartError {
    ChartError::Render(e.to_string())
}
