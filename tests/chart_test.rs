//! Chart rendering.
//!
//! Run with: cargo test --test chart_test

mod common;

use chrono::FixedOffset;
use image::ImageFormat;
use sensor_dash::chart::font;
use sensor_dash::chart::render::{BACKGROUND, HEIGHT, WIDTH};
use sensor_dash::chart::{render_chart, ChartError, ChartRenderer, Metric, Series};

use common::{first_page, measurement};

fn decode(png: &[u8]) -> image::RgbImage {
    image::load_from_memory_with_format(png, ImageFormat::Png)
        .unwrap()
        .to_rgb8()
}

#[test]
fn empty_input_renders_empty_chart() {
    let chart = render_chart(&[], Metric::Temperature).unwrap();

    assert!(chart.ticks.is_empty());
    assert_eq!((chart.width, chart.height), (768, 384));
    assert_eq!(decode(&chart.png).dimensions(), (WIDTH, HEIGHT));
}

#[test]
fn chart_is_eight_by_four_inches_on_background() {
    let chart = render_chart(&first_page(), Metric::Humidity).unwrap();
    let img = decode(&chart.png);

    assert_eq!(img.dimensions(), (768, 384));
    let corner = img.get_pixel(0, 0).0;
    assert_eq!(corner, [BACKGROUND.0, BACKGROUND.1, BACKGROUND.2]);
    assert_eq!(img.get_pixel(767, 383).0, corner);
}

#[test]
fn ticks_span_the_time_domain() {
    let measurements = vec![
        measurement("a", 1_700_000_700),
        measurement("a", 1_700_000_000),
        measurement("a", 1_700_007_000),
    ];

    let chart = render_chart(&measurements, Metric::Temperature).unwrap();
    let values: Vec<f64> = chart.ticks.iter().map(|t| t.value).collect();

    assert_eq!(values.len(), 8);
    assert_eq!(values.first(), Some(&1_700_000_000.0));
    assert_eq!(values.last(), Some(&1_700_007_000.0));
}

#[test]
fn single_point_renders() {
    let chart = render_chart(&[measurement("b", 1_700_000_000)], Metric::Temperature).unwrap();

    assert_eq!(chart.ticks.len(), 2);
    assert_eq!(chart.ticks[0], chart.ticks[1]);
}

#[test]
fn labels_use_renderer_offset() {
    let renderer = ChartRenderer::new(FixedOffset::east_opt(3600).unwrap(), None);

    let chart = renderer
        .render(&[measurement("a", 0), measurement("a", 7 * 60)], Metric::Temperature)
        .unwrap();

    assert_eq!(chart.ticks[0].label, "1970-01-01\n01:00");
    assert_eq!(chart.ticks[7].label, "1970-01-01\n01:07");
}

#[test]
fn data_uri_wraps_png() {
    let chart = render_chart(&first_page(), Metric::Temperature).unwrap();
    let uri = chart.to_data_uri();

    assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    assert_eq!(uri.len(), "data:image/png;base64,".len() + chart.to_base64().len());
}

#[test]
fn unknown_metric_is_rejected() {
    let err = "pressure".parse::<Metric>().unwrap_err();

    assert!(matches!(err, ChartError::UnknownMetric(ref m) if m == "pressure"));
    assert!("Temperature".parse::<Metric>().is_err());
}

#[test]
fn metric_selects_field() {
    let m = measurement("a", 100);

    assert_eq!(Metric::Temperature.value_of(&m), m.temperature);
    assert_eq!(Metric::Humidity.value_of(&m), 40.0);
    assert_eq!(Metric::Humidity.axis_label(), "Wilgotność [%]");
    assert_eq!(Metric::Temperature.to_string(), "temperature");
}

#[test]
fn series_keeps_input_order() {
    let measurements = vec![measurement("a", 300), measurement("a", 100), measurement("a", 200)];

    let series = Series::from_measurements(&measurements, Metric::Temperature);
    let xs: Vec<f64> = series.points.iter().map(|(x, _)| *x).collect();

    assert_eq!(xs, vec![300.0, 100.0, 200.0]);
    assert_eq!(series.time_domain(), Some((100.0, 300.0)));
}

fn reading(timestamp: i64, temperature: f64) -> sensor_dash::sensors::Measurement {
    sensor_dash::sensors::Measurement {
        temperature,
        ..measurement("a", timestamp)
    }
}

#[test]
fn extreme_values_are_rejected_not_drawn() {
    for values in [[21.0, 1.7e308], [f64::MAX, -f64::MAX], [-1.7e308, 0.0]] {
        let measurements = [reading(100, values[0]), reading(200, values[1])];

        let err = render_chart(&measurements, Metric::Temperature).unwrap_err();

        assert!(matches!(err, ChartError::Render(_)), "{values:?}");
    }
}

#[test]
fn large_but_plottable_values_render() {
    let measurements = [reading(100, -9e299), reading(200, 9e299)];

    let chart = render_chart(&measurements, Metric::Temperature).unwrap();

    assert_eq!(decode(&chart.png).dimensions(), (WIDTH, HEIGHT));
}

#[test]
fn font_bytes_are_validated() {
    assert!(!font::is_valid_font(b""));
    assert!(!font::is_valid_font(b"not a font at all"));
}
