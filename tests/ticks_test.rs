//! Time axis tick generation.
//!
//! Run with: cargo test --test ticks_test

use chrono::FixedOffset;
use sensor_dash::chart::ticks::{format_label, TICK_DIVISOR};
use sensor_dash::chart::{generate_ticks, generate_ticks_in};

#[test]
fn ticks_start_at_min_and_end_at_max() {
    let (min, max) = (1_700_000_000.0, 1_700_086_400.0);
    let ticks = generate_ticks(min, max);

    assert_eq!(ticks.first().map(|t| t.value), Some(min));
    assert_eq!(ticks.last().map(|t| t.value), Some(max));
}

#[test]
fn six_evenly_spaced_intermediates() {
    let ticks = generate_ticks(0.0, 7_000.0);
    let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();

    assert_eq!(
        values,
        vec![0.0, 1_000.0, 2_000.0, 3_000.0, 4_000.0, 5_000.0, 6_000.0, 7_000.0]
    );
}

#[test]
fn intermediates_strictly_increase_below_max() {
    // Steps that do not divide evenly must not produce a near-duplicate of max
    for (min, max) in [(0.0, 1.0), (100.0, 101.0), (1_699_999_999.3, 1_700_000_000.1)] {
        let ticks = generate_ticks(min, max);
        let step = (max - min) / TICK_DIVISOR;
        let inner = &ticks[1..ticks.len() - 1];

        assert!(inner.len() <= 6, "{min}..{max}: {} intermediates", inner.len());
        for (k, tick) in inner.iter().enumerate() {
            assert!(tick.value < max);
            assert!((tick.value - (min + (k + 1) as f64 * step)).abs() < 1e-6);
        }
        assert!(ticks.windows(2).take(ticks.len() - 2).all(|w| w[0].value < w[1].value));
    }
}

#[test]
fn equal_bounds_give_two_identical_ticks() {
    let ticks = generate_ticks(100.0, 100.0);

    assert_eq!(ticks.len(), 2);
    assert_eq!(ticks[0], ticks[1]);
    assert_eq!(ticks[0].value, 100.0);
}

#[test]
fn reversed_bounds_give_boundary_ticks_only() {
    let ticks = generate_ticks(500.0, 100.0);
    let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();

    assert_eq!(values, vec![500.0, 100.0]);
}

#[test]
fn labels_are_date_then_time_in_utc() {
    let ticks = generate_ticks(0.0, 86_400.0 * 7.0);

    assert_eq!(ticks[0].label, "1970-01-01\n00:00");
    assert_eq!(ticks[1].label, "1970-01-02\n00:00");
    assert_eq!(ticks.last().map(|t| t.label.as_str()), Some("1970-01-08\n00:00"));
}

#[test]
fn labels_follow_display_offset() {
    let warsaw_summer = FixedOffset::east_opt(2 * 3600).unwrap();
    let ticks = generate_ticks_in(0.0, 3_600.0, warsaw_summer);

    assert_eq!(ticks[0].label, "1970-01-01\n02:00");
    assert_eq!(ticks.last().map(|t| t.label.as_str()), Some("1970-01-01\n03:00"));
}

#[test]
fn labels_truncate_fractional_seconds() {
    let utc = FixedOffset::east_opt(0).unwrap();

    assert_eq!(format_label(59.999, utc), "1970-01-01\n00:00");
    assert_eq!(format_label(1_700_000_000.9, utc), "2023-11-14\n22:13");
}
