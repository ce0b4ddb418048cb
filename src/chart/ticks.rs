use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Number of intervals the domain is split into.
pub const TICK_DIVISOR: f64 = 7.0;

/// Label format: date on the first line, time of day on the second.
pub const TICK_LABEL_FORMAT: &str = "%Y-%m-%d\n%H:%M";

/// A labelled position on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Evenly spaced time ticks between `min` and `max` (Unix seconds), labelled
/// in UTC. See [`generate_ticks_in`].
#[must_use]
pub fn generate_ticks(min: f64, max: f64) -> Vec<Tick> {
    generate_ticks_in(min, max, Utc.fix())
}

/// Evenly spaced time ticks between `min` and `max`, labelled in `offset`.
///
/// Always starts with a tick at exactly `min` and ends with one at exactly
/// `max`. In between come ticks at `min + k * (max - min) / 7` for as long as
/// they stay below `max`, so at most six. `min == max` gives two identical
/// ticks. `max < min` is not meaningful and gives just the two boundary ticks.
#[must_use]
pub fn generate_ticks_in(min: f64, max: f64, offset: FixedOffset) -> Vec<Tick> {
    let step = (max - min) / TICK_DIVISOR;
    let mut ticks = Vec::with_capacity(TICK_DIVISOR as usize + 1);

    ticks.push(tick_at(min, offset));

    // k stops at 6: min + 7 * step may round to just under max.
    let mut k = 1.0;
    while k < TICK_DIVISOR {
        let value = min + k * step;
        if !(value < max) {
            break;
        }
        ticks.push(tick_at(value, offset));
        k += 1.0;
    }

    ticks.push(tick_at(max, offset));
    ticks
}

fn tick_at(value: f64, offset: FixedOffset) -> Tick {
    Tick {
        value,
        label: format_label(value, offset),
    }
}

/// Format the whole second containing `value` (truncated toward zero).
#[must_use]
pub fn format_label(value: f64, offset: FixedOffset) -> String {
    // `as` saturates, NaN becomes 0
    match DateTime::from_timestamp(value as i64, 0) {
        Some(time) => time
            .with_timezone(&offset)
            .format(TICK_LABEL_FORMAT)
            .to_string(),
        None => format!("{value}"),
    }
}
