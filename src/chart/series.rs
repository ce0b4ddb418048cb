use crate::chart::metric::Metric;
use crate::sensors::Measurement;

/// `(timestamp, value)` points of one metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// One point per measurement, in input order. Not sorted: callers that
    /// need a monotone line must order the input themselves.
    #[must_use]
    pub fn from_measurements<'a, I>(measurements: I, metric: Metric) -> Self
    where
        I: IntoIterator<Item = &'a Measurement>,
    {
        let points = measurements
            .into_iter()
            .map(|m| (m.timestamp as f64, metric.value_of(m)))
            .collect();
        Self { points }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest timestamp, `None` when empty.
    #[must_use]
    pub fn time_domain(&self) -> Option<(f64, f64)> {
        bounds(self.points.iter().map(|(x, _)| *x))
    }

    /// Smallest and largest value, `None` when empty.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        bounds(self.points.iter().map(|(_, y)| *y))
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
