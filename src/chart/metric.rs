use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::chart::ChartError;
use crate::sensors::Measurement;

/// Quantity plotted on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Humidity,
}

impl Metric {
    #[must_use]
    pub fn value_of(self, measurement: &Measurement) -> f64 {
        match self {
            Self::Temperature => measurement.temperature,
            Self::Humidity => f64::from(measurement.humidity),
        }
    }

    /// Y axis title.
    #[must_use]
    pub fn axis_label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperatura [°C]",
            Self::Humidity => "Wilgotność [%]",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
        }
    }
}

impl FromStr for Metric {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(Self::Temperature),
            "humidity" => Ok(Self::Humidity),
            other => Err(ChartError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
