use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One timestamped reading from a sensor, as served by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Measurement {
    /// Sensor identifier
    pub id: String,
    /// Temperature in °C
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: i32,
    /// Battery voltage in V
    pub voltage: f64,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
}

/// A configured sensor and the room it is placed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Sensor {
    pub id: String,
    pub room: String,
}
