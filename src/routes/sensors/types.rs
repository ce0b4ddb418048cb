use serde::Serialize;
use utoipa::ToSchema;

use crate::sensors::{Measurement, Sensor};

/// Latest reading of a sensor together with where it is placed.
#[derive(Debug, Serialize, ToSchema)]
pub struct LatestReading {
    pub sensor: Sensor,
    pub measurement: Measurement,
}
