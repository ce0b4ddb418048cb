//! Remote measurement API: record types and the HTTP client.

pub mod client;
pub mod models;

pub use client::{ClientError, SensorClient};
pub use models::{Measurement, Sensor};
