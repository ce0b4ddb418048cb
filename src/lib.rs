//! Sensor dashboard - latest readings, paged history and PNG charts for
//! remote temperature/humidity sensors.
//!
//! This library exposes the core modules for testing and reuse.

pub mod chart;
pub mod common;
pub mod config;
pub mod error;
pub mod events;
pub mod explore;
pub mod routes;
pub mod sensors;
pub mod static_site;
