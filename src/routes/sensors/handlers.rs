use axum::{
    extract::{Path, State},
    Json,
};

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::events::Widget;
use crate::sensors::Sensor;

use super::types::LatestReading;

fn find_sensor<'a>(state: &'a AppState, sensor_id: &str) -> AppResult<&'a Sensor> {
    state
        .config
        .sensors
        .iter()
        .find(|s| s.id == sensor_id)
        .ok_or_else(|| AppError::NotFound(format!("Sensor '{sensor_id}' not found")))
}

/// List configured sensors
#[utoipa::path(
    get,
    path = "/api/sensors",
    responses(
        (status = 200, description = "Configured sensors in display order", body = Vec<Sensor>),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(State(state): State<AppState>) -> Json<Vec<Sensor>> {
    Json(state.config.sensors.clone())
}

/// Latest reading of one sensor
#[utoipa::path(
    get,
    path = "/api/sensors/{sensor_id}/latest",
    params(
        ("sensor_id" = String, Path, description = "Sensor identifier"),
    ),
    responses(
        (status = 200, description = "Latest reading", body = LatestReading),
        (status = 404, description = "Sensor not configured"),
        (status = 502, description = "Sensor API failed"),
    ),
    tag = "sensors"
)]
pub async fn get_latest(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
) -> AppResult<Json<LatestReading>> {
    let sensor = find_sensor(&state, &sensor_id)?.clone();

    let loading = state.events.loading(Widget::Latest {
        sensor: sensor.id.clone(),
    });
    let measurement = state
        .client
        .fetch_latest(&sensor.id)
        .await
        .inspect_err(|e| loading.fail(e))?;

    Ok(Json(LatestReading {
        sensor,
        measurement,
    }))
}

/// Latest reading of every configured sensor
///
/// Fetched concurrently; any single failure fails the whole request.
#[utoipa::path(
    get,
    path = "/api/latest",
    responses(
        (status = 200, description = "Latest readings in sensor order", body = Vec<LatestReading>),
        (status = 502, description = "Sensor API failed"),
    ),
    tag = "sensors"
)]
pub async fn list_latest(State(state): State<AppState>) -> AppResult<Json<Vec<LatestReading>>> {
    let sensors = &state.config.sensors;

    let loading: Vec<_> = sensors
        .iter()
        .map(|s| {
            state.events.loading(Widget::Latest {
                sensor: s.id.clone(),
            })
        })
        .collect();

    let measurements = state
        .client
        .fetch_latest_all(sensors)
        .await
        .inspect_err(|e| loading.iter().for_each(|guard| guard.fail(e)))?;

    let response = sensors
        .iter()
        .cloned()
        .zip(measurements)
        .map(|(sensor, measurement)| LatestReading {
            sensor,
            measurement,
        })
        .collect();

    Ok(Json(response))
}
