use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Number of configured sensors
    pub sensors: usize,
    /// Whether charts carry axis text (a font was found)
    pub chart_text: bool,
}

/// Health check endpoint
///
/// Returns 200 while the service runs. It does not call the sensor API,
/// so an upstream outage does not fail the check. Not rate-limited.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sensors: state.config.sensors.len(),
        chart_text: state.renderer.draws_text(),
    })
}
