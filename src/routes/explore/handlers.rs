use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::DateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::chart::Metric;
use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::explore::{self, PageUpdate, PaginationState};

use super::types::{ChartQuery, ChartResponse, OpenExploreQuery, SessionQuery, SessionResponse};

/// Open an explore session
///
/// Loads the first page (skip 0) of historical measurements.
#[utoipa::path(
    post,
    path = "/api/explore",
    params(OpenExploreQuery),
    responses(
        (status = 200, description = "Session opened with its first page", body = PageUpdate),
        (status = 502, description = "Sensor API failed"),
    ),
    tag = "explore"
)]
pub async fn open_session(
    State(state): State<AppState>,
    Query(query): Query<OpenExploreQuery>,
) -> AppResult<Json<PageUpdate>> {
    Ok(Json(explore::open_session(&state, query.view).await?))
}

/// Load the next page into a session
///
/// Advances the skip cursor by the session's page size and appends the page
/// fetched there. A failed fetch ends the session.
#[utoipa::path(
    post,
    path = "/api/explore/{session_id}/more",
    params(
        ("session_id" = Uuid, Path, description = "Explore session id"),
    ),
    responses(
        (status = 200, description = "Page appended", body = PageUpdate),
        (status = 404, description = "Unknown, expired or halted session"),
        (status = 502, description = "Sensor API failed, session halted"),
    ),
    tag = "explore"
)]
pub async fn load_more(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<PageUpdate>> {
    Ok(Json(explore::load_more(&state, session_id).await?))
}

/// Get everything a session has loaded
///
/// Supports JSON and CSV (`?format=csv`).
#[utoipa::path(
    get,
    path = "/api/explore/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Explore session id"),
        SessionQuery
    ),
    responses(
        (status = 200, description = "Accumulated measurements", body = SessionResponse),
        (status = 400, description = "Unsupported format"),
        (status = 404, description = "Unknown or expired session"),
    ),
    tag = "explore"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<SessionQuery>,
) -> AppResult<Response> {
    let pagination = explore::snapshot(&state, session_id).await?;

    match query.format.to_lowercase().as_str() {
        "json" => Ok(Json(SessionResponse {
            session_id,
            cursor: pagination.cursor(),
            total: pagination.len(),
            measurements: pagination.measurements().to_vec(),
        })
        .into_response()),
        "csv" => build_csv_response(&state, session_id, &pagination),
        other => Err(AppError::BadRequest(format!(
            "Unsupported format '{other}', expected json or csv"
        ))),
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    time: String,
    room: &'a str,
    id: &'a str,
    temperature: f64,
    humidity: i32,
    voltage: f64,
    timestamp: i64,
}

fn build_csv_response(
    state: &AppState,
    session_id: Uuid,
    pagination: &PaginationState,
) -> AppResult<Response> {
    let offset = state.config.display_offset;
    let mut writer = csv::Writer::from_writer(Vec::new());

    for m in pagination.measurements() {
        let time = DateTime::from_timestamp(m.timestamp, 0)
            .map(|t| t.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        writer
            .serialize(CsvRow {
                time,
                room: state.config.room_name(&m.id).unwrap_or(""),
                id: &m.id,
                temperature: m.temperature,
                humidity: m.humidity,
                voltage: m.voltage,
                timestamp: m.timestamp,
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"measurements-{session_id}.csv\""
    ))
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(axum::body::Body::from(body))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Render a chart from a session's measurements
///
/// Plots one metric of one sensor over time, using the measurements the
/// session has accumulated so far, in accumulation order.
#[utoipa::path(
    get,
    path = "/api/explore/{session_id}/chart",
    params(
        ("session_id" = Uuid, Path, description = "Explore session id"),
        ChartQuery
    ),
    responses(
        (status = 200, description = "Rendered chart", body = ChartResponse),
        (status = 400, description = "Unknown metric"),
        (status = 404, description = "Unknown session or sensor"),
        (status = 429, description = "Rate limited"),
    ),
    tag = "explore"
)]
pub async fn render_chart(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<ChartQuery>,
) -> AppResult<Json<ChartResponse>> {
    let metric: Metric = query.metric.parse()?;
    if state.config.room_name(&query.sensor).is_none() {
        return Err(AppError::NotFound(format!(
            "Sensor '{}' not found",
            query.sensor
        )));
    }

    let shared = state.sessions.get(session_id).await?;
    let measurements: Vec<_> = shared
        .lock()
        .await
        .pagination
        .for_sensor(&query.sensor)
        .cloned()
        .collect();

    let points = measurements.len();
    let renderer = state.renderer.clone();
    let chart = tokio::task::spawn_blocking(move || renderer.render(&measurements, metric))
        .await
        .map_err(|e| AppError::Internal(format!("Chart task failed: {e}")))??;

    tracing::debug!(
        session_id = %session_id,
        sensor = %query.sensor,
        metric = %metric,
        points,
        "chart_served"
    );

    Ok(Json(ChartResponse {
        points,
        image: chart.to_data_uri(),
        width: chart.width,
        height: chart.height,
        ticks: chart.ticks,
        sensor: query.sensor,
        metric,
    }))
}
