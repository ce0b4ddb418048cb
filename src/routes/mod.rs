pub mod dashboard;
pub mod events;
pub mod explore;
pub mod health;
mod rate_limit;
pub mod sensors;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use rate_limit::FallbackIpKeyExtractor;

use crate::common::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        sensors::list_sensors,
        sensors::get_latest,
        sensors::list_latest,
        explore::open_session,
        explore::load_more,
        explore::get_session,
        explore::render_chart,
        events::stream_events,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::sensors::Measurement,
            crate::sensors::Sensor,
            sensors::LatestReading,
            crate::explore::PageUpdate,
            crate::explore::ExploreView,
            explore::SessionResponse,
            explore::ChartResponse,
            crate::chart::Tick,
            crate::chart::Metric,
            crate::events::DashboardEvent,
            crate::events::Widget,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sensors", description = "Configured sensors and their latest readings"),
        (name = "explore", description = "Paging through historical measurements and charts"),
        (name = "events", description = "Dashboard event stream"),
    ),
    info(
        title = "Sensor Dashboard API",
        description = "Temperature and humidity dashboard backed by a remote measurement API",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let sensor_routes = Router::new()
        .route("/sensors", get(sensors::list_sensors))
        .route("/sensors/{sensor_id}/latest", get(sensors::get_latest))
        .route("/latest", get(sensors::list_latest));

    let explore_routes = Router::new()
        .route("/explore", post(explore::open_session))
        .route("/explore/{session_id}", get(explore::get_session))
        .route("/explore/{session_id}/more", post(explore::load_more));

    // Rendering is the expensive call, so only it is rate limited
    let chart_routes = rate_limit::limit_chart_routes(
        Router::new().route("/explore/{session_id}/chart", get(explore::render_chart)),
        config,
    );

    let api_routes = Router::new()
        .merge(sensor_routes)
        .merge(explore_routes)
        .merge(chart_routes)
        .route("/events", get(events::stream_events))
        .layer(RequestBodyLimitLayer::new(64 * 1024));

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .route("/", get(dashboard::dashboard))
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
