use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::chart::ChartError;
use crate::sensors::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Sensor API error: {0}")]
    Upstream(#[from] ClientError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::Upstream(e) => {
                tracing::error!("Sensor API error: {e}");
                (StatusCode::BAD_GATEWAY, format!("Sensor API error: {e}"))
            }
            Self::Chart(ChartError::UnknownMetric(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::Chart(e @ ChartError::Render(_)) => {
                tracing::error!("Chart rendering error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Chart rendering failed".to_string(),
                )
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
