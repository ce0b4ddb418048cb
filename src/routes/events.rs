use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::common::AppState;

/// Stream dashboard events
///
/// Server-sent events carrying `DashboardEvent` payloads. The SSE `event`
/// field is the event type (`loading_started`, `loading_finished`,
/// `page_appended`, `load_failed`).
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (
            status = 200,
            description = "SSE stream of dashboard events",
            content_type = "text/event-stream",
            body = crate::events::DashboardEvent
        ),
    ),
    tag = "events"
)]
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!("event_stream_opened");

    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|received| async move {
        match received {
            Ok(event) => match Event::default().event(event.name()).json_data(&event) {
                Ok(sse) => Some(Ok(sse)),
                Err(e) => {
                    tracing::error!(event = event.name(), error = %e, "event_encode_failed");
                    None
                }
            },
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event_stream_lagged");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
