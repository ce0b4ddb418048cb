//! Typed dashboard events.
//!
//! Producers publish [`DashboardEvent`]s on the [`EventBus`]; the dashboard
//! receives them over `GET /api/events` (server-sent events) and updates its
//! loading indicators and tables from the structured payloads.

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

/// A dashboard element whose loading state is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    /// Latest-reading card of one sensor
    Latest { sensor: String },
    /// Measurement table of an explore session
    Measurements { session: Uuid },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    LoadingStarted {
        widget: Widget,
    },
    LoadingFinished {
        widget: Widget,
    },
    PageAppended {
        session: Uuid,
        cursor: usize,
        appended: usize,
        total: usize,
    },
    LoadFailed {
        widget: Widget,
        error: String,
    },
}

impl DashboardEvent {
    /// Name used as the SSE `event:` field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadingStarted { .. } => "loading_started",
            Self::LoadingFinished { .. } => "loading_finished",
            Self::PageAppended { .. } => "page_appended",
            Self::LoadFailed { .. } => "load_failed",
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish to every current subscriber. Having none is fine.
    pub fn publish(&self, event: DashboardEvent) {
        tracing::trace!(event = event.name(), "event_published");
        let _ = self.sender.send(event);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Mark `widget` as loading until the returned guard is dropped.
    #[must_use]
    pub fn loading(&self, widget: Widget) -> LoadingGuard {
        self.publish(DashboardEvent::LoadingStarted {
            widget: widget.clone(),
        });
        LoadingGuard {
            bus: self.clone(),
            widget,
        }
    }
}

/// Publishes `LoadingFinished` for its widget when dropped, on success and
/// error paths alike.
pub struct LoadingGuard {
    bus: EventBus,
    widget: Widget,
}

impl LoadingGuard {
    /// Publish `LoadFailed` for the guarded widget; `LoadingFinished` still
    /// follows on drop.
    pub fn fail(&self, error: &impl std::fmt::Display) {
        self.bus.publish(DashboardEvent::LoadFailed {
            widget: self.widget.clone(),
            error: error.to_string(),
        });
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.bus.publish(DashboardEvent::LoadingFinished {
            widget: self.widget.clone(),
        });
    }
}
