use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::explore::pagination::PaginationState;

/// Which dashboard view opened a session. Each view pages with its own
/// configured increment (`TABLE_PAGE_SIZE` / `CHART_PAGE_SIZE`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExploreView {
    #[default]
    Table,
    Chart,
}

impl ExploreView {
    #[must_use]
    pub fn page_size(self, config: &Config) -> usize {
        match self {
            Self::Table => config.table_page_size,
            Self::Chart => config.chart_page_size,
        }
    }
}

#[derive(Debug)]
pub struct ExploreSession {
    pub view: ExploreView,
    pub page_size: usize,
    pub pagination: PaginationState,
    /// Set once an upstream fetch failed; the session accepts no more work.
    pub halted: bool,
}

impl ExploreSession {
    #[must_use]
    pub fn new(view: ExploreView, page_size: usize) -> Self {
        Self {
            view,
            page_size,
            pagination: PaginationState::new(),
            halted: false,
        }
    }
}

pub type SharedSession = Arc<Mutex<ExploreSession>>;

/// Explore sessions keyed by id. Entries expire after sitting idle, so a
/// session lives as long as its dashboard keeps using it.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, SharedSession>,
}

impl SessionStore {
    #[must_use]
    pub fn new(idle: Duration, max_sessions: u64) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();
        Self { sessions }
    }

    pub async fn insert(&self, session: ExploreSession) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_as(id, session).await;
        id
    }

    /// Store `session` under an id the caller picked beforehand.
    pub async fn insert_as(&self, id: Uuid, session: ExploreSession) {
        self.sessions
            .insert(id, Arc::new(Mutex::new(session)))
            .await;
        tracing::debug!(session_id = %id, "session_opened");
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` for unknown or expired sessions.
    pub async fn get(&self, id: Uuid) -> AppResult<SharedSession> {
        self.sessions
            .get(&id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Explore session '{id}' not found")))
    }

    pub async fn remove(&self, id: Uuid) {
        self.sessions.invalidate(&id).await;
        tracing::debug!(session_id = %id, "session_removed");
    }
}
