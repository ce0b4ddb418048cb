//! Paging through historical measurements.
//!
//! A dashboard opens a session, which fetches the first page, then asks for
//! more: each "load more" advances the session's skip cursor by its page size,
//! fetches the page at the new cursor and appends it. Calls on one session run
//! one at a time. The first upstream failure halts the session for good.

pub mod pagination;
pub mod session;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::events::{DashboardEvent, Widget};
use crate::sensors::Measurement;

pub use pagination::PaginationState;
pub use session::{ExploreSession, ExploreView, SessionStore, SharedSession};

/// Result of opening a session or loading one more page.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageUpdate {
    pub session_id: Uuid,
    pub view: ExploreView,
    /// Skip offset the page was fetched with
    pub cursor: usize,
    pub page_size: usize,
    /// Measurements added by this call, in upstream order
    pub appended: Vec<Measurement>,
    /// Accumulated measurement count after this call
    pub total: usize,
}

/// Open a session for `view` and load its first page (skip 0).
///
/// # Errors
///
/// Upstream failures are returned as `AppError::Upstream`; no session is
/// kept in that case.
pub async fn open_session(state: &AppState, view: ExploreView) -> AppResult<PageUpdate> {
    let page_size = view.page_size(&state.config);
    let mut session = ExploreSession::new(view, page_size);
    let session_id = Uuid::new_v4();

    let loading = state.events.loading(Widget::Measurements {
        session: session_id,
    });
    let page = state
        .client
        .fetch_page(session.pagination.cursor())
        .await
        .inspect_err(|e| loading.fail(e))?;
    let appended = page.clone();
    session.pagination.append(page);

    let total = session.pagination.len();
    state.sessions.insert_as(session_id, session).await;
    tracing::info!(session_id = %session_id, view = ?view, page_size, total, "explore_opened");

    Ok(PageUpdate {
        session_id,
        view,
        cursor: 0,
        page_size,
        appended,
        total,
    })
}

/// Advance the session cursor by its page size and append the next page.
///
/// # Errors
///
/// `NotFound` for unknown, expired or halted sessions; `Upstream` when the
/// fetch fails, after which the session is halted and removed.
pub async fn load_more(state: &AppState, session_id: Uuid) -> AppResult<PageUpdate> {
    let shared = state.sessions.get(session_id).await?;
    let mut session = shared.lock().await;
    if session.halted {
        return Err(AppError::NotFound(format!(
            "Explore session '{session_id}' was halted after an upstream error"
        )));
    }

    let loading = state.events.loading(Widget::Measurements {
        session: session_id,
    });
    let page_size = session.page_size;
    let cursor = session.pagination.advance(page_size);

    let page = match state.client.fetch_page(cursor).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(session_id = %session_id, cursor, error = %e, "explore_halted");
            loading.fail(&e);
            session.halted = true;
            state.sessions.remove(session_id).await;
            return Err(e.into());
        }
    };

    let appended = page.clone();
    session.pagination.append(page);
    let total = session.pagination.len();

    state.events.publish(DashboardEvent::PageAppended {
        session: session_id,
        cursor,
        appended: appended.len(),
        total,
    });
    tracing::debug!(
        session_id = %session_id,
        cursor,
        appended = appended.len(),
        total,
        "explore_page_appended"
    );

    Ok(PageUpdate {
        session_id,
        view: session.view,
        cursor,
        page_size,
        appended,
        total,
    })
}

/// Copy of everything a session has accumulated so far.
///
/// # Errors
///
/// `NotFound` for unknown or expired sessions.
pub async fn snapshot(state: &AppState, session_id: Uuid) -> AppResult<PaginationState> {
    let shared = state.sessions.get(session_id).await?;
    let session = shared.lock().await;
    Ok(session.pagination.clone())
}
