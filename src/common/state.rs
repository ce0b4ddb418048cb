use std::sync::Arc;
use std::time::Duration;

use crate::chart::ChartRenderer;
use crate::config::Config;
use crate::events::EventBus;
use crate::explore::SessionStore;
use crate::sensors::SensorClient;

/// Upper bound on concurrently open explore sessions.
const MAX_SESSIONS: u64 = 10_000;

/// Buffered events per subscriber before slow ones start lagging.
const EVENT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<SensorClient>,
    pub sessions: SessionStore,
    pub events: EventBus,
    pub renderer: Arc<ChartRenderer>,
}

impl AppState {
    pub fn new(config: Config, client: SensorClient) -> Self {
        let sessions = SessionStore::new(
            Duration::from_secs(config.session_idle_seconds),
            MAX_SESSIONS,
        );
        let renderer = ChartRenderer::new(config.display_offset, config.chart_font_path.as_deref());

        Self {
            config: Arc::new(config),
            client: Arc::new(client),
            sessions,
            events: EventBus::new(EVENT_CAPACITY),
            renderer: Arc::new(renderer),
        }
    }
}
