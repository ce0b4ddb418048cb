use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::chart::{Metric, Tick};
use crate::explore::ExploreView;
use crate::sensors::Measurement;

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OpenExploreQuery {
    /// View the session serves: table (default) or chart
    #[serde(default)]
    pub view: ExploreView,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SessionQuery {
    /// Response format: json (default) or csv
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ChartQuery {
    /// Sensor to plot
    pub sensor: String,
    /// temperature or humidity
    pub metric: String,
}

/// Everything a session has accumulated.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub cursor: usize,
    pub total: usize,
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChartResponse {
    pub sensor: String,
    pub metric: Metric,
    /// Number of plotted points
    pub points: usize,
    pub width: u32,
    pub height: u32,
    /// PNG as `data:image/png;base64,...`
    pub image: String,
    /// X axis ticks drawn on the image
    pub ticks: Vec<Tick>,
}
