mod handlers;
mod types;

pub use handlers::{get_session, load_more, open_session, render_chart};
pub use types::{ChartQuery, ChartResponse, OpenExploreQuery, SessionQuery, SessionResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_session, __path_load_more, __path_open_session, __path_render_chart};
