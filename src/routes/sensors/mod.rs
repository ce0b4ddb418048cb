mod handlers;
mod types;

pub use handlers::{get_latest, list_latest, list_sensors};
pub use types::LatestReading;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_latest, __path_list_latest, __path_list_sensors};
