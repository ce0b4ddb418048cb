//! Static export of the dashboard page.
//!
//! With `BUILD_STATIC=true` the binary writes `index.html` into
//! `STATIC_OUTPUT_DIR` and exits; the page then calls the API at
//! `STATIC_API_BASE`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::routes::dashboard;

pub const INDEX_FILE: &str = "index.html";

/// Write the dashboard page into `dir`, creating it if needed.
///
/// # Errors
///
/// Returns the I/O error if the directory or file cannot be written.
pub fn generate(dir: &Path, config: &Config) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(INDEX_FILE);
    fs::write(&path, dashboard::render_page(&config.static_api_base))?;

    tracing::info!(
        path = %path.display(),
        api_base = %config.static_api_base,
        "static_site_generated"
    );
    Ok(path)
}
