use ab_glyph::FontRef;
use plotters::style::{register_font, FontStyle};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Family name charts refer to their text by.
pub const FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Register the chart font once per process and report whether text can be
/// drawn.
///
/// `preferred` is tried first, then a few common system locations. The first
/// call decides; later calls return the same answer whatever they pass.
pub fn ensure_registered(preferred: Option<&Path>) -> bool {
    REGISTERED
        .get_or_init(|| {
            let candidates = preferred
                .map(Path::to_path_buf)
                .into_iter()
                .chain(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));

            for path in candidates {
                match try_register(&path) {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "chart_font_registered");
                        return Some(path);
                    }
                    Err(reason) => {
                        tracing::trace!(
                            path = %path.display(),
                            reason = %reason,
                            "chart_font_skipped"
                        );
                    }
                }
            }

            tracing::warn!("No usable TrueType font found, charts are rendered without text");
            None
        })
        .is_some()
}

fn try_register(path: &Path) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    if !is_valid_font(&bytes) {
        return Err("invalid font data".to_string());
    }
    // plotters keeps a 'static reference; one font lives for the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| "invalid font data".to_string())
}

/// Whether `bytes` parse as a TrueType/OpenType font.
#[must_use]
pub fn is_valid_font(bytes: &[u8]) -> bool {
    FontRef::try_from_slice(bytes).is_ok()
}
