use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::{OutputError, Result};
use crate::video::types::{video_stem, Frame};

/// `<dir>/long_exposure_<video stem>_<YYYYmmdd_HHMMSS>.png`
pub fn output_path<P: AsRef<Path>, V: AsRef<Path>>(dir: P, video: V, timestamp: DateTime<Local>) -> PathBuf {
    let name = format!(
        "long_exposure_{}_{}.png",
        video_stem(video.as_ref()),
        timestamp.format("%Y%m%d_%H%M%S")
    );
    dir.as_ref().join(name)
}

/// Write the composite as a PNG, creating the parent directory if needed
pub fn save_composite<P: AsRef<Path>>(composite: &Frame, path: P) -> Result<()> {
    let path = path.as_ref();
    let write_failed = |reason: String| OutputError::WriteFailed {
        path: path.display().to_string(),
        reason,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
    }

    composite
        .save_png(path)
        .map_err(|e| write_failed(e.to_string()))?;

    info!("Wrote {}x{} composite to {:?}", composite.width(), composite.height(), path);
    Ok(())
}
