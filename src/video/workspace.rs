use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::error::{OutputError, Result};
use crate::video::types::video_stem;

/// Scoped directory that holds extracted frames for one run
///
/// The directory belongs to whoever holds the workspace. Unless it is marked
/// `keep`, it is removed on drop, so early returns and errors clean up too.
pub struct FrameWorkspace {
    dir: PathBuf,
    keep: bool,
    removed: bool,
}

impl FrameWorkspace {
    /// Create `frames_<stem>_<timestamp>_<pid>` under `parent`
    pub fn create<P: AsRef<Path>, V: AsRef<Path>>(parent: P, video: V, keep: bool) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let name = format!(
            "frames_{}_{}_{}",
            video_stem(video.as_ref()),
            timestamp,
            std::process::id()
        );
        Self::create_named(parent.as_ref().join(name), keep)
    }

    /// Use an explicit directory; it must not already contain frames
    pub fn create_named<P: Into<PathBuf>>(dir: P, keep: bool) -> Result<Self> {
        let dir = dir.into();
        create_dir_all(&dir)?;
        debug!("Created frame workspace: {:?}", dir);

        Ok(Self {
            dir,
            keep,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn keeps_frames(&self) -> bool {
        self.keep
    }

    /// Remove the directory now (unless kept) and report whether that worked
    pub fn finish(mut self) -> std::result::Result<(), OutputError> {
        if self.keep {
            info!("Keeping extracted frames in {:?}", self.dir);
            self.removed = true;
            return Ok(());
        }
        self.remove()
    }

    fn remove(&mut self) -> std::result::Result<(), OutputError> {
        self.removed = true;
        std::fs::remove_dir_all(&self.dir).map_err(|e| OutputError::CleanupFailed {
            path: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Removed frame workspace: {:?}", self.dir);
        Ok(())
    }
}

impl Drop for FrameWorkspace {
    fn drop(&mut self) {
        if self.keep || self.removed {
            return;
        }
        if let Err(e) = self.remove() {
            warn!("{}", e);
        }
    }
}
