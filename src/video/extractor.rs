use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{ExposureError, FrameSourceError, Result};
use crate::video::types::{ExtractionRequest, FrameFile, FrameSequence, FRAME_EXTENSION, FRAME_PREFIX};
use crate::video::workspace::FrameWorkspace;

/// Anything that can turn a video into an ordered sequence of frame files
///
/// Implementations write their frames into the workspace they are given and
/// must return them in chronological order.
pub trait FrameSource: Send + Sync {
    fn name(&self) -> &str;

    fn extract(
        &self,
        request: &ExtractionRequest,
        workspace: &FrameWorkspace,
    ) -> impl Future<Output = Result<FrameSequence>> + Send;
}

/// Frame source that shells out to the `ffmpeg` binary
#[derive(Debug, Clone)]
pub struct FfmpegFrameSource {
    program: String,
}

impl FfmpegFrameSource {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific ffmpeg executable (path or name on PATH)
    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Self { program: program.into() }
    }

    pub async fn check_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Argument list for one extraction, output pattern included
    pub fn build_args(&self, request: &ExtractionRequest, workspace: &FrameWorkspace) -> Vec<String> {
        let mut args = vec!["-hide_banner".to_string(), "-nostdin".to_string()];

        // Zero offsets are left off entirely, as ffmpeg would treat them as a no-op anyway
        if let Some(start) = request.start_time.filter(|s| *s > 0.0) {
            args.push("-ss".to_string());
            args.push(start.to_string());
        }
        if let Some(duration) = request.duration {
            args.push("-t".to_string());
            args.push(duration.to_string());
        }

        let pattern = workspace
            .path()
            .join(format!("{}_%06d.{}", FRAME_PREFIX, FRAME_EXTENSION));

        args.extend([
            "-i".to_string(),
            request.video.display().to_string(),
            "-vf".to_string(),
            format!("fps={}", request.frame_rate),
            "-y".to_string(),
            pattern.display().to_string(),
        ]);
        args
    }

    /// Collect the numbered frame files ffmpeg left in the workspace
    pub fn collect_frames(workspace: &FrameWorkspace) -> Result<FrameSequence> {
        let mut sequence = FrameSequence::new();

        for entry in std::fs::read_dir(workspace.path())? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            match FrameFile::from_path(&path) {
                Some(frame) => sequence.add_frame(frame),
                None => debug!("Ignoring non-frame file: {:?}", path),
            }
        }

        Ok(sequence)
    }
}

impl Default for FfmpegFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FfmpegFrameSource {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn extract(&self, request: &ExtractionRequest, workspace: &FrameWorkspace) -> Result<FrameSequence> {
        request.validate()?;

        if !request.video.is_file() {
            return Err(FrameSourceError::VideoNotFound {
                path: request.video.display().to_string(),
            }
            .into());
        }

        if !self.check_available().await {
            return Err(FrameSourceError::DecoderUnavailable {
                reason: format!("'{}' could not be executed", self.program),
            }
            .into());
        }

        let args = self.build_args(request, workspace);
        debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| FrameSourceError::DecoderUnavailable {
                reason: format!("Failed to spawn {}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("ffmpeg exited with {}", output.status);
            return Err(FrameSourceError::DecoderFailed {
                path: request.video.display().to_string(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        let sequence = Self::collect_frames(workspace)?;
        if sequence.is_empty() {
            return Err(ExposureError::EmptyInput);
        }

        info!(
            "Extracted {} frames at {} fps from {:?}",
            sequence.len(),
            request.frame_rate,
            request.video
        );
        Ok(sequence)
    }
}
