use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::task;
use tracing::{debug, info, warn};

use crate::{
    composition::output::{output_path, save_composite},
    config::Config,
    error::{ExposureError, Result},
    exposure::{ExposureCompositor, FlashMode},
    video::{ExtractionRequest, FfmpegFrameSource, FrameSource, FrameWorkspace},
};

/// What a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureReport {
    /// Path of the written long exposure image
    pub output: PathBuf,

    pub frame_count: usize,
    pub width: u32,
    pub height: u32,
    pub flash_mode: FlashMode,

    /// Set when the extracted frames were kept on disk
    pub frames_dir: Option<PathBuf>,
}

/// Main engine that turns a video into a long exposure photograph
///
/// The engine follows a strict pipeline:
/// 1. Workspace - Create a scoped directory for extracted frames
/// 2. Extraction - Sample frames from the video with the frame source
/// 3. Composition - Average the frames and blend the optional flash
/// 4. Output - Write the composite as a PNG
/// 5. Cleanup - Remove the extracted frames unless asked to keep them
pub struct LongExposureEngine<S: FrameSource = FfmpegFrameSource> {
    config: Config,
    source: S,
}

impl LongExposureEngine<FfmpegFrameSource> {
    /// Create an engine that extracts frames with ffmpeg
    pub fn new(config: Config) -> Self {
        Self::with_source(config, FfmpegFrameSource::new())
    }
}

impl<S: FrameSource> LongExposureEngine<S> {
    /// Create an engine with a custom frame source
    pub fn with_source(config: Config, source: S) -> Self {
        Self { config, source }
    }

    /// Run the whole pipeline for one video
    pub async fn run<P: AsRef<Path>>(&self, video: P) -> Result<ExposureReport> {
        let video = video.as_ref();
        self.config.validate()?;

        let extraction = &self.config.extraction;
        let request = ExtractionRequest::new(video, extraction.frame_rate)
            .with_start_time(extraction.start_time)
            .with_duration(extraction.duration);
        request.validate()?;

        info!("📷 Starting long exposure");
        info!("   Video: {:?}", video);
        info!("   Frame rate: {} fps", request.frame_rate);
        info!("   Flash: {}", self.config.flash.mode);
        info!("   Source: {}", self.source.name());

        // Pipeline Step 1: Workspace
        let workspace = FrameWorkspace::create(
            &self.config.output.work_directory,
            video,
            self.config.output.keep_frames,
        )?;

        // Pipeline Step 2: Extraction
        let sequence = self.source.extract(&request, &workspace).await?;
        let frame_count = sequence.len();
        info!("   Sampled {} frames into {:?}", frame_count, workspace.path());

        // Pipeline Step 3: Composition
        let compositor = ExposureCompositor::new(self.config.flash.settings());
        let mode = self.config.flash.mode;
        let composite = task::spawn_blocking(move || compositor.compose_sequence(&sequence, mode))
            .await
            .map_err(|e| ExposureError::generic(format!("Composition task failed: {}", e)))??;

        // Pipeline Step 4: Output
        let output = output_path(&self.config.output.directory, video, Local::now());
        save_composite(&composite, &output)?;

        // Pipeline Step 5: Cleanup; a failure here does not undo the written image
        let frames_dir = workspace
            .keeps_frames()
            .then(|| workspace.path().to_path_buf());
        if let Err(e) = workspace.finish() {
            warn!("{}", e);
        }

        info!("🎉 Long exposure image saved to {:?}", output);
        Ok(ExposureReport {
            output,
            frame_count,
            width: composite.width(),
            height: composite.height(),
            flash_mode: mode,
            frames_dir,
        })
    }
}

/// Size the global rayon pool used for accumulation
///
/// The global pool can only be built once per process; later calls keep the
/// existing pool.
pub fn init_thread_pool(threads: usize) {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        Ok(()) => debug!("Accumulating with {} threads", threads),
        Err(e) => debug!("Keeping existing thread pool: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    use crate::video::{Frame, FrameSequence};

    /// Writes uniform gray frames instead of decoding a video
    struct GraySource {
        values: Vec<u8>,
    }

    impl FrameSource for GraySource {
        fn name(&self) -> &str {
            "gray"
        }

        async fn extract(&self, _request: &ExtractionRequest, workspace: &FrameWorkspace) -> Result<FrameSequence> {
            for (i, &value) in self.values.iter().enumerate() {
                let path = workspace.path().join(format!("frame_{:06}.png", i + 1));
                Frame::new_filled(6, 4, [value, value, value])
                    .save_png(&path)
                    .map_err(|e| ExposureError::generic(e.to_string()))?;
            }

            let sequence = FfmpegFrameSource::collect_frames(workspace)?;
            if sequence.is_empty() {
                return Err(ExposureError::EmptyInput);
            }
            Ok(sequence)
        }
    }

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.output.directory = dir.path().join("out");
        config.output.work_directory = dir.path().join("work");
        config
    }

    fn work_entries(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path().join("work")).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_end_to_end_gray_ramp() {
        let dir = tempdir().unwrap();
        let engine = LongExposureEngine::with_source(
            config_in(&dir),
            GraySource { values: vec![50, 100, 150] },
        );

        let report = engine.run("clips/harbor.mp4").await.unwrap();
        assert_eq!(report.frame_count, 3);
        assert_eq!((report.width, report.height), (6, 4));
        assert!(report.frames_dir.is_none());

        let name = report.output.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("long_exposure_harbor_"));

        let image = Frame::open(&report.output).unwrap();
        assert!(image.samples().iter().all(|&s| s == 100));

        assert_eq!(work_entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_rear_flash_end_to_end() {
        let dir = tempdir().unwrap();
        let mut config = config_in(&dir);
        config.flash.mode = FlashMode::Rear;
        let engine = LongExposureEngine::with_source(config, GraySource { values: vec![0, 100] });

        let report = engine.run("night.mp4").await.unwrap();
        assert_eq!(report.flash_mode, FlashMode::Rear);

        // mean 50, overlay 150, 50*0.7 + 150*0.3 = 80
        let image = Frame::open(&report.output).unwrap();
        assert!(image.samples().iter().all(|&s| s == 80));
    }

    #[tokio::test]
    async fn test_keep_frames_leaves_workspace() {
        let dir = tempdir().unwrap();
        let mut config = config_in(&dir);
        config.output.keep_frames = true;
        let engine = LongExposureEngine::with_source(config, GraySource { values: vec![10, 20] });

        let report = engine.run("street.mp4").await.unwrap();
        let frames_dir = report.frames_dir.unwrap();
        assert!(frames_dir.join("frame_000001.png").is_file());
        assert!(frames_dir.join("frame_000002.png").is_file());
    }

    #[tokio::test]
    async fn test_empty_extraction_fails_and_cleans_up() {
        let dir = tempdir().unwrap();
        let engine = LongExposureEngine::with_source(config_in(&dir), GraySource { values: vec![] });

        let result = engine.run("empty.mp4").await;
        assert!(matches!(result, Err(ExposureError::EmptyInput)));
        assert_eq!(work_entries(&dir), 0);
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_extraction() {
        let dir = tempdir().unwrap();
        let mut config = config_in(&dir);
        config.extraction.frame_rate = -2.0;
        let engine = LongExposureEngine::with_source(config, GraySource { values: vec![1] });

        assert!(engine.run("clip.mp4").await.is_err());
        assert!(!dir.path().join("work").exists());
    }
}
