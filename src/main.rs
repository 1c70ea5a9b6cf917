use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use long_exposure::{
    composition::{init_thread_pool, LongExposureEngine},
    config::Config,
    exposure::FlashMode,
};

#[derive(Parser)]
#[command(
    name = "long-exposure",
    version,
    about = "Create a long exposure effect from a video",
    long_about = "Long-Exposure samples frames from a video with ffmpeg, averages them into a single photograph and can blend in a brightened first or last frame to simulate a curtain flash."
)]
struct Cli {
    /// Path to the video file
    video: PathBuf,

    /// Apply a front or rear curtain flash effect
    #[arg(long, value_enum)]
    flash_mode: Option<CliFlashMode>,

    /// Keep the extracted frames
    #[arg(long)]
    keep_frames: bool,

    /// Frames per second to sample from the video [default: 1.0]
    #[arg(long)]
    frame_rate: Option<f64>,

    /// Start time for frame extraction in seconds
    #[arg(long)]
    start_time: Option<f64>,

    /// Duration for frame extraction in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Directory the long exposure image is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory in which the temporary frame directory is created
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliFlashMode {
    Front,
    Rear,
}

impl From<CliFlashMode> for FlashMode {
    fn from(mode: CliFlashMode) -> Self {
        match mode {
            CliFlashMode::Front => FlashMode::Front,
            CliFlashMode::Rear => FlashMode::Rear,
        }
    }
}

impl Cli {
    /// Command line flags win over the configuration file
    fn apply_to(&self, config: &mut Config) {
        if let Some(mode) = self.flash_mode {
            config.flash.mode = mode.into();
        }
        if self.keep_frames {
            config.output.keep_frames = true;
        }
        if let Some(frame_rate) = self.frame_rate {
            config.extraction.frame_rate = frame_rate;
        }
        if self.start_time.is_some() {
            config.extraction.start_time = self.start_time;
        }
        if self.duration.is_some() {
            config.extraction.duration = self.duration;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(dir) = &self.work_dir {
            config.output.work_directory = dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Long-Exposure v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    cli.apply_to(&mut config);
    config.validate().map_err(|e| anyhow::anyhow!(e.user_message()))?;

    init_thread_pool(config.performance.threads);

    let engine = LongExposureEngine::new(config);
    let report = engine
        .run(&cli.video)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if let Some(frames_dir) = &report.frames_dir {
        info!("Extracted frames kept in {:?}", frames_dir);
    }
    println!("Long exposure image saved to {}", report.output.display());
    Ok(())
}
