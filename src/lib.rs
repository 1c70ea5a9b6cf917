//! # Long-Exposure
//!
//! Synthesize a long exposure photograph from a video.
//!
//! Frames are sampled from the video at a fixed rate, averaged pixel by
//! pixel, and optionally finished with a brightened copy of the first or last
//! frame to mimic a front or rear curtain flash.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use long_exposure::{
//!     composition::LongExposureEngine,
//!     config::Config,
//!     exposure::FlashMode,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! config.extraction.frame_rate = 4.0;
//! config.flash.mode = FlashMode::Rear;
//!
//! let engine = LongExposureEngine::new(config);
//! let report = engine.run("fireworks.mp4").await?;
//! println!("Saved {:?}", report.output);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`video`] - Frame extraction, frame files and the scoped frame workspace
//! - [`exposure`] - Frame averaging and the curtain flash
//! - [`composition`] - Pipeline engine and output writing
//! - [`config`] - Configuration management
//!
//! ## Custom Frame Sources
//!
//! Frames can come from anywhere by implementing the
//! [`FrameSource`](video::FrameSource) trait; the built-in one runs `ffmpeg`.

pub mod composition;
pub mod config;
pub mod error;
pub mod exposure;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{ExposureReport, LongExposureEngine},
    config::Config,
    error::{ExposureError, Result},
    exposure::{ExposureCompositor, FlashMode, FlashSettings},
    video::{Frame, FrameSource},
};
