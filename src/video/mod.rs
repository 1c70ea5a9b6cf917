//! # Video Module
//!
//! Turns a video into an ordered sequence of frame files and decodes them.
//! Decoding the video itself is delegated to an external `ffmpeg` process.

pub mod extractor;
pub mod types;
pub mod workspace;

pub use extractor::{FfmpegFrameSource, FrameSource};
pub use types::{ExtractionRequest, Frame, FrameFile, FrameSequence};
pub use workspace::FrameWorkspace;
