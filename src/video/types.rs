use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ExposureError, FrameSourceError, Result};

/// Prefix of every frame file written by a frame source
pub const FRAME_PREFIX: &str = "frame";

/// Extension of every frame file written by a frame source
pub const FRAME_EXTENSION: &str = "png";

/// Represents a single decoded video frame
///
/// This is a simple wrapper around an RGB image buffer. Whatever the decoder
/// produced (grayscale, RGBA, 16-bit) is normalized to 8-bit RGB on load.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with black
    pub fn new_black(width: u32, height: u32) -> Self {
        Self { buffer: ImageBuffer::new(width, height) }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    /// Decode a frame from an image file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| ExposureError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let rgb_image = match image {
            image::DynamicImage::ImageRgb8(img) => img,
            _ => image.to_rgb8(),
        };

        Ok(Self::new(rgb_image))
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.buffer.put_pixel(x, y, Rgb(color));
    }

    /// Interleaved RGB samples, row-major
    pub fn samples(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Create a frame from raw RGB bytes
    pub fn from_rgb_bytes(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        ImageBuffer::from_raw(width, height, data).map(|buffer| Self { buffer })
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), image::ImageError> {
        self.buffer.save_with_format(path, image::ImageFormat::Png)
    }
}

/// A frame file produced by a frame source, tagged with its sample index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFile {
    /// Position in sampling order (1-based for ffmpeg output)
    pub index: u32,

    pub path: PathBuf,
}

impl FrameFile {
    pub fn new<P: Into<PathBuf>>(index: u32, path: P) -> Self {
        Self { index, path: path.into() }
    }

    /// Parse the sample index from a filename like "frame_000042.png"
    pub fn from_path<P: Into<PathBuf>>(path: P) -> Option<Self> {
        let path = path.into();
        if path.extension()?.to_str()? != FRAME_EXTENSION {
            return None;
        }

        let stem = path.file_stem()?.to_str()?;
        let (prefix, number) = stem.split_once('_')?;
        if prefix != FRAME_PREFIX {
            return None;
        }

        let index = number.parse().ok()?;
        Some(Self::new(index, path))
    }
}

/// Ordered, chronological list of frame files
///
/// Ordering comes from the sample index each frame source assigns, never from
/// how the filenames happen to sort.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<FrameFile>,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Build a sequence whose order is exactly the given path order
    pub fn from_ordered_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let frames = paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| FrameFile::new(i as u32, path))
            .collect();
        Self { frames }
    }

    /// Add a frame file, keeping the sequence sorted by sample index
    pub fn add_frame(&mut self, frame: FrameFile) {
        let position = self.frames.partition_point(|f| f.index <= frame.index);
        self.frames.insert(position, frame);
    }

    pub fn frames(&self) -> &[FrameFile] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn first(&self) -> Option<&FrameFile> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&FrameFile> {
        self.frames.last()
    }

    /// Decode frames lazily, one at a time, in sequence order
    pub fn decode(&self) -> impl ExactSizeIterator<Item = Result<Frame>> + '_ {
        self.frames.iter().map(|f| Frame::open(&f.path))
    }
}

impl FromIterator<FrameFile> for FrameSequence {
    fn from_iter<I: IntoIterator<Item = FrameFile>>(iter: I) -> Self {
        let mut frames: Vec<FrameFile> = iter.into_iter().collect();
        frames.sort_by_key(|f| f.index);
        Self { frames }
    }
}

/// What to extract from a video: sampling rate plus an optional trim window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub video: PathBuf,

    /// Frames sampled per second of video
    pub frame_rate: f64,

    /// Offset into the video in seconds
    pub start_time: Option<f64>,

    /// Length of the sampled window in seconds
    pub duration: Option<f64>,
}

impl ExtractionRequest {
    pub fn new<P: Into<PathBuf>>(video: P, frame_rate: f64) -> Self {
        Self {
            video: video.into(),
            frame_rate,
            start_time: None,
            duration: None,
        }
    }

    pub fn with_start_time(mut self, start_time: Option<f64>) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn with_duration(mut self, duration: Option<f64>) -> Self {
        self.duration = duration;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(FrameSourceError::InvalidParameters {
                details: format!("frame rate must be positive, got {}", self.frame_rate),
            }
            .into());
        }

        if let Some(start) = self.start_time {
            if !(start.is_finite() && start >= 0.0) {
                return Err(FrameSourceError::InvalidParameters {
                    details: format!("start time must be non-negative, got {}", start),
                }
                .into());
            }
        }

        if let Some(duration) = self.duration {
            if !(duration.is_finite() && duration > 0.0) {
                return Err(FrameSourceError::InvalidParameters {
                    details: format!("duration must be positive, got {}", duration),
                }
                .into());
            }
        }

        Ok(())
    }

    /// File stem of the video, used to name derived artifacts
    pub fn video_stem(&self) -> String {
        video_stem(&self.video)
    }
}

pub(crate) fn video_stem(video: &Path) -> String {
    video
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video")
        .to_string()
}
