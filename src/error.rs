use thiserror::Error;

/// Main error type for the long-exposure library
#[derive(Error, Debug)]
pub enum ExposureError {
    #[error("No frames to compose")]
    EmptyInput,

    #[error("Frame {index} is {found_width}x{found_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        index: usize,
        expected_width: u32,
        expected_height: u32,
        found_width: u32,
        found_height: u32,
    },

    #[error("Failed to decode frame {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Frame extraction error: {0}")]
    FrameSource(#[from] FrameSourceError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while turning a video into frame files
#[derive(Error, Debug)]
pub enum FrameSourceError {
    #[error("Decoder not available: {reason}")]
    DecoderUnavailable { reason: String },

    #[error("Decoder failed on {path}: {stderr}")]
    DecoderFailed { path: String, stderr: String },

    #[error("Video file not found: {path}")]
    VideoNotFound { path: String },

    #[error("Invalid extraction parameters: {details}")]
    InvalidParameters { details: String },
}

/// Errors raised while persisting the composite or cleaning up after it
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: String, reason: String },

    #[error("Failed to remove frame directory {path}: {reason}")]
    CleanupFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown flash mode: {name}")]
    UnknownFlashMode { name: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using ExposureError
pub type Result<T> = std::result::Result<T, ExposureError>;

impl ExposureError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => {
                "The decoder produced no frames. Check the start time and duration fall inside the video.".to_string()
            }
            Self::FrameSource(FrameSourceError::DecoderUnavailable { .. }) => {
                "FFmpeg was not found. Please install FFmpeg and make sure it is on your PATH.".to_string()
            }
            Self::FrameSource(FrameSourceError::VideoNotFound { path }) => {
                format!("Could not find video file '{}'.", path)
            }
            Self::Config(ConfigError::UnknownFlashMode { name }) => {
                format!("Flash mode '{}' not recognized. Available modes: front, rear", name)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
