use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    exposure::{FlashMode, FlashSettings},
};

/// Main configuration for a long exposure run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame sampling settings
    pub extraction: ExtractionConfig,

    /// Flash mode and strength
    pub flash: FlashConfig,

    /// Where results and working files go
    pub output: OutputConfig,

    /// Thread pool sizing
    pub performance: PerformanceConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()?;
        self.flash.settings().validate()?;
        self.performance.validate()?;
        Ok(())
    }
}

/// Frame sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Frames sampled per second of video
    pub frame_rate: f64,

    /// Seconds to skip before sampling starts
    pub start_time: Option<f64>,

    /// Seconds of video to sample
    pub duration: Option<f64>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            frame_rate: 1.0,
            start_time: None,
            duration: None,
        }
    }
}

impl ExtractionConfig {
    fn validate(&self) -> Result<()> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "extraction.frame_rate".to_string(),
                value: self.frame_rate.to_string()
            }.into());
        }

        if let Some(start) = self.start_time {
            if !(start.is_finite() && start >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    key: "extraction.start_time".to_string(),
                    value: start.to_string()
                }.into());
            }
        }

        if let Some(duration) = self.duration {
            if !(duration.is_finite() && duration > 0.0) {
                return Err(ConfigError::InvalidValue {
                    key: "extraction.duration".to_string(),
                    value: duration.to_string()
                }.into());
            }
        }

        Ok(())
    }
}

/// Flash configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
    pub mode: FlashMode,

    /// Brightness multiplier for the flashed frame
    pub boost: f64,

    /// Weight of the flashed frame in the final blend (0.0-1.0)
    pub alpha: f64,
}

impl Default for FlashConfig {
    fn default() -> Self {
        let settings = FlashSettings::default();
        Self {
            mode: FlashMode::None,
            boost: settings.boost,
            alpha: settings.alpha,
        }
    }
}

impl FlashConfig {
    pub fn settings(&self) -> FlashSettings {
        FlashSettings {
            boost: self.boost,
            alpha: self.alpha,
        }
    }
}

/// Output and working directory configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the final image is written to
    pub directory: PathBuf,

    /// Directory under which the per-run frame directory is created
    pub work_directory: PathBuf,

    /// Leave the extracted frames on disk after composing
    pub keep_frames: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            work_directory: PathBuf::from("."),
            keep_frames: false,
        }
    }
}

/// Thread pool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Worker threads used to accumulate frames
    pub threads: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(),
        }
    }
}

impl PerformanceConfig {
    fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "performance.threads".to_string(),
                value: self.threads.to_string()
            }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction.frame_rate, 1.0);
        assert_eq!(config.flash.mode, FlashMode::None);
        assert_eq!(config.flash.settings(), FlashSettings::default());
        assert!(!config.output.keep_frames);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.extraction.start_time = Some(2.5);
        original_config.flash.mode = FlashMode::Rear;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[flash]\nmode = \"front\"\nalpha = 0.5\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.flash.mode, FlashMode::Front);
        assert_eq!(config.flash.alpha, 0.5);
        assert_eq!(config.flash.boost, 1.5);
        assert_eq!(config.extraction.frame_rate, 1.0);
    }

    #[test]
    fn test_unknown_flash_mode_in_file_fails_to_parse() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        std::fs::write(&file_path, "[flash]\nmode = \"sideways\"\n").unwrap();

        assert!(Config::from_file(&file_path).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::from_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_invalid_frame_rate() {
        let mut config = Config::default();
        config.extraction.frame_rate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_trim_window() {
        let mut config = Config::default();
        config.extraction.duration = Some(-3.0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.extraction.start_time = Some(f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_alpha() {
        let mut config = Config::default();
        config.flash.alpha = 1.5;
        assert!(config.validate().is_err());
    }
}
