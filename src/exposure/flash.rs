use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ExposureError, Result};
use crate::video::types::Frame;

/// Which frame, if any, gets flashed into the exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    None,
    /// Flash fires at the start of the exposure (first frame)
    Front,
    /// Flash fires at the end of the exposure (last frame)
    Rear,
}

impl FlashMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashMode::None => "none",
            FlashMode::Front => "front",
            FlashMode::Rear => "rear",
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self != FlashMode::None
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlashMode {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(FlashMode::None),
            "front" => Ok(FlashMode::Front),
            "rear" => Ok(FlashMode::Rear),
            _ => Err(ConfigError::UnknownFlashMode { name: s.to_string() }.into()),
        }
    }
}

/// Strength of the simulated flash
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlashSettings {
    /// Multiplier applied to every channel of the anchor frame
    pub boost: f64,

    /// Weight of the flash overlay in the final blend (0.0-1.0)
    pub alpha: f64,
}

impl Default for FlashSettings {
    fn default() -> Self {
        Self {
            boost: 1.5,
            alpha: 0.3,
        }
    }
}

impl FlashSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.boost.is_finite() && self.boost >= 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "flash.boost".to_string(),
                value: self.boost.to_string(),
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::InvalidValue {
                key: "flash.alpha".to_string(),
                value: self.alpha.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Brightened copy of the anchor frame: `min(255, round(p * boost))` per channel
///
/// A straight linear gain with a hard clip; hue is untouched and no gamma is applied.
pub fn flash_overlay(anchor: &Frame, boost: f64) -> Frame {
    let mut overlay = anchor.clone();
    for sample in overlay.samples_mut() {
        *sample = (*sample as f64 * boost).round().min(255.0) as u8;
    }
    overlay
}

/// `round(base * (1 - alpha) + overlay * alpha)` per channel
pub fn blend(base: &Frame, overlay: &Frame, alpha: f64) -> Result<Frame> {
    if base.dimensions() != overlay.dimensions() {
        return Err(ExposureError::DimensionMismatch {
            index: 0,
            expected_width: base.width(),
            expected_height: base.height(),
            found_width: overlay.width(),
            found_height: overlay.height(),
        });
    }

    let mut blended = base.clone();
    for (out, &flash) in blended.samples_mut().iter_mut().zip(overlay.samples()) {
        let mixed = *out as f64 * (1.0 - alpha) + flash as f64 * alpha;
        *out = mixed.round().clamp(0.0, 255.0) as u8;
    }
    Ok(blended)
}

/// Blend a flashed copy of `anchor` into `composite`
pub fn apply_flash(composite: &Frame, anchor: &Frame, settings: &FlashSettings) -> Result<Frame> {
    let overlay = flash_overlay(anchor, settings.boost);
    blend(composite, &overlay, settings.alpha)
}
