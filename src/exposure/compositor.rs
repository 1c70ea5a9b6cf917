use std::borrow::Borrow;

use tracing::{debug, info};

use crate::error::{ExposureError, Result};
use crate::exposure::accumulator::Accumulator;
use crate::exposure::flash::{apply_flash, FlashMode, FlashSettings};
use crate::video::types::{Frame, FrameSequence};

/// Averages a sequence of frames into one long exposure
///
/// Frames are consumed one at a time. Besides the accumulator, at most the
/// frame being added and the flash anchor are held in memory.
#[derive(Debug, Clone, Default)]
pub struct ExposureCompositor {
    flash: FlashSettings,
}

impl ExposureCompositor {
    pub fn new(flash: FlashSettings) -> Self {
        Self { flash }
    }

    /// Compose frames already held in memory
    pub fn compose_frames(&self, frames: &[Frame], mode: FlashMode) -> Result<Frame> {
        self.compose(frames.iter().map(Ok), mode)
    }

    /// Compose a sequence of frame files, decoding each one as it is reached
    pub fn compose_sequence(&self, sequence: &FrameSequence, mode: FlashMode) -> Result<Frame> {
        self.compose(sequence.decode(), mode)
    }

    /// Mean of all frames, with the optional flash blended on top
    ///
    /// The frame count must be known up front so an empty or short stream is
    /// caught. The first frame fixes the output size; any frame of another
    /// size aborts with [`ExposureError::DimensionMismatch`].
    pub fn compose<I, F>(&self, frames: I, mode: FlashMode) -> Result<Frame>
    where
        I: IntoIterator<Item = Result<F>>,
        I::IntoIter: ExactSizeIterator,
        F: Borrow<Frame>,
    {
        let mut frames = frames.into_iter();
        let total = frames.len();

        let first = match frames.next() {
            Some(frame) => frame?,
            None => return Err(ExposureError::EmptyInput),
        };

        let (width, height) = first.borrow().dimensions();
        info!("Composing {} frames of {}x{} (flash: {})", total, width, height, mode);

        let mut accumulator = Accumulator::new(width, height, total)?;
        accumulator.add(first.borrow())?;

        let mut anchor = mode.is_enabled().then_some(first);

        for frame in frames {
            let frame = frame?;
            accumulator.add(frame.borrow())?;
            debug!("Accumulated frame {}/{}", accumulator.added(), total);

            if mode == FlashMode::Rear {
                anchor = Some(frame);
            }
        }

        let composite = accumulator.finish()?;

        match anchor {
            Some(anchor) => {
                debug!(
                    "Blending {} curtain flash (boost {}, alpha {})",
                    mode, self.flash.boost, self.flash.alpha
                );
                apply_flash(&composite, anchor.borrow(), &self.flash)
            }
            None => Ok(composite),
        }
    }
}
