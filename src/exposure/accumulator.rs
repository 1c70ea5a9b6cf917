use rayon::prelude::*;

use crate::error::{ExposureError, Result};
use crate::video::types::Frame;

/// Elements handed to a single rayon task; below this the split costs more than it saves
const PARALLEL_MIN_LEN: usize = 16 * 1024;

/// Per-pixel, per-channel running sum
///
/// Sums are kept as exact integers and divided once in [`Accumulator::finish`],
/// so the result does not depend on the order frames are added in.
#[derive(Debug, Clone)]
pub struct Accumulator {
    width: u32,
    height: u32,
    total_frames: usize,
    added: usize,
    sums: Vec<u64>,
}

impl Accumulator {
    /// Zeroed accumulator for `total_frames` frames of `width`x`height`
    pub fn new(width: u32, height: u32, total_frames: usize) -> Result<Self> {
        if total_frames == 0 {
            return Err(ExposureError::EmptyInput);
        }

        let len = width as usize * height as usize * 3;
        Ok(Self {
            width,
            height,
            total_frames,
            added: 0,
            sums: vec![0; len],
        })
    }

    /// Frames added so far
    pub fn added(&self) -> usize {
        self.added
    }

    /// Fold one frame into the running sum
    ///
    /// A frame whose size differs from the accumulator is rejected before
    /// any sum is touched.
    pub fn add(&mut self, frame: &Frame) -> Result<()> {
        let (width, height) = frame.dimensions();
        if (width, height) != (self.width, self.height) {
            return Err(ExposureError::DimensionMismatch {
                index: self.added,
                expected_width: self.width,
                expected_height: self.height,
                found_width: width,
                found_height: height,
            });
        }

        if self.added == self.total_frames {
            return Err(ExposureError::generic(format!(
                "accumulator sized for {} frames received another",
                self.total_frames
            )));
        }

        self.sums
            .par_iter_mut()
            .zip(frame.samples().par_iter())
            .with_min_len(PARALLEL_MIN_LEN)
            .for_each(|(sum, &sample)| *sum += u64::from(sample));

        self.added += 1;
        Ok(())
    }

    /// Divide every sum by the frame count, rounding halves to even, into an 8-bit frame
    pub fn finish(self) -> Result<Frame> {
        if self.added != self.total_frames {
            return Err(ExposureError::generic(format!(
                "expected {} frames, accumulated {}",
                self.total_frames, self.added
            )));
        }

        let n = self.total_frames as u64;
        let samples: Vec<u8> = self
            .sums
            .par_iter()
            .with_min_len(PARALLEL_MIN_LEN)
            .map(|&sum| rounded_mean(sum, n).min(255) as u8)
            .collect();

        Frame::from_rgb_bytes(self.width, self.height, samples)
            .ok_or_else(|| ExposureError::generic("accumulator buffer does not match its dimensions"))
    }
}

/// `sum / n` rounded to the nearest integer, ties to even
fn rounded_mean(sum: u64, n: u64) -> u64 {
    let quotient = sum / n;
    let twice_remainder = (sum % n) * 2;
    match twice_remainder.cmp(&n) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
        std::cmp::Ordering::Less => quotient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_frames_rejected() {
        assert!(matches!(Accumulator::new(4, 4, 0), Err(ExposureError::EmptyInput)));
    }

    #[test]
    fn test_mean_of_two_frames() {
        let mut acc = Accumulator::new(2, 2, 2).unwrap();
        acc.add(&Frame::new_filled(2, 2, [0, 100, 255])).unwrap();
        acc.add(&Frame::new_filled(2, 2, [10, 101, 255])).unwrap();

        let frame = acc.finish().unwrap();
        // 100.5 rounds to the even neighbour
        assert_eq!(frame.get_pixel(1, 1), [5, 100, 255]);
    }

    #[test]
    fn test_mismatched_frame_leaves_sums_untouched() {
        let mut acc = Accumulator::new(3, 2, 2).unwrap();
        acc.add(&Frame::new_filled(3, 2, [90, 90, 90])).unwrap();

        let err = acc.add(&Frame::new_filled(2, 2, [10, 10, 10])).unwrap_err();
        assert!(matches!(
            err,
            ExposureError::DimensionMismatch { index: 1, found_width: 2, .. }
        ));
        assert_eq!(acc.added(), 1);
        assert!(acc.sums.iter().all(|&s| s == 90));
    }

    #[test]
    fn test_halves_round_to_even() {
        let mut acc = Accumulator::new(1, 1, 2).unwrap();
        acc.add(&Frame::new_filled(1, 1, [0, 100, 2])).unwrap();
        acc.add(&Frame::new_filled(1, 1, [1, 101, 3])).unwrap();
        assert_eq!(acc.finish().unwrap().get_pixel(0, 0), [0, 100, 2]);
    }

    #[test]
    fn test_rounded_mean() {
        assert_eq!(rounded_mean(7, 3), 2);
        assert_eq!(rounded_mean(8, 3), 3);
        assert_eq!(rounded_mean(5, 2), 2);
        assert_eq!(rounded_mean(7, 2), 4);
        assert_eq!(rounded_mean(2651, 22), 120);
        assert_eq!(rounded_mean(255 * 1000, 1000), 255);
    }

    #[test]
    fn test_finish_requires_every_frame() {
        let mut acc = Accumulator::new(1, 1, 3).unwrap();
        acc.add(&Frame::new_filled(1, 1, [1, 2, 3])).unwrap();
        assert!(acc.finish().is_err());
    }

    #[test]
    fn test_overfilled_accumulator_rejected() {
        let mut acc = Accumulator::new(1, 1, 1).unwrap();
        acc.add(&Frame::new_filled(1, 1, [1, 2, 3])).unwrap();
        assert!(acc.add(&Frame::new_filled(1, 1, [1, 2, 3])).is_err());
    }

    #[test]
    fn test_large_frame_takes_parallel_path() {
        let (w, h) = (256, 128);
        let mut acc = Accumulator::new(w, h, 4).unwrap();
        for value in [0u8, 64, 128, 255] {
            acc.add(&Frame::new_filled(w, h, [value, 255 - value, 7])).unwrap();
        }

        let frame = acc.finish().unwrap();
        // (0 + 64 + 128 + 255) / 4 = 111.75
        assert!(frame.samples().chunks(3).all(|px| px == [112, 143, 7]));
    }
}
