//! # Exposure Module
//!
//! The long exposure itself: a running per-pixel mean over every sampled
//! frame, optionally finished with a simulated front or rear curtain flash.
//!
//! ```rust,no_run
//! use long_exposure::exposure::{ExposureCompositor, FlashMode};
//! use long_exposure::video::Frame;
//!
//! let frames = vec![
//!     Frame::new_filled(64, 48, [50, 50, 50]),
//!     Frame::new_filled(64, 48, [150, 150, 150]),
//! ];
//! let composite = ExposureCompositor::default()
//!     .compose_frames(&frames, FlashMode::Rear)
//!     .unwrap();
//! composite.save_png("long_exposure.png").unwrap();
//! ```

pub mod accumulator;
pub mod compositor;
pub mod flash;

pub use accumulator::Accumulator;
pub use compositor::ExposureCompositor;
pub use flash::{apply_flash, blend, flash_overlay, FlashMode, FlashSettings};
