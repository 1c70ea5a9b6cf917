//! # Composition Engine
//!
//! The engine coordinates frame extraction, averaging and output so that a
//! single call turns a video into a long exposure image.

pub mod engine;
pub mod output;

// Re-exports for convenience
pub use engine::{init_thread_pool, ExposureReport, LongExposureEngine};
pub use output::{output_path, save_composite};
