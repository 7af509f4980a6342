//! Errors raised by the waterfall core.

use thiserror::Error;

/// Invalid input handed to the waterfall core.
///
/// Runtime data problems (empty or short buffers) never surface here; they
/// degrade to an untouched row instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisualError {
    /// A display range whose upper bound does not exceed its lower bound
    #[error("Invalid display range: min ({min}) must be finite and below max ({max})")]
    InvalidRange { min: f32, max: f32 },

    /// A surface with no drawable area
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}
