//! Fixed-length resampling of magnitude buffers.
//!
//! Incoming FFT buffers change length with the zoom level and the analysis
//! size; the display row is always as wide as the surface. This maps one onto
//! the other by nearest-index picking, optionally normalizing into [0, 1].

use super::error::VisualError;

/// Default lower bound of the magnitude window, in dB
pub const DEFAULT_RANGE_MIN: f32 = -120.0;
/// Default upper bound of the magnitude window, in dB
pub const DEFAULT_RANGE_MAX: f32 = 0.0;

/// Value window used to normalize magnitudes into [0, 1].
///
/// Always satisfies `min < max` with both bounds finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRange {
    min: f32,
    max: f32,
}

impl DisplayRange {
    /// Creates a range, rejecting empty, inverted or non-finite windows.
    ///
    /// # Errors
    /// - If `max <= min`
    /// - If either bound is NaN or infinite
    pub fn new(min: f32, max: f32) -> Result<Self, VisualError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(VisualError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Clamps `value` into the window and scales it to [0, 1].
    ///
    /// NaN maps to 0.
    pub fn normalize(&self, value: f32) -> f32 {
        if value.is_nan() {
            return 0.0;
        }
        (value.clamp(self.min, self.max) - self.min) / (self.max - self.min)
    }
}

impl Default for DisplayRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_RANGE_MIN,
            max: DEFAULT_RANGE_MAX,
        }
    }
}

/// Maps `buffer` onto `output_count` evenly spaced positions.
///
/// Position `i` takes the sample at `round(i * (len - 1) / output_count)`,
/// with halfway cases rounded to even, clamped to the last index. Positions are visited in steps of `step`
/// (0 behaves as 1). When `range` is given every picked value is normalized
/// through it.
///
/// Returns `(position, value)` pairs in increasing position order, or nothing
/// at all for an empty buffer or a zero output count.
///
/// # Arguments
/// * `buffer` - Source samples, any length
/// * `output_count` - Number of output positions (typically surface width)
/// * `step` - Downsample factor across output positions
/// * `range` - Optional normalization window
pub fn resample(
    buffer: &[f32],
    output_count: usize,
    step: usize,
    range: Option<DisplayRange>,
) -> Vec<(usize, f32)> {
    if buffer.is_empty() || output_count == 0 {
        return Vec::new();
    }

    let last_index = buffer.len() - 1;
    let skip = last_index as f64 / output_count as f64;

    (0..output_count)
        .step_by(step.max(1))
        .map(|position| {
            let index = ((skip * position as f64).round_ties_even() as usize).min(last_index);
            let value = buffer[index];
            let value = match range {
                Some(range) => range.normalize(value),
                None => value,
            };
            (position, value)
        })
        .collect()
}
