//! Stylize filters: Posterize, Clip.
//!
//! ## Supported Formats
//!
//! RGB `f32` images of shape (height, width, 3), values 0.0-1.0. Both
//! filters act on each value independently.

use super::core::Image;
use super::Adjustment;
use crate::error::{FilterError, FilterResult};

// ============================================================================
// Posterize
// ============================================================================

/// Quantize values to multiples of `1 / levels`.
///
/// Rounding is half-to-even, so 0.5 with two levels stays 0.5 and 0.25
/// rounds down to 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Posterize {
    levels: f32,
}

impl Posterize {
    /// # Arguments
    /// * `levels` - Number of steps per unit, must be positive
    pub fn new(levels: f32) -> FilterResult<Self> {
        if !(levels.is_finite() && levels > 0.0) {
            return Err(FilterError::InvalidConfiguration(format!(
                "posterize levels must be positive, got {levels}"
            )));
        }
        Ok(Self { levels })
    }
}

impl Adjustment for Posterize {
    fn process(&self, image: &mut Image) {
        let levels = self.levels;
        image.par_mapv_inplace(|v| (v * levels).round_ties_even() / levels);
    }
}

// ============================================================================
// Clip
// ============================================================================

/// Snap values near the extremes to pure black or white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    threshold: f32,
}

impl Clip {
    /// # Arguments
    /// * `adjust` - 0..100; values above `1 - adjust%` become 1, values
    ///   below `adjust%` become 0. The sign is ignored.
    pub fn new(adjust: f32) -> Self {
        Self {
            threshold: adjust.abs() * 0.01,
        }
    }
}

impl Adjustment for Clip {
    fn process(&self, image: &mut Image) {
        let low = self.threshold;
        let high = 1.0 - self.threshold;
        image.par_mapv_inplace(|v| {
            let v = if v > high { 1.0 } else { v };
            if v < low {
                0.0
            } else {
                v
            }
        });
    }
}
