//! Radial vignette.
//!
//! Pixels beyond an inner radius are darkened by raising them to a power
//! that grows toward the corners. The growth follows the fixed falloff
//! curve in [`crate::curve::FalloffCurve`], which is shared between every
//! vignette built from the same cache.
//!
//! ## Geometry
//!
//! - `size = min(height, width) * scale`
//! - center at `(height / 2, width / 2)`; `start` is the distance from the
//!   center to the top-left corner and `end = start - size`
//! - a pixel at distance `d > end` takes falloff index
//!   `round((d - end) / size * 100)` and exponent
//!   `max(falloff[index] * 0.1 * strength, 1)`

use std::sync::Arc;

use ndarray::{Axis, Zip};

use super::core::Image;
use super::Adjustment;
use crate::curve::FalloffCurve;
use crate::error::{FilterError, FilterResult};

/// Default vignette strength in percent.
pub const DEFAULT_STRENGTH: f32 = 60.0;

/// Validated vignette parameters, stored as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VignetteParams {
    scale: f64,
    strength: f64,
}

impl VignetteParams {
    /// # Arguments
    /// * `scale` - Width of the darkened band as a percentage of the shorter
    ///   image side, in `(0, 100]`
    /// * `strength` - 0..=100, how hard the band darkens
    pub fn new(scale: f32, strength: f32) -> FilterResult<Self> {
        if !(scale.is_finite() && scale > 0.0 && scale <= 100.0) {
            return Err(FilterError::InvalidConfiguration(format!(
                "vignette scale must be within (0, 100], got {scale}"
            )));
        }
        if !(0.0..=100.0).contains(&strength) {
            return Err(FilterError::InvalidConfiguration(format!(
                "vignette strength must be within 0..=100, got {strength}"
            )));
        }
        Ok(Self {
            scale: scale as f64 * 0.01,
            strength: strength as f64 * 0.01,
        })
    }

    /// Parameters with the default strength.
    pub fn with_scale(scale: f32) -> FilterResult<Self> {
        Self::new(scale, DEFAULT_STRENGTH)
    }
}

/// Radial vignette filter.
#[derive(Debug, Clone)]
pub struct Vignette {
    params: VignetteParams,
    falloff: Arc<FalloffCurve>,
}

impl Vignette {
    pub fn new(params: VignetteParams, falloff: Arc<FalloffCurve>) -> Self {
        Self { params, falloff }
    }

    pub fn params(&self) -> VignetteParams {
        self.params
    }

    pub fn falloff(&self) -> &Arc<FalloffCurve> {
        &self.falloff
    }
}

impl Adjustment for Vignette {
    fn process(&self, image: &mut Image) {
        let (height, width, _) = image.dim();
        let size = height.min(width) as f64 * self.params.scale;
        let (cy, cx) = (height as f64 * 0.5, width as f64 * 0.5);
        let end = cy.hypot(cx) - size;
        let factor = 0.1 * self.params.strength;
        let table = self.falloff.table();

        Zip::indexed(image.lanes_mut(Axis(2))).par_for_each(|(y, x), mut px| {
            let d = (y as f64 - cy).hypot(x as f64 - cx);
            if d <= end {
                return;
            }
            let index = ((d - end) / size * 100.0).round_ties_even() as usize;
            let weight = table.get(index).copied().unwrap_or(0) as f64;
            let exponent = (weight * factor).max(1.0) as f32;
            px.mapv_inplace(|v| v.powf(exponent));
        });
    }
}
