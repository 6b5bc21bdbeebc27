//! Tonal filters: Curves, Exposure.
//!
//! Both remap intensities through a 256-entry lookup table generated from
//! Bezier control points (see [`crate::curve`]). The table is built on the
//! first application and cached for the lifetime of the filter.
//!
//! ## Supported Formats
//!
//! RGB `f32` images of shape (height, width, 3), values 0.0-1.0. Curves only
//! touch the channels they were configured for.

use std::sync::OnceLock;

use ndarray::Axis;

use super::core::{Image, CHANNELS};
use super::Adjustment;
use crate::curve::{ControlPoints, Lut};
use crate::error::{FilterError, FilterResult};

// ============================================================================
// Curves
// ============================================================================

/// Tone curve applied to a subset of channels.
#[derive(Debug, Clone)]
pub struct Curves {
    channels: Vec<usize>,
    points: ControlPoints,
    lut: OnceLock<Lut>,
}

impl Curves {
    /// Create a curve filter.
    ///
    /// # Arguments
    /// * `channels` - Channel indices (0 = red, 1 = green, 2 = blue);
    ///   duplicates are ignored
    /// * `points` - Bezier control points in the 0-255 plane
    ///
    /// # Errors
    /// `InvalidConfiguration` for a channel index >= 3 or bad control points,
    /// `DegenerateInterpolation` when the endpoints span no interval.
    pub fn new(channels: &[usize], points: &[(i32, i32)]) -> FilterResult<Self> {
        if let Some(c) = channels.iter().find(|&&c| c >= CHANNELS) {
            return Err(FilterError::InvalidConfiguration(format!(
                "curve channel {c} out of range 0-{}",
                CHANNELS - 1
            )));
        }

        let mut unique = Vec::with_capacity(channels.len());
        for &c in channels {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }

        Ok(Self {
            channels: unique,
            points: ControlPoints::new(points)?,
            lut: OnceLock::new(),
        })
    }

    pub fn channels(&self) -> &[usize] {
        &self.channels
    }

    /// The lookup table, built on first access.
    pub fn lut(&self) -> &Lut {
        self.lut.get_or_init(|| Lut::from_control_points(&self.points))
    }

    /// Whether the lookup table has been built yet.
    pub fn is_built(&self) -> bool {
        self.lut.get().is_some()
    }
}

impl Adjustment for Curves {
    fn process(&self, image: &mut Image) {
        let lut = self.lut();
        for &c in &self.channels {
            image
                .index_axis_mut(Axis(2), c)
                .par_mapv_inplace(|v| lut.map(v));
        }
    }
}

// ============================================================================
// Exposure
// ============================================================================

/// Exposure as an S-shaped curve on all channels.
///
/// For `adjust > 0` the handles are `(0, p)` and `(255 - p, 255)`, which
/// lift the shadows; otherwise `(p, 0)` and `(255, 255 - p)`, which pull the
/// highlights down. `p = |adjust| * 2.55` and handle coordinates are
/// truncated to integers.
#[derive(Debug, Clone)]
pub struct Exposure {
    curves: Curves,
}

impl Exposure {
    /// # Arguments
    /// * `adjust` - -100..=100, 0 = no change
    pub fn new(adjust: f32) -> FilterResult<Self> {
        if !adjust.is_finite() || adjust.abs() > 100.0 {
            return Err(FilterError::InvalidConfiguration(format!(
                "exposure must be within -100..=100, got {adjust}"
            )));
        }

        let p = (adjust.abs() as f64) * 0.01;
        let near = (p * 255.0) as i32;
        let far = ((1.0 - p) * 255.0) as i32;
        let (ctrl1, ctrl2) = if adjust > 0.0 {
            ((0, near), (far, 255))
        } else {
            ((near, 0), (255, far))
        };

        let curves = Curves::new(&[0, 1, 2], &[(0, 0), ctrl1, ctrl2, (255, 255)])?;
        Ok(Self { curves })
    }

    pub fn curves(&self) -> &Curves {
        &self.curves
    }
}

impl Adjustment for Exposure {
    fn process(&self, image: &mut Image) {
        self.curves.process(image);
    }
}
