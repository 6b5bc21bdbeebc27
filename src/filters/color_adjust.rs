//! Color adjustment filters: FillColor, Brightness, Contrast, Gamma, Invert,
//! Colorize, Channels.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Percentages are given in the -100..100 (or 0..100) range and scaled by
//! 0.01 at construction.
//!
//! ## Supported Formats
//!
//! All filters operate on RGB `f32` images of shape (height, width, 3) with
//! values in 0.0-1.0. Results may leave that range; wrap them in
//! [`Clamped`](super::Clamped) to saturate.

use ndarray::{Axis, Zip};

use super::core::{Image, CHANNELS};
use super::Adjustment;

#[inline]
fn rgb_unit(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|c| c as f32 / 255.0)
}

// ============================================================================
// FillColor
// ============================================================================

/// Replace every pixel with a constant color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillColor {
    rgb: [f32; 3],
}

impl FillColor {
    /// # Arguments
    /// * `rgb` - Fill color as 0-255 components
    pub fn new(rgb: [u8; 3]) -> Self {
        Self { rgb: rgb_unit(rgb) }
    }
}

impl Adjustment for FillColor {
    fn process(&self, image: &mut Image) {
        Zip::from(image.lanes_mut(Axis(2))).par_for_each(|mut px| {
            for c in 0..CHANNELS {
                px[c] = self.rgb[c];
            }
        });
    }
}

// ============================================================================
// Brightness
// ============================================================================

/// Shift every value by a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brightness {
    offset: f32,
}

impl Brightness {
    /// # Arguments
    /// * `adjust` - -100 (black) to 100 (white), 0 = no change
    pub fn new(adjust: f32) -> Self {
        Self { offset: adjust * 0.01 }
    }
}

impl Adjustment for Brightness {
    fn process(&self, image: &mut Image) {
        let offset = self.offset;
        image.par_mapv_inplace(|v| v + offset);
    }
}

// ============================================================================
// Contrast
// ============================================================================

/// Scale values around mid-grey.
///
/// The factor is `((adjust + 100) * 0.01)^2`, so 0 is neutral, -100 collapses
/// everything to 0.5 and 100 quadruples the distance from mid-grey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contrast {
    factor: f32,
}

impl Contrast {
    pub fn new(adjust: f32) -> Self {
        let base = (adjust + 100.0) * 0.01;
        Self { factor: base * base }
    }
}

impl Adjustment for Contrast {
    fn process(&self, image: &mut Image) {
        let factor = self.factor;
        let offset = 0.5 * (1.0 - factor);
        image.par_mapv_inplace(|v| v * factor + offset);
    }
}

// ============================================================================
// Gamma
// ============================================================================

/// Raise every value to a fixed power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma {
    exponent: f32,
}

impl Gamma {
    /// # Arguments
    /// * `adjust` - Exponent, 0..inf. Values above 1 darken, below 1 brighten.
    pub fn new(adjust: f32) -> Self {
        Self { exponent: adjust }
    }
}

impl Adjustment for Gamma {
    fn process(&self, image: &mut Image) {
        let exponent = self.exponent;
        image.par_mapv_inplace(|v| v.powf(exponent));
    }
}

// ============================================================================
// Invert
// ============================================================================

/// Photographic negative.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Invert;

impl Adjustment for Invert {
    fn process(&self, image: &mut Image) {
        image.par_mapv_inplace(|v| 1.0 - v);
    }
}

// ============================================================================
// Colorize
// ============================================================================

/// Pull every pixel toward a tint color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colorize {
    tint: [f32; 3],
    level: f32,
}

impl Colorize {
    /// # Arguments
    /// * `rgb` - Tint color as 0-255 components
    /// * `level` - 0 (no change) to 100 (solid tint)
    pub fn new(rgb: [u8; 3], level: f32) -> Self {
        Self {
            tint: rgb_unit(rgb),
            level: level * 0.01,
        }
    }
}

impl Adjustment for Colorize {
    fn process(&self, image: &mut Image) {
        let level = self.level;
        Zip::from(image.lanes_mut(Axis(2))).par_for_each(|mut px| {
            for c in 0..CHANNELS {
                px[c] -= (px[c] - self.tint[c]) * level;
            }
        });
    }
}

// ============================================================================
// Channels
// ============================================================================

/// Push individual channels toward white (positive) or black (negative).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Channels {
    adjust: [f32; 3],
}

impl Channels {
    /// # Arguments
    /// * `red`, `green`, `blue` - -100..100 per channel, 0 = no change
    pub fn new(red: f32, green: f32, blue: f32) -> Self {
        Self {
            adjust: [red * 0.01, green * 0.01, blue * 0.01],
        }
    }
}

impl Adjustment for Channels {
    fn process(&self, image: &mut Image) {
        for (c, &amount) in self.adjust.iter().enumerate() {
            let mut channel = image.index_axis_mut(Axis(2), c);
            if amount > 0.0 {
                channel.par_mapv_inplace(|v| v + (1.0 - v) * amount);
            } else if amount < 0.0 {
                let amount = amount.abs();
                channel.par_mapv_inplace(|v| v - v * amount);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pixel(r: f32, g: f32, b: f32) -> Image {
        let mut img = Image::zeros((1, 1, 3));
        img[[0, 0, 0]] = r;
        img[[0, 0, 1]] = g;
        img[[0, 0, 2]] = b;
        img
    }

    #[test]
    fn test_fill_color() {
        let mut img = Image::from_elem((2, 3, 3), 0.3);
        FillColor::new([255, 0, 51]).process(&mut img);
        for y in 0..2 {
            for x in 0..3 {
                assert_abs_diff_eq!(img[[y, x, 0]], 1.0);
                assert_abs_diff_eq!(img[[y, x, 1]], 0.0);
                assert_abs_diff_eq!(img[[y, x, 2]], 0.2, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_brightness_is_unclamped() {
        let mut img = pixel(0.5, 0.95, 0.0);
        Brightness::new(10.0).process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 1.05, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 2]], 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_contrast() {
        let mut img = pixel(0.5, 0.75, 0.25);
        Contrast::new(100.0).process(&mut img);
        // Factor 4: mid-grey is fixed, distances quadruple
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 2]], -0.5, epsilon = 1e-6);

        let mut flat = pixel(0.1, 0.9, 0.4);
        Contrast::new(-100.0).process(&mut flat);
        assert!(flat.iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_gamma() {
        let mut img = pixel(0.25, 1.0, 0.0);
        Gamma::new(0.5).process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 1.0);
        assert_abs_diff_eq!(img[[0, 0, 2]], 0.0);
    }

    #[test]
    fn test_invert() {
        let mut img = pixel(0.2, 0.0, 1.0);
        Invert.process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.8, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 1.0);
        assert_abs_diff_eq!(img[[0, 0, 2]], 0.0);
    }

    #[test]
    fn test_colorize() {
        let mut img = pixel(0.0, 1.0, 0.5);
        Colorize::new([255, 0, 255], 50.0).process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 2]], 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_channels() {
        let mut img = pixel(0.5, 0.5, 0.5);
        Channels::new(50.0, -50.0, 0.0).process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 2]], 0.5);
    }
}
