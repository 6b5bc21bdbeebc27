//! Color science filters: Saturation, Vibrance, Hue, Sepia.
//!
//! These filters mix channels within a pixel, so they work on whole RGB
//! lanes rather than on individual values.
//!
//! ## Supported Formats
//!
//! RGB `f32` images of shape (height, width, 3), values 0.0-1.0.

use ndarray::{Axis, Zip};

use super::core::{hsv_to_rgb, rgb_to_hsv, Image};
use super::Adjustment;

// ============================================================================
// Saturation
// ============================================================================

/// Move each channel toward (negative) or away from (positive) the pixel's
/// brightest channel.
///
/// Positive `adjust` increases saturation; -100 flattens every pixel to its
/// maximum channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saturation {
    amount: f32,
}

impl Saturation {
    pub fn new(adjust: f32) -> Self {
        Self {
            amount: adjust * -0.01,
        }
    }
}

impl Adjustment for Saturation {
    fn process(&self, image: &mut Image) {
        let amount = self.amount;
        Zip::from(image.lanes_mut(Axis(2))).par_for_each(|mut px| {
            let max = px[0].max(px[1]).max(px[2]);
            px.mapv_inplace(|v| v + (max - v) * amount);
        });
    }
}

// ============================================================================
// Vibrance
// ============================================================================

/// Saturation weighted by how colorful the pixel already is.
///
/// The per-pixel amount is `2 * |max - mean| * -adjust`, so neutral greys
/// are left alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vibrance {
    amount: f32,
}

impl Vibrance {
    pub fn new(adjust: f32) -> Self {
        Self {
            amount: adjust * -0.01,
        }
    }
}

impl Adjustment for Vibrance {
    fn process(&self, image: &mut Image) {
        let amount = self.amount;
        Zip::from(image.lanes_mut(Axis(2))).par_for_each(|mut px| {
            let max = px[0].max(px[1]).max(px[2]);
            let mean = (px[0] + px[1] + px[2]) / 3.0;
            let weight = 2.0 * (max - mean).abs() * amount;
            px.mapv_inplace(|v| v + (max - v) * weight);
        });
    }
}

// ============================================================================
// Hue
// ============================================================================

/// Rotate the HSV hue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hue {
    shift: f32,
}

impl Hue {
    /// # Arguments
    /// * `adjust` - 0..100, a fraction of the full hue circle
    pub fn new(adjust: f32) -> Self {
        Self {
            shift: adjust * 0.01,
        }
    }
}

impl Adjustment for Hue {
    fn process(&self, image: &mut Image) {
        let shift = self.shift;
        Zip::from(image.lanes_mut(Axis(2))).par_for_each(|mut px| {
            let (h, s, v) = rgb_to_hsv(px[0], px[1], px[2]);
            let mut h = h + shift;
            if h > 1.0 {
                h -= 1.0;
            }
            let (r, g, b) = hsv_to_rgb(h, s, v);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        });
    }
}

// ============================================================================
// Sepia
// ============================================================================

/// Sepia toning by a blended 3x3 color matrix.
///
/// The rows are applied in sequence: green is computed from the already
/// toned red, and blue from the toned red and green.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sepia {
    matrix: [[f32; 3]; 3],
}

impl Sepia {
    /// # Arguments
    /// * `adjust` - 0 (no change) to 100 (full sepia)
    pub fn new(adjust: f32) -> Self {
        let a = adjust * 0.01;
        Self {
            matrix: [
                [1.0 - 0.607 * a, 0.769 * a, 0.189 * a],
                [0.349 * a, 1.0 - 0.314 * a, 0.168 * a],
                [0.272 * a, 0.534 * a, 1.0 - 0.869 * a],
            ],
        }
    }
}

impl Adjustment for Sepia {
    fn process(&self, image: &mut Image) {
        Zip::from(image.lanes_mut(Axis(2))).par_for_each(|mut px| {
            for (c, row) in self.matrix.iter().enumerate() {
                px[c] = row[0] * px[0] + row[1] * px[1] + row[2] * px[2];
            }
        });
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
    fn test_saturation_full_desaturate() {
        let mut img = pixel(0.8, 0.4, 0.2);
        Saturation::new(-100.0).process(&mut img);
        assert!(img.iter().all(|&v| (v - 0.8).abs() < 1e-6));
    }

    #[test]
    fn test_saturation_boost() {
        let mut img = pixel(0.8, 0.4, 0.2);
        Saturation::new(50.0).process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.8, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 2]], -0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_vibrance_ignores_grey() {
        let mut img = pixel(0.4, 0.4, 0.4);
        Vibrance::new(75.0).process(&mut img);
        assert!(img.iter().all(|&v| (v - 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_vibrance_weight() {
        // max 0.9, mean 0.5 -> weight 2 * 0.4 * 0.5 = 0.4
        let mut img = pixel(0.9, 0.3, 0.3);
        Vibrance::new(-50.0).process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.9, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 0.54, epsilon = 1e-6);
    }

    #[test]
    fn test_hue_rotation() {
        // Red rotated by a third of the circle becomes green
        let mut img = pixel(1.0, 0.0, 0.0);
        Hue::new(100.0 / 3.0).process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(img[[0, 0, 1]], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(img[[0, 0, 2]], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_hue_wraps() {
        let mut img = pixel(0.0, 0.0, 1.0);
        Hue::new(50.0).process(&mut img);
        // Blue (h = 2/3) plus 0.5 wraps to h = 1/6: yellow
        assert_abs_diff_eq!(img[[0, 0, 0]], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(img[[0, 0, 1]], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(img[[0, 0, 2]], 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_sepia_zero_is_identity() {
        let mut img = pixel(0.8, 0.4, 0.2);
        Sepia::new(0.0).process(&mut img);
        assert_abs_diff_eq!(img[[0, 0, 0]], 0.8, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 1]], 0.4, epsilon = 1e-6);
        assert_abs_diff_eq!(img[[0, 0, 2]], 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_sepia_rows_in_sequence() {
        let mut img = pixel(0.5, 0.5, 0.5);
        Sepia::new(100.0).process(&mut img);

        let r = 0.393 * 0.5 + 0.769 * 0.5 + 0.189 * 0.5;
        let g = 0.349 * r + 0.686 * 0.5 + 0.168 * 0.5;
        let b = 0.272 * r + 0.534 * g + 0.131 * 0.5;
        assert_abs_diff_eq!(img[[0, 0, 0]], r, epsilon = 1e-5);
        assert_abs_diff_eq!(img[[0, 0, 1]], g, epsilon = 1e-5);
        assert_abs_diff_eq!(img[[0, 0, 2]], b, epsilon = 1e-5);
    }
}
