//! Core utilities shared by the filters and the compositing engine.
//!
//! This module provides:
//! - The [`Image`] buffer type and its shape/range check
//! - Unit-range clamping
//! - Gaussian kernel generation with mirror-reflect indexing
//! - Luminance and HSV conversion helpers

use ndarray::{Array3, ArrayView3};

use crate::error::{FilterError, FilterResult};

/// RGB image buffer of shape (height, width, 3), values nominally 0.0-1.0.
pub type Image = Array3<f32>;

/// Number of color channels every engine buffer carries.
pub const CHANNELS: usize = 3;

/// Rec. 601 luma weights used by Greyscale.
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Validate that `image` is a non-empty `H x W x 3` buffer with every value
/// finite and inside `[0, 1]`.
pub fn check_image(image: ArrayView3<f32>) -> FilterResult<()> {
    let (height, width, channels) = image.dim();
    if channels != CHANNELS {
        return Err(FilterError::InvalidImageShape(format!(
            "expected {CHANNELS} channels, got {channels} ({height}x{width}x{channels})"
        )));
    }
    if height == 0 || width == 0 {
        return Err(FilterError::InvalidImageShape(format!(
            "image is empty ({height}x{width}x{channels})"
        )));
    }
    if let Some(v) = image.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        return Err(FilterError::InvalidImageShape(format!(
            "pixel value {v} outside [0, 1]"
        )));
    }
    Ok(())
}

/// Saturate a value to `[0, 1]`. NaN becomes 0.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    v.max(0.0).min(1.0)
}

/// Clamp every value of the image to `[0, 1]` in place.
pub fn clamp_image(image: &mut Image) {
    image.par_mapv_inplace(clamp_unit);
}

/// Rec. 601 luminance of an RGB triple.
#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Generate a normalized 1D Gaussian kernel.
///
/// The half-width is `floor(4 * sigma + 0.5)`, so the kernel covers four
/// standard deviations on each side. A non-positive sigma yields `[1.0]`.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let half = (4.0 * sigma + 0.5) as usize;
    let mut kernel: Vec<f32> = (0..=2 * half)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-0.5 * x * x / (sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Mirror an out-of-range index back into `0..len` (`d c b a | a b c d`).
#[inline]
pub fn reflect_index(i: isize, len: usize) -> usize {
    let n = len as isize;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    if m >= n {
        (period - 1 - m) as usize
    } else {
        m as usize
    }
}

/// Convert RGB to HSV.
/// Input: r, g, b in 0.0-1.0
/// Output: (h, s, v) all in 0.0-1.0
#[inline]
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max } else { 0.0 };
    if delta <= 0.0 {
        return (0.0, s, max);
    }

    // Blue wins ties over green, green over red.
    let h = if b == max {
        4.0 + (r - g) / delta
    } else if g == max {
        2.0 + (b - r) / delta
    } else {
        (g - b) / delta
    };

    ((h / 6.0).rem_euclid(1.0), s, max)
}

/// Convert HSV to RGB.
/// Input: h, s, v in 0.0-1.0
/// Output: (r, g, b) in 0.0-1.0
#[inline]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let scaled = h * 6.0;
    let sector = scaled.floor();
    let f = scaled - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_image_accepts_rgb() {
        let img = Image::from_elem((2, 3, 3), 0.5);
        assert!(check_image(img.view()).is_ok());
    }

    #[test]
    fn test_check_image_rejects_rgba() {
        let img = Image::zeros((2, 2, 4));
        assert!(matches!(
            check_image(img.view()),
            Err(FilterError::InvalidImageShape(_))
        ));
    }

    #[test]
    fn test_check_image_rejects_empty() {
        let img = Image::zeros((0, 4, 3));
        assert!(matches!(
            check_image(img.view()),
            Err(FilterError::InvalidImageShape(_))
        ));
    }

    #[test]
    fn test_check_image_rejects_out_of_range() {
        let mut img = Image::from_elem((2, 2, 3), 0.5);
        img[[1, 1, 2]] = 1.5;
        assert!(check_image(img.view()).is_err());

        img[[1, 1, 2]] = f32::NAN;
        assert!(check_image(img.view()).is_err());
    }

    #[test]
    fn test_clamp_unit_saturates_nan() {
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(f32::NAN), 0.0);
    }

    #[test]
    fn test_gaussian_kernel_normalized() {
        let kernel = gaussian_kernel_1d(2.0);
        assert_eq!(kernel.len(), 2 * 8 + 1);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(kernel[8] > kernel[7]);
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(2, 4), 2);
        assert_eq!(reflect_index(-3, 1), 0);
    }

    #[test]
    fn test_hsv_roundtrip() {
        for &(r, g, b) in &[(0.8, 0.4, 0.2), (0.1, 0.9, 0.3), (0.2, 0.2, 0.7), (0.5, 0.5, 0.5)] {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (nr, ng, nb) = hsv_to_rgb(h, s, v);
            assert!((nr - r).abs() < 1e-5);
            assert!((ng - g).abs() < 1e-5);
            assert!((nb - b).abs() < 1e-5);
        }
    }
}
