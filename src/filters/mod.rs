//! Per-pixel filters and the contract the compositing engine consumes.
//!
//! ## Supported Formats
//!
//! Every filter operates on an [`Image`]: an `f32` buffer of shape
//! `(height, width, 3)` with values nominally in 0.0-1.0.
//!
//! ## Architecture
//!
//! - [`Filter`] is the only capability the engine uses: mutate an image in
//!   place.
//! - [`Adjustment`] is the raw transform of a basic filter. It may push
//!   values out of range.
//! - [`Clamped`] turns an adjustment into a filter by saturating every
//!   value to `[0, 1]` after processing. Basic filters are only usable
//!   through it.
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: fill color, brightness, contrast, gamma, invert,
//!   colorize, channels
//! - **Color science**: saturation, vibrance, hue, sepia
//! - **Tonal**: curves, exposure, greyscale, posterize, clip
//! - **Spatial**: gaussian blur, sharpen, vignette
//! - **Noise**: uniform noise

pub mod core;
pub mod grayscale;
pub mod color_adjust;
pub mod color_science;
pub mod stylize;
pub mod levels_curves;
pub mod noise;
pub mod blur;
pub mod sharpen;
pub mod vignette;

pub use self::core::{check_image, clamp_image, clamp_unit, Image};
pub use blur::GaussianBlur;
pub use color_adjust::{Brightness, Channels, Colorize, Contrast, FillColor, Gamma, Invert};
pub use color_science::{Hue, Saturation, Sepia, Vibrance};
pub use grayscale::Greyscale;
pub use levels_curves::{Curves, Exposure};
pub use noise::Noise;
pub use sharpen::Sharpen;
pub use stylize::{Clip, Posterize};
pub use vignette::{Vignette, VignetteParams};

/// A configured image transform applied in place.
pub trait Filter: Send + Sync {
    fn apply(&self, image: &mut Image);
}

/// Unclamped transform of a basic filter.
pub trait Adjustment: Send + Sync {
    fn process(&self, image: &mut Image);

    /// Wrap the adjustment so its output is clamped to `[0, 1]`.
    fn clamped(self) -> Clamped<Self>
    where
        Self: Sized,
    {
        Clamped::new(self)
    }
}

/// A basic filter: runs an [`Adjustment`] and saturates the result.
#[derive(Debug, Clone)]
pub struct Clamped<A> {
    inner: A,
}

impl<A: Adjustment> Clamped<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Adjustment> Filter for Clamped<A> {
    fn apply(&self, image: &mut Image) {
        self.inner.process(image);
        clamp_image(image);
    }
}

/// Filter that leaves the image untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Filter for Identity {
    fn apply(&self, _image: &mut Image) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::curve::FalloffCurve;

    /// Image whose values sweep the full range, including both extremes.
    fn sweep(height: usize, width: usize) -> Image {
        let total = (height * width * 3 - 1).max(1) as f32;
        Image::from_shape_fn((height, width, 3), |(y, x, c)| {
            ((y * width + x) * 3 + c) as f32 / total
        })
    }

    fn all_basic_filters() -> Vec<Box<dyn Filter>> {
        let falloff = Arc::new(FalloffCurve::new());
        vec![
            Box::new(FillColor::new([0xf4, 0x96, 0x00]).clamped()),
            Box::new(Brightness::new(40.0).clamped()),
            Box::new(Brightness::new(-40.0).clamped()),
            Box::new(Saturation::new(-60.0).clamped()),
            Box::new(Saturation::new(50.0).clamped()),
            Box::new(Vibrance::new(75.0).clamped()),
            Box::new(Vibrance::new(-50.0).clamped()),
            Box::new(Greyscale.clamped()),
            Box::new(Contrast::new(100.0).clamped()),
            Box::new(Contrast::new(-5.0).clamped()),
            Box::new(Hue::new(90.0).clamped()),
            Box::new(Colorize::new([0xe8, 0x7b, 0x22], 30.0).clamped()),
            Box::new(Invert.clamped()),
            Box::new(Sepia::new(100.0).clamped()),
            Box::new(Gamma::new(0.7).clamped()),
            Box::new(Noise::new(30.0).clamped()),
            Box::new(Clip::new(25.0).clamped()),
            Box::new(Channels::new(8.0, -10.0, 4.0).clamped()),
            Box::new(Curves::new(&[0, 1, 2], &[(0, 0), (200, 0), (155, 255), (255, 255)]).unwrap().clamped()),
            Box::new(Exposure::new(30.0).unwrap().clamped()),
            Box::new(Exposure::new(-30.0).unwrap().clamped()),
            Box::new(Posterize::new(80.0).unwrap().clamped()),
            Box::new(Vignette::new(VignetteParams::new(45.0, 100.0).unwrap(), falloff).clamped()),
            Box::new(Sharpen::new(40.0).clamped()),
            Box::new(GaussianBlur::new(15.0).unwrap().clamped()),
        ]
    }

    #[test]
    fn test_basic_filters_stay_in_unit_range() {
        for (i, filter) in all_basic_filters().iter().enumerate() {
            let mut img = sweep(7, 9);
            filter.apply(&mut img);
            assert_eq!(img.dim(), (7, 9, 3));
            assert!(
                img.iter().all(|v| (0.0..=1.0).contains(v)),
                "filter #{i} left the unit range"
            );
        }
    }

    #[test]
    fn test_clamped_saturates_nan() {
        struct Poison;
        impl Adjustment for Poison {
            fn process(&self, image: &mut Image) {
                image.fill(f32::NAN);
            }
        }

        let mut img = Image::from_elem((2, 2, 3), 0.5);
        Poison.clamped().apply(&mut img);
        assert!(img.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_identity_leaves_image() {
        let mut img = sweep(3, 3);
        let before = img.clone();
        Identity.apply(&mut img);
        assert_eq!(img, before);
    }
}
