//! Grayscale conversion.
//!
//! ## Supported Formats
//!
//! RGB `f32` images of shape (height, width, 3), values 0.0-1.0. The output
//! keeps three channels, each holding the pixel's luminance.

use ndarray::{Axis, Zip};

use super::core::{luminance, Image};
use super::Adjustment;

/// Replace every channel with Rec. 601 luminance
/// (`0.299 R + 0.587 G + 0.114 B`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Greyscale;

impl Adjustment for Greyscale {
    fn process(&self, image: &mut Image) {
        Zip::from(image.lanes_mut(Axis(2))).par_for_each(|mut px| {
            let grey = luminance(px[0], px[1], px[2]);
            px.fill(grey);
        });
    }
}
