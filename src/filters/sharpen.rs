//! Sharpen filter.
//!
//! ## Supported Formats
//!
//! RGB `f32` images of shape (height, width, 3), values 0.0-1.0.
//!
//! ## Boundary Handling
//!
//! Neighbors outside the image count as zero, so border pixels darken
//! slightly for positive amounts.

use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

use super::core::{Image, CHANNELS};
use super::Adjustment;

/// 3x3 sharpening convolution.
///
/// Kernel:
/// ```text
///  0  -a   0
/// -a 1+4a -a
///  0  -a   0
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpen {
    amount: f32,
}

impl Sharpen {
    /// # Arguments
    /// * `adjust` - -100..100, 0 = no change
    pub fn new(adjust: f32) -> Self {
        Self {
            amount: adjust * 0.01,
        }
    }
}

fn sharpen_plane(plane: ArrayView2<f32>, amount: f32) -> Array2<f32> {
    let (height, width) = plane.dim();
    let center_weight = 1.0 + 4.0 * amount;

    let sample = |y: isize, x: isize| -> f32 {
        if y < 0 || x < 0 || y >= height as isize || x >= width as isize {
            0.0
        } else {
            plane[[y as usize, x as usize]]
        }
    };

    Array2::from_shape_fn((height, width), |(y, x)| {
        let (y, x) = (y as isize, x as isize);
        let neighbors = sample(y - 1, x) + sample(y + 1, x) + sample(y, x - 1) + sample(y, x + 1);
        sample(y, x) * center_weight - neighbors * amount
    })
}

impl Adjustment for Sharpen {
    fn process(&self, image: &mut Image) {
        let planes: Vec<Array2<f32>> = (0..CHANNELS)
            .into_par_iter()
            .map(|c| sharpen_plane(image.index_axis(Axis(2), c), self.amount))
            .collect();

        for (c, plane) in planes.iter().enumerate() {
            image.index_axis_mut(Axis(2), c).assign(plane);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharpen_flat_interior_unchanged() {
        let mut img = Image::from_elem((5, 5, 3), 0.5);
        Sharpen::new(40.0).process(&mut img);
        assert!((img[[2, 2, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sharpen_zero_padded_border() {
        let mut img = Image::from_elem((5, 5, 3), 0.5);
        Sharpen::new(40.0).process(&mut img);
        // Corner has two missing neighbors: 0.5 * (1 + 1.6) - 2 * 0.5 * 0.4
        assert!((img[[0, 0, 0]] - 0.9).abs() < 1e-6);
        // Edge has one missing neighbor: 0.5 * 2.6 - 3 * 0.5 * 0.4
        assert!((img[[0, 2, 0]] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_sharpen_boosts_edges() {
        let mut img = Image::from_shape_fn((3, 4, 3), |(_, x, _)| if x < 2 { 0.2 } else { 0.8 });

        Sharpen::new(50.0).process(&mut img);

        // Dark side of the edge pulled down, bright side pushed up
        assert!(img[[1, 1, 0]] < 0.2);
        assert!(img[[1, 2, 0]] > 0.8);
    }

    #[test]
    fn test_sharpen_zero_amount() {
        let mut img = Image::from_shape_fn((3, 3, 3), |(y, x, c)| (y * 3 + x + c) as f32 / 12.0);
        let before = img.clone();
        Sharpen::new(0.0).process(&mut img);
        assert_eq!(img, before);
    }
}
