//! Gaussian blur.
//!
//! Uses separable 2-pass convolution per channel. Channels are blurred in
//! parallel on the rayon pool.
//!
//! ## Boundary Handling
//!
//! Samples outside the image are mirrored about the edge, including the
//! edge pixel itself (`d c b a | a b c d | d c b a`).

use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

use super::core::{gaussian_kernel_1d, reflect_index, Image, CHANNELS};
use super::Adjustment;
use crate::error::{FilterError, FilterResult};

/// Gaussian blur with `sigma = radius / 3`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianBlur {
    kernel: Vec<f32>,
}

impl GaussianBlur {
    /// # Arguments
    /// * `radius` - Blur radius in pixels, >= 0. Zero leaves the image as is.
    pub fn new(radius: f32) -> FilterResult<Self> {
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(FilterError::InvalidConfiguration(format!(
                "blur radius must be non-negative, got {radius}"
            )));
        }
        Ok(Self {
            kernel: gaussian_kernel_1d(radius / 3.0),
        })
    }

    pub fn kernel(&self) -> &[f32] {
        &self.kernel
    }
}

/// Blur one channel plane with the separable kernel.
fn blur_plane(plane: ArrayView2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (height, width) = plane.dim();
    let half = (kernel.len() / 2) as isize;

    // Horizontal pass
    let mut temp = Array2::<f32>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = reflect_index(x as isize + ki as isize - half, width);
                sum += plane[[y, sx]] * kv;
            }
            temp[[y, x]] = sum;
        }
    }

    // Vertical pass
    let mut result = Array2::<f32>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = reflect_index(y as isize + ki as isize - half, height);
                sum += temp[[sy, x]] * kv;
            }
            result[[y, x]] = sum;
        }
    }

    result
}

impl Adjustment for GaussianBlur {
    fn process(&self, image: &mut Image) {
        if self.kernel.len() == 1 {
            return;
        }

        let planes: Vec<Array2<f32>> = (0..CHANNELS)
            .into_par_iter()
            .map(|c| blur_plane(image.index_axis(Axis(2), c), &self.kernel))
            .collect();

        for (c, plane) in planes.iter().enumerate() {
            image.index_axis_mut(Axis(2), c).assign(plane);
        }
    }
}
