//! Blend modes for compositing a layer onto its parent.
//!
//! Every mode is a pure, channel-uniform function of `(parent, layer)`.
//! Results are **not** clamped; the layer engine clamps after mixing by
//! opacity.
//!
//! | Mode | Formula |
//! |------|---------|
//! | Normal | `l` |
//! | Multiply | `l * p` |
//! | Screen | `1 - (1 - l)(1 - p)` |
//! | Overlay | `p > 0.5 ? 1 - 2(1 - l)(1 - p) : 2 l p` |
//! | Difference | `l - p` |
//! | Addition | `l + p` |
//! | Exclusion | `0.5 - 2(l - 0.5)(p - 0.5)` |
//! | SoftLight | `p > 0.5 ? 1 - (1 - (l - 0.5))(1 - p) : (l + 0.5) p` |
//! | Lighten | `max(p, l)` |
//! | Darken | `min(p, l)` |

use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, ArrayView3, Zip};

use crate::error::FilterError;

/// Blend mode used by a filter layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Layer replaces parent.
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    /// Signed difference (`layer - parent`).
    Difference,
    Addition,
    Exclusion,
    SoftLight,
    Lighten,
    Darken,
}

impl BlendMode {
    /// All modes in declaration order.
    pub const ALL: [BlendMode; 10] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Difference,
        BlendMode::Addition,
        BlendMode::Exclusion,
        BlendMode::SoftLight,
        BlendMode::Lighten,
        BlendMode::Darken,
    ];

    /// Lowercase name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Difference => "difference",
            BlendMode::Addition => "addition",
            BlendMode::Exclusion => "exclusion",
            BlendMode::SoftLight => "softlight",
            BlendMode::Lighten => "lighten",
            BlendMode::Darken => "darken",
        }
    }

    /// Blend a single parent value with a single layer value.
    #[inline]
    pub fn blend_value(self, parent: f32, layer: f32) -> f32 {
        match self {
            BlendMode::Normal => layer,
            BlendMode::Multiply => layer * parent,
            BlendMode::Screen => 1.0 - (1.0 - layer) * (1.0 - parent),
            BlendMode::Overlay => {
                if parent > 0.5 {
                    1.0 - 2.0 * (1.0 - layer) * (1.0 - parent)
                } else {
                    2.0 * layer * parent
                }
            }
            BlendMode::Difference => layer - parent,
            BlendMode::Addition => layer + parent,
            BlendMode::Exclusion => 0.5 - 2.0 * (layer - 0.5) * (parent - 0.5),
            BlendMode::SoftLight => {
                if parent > 0.5 {
                    1.0 - (1.0 - (layer - 0.5)) * (1.0 - parent)
                } else {
                    (layer + 0.5) * parent
                }
            }
            BlendMode::Lighten => parent.max(layer),
            BlendMode::Darken => parent.min(layer),
        }
    }

    /// Blend two buffers of identical shape into a new buffer.
    ///
    /// # Panics
    /// Panics if the shapes differ.
    pub fn blend(self, parent: ArrayView3<f32>, layer: ArrayView3<f32>) -> Array3<f32> {
        let mut output = Array3::<f32>::zeros(parent.raw_dim());
        Zip::from(&mut output)
            .and(&parent)
            .and(&layer)
            .par_for_each(|out, &p, &l| *out = self.blend_value(p, l));
        output
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlendMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FilterError::InvalidConfiguration(format!("unknown blend mode '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_scalar_formulas() {
        let (p, l) = (0.25, 0.6);
        assert_abs_diff_eq!(BlendMode::Normal.blend_value(p, l), 0.6);
        assert_abs_diff_eq!(BlendMode::Multiply.blend_value(p, l), 0.15);
        assert_abs_diff_eq!(BlendMode::Screen.blend_value(p, l), 0.7, epsilon = 1e-6);
        assert_abs_diff_eq!(BlendMode::Difference.blend_value(p, l), 0.35, epsilon = 1e-6);
        assert_abs_diff_eq!(BlendMode::Addition.blend_value(p, l), 0.85);
        assert_abs_diff_eq!(BlendMode::Exclusion.blend_value(p, l), 0.55, epsilon = 1e-6);
        assert_abs_diff_eq!(BlendMode::Lighten.blend_value(p, l), 0.6);
        assert_abs_diff_eq!(BlendMode::Darken.blend_value(p, l), 0.25);
    }

    #[test]
    fn test_overlay_branches() {
        // Dark parent: 2 * l * p
        assert_abs_diff_eq!(BlendMode::Overlay.blend_value(0.4, 0.5), 0.4, epsilon = 1e-6);
        // Bright parent: 1 - 2 (1 - l)(1 - p)
        assert_abs_diff_eq!(BlendMode::Overlay.blend_value(0.8, 0.5), 0.8, epsilon = 1e-6);
        // Exactly 0.5 takes the dark branch
        assert_abs_diff_eq!(BlendMode::Overlay.blend_value(0.5, 1.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_softlight_branches() {
        assert_abs_diff_eq!(BlendMode::SoftLight.blend_value(0.4, 0.5), 0.4, epsilon = 1e-6);
        assert_abs_diff_eq!(BlendMode::SoftLight.blend_value(0.8, 0.7), 0.84, epsilon = 1e-6);
    }

    #[test]
    fn test_blend_does_not_clamp() {
        let parent = Array3::<f32>::from_elem((2, 2, 3), 0.8);
        let layer = Array3::<f32>::from_elem((2, 2, 3), 0.7);

        let added = BlendMode::Addition.blend(parent.view(), layer.view());
        assert!(added.iter().all(|&v| (v - 1.5).abs() < 1e-6));

        let diff = BlendMode::Difference.blend(parent.view(), layer.view());
        assert!(diff.iter().all(|&v| (v + 0.1).abs() < 1e-6));
    }

    #[test]
    fn test_blend_preserves_shape_and_inputs() {
        let mut parent = Array3::<f32>::zeros((3, 4, 3));
        parent[[1, 2, 0]] = 0.9;
        let layer = Array3::<f32>::from_elem((3, 4, 3), 0.3);
        let parent_before = parent.clone();

        let result = BlendMode::Screen.blend(parent.view(), layer.view());

        assert_eq!(result.dim(), (3, 4, 3));
        assert_eq!(parent, parent_before);
        assert!((result[[1, 2, 0]] - (1.0 - 0.7 * 0.1)).abs() < 1e-6);
        assert!((result[[0, 0, 0]] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_parse_names() {
        for mode in BlendMode::ALL {
            assert_eq!(mode.name().parse::<BlendMode>().unwrap(), mode);
        }
        assert_eq!("SoftLight".parse::<BlendMode>().unwrap(), BlendMode::SoftLight);
        assert!("dissolve".parse::<BlendMode>().is_err());
    }
}
