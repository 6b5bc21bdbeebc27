//! Tone curves: Bezier control points sampled into integer lookup tables.
//!
//! A curve is defined by integer control points in the 0-255 intensity
//! plane. Only the endpoints lie on the curve; interior points act as
//! handles. [`sample_bezier`] evaluates the curve with de Casteljau's
//! algorithm at 1000 parameter values, records one output per rounded x and
//! fills the gaps linearly. [`Lut`] extends that table to all 256 input
//! intensities.
//!
//! ## Validation
//!
//! [`ControlPoints::new`] rejects, at construction time:
//! - fewer than two points, or coordinates outside 0-255
//! - endpoints with `first.x >= last.x` ([`FilterError::DegenerateInterpolation`])
//! - interior points whose x falls outside `[first.x, last.x]`
//!
//! Interior handles may be non-monotonic in x; gap filling only divides by
//! the positive distance between two recorded indices.

use std::sync::OnceLock;

use tracing::debug;

use crate::error::{FilterError, FilterResult};

/// Number of entries in a tone lookup table.
pub const LUT_SIZE: usize = 256;

/// Number of Bezier parameter samples (`t = i * 0.001`, `i < 1000`).
const SAMPLES: usize = 1000;
const SAMPLE_STEP: f64 = 0.001;

/// Highest intensity a control point may use.
const MAX_INTENSITY: i32 = 255;

/// Control points of the radial vignette falloff. The table spans 0-100.
const FALLOFF_POINTS: [(i32, i32); 4] = [(0, 1), (30, 30), (70, 60), (100, 80)];

// ============================================================================
// Control points
// ============================================================================

/// Validated Bezier control points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlPoints(Vec<(i32, i32)>);

impl ControlPoints {
    /// Validate and wrap a list of `(x, y)` control points.
    pub fn new(points: &[(i32, i32)]) -> FilterResult<Self> {
        if points.len() < 2 {
            return Err(FilterError::InvalidConfiguration(format!(
                "a curve needs at least two control points, got {}",
                points.len()
            )));
        }

        if let Some(&(x, y)) = points
            .iter()
            .find(|&&(x, y)| !(0..=MAX_INTENSITY).contains(&x) || !(0..=MAX_INTENSITY).contains(&y))
        {
            return Err(FilterError::InvalidConfiguration(format!(
                "control point ({x}, {y}) outside 0-{MAX_INTENSITY}"
            )));
        }

        let (first_x, _) = points[0];
        let (last_x, _) = points[points.len() - 1];
        if first_x >= last_x {
            return Err(FilterError::DegenerateInterpolation(format!(
                "curve endpoints must have increasing x, got {first_x} then {last_x}"
            )));
        }

        if let Some(&(x, y)) = points[1..points.len() - 1]
            .iter()
            .find(|&&(x, _)| x < first_x || x > last_x)
        {
            return Err(FilterError::InvalidConfiguration(format!(
                "control point ({x}, {y}) lies outside the curve span {first_x}-{last_x}"
            )));
        }

        Ok(Self(points.to_vec()))
    }

    /// First control point (the curve's start).
    pub fn first(&self) -> (i32, i32) {
        self.0[0]
    }

    /// Last control point (the curve's end).
    pub fn last(&self) -> (i32, i32) {
        self.0[self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[(i32, i32)] {
        &self.0
    }
}

// ============================================================================
// Sampling
// ============================================================================

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Evaluate the Bezier curve at `t` with de Casteljau's algorithm.
fn de_casteljau(points: &[(i32, i32)], scratch: &mut Vec<(f64, f64)>, t: f64) -> (f64, f64) {
    scratch.clear();
    scratch.extend(points.iter().map(|&(x, y)| (x as f64, y as f64)));

    for j in (1..scratch.len()).rev() {
        for k in 0..j {
            let (x0, y0) = scratch[k];
            let (x1, y1) = scratch[k + 1];
            scratch[k] = (lerp(x0, x1, t), lerp(y0, y1, t));
        }
    }
    scratch[0]
}

/// Sample a Bezier curve into an integer table covering `0..=last.x`.
///
/// Each sample's y is clamped to `[lower, upper]` and rounded; the last
/// sample landing on an index wins, except at the endpoints' x which always
/// hold the endpoints' y. Indices before the first recorded one
/// take the first control point's y, gaps are linearly interpolated and
/// truncated, and indices after the last recorded one keep its value.
pub fn sample_bezier(points: &ControlPoints, lower: i32, upper: i32) -> Vec<i32> {
    let end = points.last().0 as usize;
    let mut recorded: Vec<Option<f64>> = vec![None; end + 1];
    let mut scratch = Vec::with_capacity(points.as_slice().len());

    for i in 0..SAMPLES {
        let t = i as f64 * SAMPLE_STEP;
        let (x, y) = de_casteljau(points.as_slice(), &mut scratch, t);
        let index = x.round();
        if index < 0.0 || index > end as f64 {
            continue;
        }
        recorded[index as usize] = Some(y.clamp(lower as f64, upper as f64).round());
    }

    // The curve passes exactly through both endpoints.
    let (first_x, first_y) = points.first();
    recorded[first_x as usize] = Some(first_y.clamp(lower, upper) as f64);
    recorded[end] = Some(points.last().1.clamp(lower, upper) as f64);

    let known: Vec<(usize, f64)> = recorded
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();

    let start_y = points.first().1;
    let mut table = Vec::with_capacity(end + 1);
    let mut k = 0;
    for i in 0..=end {
        while k + 1 < known.len() && known[k + 1].0 <= i {
            k += 1;
        }
        let value = match known.get(k) {
            None => start_y as f64,
            Some(&(x0, _)) if i < x0 => start_y as f64,
            Some(&(_, y0)) if k + 1 == known.len() => y0,
            Some(&(x0, y0)) => {
                let (x1, y1) = known[k + 1];
                y0 + (y1 - y0) / (x1 - x0) as f64 * (i - x0) as f64
            }
        };
        table.push(value as i32);
    }

    table
}

// ============================================================================
// Lookup table
// ============================================================================

/// 256-entry intensity lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut([i32; LUT_SIZE]);

impl Lut {
    /// Build the table for a curve, extending it flat on both sides.
    pub fn from_control_points(points: &ControlPoints) -> Self {
        debug!(points = ?points.as_slice(), "building tone curve");

        let sampled = sample_bezier(points, 0, MAX_INTENSITY);
        let (first_x, first_y) = points.first();
        let (last_x, last_y) = points.last();

        let mut table = [0i32; LUT_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = if (i as i32) < first_x {
                first_y
            } else if (i as i32) > last_x {
                last_y
            } else {
                sampled[i]
            };
        }
        Self(table)
    }

    /// Table entry for an intensity index.
    #[inline]
    pub fn get(&self, index: usize) -> i32 {
        self.0[index]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Map a normalized value through the table.
    ///
    /// The value is scaled to 0-255, rounded half-to-even to an index and the
    /// looked-up intensity is scaled back to 0.0-1.0.
    #[inline]
    pub fn map(&self, v: f32) -> f32 {
        let index = (v * 255.0).round_ties_even().clamp(0.0, 255.0) as usize;
        self.0[index] as f32 / 255.0
    }
}

// ============================================================================
// Vignette falloff
// ============================================================================

/// Fixed radial falloff curve used by every vignette.
///
/// The table has 101 entries (0-100) and is computed on first use.
#[derive(Debug, Default)]
pub struct FalloffCurve {
    table: OnceLock<Vec<i32>>,
}

impl FalloffCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// The falloff table, built on the first call.
    pub fn table(&self) -> &[i32] {
        self.table.get_or_init(|| {
            debug!("building vignette falloff curve");
            let points = ControlPoints(FALLOFF_POINTS.to_vec());
            sample_bezier(&points, 0, MAX_INTENSITY)
        })
    }

    /// Whether the table has been computed yet.
    pub fn is_built(&self) -> bool {
        self.table.get().is_some()
    }
}
