//! Filter specs: a pool key paired with a lazy constructor.
//!
//! Built-in specs validate their parameters when the spec is created, so a
//! pooled filter's deferred construction can never fail.

use std::fmt;
use std::sync::Arc;

use super::key::{Args, FilterKey};
use crate::curve::FalloffCurve;
use crate::error::FilterResult;
use crate::filters::vignette::DEFAULT_STRENGTH;
use crate::filters::{
    Adjustment, Brightness, Channels, Clip, Colorize, Contrast, Curves, Exposure, FillColor, Filter,
    Gamma, GaussianBlur, Greyscale, Hue, Invert, Noise, Posterize, Saturation, Sepia, Sharpen,
    Vibrance, Vignette, VignetteParams,
};

/// Shared curve state handed to filter factories.
#[derive(Debug, Clone, Default)]
pub struct CurveCache {
    falloff: Arc<FalloffCurve>,
}

impl CurveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The vignette falloff curve shared by every vignette from this cache.
    pub fn falloff(&self) -> &Arc<FalloffCurve> {
        &self.falloff
    }
}

pub(crate) type Factory = Box<dyn Fn(&CurveCache) -> Box<dyn Filter> + Send + Sync>;

/// A filter configuration ready to be registered in a pool.
pub struct FilterSpec {
    pub(crate) key: FilterKey,
    pub(crate) factory: Factory,
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec").field("key", &self.key).finish_non_exhaustive()
    }
}

impl FilterSpec {
    /// Spec for any filter. `factory` runs at most once per pool entry, on
    /// the entry's first application.
    pub fn new<F>(kind: impl Into<String>, args: Args, factory: F) -> Self
    where
        F: Fn(&CurveCache) -> Box<dyn Filter> + Send + Sync + 'static,
    {
        Self {
            key: FilterKey::new(kind, args),
            factory: Box::new(factory),
        }
    }

    pub fn key(&self) -> &FilterKey {
        &self.key
    }

    /// Spec for a basic filter cloned from an already validated prototype.
    fn basic<A>(kind: &str, args: Args, prototype: A) -> Self
    where
        A: Adjustment + Clone + 'static,
    {
        Self::new(kind, args, move |_: &CurveCache| -> Box<dyn Filter> {
            Box::new(prototype.clone().clamped())
        })
    }

    // ========================================================================
    // Built-in filters
    // ========================================================================

    pub fn fill_color(rgb: [u8; 3]) -> Self {
        Self::basic("FillColor", Args::new().arg(rgb), FillColor::new(rgb))
    }

    pub fn brightness(adjust: f32) -> Self {
        Self::basic("Brightness", Args::new().arg(adjust), Brightness::new(adjust))
    }

    pub fn saturation(adjust: f32) -> Self {
        Self::basic("Saturation", Args::new().arg(adjust), Saturation::new(adjust))
    }

    pub fn vibrance(adjust: f32) -> Self {
        Self::basic("Vibrance", Args::new().arg(adjust), Vibrance::new(adjust))
    }

    pub fn greyscale() -> Self {
        Self::basic("Greyscale", Args::new(), Greyscale)
    }

    pub fn contrast(adjust: f32) -> Self {
        Self::basic("Contrast", Args::new().arg(adjust), Contrast::new(adjust))
    }

    pub fn hue(adjust: f32) -> Self {
        Self::basic("Hue", Args::new().arg(adjust), Hue::new(adjust))
    }

    pub fn colorize(rgb: [u8; 3], level: f32) -> Self {
        Self::basic(
            "Colorize",
            Args::new().arg(rgb).arg(level),
            Colorize::new(rgb, level),
        )
    }

    pub fn invert() -> Self {
        Self::basic("Invert", Args::new(), Invert)
    }

    pub fn sepia(adjust: f32) -> Self {
        Self::basic("Sepia", Args::new().arg(adjust), Sepia::new(adjust))
    }

    pub fn gamma(adjust: f32) -> Self {
        Self::basic("Gamma", Args::new().arg(adjust), Gamma::new(adjust))
    }

    /// Noise keeps its own seed counter, so each pool entry gets a fresh one.
    pub fn noise(adjust: f32) -> Self {
        Self::new(
            "Noise",
            Args::new().arg(adjust),
            move |_: &CurveCache| -> Box<dyn Filter> { Box::new(Noise::new(adjust).clamped()) },
        )
    }

    pub fn clip(adjust: f32) -> Self {
        Self::basic("Clip", Args::new().arg(adjust), Clip::new(adjust))
    }

    /// Channel adjustments are keyword arguments; pass 0 for untouched
    /// channels.
    pub fn channels(red: f32, green: f32, blue: f32) -> Self {
        Self::basic(
            "Channels",
            Args::new()
                .kwarg("red", red)
                .kwarg("green", green)
                .kwarg("blue", blue),
            Channels::new(red, green, blue),
        )
    }

    pub fn curves(channels: &[usize], points: &[(i32, i32)]) -> FilterResult<Self> {
        let prototype = Curves::new(channels, points)?;
        Ok(Self::basic(
            "Curves",
            Args::new().arg(channels).arg(points),
            prototype,
        ))
    }

    pub fn exposure(adjust: f32) -> FilterResult<Self> {
        let prototype = Exposure::new(adjust)?;
        Ok(Self::basic("Exposure", Args::new().arg(adjust), prototype))
    }

    pub fn posterize(levels: f32) -> FilterResult<Self> {
        let prototype = Posterize::new(levels)?;
        Ok(Self::basic("Posterize", Args::new().arg(levels), prototype))
    }

    /// Vignette with an explicit strength. The falloff curve comes from the
    /// pool's [`CurveCache`].
    pub fn vignette(scale: f32, strength: f32) -> FilterResult<Self> {
        let params = VignetteParams::new(scale, strength)?;
        Ok(Self::new(
            "Vignette",
            Args::new().arg(scale).kwarg("strength", strength),
            move |curves: &CurveCache| -> Box<dyn Filter> {
                Box::new(Vignette::new(params, Arc::clone(curves.falloff())).clamped())
            },
        ))
    }

    /// Vignette with the default strength of 60.
    pub fn vignette_with_scale(scale: f32) -> FilterResult<Self> {
        Self::vignette(scale, DEFAULT_STRENGTH)
    }

    pub fn sharpen(adjust: f32) -> Self {
        Self::basic("Sharpen", Args::new().arg(adjust), Sharpen::new(adjust))
    }

    pub fn gaussian_blur(radius: f32) -> FilterResult<Self> {
        let prototype = GaussianBlur::new(radius)?;
        Ok(Self::basic("GaussianBlur", Args::new().arg(radius), prototype))
    }
}
