//! Layer compositing engine.
//!
//! A preset is an ordered list of [`LayerItem`]s applied to a running
//! accumulator. Plain filters mutate the accumulator directly. A
//! [`FilterLayer`] instead starts from a fresh copy of the pristine origin
//! image, runs its own children on that copy, blends the result onto the
//! accumulator and mixes by opacity.
//!
//! Nesting is recursive: a layer inside a layer also starts from the
//! origin, never from its parent's working canvas.

use std::fmt;
use std::sync::Arc;

use ndarray::{ArrayView3, Zip};
use tracing::{debug, trace};

use crate::blend::BlendMode;
use crate::error::{FilterError, FilterResult};
use crate::filters::core::{check_image, clamp_unit};
use crate::filters::{Filter, Image};

// ============================================================================
// Layer items
// ============================================================================

/// One step of a pipeline: a filter or a nested layer.
#[derive(Clone)]
pub enum LayerItem {
    Filter(Arc<dyn Filter>),
    Layer(FilterLayer),
}

impl LayerItem {
    /// Wrap any filter as an item.
    pub fn filter<F: Filter + 'static>(filter: F) -> Self {
        LayerItem::Filter(Arc::new(filter))
    }

    /// Build a nested layer item.
    pub fn layer(opacity: f32, blend: BlendMode, children: Vec<LayerItem>) -> FilterResult<Self> {
        Ok(LayerItem::Layer(FilterLayer::new(opacity, blend, children)?))
    }

    /// Apply this item to `canvas`, with `origin` as the pristine input.
    pub fn render(&self, canvas: &mut Image, origin: ArrayView3<f32>) {
        match self {
            LayerItem::Filter(filter) => filter.apply(canvas),
            LayerItem::Layer(layer) => layer.composite(canvas, origin),
        }
    }
}

impl fmt::Debug for LayerItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerItem::Filter(filter) => write!(f, "Filter({:p})", Arc::as_ptr(filter)),
            LayerItem::Layer(layer) => f.debug_tuple("Layer").field(layer).finish(),
        }
    }
}

// ============================================================================
// Filter layer
// ============================================================================

/// A blended group of items evaluated against the origin image.
#[derive(Debug, Clone)]
pub struct FilterLayer {
    opacity: f32,
    blend: BlendMode,
    children: Vec<LayerItem>,
}

impl FilterLayer {
    /// # Arguments
    /// * `opacity` - 0..=100 percent
    /// * `blend` - How the layer's result combines with its parent
    /// * `children` - Items run in order on the layer's working copy
    ///
    /// # Errors
    /// `InvalidConfiguration` when `opacity` is outside 0..=100 or NaN.
    pub fn new(opacity: f32, blend: BlendMode, children: Vec<LayerItem>) -> FilterResult<Self> {
        if !(0.0..=100.0).contains(&opacity) {
            return Err(FilterError::InvalidConfiguration(format!(
                "layer opacity must be within 0..=100, got {opacity}"
            )));
        }
        Ok(Self {
            opacity: opacity / 100.0,
            blend,
            children,
        })
    }

    /// Opacity as a fraction in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn blend(&self) -> BlendMode {
        self.blend
    }

    pub fn children(&self) -> &[LayerItem] {
        &self.children
    }

    /// Composite this layer onto `parent`.
    ///
    /// The children run on a copy of `origin`; the result is blended with
    /// `parent`, mixed as `parent * (1 - opacity) + blended * opacity` and
    /// clamped to `[0, 1]`.
    ///
    /// # Errors
    /// `InvalidImageShape` if either buffer is not a valid image or the two
    /// differ in shape.
    pub fn apply(&self, parent: &mut Image, origin: ArrayView3<f32>) -> FilterResult<()> {
        check_image(parent.view())?;
        check_image(origin)?;
        if parent.dim() != origin.dim() {
            return Err(FilterError::InvalidImageShape(format!(
                "parent is {:?} but origin is {:?}",
                parent.dim(),
                origin.dim()
            )));
        }
        self.composite(parent, origin);
        Ok(())
    }

    /// Composite without validating; both buffers share one shape.
    fn composite(&self, parent: &mut Image, origin: ArrayView3<f32>) {
        trace!(
            blend = %self.blend,
            opacity = self.opacity,
            children = self.children.len(),
            "rendering layer"
        );

        let mut canvas = origin.to_owned();
        for child in &self.children {
            child.render(&mut canvas, origin);
        }

        let blended = self.blend.blend(parent.view(), canvas.view());
        let opacity = self.opacity;
        Zip::from(&mut *parent)
            .and(&blended)
            .par_for_each(|p, &b| *p = clamp_unit(*p * (1.0 - opacity) + b * opacity));
    }
}

// ============================================================================
// Layered filter
// ============================================================================

/// A named preset: an ordered list of top-level items.
#[derive(Debug, Clone)]
pub struct LayeredFilter {
    name: String,
    items: Vec<LayerItem>,
}

impl LayeredFilter {
    pub fn new(name: impl Into<String>, items: Vec<LayerItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    /// Build a variant of a canonical item list with some items left out.
    ///
    /// The remaining items keep their canonical order.
    ///
    /// # Errors
    /// `InvalidConfiguration` if an index in `omit` is out of range.
    pub fn from_canonical(
        name: impl Into<String>,
        canonical: Vec<LayerItem>,
        omit: &[usize],
    ) -> FilterResult<Self> {
        let name = name.into();
        if let Some(&index) = omit.iter().find(|&&i| i >= canonical.len()) {
            return Err(FilterError::InvalidConfiguration(format!(
                "{name}: cannot omit item {index} of {}",
                canonical.len()
            )));
        }

        let items = canonical
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !omit.contains(i))
            .map(|(_, item)| item)
            .collect();
        Ok(Self { name, items })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[LayerItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply the preset and return the image.
    ///
    /// # Errors
    /// `InvalidImageShape` if the image is not a non-empty `H x W x 3`
    /// buffer with values in `[0, 1]`.
    pub fn apply(&self, mut image: Image) -> FilterResult<Image> {
        self.apply_in_place(&mut image)?;
        Ok(image)
    }

    /// Apply the preset to a borrowed image.
    pub fn apply_in_place(&self, image: &mut Image) -> FilterResult<()> {
        check_image(image.view())?;

        let (height, width, _) = image.dim();
        debug!(preset = %self.name, height, width, items = self.items.len(), "applying preset");

        let origin = image.clone();
        for item in &self.items {
            item.render(image, origin.view());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{Adjustment, Brightness, Greyscale, Identity, Invert};

    fn constant(value: f32) -> Image {
        Image::from_elem((3, 4, 3), value)
    }

    /// Sets every value to a constant, without clamping.
    struct Set(f32);

    impl Filter for Set {
        fn apply(&self, image: &mut Image) {
            image.fill(self.0);
        }
    }

    #[test]
    fn test_zero_opacity_leaves_parent() {
        let layer = FilterLayer::new(
            0.0,
            BlendMode::Addition,
            vec![LayerItem::filter(Invert.clamped())],
        )
        .unwrap();
        let mut parent = Image::from_shape_fn((3, 4, 3), |(y, x, c)| (y + x + c) as f32 / 10.0);
        let before = parent.clone();
        let origin = constant(0.9);

        layer.apply(&mut parent, origin.view()).unwrap();

        assert_eq!(parent, before);
    }

    #[test]
    fn test_full_opacity_normal_replaces_parent() {
        let layer = FilterLayer::new(
            100.0,
            BlendMode::Normal,
            vec![LayerItem::filter(Set(1.4))],
        )
        .unwrap();
        let mut parent = constant(0.2);
        let origin = constant(0.6);

        layer.apply(&mut parent, origin.view()).unwrap();

        // Child output is clamped on the way back
        assert!(parent.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_multiply_half_opacity() {
        let layer = FilterLayer::new(
            50.0,
            BlendMode::Multiply,
            vec![LayerItem::filter(Identity)],
        )
        .unwrap();
        let mut parent = constant(1.0);
        let origin = constant(0.5);

        layer.apply(&mut parent, origin.view()).unwrap();

        assert!(parent.iter().all(|&v| (v - 0.75).abs() < 1e-6));
    }

    #[test]
    fn test_nested_layer_sees_origin() {
        // The outer layer brightens its canvas, but the nested layer must
        // start again from the origin (0.2), not from the brightened canvas.
        let inner = LayerItem::layer(100.0, BlendMode::Normal, vec![LayerItem::filter(Identity)])
            .unwrap();
        let outer = FilterLayer::new(
            100.0,
            BlendMode::Normal,
            vec![LayerItem::filter(Brightness::new(50.0).clamped()), inner],
        )
        .unwrap();

        let mut parent = constant(0.9);
        let origin = constant(0.2);
        outer.apply(&mut parent, origin.view()).unwrap();

        assert!(parent.iter().all(|&v| (v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_layer_clamps_blend_overflow() {
        let layer = FilterLayer::new(
            100.0,
            BlendMode::Addition,
            vec![LayerItem::filter(Identity)],
        )
        .unwrap();
        let mut parent = constant(0.7);
        let origin = constant(0.6);

        layer.apply(&mut parent, origin.view()).unwrap();

        assert!(parent.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_invalid_opacity() {
        for opacity in [-1.0, 100.5, f32::NAN] {
            assert!(matches!(
                FilterLayer::new(opacity, BlendMode::Normal, vec![]),
                Err(FilterError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_sequential_composition() {
        let preset = LayeredFilter::new(
            "Test",
            vec![
                LayerItem::filter(Brightness::new(20.0).clamped()),
                LayerItem::filter(Brightness::new(20.0).clamped()),
            ],
        );

        let result = preset.apply(constant(0.5)).unwrap();

        assert!(result.iter().all(|&v| (v - 0.9).abs() < 1e-6));
    }

    #[test]
    fn test_top_level_layer_uses_input_image() {
        // Greyscale first, then a layer that copies the input colors back
        let preset = LayeredFilter::new(
            "Test",
            vec![
                LayerItem::filter(Greyscale.clamped()),
                LayerItem::layer(100.0, BlendMode::Normal, vec![LayerItem::filter(Identity)])
                    .unwrap(),
            ],
        );
        let mut input = Image::zeros((1, 1, 3));
        input[[0, 0, 0]] = 0.8;
        input[[0, 0, 1]] = 0.4;
        input[[0, 0, 2]] = 0.2;

        let result = preset.apply(input.clone()).unwrap();

        assert_eq!(result, input);
    }

    #[test]
    fn test_rejects_bad_images() {
        let preset = LayeredFilter::new("Test", vec![LayerItem::filter(Identity)]);
        assert!(matches!(
            preset.apply(Image::zeros((2, 2, 4))),
            Err(FilterError::InvalidImageShape(_))
        ));
        assert!(matches!(
            preset.apply(Image::from_elem((2, 2, 3), 1.2)),
            Err(FilterError::InvalidImageShape(_))
        ));
    }

    #[test]
    fn test_layer_rejects_mismatched_buffers() {
        let layer = FilterLayer::new(50.0, BlendMode::Screen, vec![LayerItem::filter(Identity)])
            .unwrap();
        let mut parent = constant(0.5);
        let before = parent.clone();

        assert!(matches!(
            layer.apply(&mut parent, Image::zeros((2, 2, 3)).view()),
            Err(FilterError::InvalidImageShape(_))
        ));
        assert!(matches!(
            layer.apply(&mut parent, Image::zeros((3, 4, 4)).view()),
            Err(FilterError::InvalidImageShape(_))
        ));
        assert_eq!(parent, before);
    }

    #[test]
    fn test_from_canonical_omits_in_order() {
        let items: Vec<LayerItem> = (0..4)
            .map(|i| LayerItem::filter(Brightness::new(i as f32).clamped()))
            .collect();
        let ptrs: Vec<*const ()> = items
            .iter()
            .map(|item| match item {
                LayerItem::Filter(f) => Arc::as_ptr(f) as *const (),
                LayerItem::Layer(_) => unreachable!(),
            })
            .collect();

        let preset = LayeredFilter::from_canonical("Test", items, &[1]).unwrap();

        let kept: Vec<*const ()> = preset
            .items()
            .iter()
            .map(|item| match item {
                LayerItem::Filter(f) => Arc::as_ptr(f) as *const (),
                LayerItem::Layer(_) => unreachable!(),
            })
            .collect();
        assert_eq!(kept, vec![ptrs[0], ptrs[2], ptrs[3]]);
    }

    #[test]
    fn test_from_canonical_rejects_bad_index() {
        let items = vec![LayerItem::filter(Identity)];
        assert!(matches!(
            LayeredFilter::from_canonical("Test", items, &[1]),
            Err(FilterError::InvalidConfiguration(_))
        ));
    }
}
