//! imeffect: layered photo-effect presets
//!
//! Stylized photo effects built from chains of per-pixel filters, optionally
//! grouped into blended, nested layers.
//!
//! ## Image Format
//! Every filter and preset works on an RGB `f32` buffer:
//! - **Shape**: (height, width, 3)
//! - **Values**: 0.0-1.0 in and out
//!
//! ## Architecture
//! - [`filters`]: the [`Filter`] contract and the basic filters, each
//!   clamped to `[0, 1]` after processing
//! - [`blend`]: blend modes used when a layer is composited onto its parent
//! - [`curve`]: Bezier tone curves sampled into lookup tables
//! - [`layer`]: the compositing engine ([`FilterLayer`], [`LayeredFilter`])
//! - [`pool`]: memoized, lazily constructed filter instances
//! - [`presets`]: the built-in presets and a name-based registry
//!
//! ## Example
//! ```
//! use imeffect::{FilterPool, Image, PresetOptions, PresetRegistry};
//!
//! let registry = PresetRegistry::standard();
//! let pool = FilterPool::new();
//! let preset = registry.build("Lomo", &pool, &PresetOptions::default())?;
//!
//! let image = Image::from_elem((4, 4, 3), 0.5);
//! let result = preset.apply(image)?;
//! assert_eq!(result.dim(), (4, 4, 3));
//! # Ok::<(), imeffect::FilterError>(())
//! ```

pub mod blend;
pub mod curve;
pub mod error;
pub mod filters;
pub mod layer;
pub mod pool;
pub mod presets;

pub use blend::BlendMode;
pub use error::{FilterError, FilterResult};
pub use filters::{Adjustment, Clamped, Filter, Identity, Image};
pub use layer::{FilterLayer, LayerItem, LayeredFilter};
pub use pool::{FilterPool, FilterSpec};
pub use presets::{PresetOptions, PresetRegistry};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use std::sync::OnceLock;

    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyKeyError, PyValueError};
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::pool::FilterPool;
    use crate::presets::{PresetOptions, PresetRegistry};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            match err {
                FilterError::UnknownPreset(name) => PyKeyError::new_err(name),
                other => PyValueError::new_err(other.to_string()),
            }
        }
    }

    /// Process-wide registry and the pool every preset is built from.
    struct Catalog {
        registry: PresetRegistry,
        pool: FilterPool,
    }

    fn catalog() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| Catalog {
            registry: PresetRegistry::standard(),
            pool: FilterPool::new(),
        })
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// Names of the built-in presets, in registry order.
    #[pyfunction]
    pub fn preset_names() -> Vec<String> {
        catalog().registry.names().map(str::to_string).collect()
    }

    /// Apply a preset to an RGB f32 image.
    ///
    /// # Arguments
    /// * `image` - (height, width, 3) array, values 0.0-1.0
    /// * `name` - Preset name, see `preset_names()`
    /// * `vignette` - Keep the vignette (Vintage, Lomo, GlowingSun)
    /// * `grey` - Finish in greyscale (Clarity)
    ///
    /// # Returns
    /// A new array of the same shape.
    #[pyfunction]
    #[pyo3(signature = (image, name, vignette=true, grey=false))]
    pub fn apply_preset<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        name: &str,
        vignette: bool,
        grey: bool,
    ) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let catalog = catalog();
        let options = PresetOptions::default()
            .with_vignette(vignette)
            .with_grey(grey);
        let preset = catalog.registry.build(name, &catalog.pool, &options)?;

        let input = image.as_array().to_owned();
        let result = py.allow_threads(|| preset.apply(input))?;
        Ok(result.into_pyarray(py))
    }

    #[pymodule]
    pub fn imeffect(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(preset_names, m)?)?;
        m.add_function(wrap_pyfunction!(apply_preset, m)?)?;
        Ok(())
    }
}
