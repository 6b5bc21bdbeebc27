//! Preset registry.
//!
//! Presets are registered by name with a factory that assembles the preset
//! from a shared [`FilterPool`]. Building several presets from one pool
//! shares every identical filter configuration between them.

mod catalog;

use std::collections::HashMap;
use std::fmt;

use crate::error::{FilterError, FilterResult};
use crate::layer::LayeredFilter;
use crate::pool::FilterPool;

pub use catalog::*;

/// Toggles selecting a variant of a preset.
///
/// Presets ignore toggles they don't have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetOptions {
    /// Keep the vignette (Vintage, Lomo, GlowingSun).
    pub vignette: bool,
    /// Finish in greyscale (Clarity).
    pub grey: bool,
}

impl Default for PresetOptions {
    fn default() -> Self {
        Self {
            vignette: true,
            grey: false,
        }
    }
}

impl PresetOptions {
    pub fn with_vignette(mut self, vignette: bool) -> Self {
        self.vignette = vignette;
        self
    }

    pub fn with_grey(mut self, grey: bool) -> Self {
        self.grey = grey;
        self
    }
}

/// Builds a preset from a pool.
pub type PresetFactory = fn(&FilterPool, &PresetOptions) -> FilterResult<LayeredFilter>;

/// Registry of presets by name, enumerable in registration order.
#[derive(Clone, Default)]
pub struct PresetRegistry {
    factories: HashMap<String, PresetFactory>,
    order: Vec<String>,
}

impl fmt::Debug for PresetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresetRegistry").field("names", &self.order).finish()
    }
}

impl PresetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in preset.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("Vintage", vintage);
        registry.register("Lomo", lomo);
        registry.register("Clarity", clarity);
        registry.register("SinCity", sin_city);
        registry.register("Sunrise", sunrise);
        registry.register("CrossProcess", cross_process);
        registry.register("OrangePeel", orange_peel);
        registry.register("Love", love);
        registry.register("Grungy", grungy);
        registry.register("Jarques", jarques);
        registry.register("Pinhole", pinhole);
        registry.register("OldBoot", old_boot);
        registry.register("GlowingSun", glowing_sun);
        registry.register("HazyDays", hazy_days);
        registry.register("HerMajesty", her_majesty);
        registry.register("Nostalgia", nostalgia);
        registry.register("Hemingway", hemingway);
        registry.register("Concentrate", concentrate);
        registry
    }

    /// Register a preset. Re-registering a name replaces its factory and
    /// keeps its position.
    pub fn register(&mut self, name: impl Into<String>, factory: PresetFactory) {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<PresetFactory> {
        self.factories.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Preset names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Build the preset registered under `name`.
    ///
    /// # Errors
    /// `UnknownPreset` if no preset has that name, or any error of the
    /// preset's own construction.
    pub fn build(
        &self,
        name: &str,
        pool: &FilterPool,
        options: &PresetOptions,
    ) -> FilterResult<LayeredFilter> {
        let factory = self
            .get(name)
            .ok_or_else(|| FilterError::UnknownPreset(name.to_string()))?;
        factory(pool, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_order() {
        let registry = PresetRegistry::standard();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names.len(), 18);
        assert_eq!(names[0], "Vintage");
        assert_eq!(names[3], "SinCity");
        assert_eq!(names[17], "Concentrate");
        assert!(registry.contains("HazyDays"));
    }

    #[test]
    fn test_unknown_preset() {
        let registry = PresetRegistry::standard();
        let pool = FilterPool::new();
        assert!(matches!(
            registry.build("Polaroid", &pool, &PresetOptions::default()),
            Err(FilterError::UnknownPreset(name)) if name == "Polaroid"
        ));
    }

    #[test]
    fn test_reregister_keeps_position() {
        let mut registry = PresetRegistry::new();
        registry.register("A", vintage);
        registry.register("B", lomo);
        registry.register("A", clarity);

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["A", "B"]);
        let pool = FilterPool::new();
        let built = registry.build("A", &pool, &PresetOptions::default()).unwrap();
        assert_eq!(built.name(), "Clarity");
    }

    #[test]
    fn test_options_builders() {
        let options = PresetOptions::default().with_vignette(false).with_grey(true);
        assert!(!options.vignette);
        assert!(options.grey);
        assert_eq!(PresetOptions::default(), PresetOptions { vignette: true, grey: false });
    }
}
