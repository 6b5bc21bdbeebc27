//! Memoizing filter pool.
//!
//! Presets name their filters by configuration rather than by instance. The
//! pool maps each distinct [`FilterKey`] to one shared [`PooledFilter`], so
//! identical configurations used by several presets (or several times by
//! one preset) are the same object.
//!
//! ## Lifecycle
//!
//! - [`FilterPool::register`] inserts an unconstructed entry, or returns the
//!   existing one for a known key.
//! - The entry builds its filter on its first [`Filter::apply`]; the factory
//!   runs at most once, even under concurrent first use.
//! - Entries live as long as the pool (or any preset holding them).

mod key;
mod spec;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::{debug, trace};

use crate::error::{FilterError, FilterResult};
use crate::filters::{Filter, Image};
use crate::layer::LayerItem;

pub use key::{ArgValue, Args, FilterKey};
pub use spec::{CurveCache, FilterSpec};

use spec::Factory;

// ============================================================================
// Pooled filter
// ============================================================================

/// A pool entry: a filter built lazily from its spec.
pub struct PooledFilter {
    key: FilterKey,
    factory: Factory,
    curves: CurveCache,
    instance: OnceLock<Box<dyn Filter>>,
}

impl PooledFilter {
    pub fn key(&self) -> &FilterKey {
        &self.key
    }

    /// Whether the underlying filter has been built yet.
    pub fn is_constructed(&self) -> bool {
        self.instance.get().is_some()
    }

    fn instance(&self) -> &dyn Filter {
        self.instance
            .get_or_init(|| {
                debug!(kind = %self.key.kind, "constructing pooled filter");
                (self.factory)(&self.curves)
            })
            .as_ref()
    }
}

impl Filter for PooledFilter {
    fn apply(&self, image: &mut Image) {
        self.instance().apply(image);
    }
}

impl fmt::Debug for PooledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledFilter")
            .field("key", &self.key)
            .field("constructed", &self.is_constructed())
            .finish()
    }
}

// ============================================================================
// Pool
// ============================================================================

/// Registry of shared filter instances keyed by configuration.
#[derive(Debug, Default)]
pub struct FilterPool {
    entries: Mutex<HashMap<FilterKey, Arc<PooledFilter>>>,
    curves: CurveCache,
}

impl FilterPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The curve cache handed to every factory of this pool.
    pub fn curves(&self) -> &CurveCache {
        &self.curves
    }

    /// Look up or insert the entry for `spec`.
    ///
    /// # Errors
    /// `InvalidConfiguration` when the kind is empty or any argument is NaN.
    pub fn register(&self, spec: FilterSpec) -> FilterResult<Arc<PooledFilter>> {
        let FilterSpec { key, factory } = spec;
        if key.kind.is_empty() {
            return Err(FilterError::InvalidConfiguration(
                "pooled filter kind must not be empty".to_string(),
            ));
        }
        if key.has_nan() {
            return Err(FilterError::InvalidConfiguration(format!(
                "pooled filter {} has a NaN argument",
                key.kind
            )));
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = entries.get(&key) {
            trace!(kind = %key.kind, "pool hit");
            return Ok(Arc::clone(existing));
        }

        debug!(kind = %key.kind, args = ?key.positional, kwargs = ?key.keyword, "pool entry created");
        let entry = Arc::new(PooledFilter {
            key: key.clone(),
            factory,
            curves: self.curves.clone(),
            instance: OnceLock::new(),
        });
        entries.insert(key, Arc::clone(&entry));
        Ok(entry)
    }

    /// Register `spec` and wrap the entry as a layer item.
    pub fn item(&self, spec: FilterSpec) -> FilterResult<LayerItem> {
        let filter: Arc<dyn Filter> = self.register(spec)?;
        Ok(LayerItem::Filter(filter))
    }

    /// Same as [`FilterPool::item`] for specs whose construction can fail.
    pub fn try_item(&self, spec: FilterResult<FilterSpec>) -> FilterResult<LayerItem> {
        self.item(spec?)
    }

    /// Number of distinct configurations in the pool.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
