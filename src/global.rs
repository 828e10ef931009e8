//! Process-wide registry instances.
//!
//! Applications that prefer a single registry per process can share one through
//! [`get_instance`] instead of threading an [`AutoWiredCache`] through their components. The first
//! call creates the registry with the given configuration; later calls return the same registry
//! until [`flush`] discards it.
//!
//! ```
//! use std::sync::Arc;
//! use autowire::{global, CacheConfig};
//!
//! let cache = global::get_instance(CacheConfig::default());
//! assert!(Arc::ptr_eq(&cache, &global::get_instance(CacheConfig::lazy())));
//!
//! global::flush();
//! assert!(!Arc::ptr_eq(&cache, &global::get_instance(CacheConfig::default())));
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::{cache::AutoWiredCache, config::CacheConfig, provider::ProviderCache};

/// A shared handle to the process-wide [`AutoWiredCache`].
pub type SharedCache = Arc<Mutex<AutoWiredCache>>;

/// A shared handle to the process-wide [`ProviderCache`].
pub type SharedProviders = Arc<Mutex<ProviderCache>>;

static AUTO_WIRED_CACHE: Lazy<Mutex<Option<SharedCache>>> = Lazy::new(|| Mutex::new(None));

static PROVIDER_CACHE: Lazy<Mutex<Option<SharedProviders>>> = Lazy::new(|| Mutex::new(None));

/// Returns the process-wide auto-wiring registry, creating it on first use.
///
/// `config` only takes effect when this call creates the registry.
pub fn get_instance(config: CacheConfig) -> SharedCache {
    let mut slot = lock(&*AUTO_WIRED_CACHE);
    slot.get_or_insert_with(|| {
        debug!(evaluate_lazy = config.evaluate_lazy, "global registry created");
        Arc::new(Mutex::new(AutoWiredCache::new(config)))
    })
    .clone()
}

/// Discards the process-wide auto-wiring registry.
///
/// Handles obtained earlier keep the old registry alive but it is no longer reachable through
/// [`get_instance`], which will create a fresh, empty registry on its next call.
pub fn flush() {
    if lock(&*AUTO_WIRED_CACHE).take().is_some() {
        debug!("global registry flushed");
    }
}

/// Returns the process-wide provider cache, creating it on first use.
pub fn provider_instance() -> SharedProviders {
    lock(&*PROVIDER_CACHE)
        .get_or_insert_with(|| Arc::new(Mutex::new(ProviderCache::new())))
        .clone()
}

/// Discards the process-wide provider cache.
pub fn flush_providers() {
    if lock(&*PROVIDER_CACHE).take().is_some() {
        debug!("global provider cache flushed");
    }
}

/// Locks a shared registry, recovering the guard if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
