//! A registry of ready-made instances.
//!
//! [`ProviderCache`] is the construction-free counterpart of
//! [`AutoWiredCache`](crate::AutoWiredCache): it only hands back instances and substitutes that
//! were registered explicitly.
//!
//! ```
//! use std::sync::Arc;
//! use autowire::ProviderCache;
//!
//! struct Image {
//!     file: String,
//! }
//!
//! let mut providers = ProviderCache::new();
//! providers.assign(Arc::new(Image { file: "image.png".into() }))?;
//! assert_eq!(providers.get::<Image>()?.file, "image.png");
//! # Ok::<(), autowire::error::RegistryError>(())
//! ```

use std::sync::Arc;

use crate::{
    cache::Assignment,
    error::Result,
    instance::Instance,
    registry::TypeRegistry,
    type_key::TypeKey,
};

/// A type-keyed store of instances and substitutes.
#[derive(Debug, Default)]
pub struct ProviderCache {
    registry: TypeRegistry,
}

impl ProviderCache {
    /// Creates an empty provider cache.
    pub fn new() -> Self {
        ProviderCache {
            registry: TypeRegistry::new(),
        }
    }

    /// Registers an instance under its own type, or a substitute under its target.
    pub fn insert(&mut self, value: impl Into<Assignment>) -> Result<&mut Self> {
        match value.into() {
            Assignment::Instance(instance) => {
                self.registry.put_instance(instance.key(), instance)?;
            }
            Assignment::Substitute(substitute) => {
                self.registry.put_substitute(substitute.target(), substitute)?;
            }
        }

        Ok(self)
    }

    /// Binds `value` under `T`, replacing any previous entry.
    pub fn assign<T>(&mut self, value: Arc<T>) -> Result<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry
            .put_instance(TypeKey::of::<T>(), Instance::from_arc(value))?;
        Ok(self)
    }

    /// Binds an erased instance or a substitute under `key`.
    pub fn assign_erased(
        &mut self,
        key: TypeKey,
        value: impl Into<Assignment>,
    ) -> Result<&mut Self> {
        match value.into() {
            Assignment::Instance(instance) => self.registry.put_instance(key, instance)?,
            Assignment::Substitute(substitute) => self.registry.put_substitute(key, substitute)?,
        }

        Ok(self)
    }

    /// Returns the value registered for `T`.
    pub fn get<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry.get(TypeKey::of::<T>())?.downcast()
    }

    /// Returns the erased value registered for `key`.
    pub fn get_erased(&self, key: TypeKey) -> Result<Instance> {
        self.registry.get(key).cloned()
    }

    /// Removes the value registered for `T`.
    pub fn remove<T: ?Sized + 'static>(&mut self) -> Result<&mut Self> {
        self.registry.remove(TypeKey::of::<T>())?;
        Ok(self)
    }

    /// Returns `true` if a value is registered for `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(TypeKey::of::<T>())
    }

    /// The number of registered values.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no values are registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Removes every registered value.
    pub fn clear(&mut self) {
        self.registry.clear();
    }
}
