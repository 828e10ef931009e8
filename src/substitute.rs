//! Substitute values that stand in for a type.
//!
//! A [`Substitute`] binds an opaque value to a target [`TypeKey`]. Once registered it is returned in
//! place of normal resolution for that type and is never replaced by a later blueprint
//! registration. No relationship between the value and the target type is checked, which makes
//! substitutes suitable for test doubles:
//!
//! ```
//! use std::sync::Arc;
//! use autowire::{AutoWiredCache, CacheConfig, Substitute};
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FrozenClock;
//!
//! impl Clock for FrozenClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! let mut cache = AutoWiredCache::new(CacheConfig::default());
//! cache
//!     .insert(Substitute::new::<dyn Clock>(Arc::new(FrozenClock)))
//!     .unwrap();
//! assert_eq!(cache.get::<dyn Clock>().unwrap().now(), 42);
//! ```

use std::sync::Arc;

use crate::{instance::Instance, type_key::TypeKey};

/// A replacement value together with the type it stands in for.
#[derive(Clone, Debug)]
pub struct Substitute {
    target: TypeKey,
    value: Instance,
}

impl Substitute {
    /// Creates a substitute for `T` from a value of type `T`.
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Substitute {
            target: TypeKey::of::<T>(),
            value: Instance::from_arc(value),
        }
    }

    /// Creates a substitute for `T` from an arbitrary value.
    ///
    /// Typed lookups of `T` will fail with a type mismatch unless `V` is `T`; the value can still be
    /// read through erased lookups or downcast to `V`.
    pub fn of<T, V>(value: V) -> Self
    where
        T: ?Sized + 'static,
        V: Send + Sync + 'static,
    {
        Substitute::from_instance(TypeKey::of::<T>(), Instance::new(value))
    }

    /// Creates a substitute binding an already erased value to `target`.
    pub fn from_instance(target: TypeKey, value: Instance) -> Self {
        Substitute { target, value }
    }

    /// The type this substitute stands in for.
    pub fn target(&self) -> TypeKey {
        self.target
    }

    /// The replacement value.
    pub fn value(&self) -> &Instance {
        &self.value
    }

    /// Consumes the substitute, returning the replacement value.
    pub fn into_value(self) -> Instance {
        self.value
    }
}
