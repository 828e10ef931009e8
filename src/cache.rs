//! The auto-wiring registry.
//!
//! [`AutoWiredCache`] stores instances, blueprints and substitutes by type and builds blueprints on
//! demand from their registered dependencies. Every constructed type is cached, so all dependents
//! of a type share one instance of it.
//!
//! Two resolution modes are available through [`CacheConfig`]:
//!
//! - **Eager** (default): a blueprint's dependency graph is validated when it is registered, and
//!   registration fails if a dependency is missing.
//! - **Lazy**: registration always succeeds and validation happens on the first lookup.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use autowire::{AutoWiredCache, Blueprint, CacheConfig, Registration};
//!
//! struct Image {
//!     file: String,
//! }
//!
//! #[derive(Blueprint)]
//! struct ImageProcessor {
//!     image: Arc<Image>,
//! }
//!
//! let mut cache = AutoWiredCache::new(CacheConfig::eager());
//! cache
//!     .insert(Registration::instance(Image { file: "image.png".into() }))?
//!     .add_blueprint::<ImageProcessor>()?;
//!
//! let processor = cache.get::<ImageProcessor>()?;
//! assert!(Arc::ptr_eq(&processor.image, &cache.get::<Image>()?));
//! # Ok::<(), autowire::error::RegistryError>(())
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::{
    blueprint::{Blueprint, BlueprintDescriptor},
    config::CacheConfig,
    error::Result,
    instance::Instance,
    registry::{Entry, TypeRegistry},
    resolver::{self, Resolver},
    substitute::Substitute,
    type_key::TypeKey,
};

/// A value accepted by [`AutoWiredCache::insert`].
#[derive(Clone, Debug)]
pub enum Registration {
    /// A constructed value, registered under its own type.
    Instance(Instance),
    /// A type to construct on demand.
    Blueprint(BlueprintDescriptor),
    /// A value standing in for its target type.
    Substitute(Substitute),
}

impl Registration {
    /// Registers an owned value under its own type.
    pub fn instance<T>(value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Registration::Instance(Instance::new(value))
    }

    /// Registers a shared value under `T`.
    pub fn shared<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Registration::Instance(Instance::from_arc(value))
    }

    /// Registers `T` as a blueprint.
    pub fn blueprint<T: Blueprint>() -> Self {
        Registration::Blueprint(BlueprintDescriptor::of::<T>())
    }
}

impl From<Instance> for Registration {
    fn from(instance: Instance) -> Self {
        Registration::Instance(instance)
    }
}

impl From<BlueprintDescriptor> for Registration {
    fn from(blueprint: BlueprintDescriptor) -> Self {
        Registration::Blueprint(blueprint)
    }
}

impl From<Substitute> for Registration {
    fn from(substitute: Substitute) -> Self {
        Registration::Substitute(substitute)
    }
}

/// A value accepted by explicit type-keyed assignment.
#[derive(Clone, Debug)]
pub enum Assignment {
    /// A constructed value.
    Instance(Instance),
    /// A value standing in for its target type.
    Substitute(Substitute),
}

impl From<Instance> for Assignment {
    fn from(instance: Instance) -> Self {
        Assignment::Instance(instance)
    }
}

impl From<Substitute> for Assignment {
    fn from(substitute: Substitute) -> Self {
        Assignment::Substitute(substitute)
    }
}

/// A registry that resolves and constructs dependency graphs on demand.
#[derive(Debug, Default)]
pub struct AutoWiredCache {
    config: CacheConfig,
    registry: TypeRegistry,
}

impl AutoWiredCache {
    /// Creates an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        AutoWiredCache {
            config,
            registry: TypeRegistry::new(),
        }
    }

    /// The configuration this cache was created with.
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Returns `true` if dependency validation is deferred to lookup.
    pub fn is_lazy(&self) -> bool {
        self.config.evaluate_lazy
    }

    /// The underlying type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Registers an instance, blueprint or substitute.
    ///
    /// Instances are keyed by their own type and substitutes by their target. In eager mode a
    /// blueprint is validated first and is not registered if any of its transitive dependencies is
    /// missing. A blueprint for a type that is substituted or already built is ignored.
    pub fn insert(&mut self, registration: impl Into<Registration>) -> Result<&mut Self> {
        match registration.into() {
            Registration::Instance(instance) => {
                self.registry.put_instance(instance.key(), instance)?;
            }
            Registration::Blueprint(blueprint) => self.register_blueprint(blueprint)?,
            Registration::Substitute(substitute) => {
                self.registry.put_substitute(substitute.target(), substitute)?;
            }
        }

        Ok(self)
    }

    /// Registers `T` as a blueprint.
    pub fn add_blueprint<T: Blueprint>(&mut self) -> Result<&mut Self> {
        self.register_blueprint(BlueprintDescriptor::of::<T>())?;
        Ok(self)
    }

    /// Binds `value` under `T`, replacing any previous entry.
    ///
    /// The value may be any type coercible to `Arc<T>`, which allows binding an implementation
    /// under a trait object key.
    pub fn assign<T>(&mut self, value: Arc<T>) -> Result<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry
            .put_instance(TypeKey::of::<T>(), Instance::from_arc(value))?;
        Ok(self)
    }

    /// Binds an erased instance or a substitute under `key`.
    ///
    /// Fails with [`RegistryError::TypeMismatch`](crate::error::RegistryError::TypeMismatch) if
    /// the instance was not erased as `key`, or if `key` is not the substitute's target.
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

    /// Returns the value registered for `T`, constructing it if necessary.
    pub fn get<T>(&mut self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_erased(TypeKey::of::<T>())?.downcast()
    }

    /// Returns the erased value registered for `key`, constructing it if necessary.
    pub fn get_erased(&mut self, key: TypeKey) -> Result<Instance> {
        trace!(type_name = %key, lazy = self.is_lazy(), "lookup");
        Resolver::new(&mut self.registry).resolve(key)
    }

    /// Removes the entry registered for `T`.
    ///
    /// Cached dependents of `T` keep the instance they were built with.
    pub fn remove<T: ?Sized + 'static>(&mut self) -> Result<&mut Self> {
        self.remove_erased(TypeKey::of::<T>())
    }

    /// Removes the entry registered for `key`.
    pub fn remove_erased(&mut self, key: TypeKey) -> Result<&mut Self> {
        self.registry.remove(key)?;
        Ok(self)
    }

    /// Returns `true` if anything is registered for `T`.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(TypeKey::of::<T>())
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    fn register_blueprint(&mut self, blueprint: BlueprintDescriptor) -> Result<()> {
        let key = blueprint.key();
        if self.config.evaluate_lazy || self.registry.entry(key).is_some_and(Entry::is_fixed) {
            self.registry.put_blueprint(blueprint);
            return Ok(());
        }

        let confirmed = resolver::validate(&self.registry, key, blueprint.dependencies()?)?;
        self.registry.put_blueprint(blueprint);
        self.registry.mark_validated(confirmed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blueprint::{Arguments, Dependency},
        error::RegistryError,
    };

    #[derive(Debug)]
    struct Image {
        file: &'static str,
    }

    #[derive(Debug)]
    struct ImageProcessor {
        image: Arc<Image>,
    }

    impl Blueprint for ImageProcessor {
        fn dependencies() -> Vec<Dependency> {
            vec![Dependency::new::<Image>("image")]
        }

        fn construct(args: &mut Arguments) -> Result<Self> {
            Ok(ImageProcessor {
                image: args.take("image")?,
            })
        }
    }

    #[test]
    fn eager_blueprint_is_validated_at_registration() {
        let mut cache = AutoWiredCache::new(CacheConfig::eager());
        let err = cache.add_blueprint::<ImageProcessor>().unwrap_err();
        assert_eq!(
            err,
            RegistryError::missing_dependency(
                TypeKey::of::<Image>(),
                TypeKey::of::<ImageProcessor>()
            )
        );
        assert!(!cache.contains::<ImageProcessor>());
    }

    #[test]
    fn lazy_blueprint_is_validated_at_lookup() {
        let mut cache = AutoWiredCache::new(CacheConfig::lazy());
        cache.add_blueprint::<ImageProcessor>().unwrap();
        assert!(cache.contains::<ImageProcessor>());
        assert!(!cache.registry().is_validated(TypeKey::of::<ImageProcessor>()));

        let err = cache.get::<ImageProcessor>().unwrap_err();
        assert!(matches!(err, RegistryError::MissingDependency { .. }));

        cache
            .insert(Registration::instance(Image { file: "image.png" }))
            .unwrap();
        let processor = cache.get::<ImageProcessor>().unwrap();
        assert_eq!(processor.image.file, "image.png");
    }

    #[test]
    fn assign_erased_checks_the_key() {
        let mut cache = AutoWiredCache::default();
        let err = cache
            .assign_erased(TypeKey::of::<Image>(), Instance::new(1i32))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "value of type `i32` cannot be set under type `{}`",
                TypeKey::of::<Image>()
            )
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn typed_lookup_of_opaque_substitute_is_a_type_mismatch() {
        let mut cache = AutoWiredCache::default();
        cache
            .insert(Substitute::of::<Image, _>(String::from("mock")))
            .unwrap();

        assert!(matches!(
            cache.get::<Image>().unwrap_err(),
            RegistryError::TypeMismatch { .. }
        ));
        let erased = cache.get_erased(TypeKey::of::<Image>()).unwrap();
        assert_eq!(*erased.downcast::<String>().unwrap(), "mock");
    }

    #[test]
    fn shared_registration_keeps_the_handle() {
        let image = Arc::new(Image { file: "image.png" });
        let mut cache = AutoWiredCache::default();
        cache.insert(Registration::shared(image.clone())).unwrap();

        assert!(Arc::ptr_eq(&cache.get::<Image>().unwrap(), &image));
        assert!(cache.registry().is_validated(TypeKey::of::<Image>()));
    }

    #[test]
    fn removal_is_not_found_afterwards() {
        let mut cache = AutoWiredCache::default();
        cache.assign(Arc::new(Image { file: "image.png" })).unwrap();
        cache.remove::<Image>().unwrap();
        assert!(cache.get::<Image>().unwrap_err().is_not_found());
        assert!(cache.remove::<Image>().unwrap_err().is_not_found());
    }
}
