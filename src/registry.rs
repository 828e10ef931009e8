//! Type-keyed storage of registry entries.
//!
//! [`TypeRegistry`] is the leaf store underneath the resolver. It maps each [`TypeKey`] to at most
//! one [`Entry`] and tracks which keys have had their transitive dependency graph validated. It
//! performs no resolution itself: a key registered only as a blueprint has no value to return
//! until the resolver constructs one.

use std::collections::{hash_map::Keys, HashMap, HashSet};

use tracing::{debug, warn};

use crate::{
    blueprint::{BlueprintDescriptor, Dependency},
    error::{RegistryError, Result},
    instance::Instance,
    substitute::Substitute,
    type_key::TypeKey,
};

/// The registration state of a single type.
#[derive(Clone, Debug)]
pub enum Entry {
    /// A value supplied by the caller.
    Instance(Instance),
    /// A constructible type that has not been instantiated yet.
    Blueprint(BlueprintDescriptor),
    /// A blueprint together with the singleton constructed from it.
    Built {
        /// The blueprint the instance was constructed from.
        blueprint: BlueprintDescriptor,
        /// The cached instance.
        instance: Instance,
    },
    /// A value standing in for the type, overriding any blueprint.
    Substitute(Instance),
}

impl Entry {
    /// The value bound by this entry, if any.
    pub fn value(&self) -> Option<&Instance> {
        match self {
            Entry::Instance(instance)
            | Entry::Built { instance, .. }
            | Entry::Substitute(instance) => Some(instance),
            Entry::Blueprint(_) => None,
        }
    }

    /// The blueprint backing this entry, if any.
    pub fn blueprint(&self) -> Option<&BlueprintDescriptor> {
        match self {
            Entry::Blueprint(blueprint) | Entry::Built { blueprint, .. } => Some(blueprint),
            Entry::Instance(_) | Entry::Substitute(_) => None,
        }
    }

    /// Returns `true` if this entry is a substitute.
    pub fn is_substitute(&self) -> bool {
        matches!(self, Entry::Substitute(_))
    }

    /// Returns `true` if a later blueprint registration leaves this entry in place.
    ///
    /// Substitutes and built singletons are only cleared by removal.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Entry::Built { .. } | Entry::Substitute(_))
    }
}

/// A store of entries keyed by type, plus the set of validated types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: HashMap<TypeKey, Entry>,
    validated: HashSet<TypeKey>,
}

impl TypeRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        TypeRegistry {
            entries: HashMap::new(),
            validated: HashSet::new(),
        }
    }

    /// Creates a new empty registry with at least the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        TypeRegistry {
            entries: HashMap::with_capacity(capacity),
            validated: HashSet::with_capacity(capacity),
        }
    }

    /// An iterator visiting all registered types in arbitrary order.
    pub fn keys(&self) -> Keys<'_, TypeKey, Entry> {
        self.entries.keys()
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry and all validation state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.validated.clear();
    }

    /// Binds a concrete instance under `key`, replacing any previous entry.
    ///
    /// The instance must have been erased as `key`'s type, otherwise a
    /// [`RegistryError::TypeMismatch`] is returned and the registry is left unchanged.
    pub fn put_instance(&mut self, key: TypeKey, instance: Instance) -> Result<()> {
        if instance.key() != key {
            return Err(RegistryError::type_mismatch(key, instance.key().name()));
        }

        debug!(type_name = %key, "instance registered");
        self.entries.insert(key, Entry::Instance(instance));
        self.validated.insert(key);
        Ok(())
    }

    /// Registers a constructible type without instantiating it.
    ///
    /// Any previous instance or unbuilt blueprint for the type is replaced and its validation
    /// state is reset. A substitute or an already built singleton bound to the type is kept.
    pub fn put_blueprint(&mut self, blueprint: BlueprintDescriptor) {
        let key = blueprint.key();
        match self.entries.get(&key) {
            Some(Entry::Substitute(_)) => {
                warn!(type_name = %key, "blueprint ignored, type is substituted");
                return;
            }
            Some(Entry::Built { .. }) => {
                debug!(type_name = %key, "blueprint ignored, type is already instantiated");
                return;
            }
            _ => {}
        }

        debug!(type_name = %key, "blueprint registered");
        self.entries.insert(key, Entry::Blueprint(blueprint));
        self.validated.remove(&key);
    }

    /// Binds a substitute under `key`, replacing any previous entry.
    ///
    /// Fails with [`RegistryError::TypeMismatch`] if `key` is not the substitute's declared target.
    pub fn put_substitute(&mut self, key: TypeKey, substitute: Substitute) -> Result<()> {
        if substitute.target() != key {
            return Err(RegistryError::type_mismatch(key, substitute.target().name()));
        }

        debug!(
            type_name = %key,
            value_type = %substitute.value().key(),
            "substitute registered"
        );
        self.entries
            .insert(key, Entry::Substitute(substitute.into_value()));
        self.validated.insert(key);
        Ok(())
    }

    /// Caches the instance constructed from the blueprint registered under `key`.
    pub(crate) fn put_built(&mut self, key: TypeKey, instance: Instance) -> Result<()> {
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| RegistryError::not_found(key))?;
        // A value bound while constructing wins over the freshly built one.
        if let Entry::Blueprint(blueprint) = *entry {
            *entry = Entry::Built {
                blueprint,
                instance,
            };
        }
        Ok(())
    }

    /// Returns the value bound to `key`.
    ///
    /// Fails with [`RegistryError::NotFound`] if the type is not registered or is registered as a
    /// blueprint that has not been instantiated yet.
    pub fn get(&self, key: TypeKey) -> Result<&Instance> {
        self.entries
            .get(&key)
            .and_then(Entry::value)
            .ok_or_else(|| RegistryError::not_found(key))
    }

    /// Returns the entry registered for `key`.
    pub fn entry(&self, key: TypeKey) -> Option<&Entry> {
        self.entries.get(&key)
    }

    /// Returns the blueprint registered for `key`, if the type is constructible.
    pub fn blueprint(&self, key: TypeKey) -> Option<&BlueprintDescriptor> {
        self.entries.get(&key).and_then(Entry::blueprint)
    }

    /// Returns `true` if any entry is registered for `key`.
    pub fn contains(&self, key: TypeKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Returns `true` if the dependency graph of `key` is known to be resolvable.
    pub fn is_validated(&self, key: TypeKey) -> bool {
        self.validated.contains(&key)
    }

    /// Marks every key as validated.
    pub(crate) fn mark_validated(&mut self, keys: impl IntoIterator<Item = TypeKey>) {
        self.validated.extend(keys);
    }

    /// The direct dependencies of `key`, in declaration order.
    ///
    /// Instances and substitutes are terminal and have none. A key with no entry has no
    /// inspectable constructor and yields [`RegistryError::Introspection`].
    pub fn direct_dependencies(&self, key: TypeKey) -> Result<Vec<Dependency>> {
        match self.entries.get(&key) {
            // A built entry is terminal like an instance: its value already exists.
            Some(Entry::Blueprint(blueprint)) => blueprint.dependencies(),
            Some(_) => Ok(Vec::new()),
            None => Err(RegistryError::introspection(
                key,
                "type has no registered constructor",
            )),
        }
    }

    /// Removes the entry and validation state of `key`.
    ///
    /// Types depending on `key` are left untouched. Fails with [`RegistryError::NotFound`] if the
    /// type is not registered.
    pub fn remove(&mut self, key: TypeKey) -> Result<Entry> {
        let entry = self
            .entries
            .remove(&key)
            .ok_or_else(|| RegistryError::not_found(key))?;
        self.validated.remove(&key);
        debug!(type_name = %key, "type removed");
        Ok(entry)
    }
}
