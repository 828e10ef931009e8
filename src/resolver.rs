//! Transitive validation and instantiation of registered types.
//!
//! Resolution happens in two phases:
//!
//! - **Validation** walks the dependency graph of a type breadth-first and confirms that every
//!   dependency has a registered blueprint, instance or substitute. The types confirmed by a pass
//!   are committed to the registry's validated set only once the whole pass succeeds, so a failed
//!   pass never marks a type as resolvable.
//! - **Instantiation** returns an existing value when there is one and otherwise constructs the
//!   type from its resolved dependencies, caching the result so that every later lookup shares the
//!   same instance.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::{
    blueprint::{Arguments, BlueprintDescriptor, Dependency},
    error::{RegistryError, Result},
    instance::Instance,
    registry::{Entry, TypeRegistry},
    type_key::TypeKey,
};

/// Confirms that the dependency graph rooted at `root` is resolvable.
///
/// `dependencies` are the direct dependencies of `root`; they are passed in so a blueprint can be
/// validated before it is registered. On success the set of types confirmed by this pass is
/// returned, including `root`, and nothing is written to the registry.
///
/// Fails with [`RegistryError::MissingDependency`] naming the first unmet dependency and the type
/// that declared it.
pub fn validate(
    registry: &TypeRegistry,
    root: TypeKey,
    dependencies: Vec<Dependency>,
) -> Result<HashSet<TypeKey>> {
    let mut confirmed = HashSet::from([root]);
    let mut queue: VecDeque<(Dependency, TypeKey)> =
        dependencies.into_iter().map(|dep| (dep, root)).collect();

    while let Some((dep, required_by)) = queue.pop_front() {
        let key = dep.key();
        if registry.is_validated(key) || confirmed.contains(&key) {
            continue;
        }
        if !registry.contains(key) {
            debug!(
                type_name = %root,
                dependency = %key,
                required_by = %required_by,
                "validation failed"
            );
            return Err(RegistryError::missing_dependency(key, required_by));
        }

        trace!(type_name = %key, parameter = dep.name(), "dependency present");
        confirmed.insert(key);
        queue.extend(
            registry
                .direct_dependencies(key)?
                .into_iter()
                .filter(|next| {
                    !registry.is_validated(next.key()) && !confirmed.contains(&next.key())
                })
                .map(|next| (next, key)),
        );
    }

    debug!(type_name = %root, confirmed = confirmed.len(), "validation passed");
    Ok(confirmed)
}

/// Resolves types against a [`TypeRegistry`], constructing and caching them as needed.
#[derive(Debug)]
pub struct Resolver<'a> {
    registry: &'a mut TypeRegistry,
    constructing: Vec<TypeKey>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver operating on `registry`.
    pub fn new(registry: &'a mut TypeRegistry) -> Self {
        Resolver {
            registry,
            constructing: Vec::new(),
        }
    }

    /// Validates the registered blueprint `key` and commits the result.
    ///
    /// Types that are already validated, and instances or substitutes, succeed immediately.
    pub fn validate(&mut self, key: TypeKey) -> Result<()> {
        if self.registry.is_validated(key) {
            return Ok(());
        }

        let dependencies = self.registry.direct_dependencies(key)?;
        let confirmed = validate(self.registry, key, dependencies)?;
        self.registry.mark_validated(confirmed);
        Ok(())
    }

    /// Returns the value for `key`, constructing it and its dependencies if necessary.
    ///
    /// An existing instance or substitute is returned without running any constructor. A blueprint
    /// is validated first if it has not been yet, then built from its recursively resolved
    /// dependencies and cached under `key`.
    pub fn resolve(&mut self, key: TypeKey) -> Result<Instance> {
        let blueprint = match self.registry.entry(key) {
            None => return Err(RegistryError::not_found(key)),
            Some(Entry::Blueprint(blueprint)) => *blueprint,
            Some(entry) => {
                trace!(type_name = %key, "cache hit");
                return entry.value().cloned().ok_or_else(|| RegistryError::not_found(key));
            }
        };

        if let Some(pos) = self.constructing.iter().position(|k| *k == key) {
            let mut path = self.constructing[pos..].to_vec();
            path.push(key);
            return Err(RegistryError::cycle(path));
        }

        self.validate(key)?;

        self.constructing.push(key);
        let built = self.construct(&blueprint);
        self.constructing.pop();
        let instance = built?;

        debug!(type_name = %key, "instance constructed");
        self.registry.put_built(key, instance.clone())?;
        Ok(instance)
    }

    fn construct(&mut self, blueprint: &BlueprintDescriptor) -> Result<Instance> {
        let mut args = Arguments::new(blueprint.key());
        for dep in blueprint.dependencies()? {
            let value = self.resolve(dep.key())?;
            args.insert(dep.name(), value);
        }

        blueprint.construct(&mut args)
    }
}
