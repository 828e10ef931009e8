//! Constructor signatures for types the registry can build.
//!
//! A type becomes constructible by implementing [`Blueprint`]: it declares its constructor
//! parameters as an ordered list of [`Dependency`] values and builds itself from the resolved
//! [`Arguments`]. The derive macro generates both halves from the struct's fields.
//!
//! # Example with Derive
//!
//! ```
//! use std::sync::Arc;
//! use autowire::Blueprint;
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
//! let deps = ImageProcessor::dependencies();
//! assert_eq!(deps[0].name(), "image");
//! ```
//!
//! # Example Manual Implementation
//!
//! ```
//! use std::sync::Arc;
//! use autowire::{error::Result, Arguments, Blueprint, Dependency};
//!
//! struct Image;
//!
//! struct Thumbnailer {
//!     source: Arc<Image>,
//!     size: u32,
//! }
//!
//! impl Blueprint for Thumbnailer {
//!     fn dependencies() -> Vec<Dependency> {
//!         vec![Dependency::new::<Image>("source")]
//!     }
//!
//!     fn construct(args: &mut Arguments) -> Result<Self> {
//!         Ok(Thumbnailer {
//!             source: args.take("source")?,
//!             size: 128,
//!         })
//!     }
//! }
//! ```

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    error::{RegistryError, Result},
    instance::Instance,
    type_key::TypeKey,
};

/// A single constructor parameter: its name and the type it is resolved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dependency {
    name: &'static str,
    key: TypeKey,
}

impl Dependency {
    /// Declares a parameter named `name` resolved from the registry entry for `T`.
    pub fn new<T: ?Sized + 'static>(name: &'static str) -> Self {
        Dependency::from_key(name, TypeKey::of::<T>())
    }

    /// Declares a parameter from an already known key.
    pub fn from_key(name: &'static str, key: TypeKey) -> Self {
        Dependency { name, key }
    }

    /// The parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type the parameter is resolved from.
    pub fn key(&self) -> TypeKey {
        self.key
    }
}

/// A type the registry can construct from its resolved dependencies.
///
/// Each implementor has exactly one constructor signature. Dependencies are resolved as shared
/// singletons, so every parameter is received as an `Arc`.
pub trait Blueprint: Sized + Send + Sync + 'static {
    /// The constructor parameters, in declaration order.
    fn dependencies() -> Vec<Dependency>;

    /// Builds the value from its resolved parameters.
    fn construct(args: &mut Arguments) -> Result<Self>;
}

/// Resolved constructor parameters, keyed by parameter name.
pub struct Arguments {
    owner: TypeKey,
    values: HashMap<&'static str, Instance>,
}

impl Arguments {
    /// Creates an empty set of arguments for constructing `owner`.
    pub fn new(owner: TypeKey) -> Self {
        Arguments {
            owner,
            values: HashMap::new(),
        }
    }

    /// Binds a resolved value to a parameter, replacing any previous binding.
    pub fn insert(&mut self, name: &'static str, value: Instance) {
        self.values.insert(name, value);
    }

    /// Removes the parameter `name` and downcasts it to `Arc<T>`.
    pub fn take<T>(&mut self, name: &str) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let value = self.values.remove(name).ok_or_else(|| {
            RegistryError::introspection(
                self.owner,
                format!("no resolved argument for parameter `{name}`"),
            )
        })?;
        value.downcast()
    }

    /// The type being constructed.
    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    /// The number of parameters not yet taken.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if every parameter has been taken.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("owner", &self.owner)
            .field("values", &self.values)
            .finish()
    }
}

/// The type-erased constructor signature of a [`Blueprint`].
#[derive(Clone, Copy)]
pub struct BlueprintDescriptor {
    key: TypeKey,
    dependencies: fn() -> Vec<Dependency>,
    construct: fn(&mut Arguments) -> Result<Instance>,
}

impl BlueprintDescriptor {
    /// Describes the blueprint `T`.
    pub fn of<T: Blueprint>() -> Self {
        BlueprintDescriptor {
            key: TypeKey::of::<T>(),
            dependencies: T::dependencies,
            construct: construct_erased::<T>,
        }
    }

    /// The type this blueprint constructs.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Reads the constructor signature.
    ///
    /// Fails with [`RegistryError::Introspection`] if a parameter has an empty name, a parameter
    /// name is repeated, or the type declares itself as a parameter.
    pub fn dependencies(&self) -> Result<Vec<Dependency>> {
        let deps = (self.dependencies)();
        for (i, dep) in deps.iter().enumerate() {
            if dep.name.is_empty() {
                return Err(RegistryError::introspection(
                    self.key,
                    format!("parameter {i} has no name"),
                ));
            }
            if dep.key == self.key {
                return Err(RegistryError::introspection(
                    self.key,
                    format!("parameter `{}` refers to the type itself", dep.name),
                ));
            }
            if deps[..i].iter().any(|prev| prev.name == dep.name) {
                return Err(RegistryError::introspection(
                    self.key,
                    format!("parameter `{}` is declared more than once", dep.name),
                ));
            }
        }

        Ok(deps)
    }

    /// Invokes the constructor.
    pub fn construct(&self, args: &mut Arguments) -> Result<Instance> {
        (self.construct)(args)
    }
}

impl fmt::Debug for BlueprintDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlueprintDescriptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

fn construct_erased<T: Blueprint>(args: &mut Arguments) -> Result<Instance> {
    T::construct(args).map(Instance::new)
}
