//! Defines error handling constructs for autowire.
//!
//! Every fallible registry operation returns a [`RegistryError`]. Errors are surfaced to the immediate
//! caller and are never retried or recovered internally; they describe programmer or configuration
//! mistakes such as binding a value under the wrong type or requesting a type whose dependency graph
//! is incomplete.

use std::{borrow::Cow, error, fmt};

use itertools::Itertools;

use crate::type_key::TypeKey;

/// Shorthand for results returned by registry operations.
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

/// An error that can occur when registering, resolving or removing types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A value was bound under a type it is not compatible with, or a stored value
    /// could not be downcast to the requested type.
    TypeMismatch {
        /// The type the value was bound under or requested as.
        expected: Cow<'static, str>,
        /// The runtime type of the value.
        actual: Cow<'static, str>,
    },
    /// A dependency has no registered blueprint, instance or substitute.
    MissingDependency {
        /// The unmet dependency.
        dependency: Cow<'static, str>,
        /// The type whose constructor declared the dependency.
        required_by: Cow<'static, str>,
    },
    /// No entry is registered for the type.
    NotFound {
        /// The requested type.
        type_name: Cow<'static, str>,
    },
    /// The constructor signature of a type could not be read.
    Introspection {
        /// The inspected type.
        type_name: Cow<'static, str>,
        /// Why the signature is unusable.
        reason: Cow<'static, str>,
    },
    /// Construction reached a type that is already being constructed.
    DependencyCycle {
        /// The chain of types, starting and ending with the repeated type.
        path: Vec<Cow<'static, str>>,
    },
}

impl RegistryError {
    pub(crate) fn type_mismatch(expected: TypeKey, actual: impl Into<Cow<'static, str>>) -> Self {
        RegistryError::TypeMismatch {
            expected: expected.name().into(),
            actual: actual.into(),
        }
    }

    pub(crate) fn missing_dependency(dependency: TypeKey, required_by: TypeKey) -> Self {
        RegistryError::MissingDependency {
            dependency: dependency.name().into(),
            required_by: required_by.name().into(),
        }
    }

    pub(crate) fn not_found(key: TypeKey) -> Self {
        RegistryError::NotFound {
            type_name: key.name().into(),
        }
    }

    pub(crate) fn introspection(key: TypeKey, reason: impl Into<Cow<'static, str>>) -> Self {
        RegistryError::Introspection {
            type_name: key.name().into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn cycle(path: impl IntoIterator<Item = TypeKey>) -> Self {
        RegistryError::DependencyCycle {
            path: path.into_iter().map(|key| key.name().into()).collect(),
        }
    }

    /// Returns `true` if this is a [`RegistryError::NotFound`] error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::TypeMismatch { expected, actual } => {
                write!(f, "value of type `{actual}` cannot be set under type `{expected}`")
            }
            RegistryError::MissingDependency {
                dependency,
                required_by,
            } => write!(
                f,
                "peer dependency `{dependency}` not found for `{required_by}`"
            ),
            RegistryError::NotFound { type_name } => {
                write!(f, "type `{type_name}` not found or could not be instantiated")
            }
            RegistryError::Introspection { type_name, reason } => {
                write!(f, "cannot introspect constructor of `{type_name}`: {reason}")
            }
            RegistryError::DependencyCycle { path } => {
                write!(f, "dependency cycle detected: {}", path.iter().join(" -> "))
            }
        }
    }
}

impl error::Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Image;
    struct ImageProcessor;

    #[test]
    fn missing_dependency_names_both_types() {
        let err = RegistryError::missing_dependency(
            TypeKey::of::<Image>(),
            TypeKey::of::<ImageProcessor>(),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("peer dependency `"));
        assert!(msg.contains("Image`"));
        assert!(msg.contains("ImageProcessor`"));
    }

    #[test]
    fn type_mismatch_message() {
        let err = RegistryError::type_mismatch(TypeKey::of::<Image>(), "i32");
        assert_eq!(
            err.to_string(),
            format!(
                "value of type `i32` cannot be set under type `{}`",
                std::any::type_name::<Image>()
            )
        );
    }

    #[test]
    fn cycle_path_is_joined() {
        let err = RegistryError::cycle([
            TypeKey::of::<Image>(),
            TypeKey::of::<ImageProcessor>(),
            TypeKey::of::<Image>(),
        ]);
        let RegistryError::DependencyCycle { path } = &err else {
            panic!("expected a cycle error");
        };
        assert_eq!(path.len(), 3);
        assert_eq!(err.to_string().matches(" -> ").count(), 2);
        assert!(!err.is_not_found());
    }
}
