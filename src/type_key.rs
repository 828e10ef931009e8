//! Stable type identifiers used as registry keys.
//!
//! A [`TypeKey`] names a type by its [`TypeId`], so two keys are equal exactly when they name the
//! same type. The type's name is carried along for diagnostics only and never takes part in
//! comparisons.

use std::{
    any::{self, TypeId},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// A handle uniquely identifying a type within the registry.
///
/// Keys can be created for unsized types, which makes trait objects valid registry keys:
///
/// ```
/// use autowire::TypeKey;
///
/// trait Storage {}
///
/// let key = TypeKey::of::<dyn Storage>();
/// assert_ne!(key, TypeKey::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Creates the key identifying `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// The underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name, as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if this key identifies `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    trait Shape {}

    #[test]
    fn keys_compare_by_identity() {
        assert_eq!(TypeKey::of::<u32>(), TypeKey::of::<u32>());
        assert_ne!(TypeKey::of::<u32>(), TypeKey::of::<u64>());
        assert_ne!(TypeKey::of::<dyn Shape>(), TypeKey::of::<Box<dyn Shape>>());
        assert!(TypeKey::of::<dyn Shape>().is::<dyn Shape>());
    }

    #[test]
    fn keys_hash_consistently() {
        let set: HashSet<_> = [TypeKey::of::<u8>(), TypeKey::of::<u8>(), TypeKey::of::<str>()]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_uses_type_name() {
        assert_eq!(TypeKey::of::<i32>().to_string(), "i32");
        assert_eq!(format!("{:?}", TypeKey::of::<i32>()), "TypeKey(\"i32\")");
    }
}
