//! Type-erased holders for registered values.
//!
//! The registry stores every value as an [`Instance`]: an `Arc<T>` boxed behind a clonable trait
//! object and tagged with the [`TypeKey`] of `T`. Reading a value back is a checked downcast against
//! that tag, so a value can only ever be observed as the type it was stored as.

use std::{any::Any, fmt, sync::Arc};

use dyn_clone::DynClone;

use crate::{
    error::{RegistryError, Result},
    type_key::TypeKey,
};

trait ErasedArc: DynClone + Send + Sync {
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    fn data_ptr(&self) -> *const ();
}

dyn_clone::clone_trait_object!(ErasedArc);

impl<T> ErasedArc for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn data_ptr(&self) -> *const () {
        Arc::as_ptr(self).cast::<()>()
    }
}

/// A shared, type-erased value registered under a [`TypeKey`].
///
/// Cloning an instance clones the inner `Arc`, so every clone refers to the same value.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use autowire::Instance;
///
/// let instance = Instance::new(String::from("image.png"));
/// let value: Arc<String> = instance.downcast().unwrap();
/// assert_eq!(*value, "image.png");
/// assert!(instance.downcast::<u32>().is_err());
/// ```
#[derive(Clone)]
pub struct Instance {
    key: TypeKey,
    value: Box<dyn ErasedArc>,
}

impl Instance {
    /// Wraps an owned value, keyed by its own type.
    pub fn new<T>(value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Instance::from_arc(Arc::new(value))
    }

    /// Wraps a shared value, keyed by `T`.
    ///
    /// `T` may be unsized: an `Arc<Concrete>` coerced into `Arc<dyn Trait>` yields an instance
    /// keyed by `dyn Trait`.
    pub fn from_arc<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Instance {
            key: TypeKey::of::<T>(),
            value: Box::new(value),
        }
    }

    /// The type this instance can be downcast to.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Returns `true` if the instance holds an `Arc<T>`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.key.is::<T>()
    }

    /// Returns the inner value as an `Arc<T>`.
    ///
    /// If the instance does not hold an `Arc<T>`, a [`RegistryError::TypeMismatch`] naming both
    /// types is returned.
    pub fn downcast<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.value
            .as_any()
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| {
                RegistryError::type_mismatch(TypeKey::of::<T>(), self.key.name())
            })
    }

    /// Returns `true` if both instances point at the same allocation.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        std::ptr::eq(self.value.data_ptr(), other.value.data_ptr())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.key.name())
            .finish_non_exhaustive()
    }
}

impl<T> From<Arc<T>> for Instance
where
    T: ?Sized + Send + Sync + 'static,
{
    fn from(value: Arc<T>) -> Self {
        Instance::from_arc(value)
    }
}

#[cfg(test)]
mod tests {
    use std::any;

    use super::*;

    trait Shape: Send + Sync {
        fn sides(&self) -> u32;
    }

    struct Square;

    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    #[test]
    fn clones_share_the_value() {
        let instance = Instance::new(vec![1, 2, 3]);
        let clone = instance.clone();
        assert!(instance.ptr_eq(&clone));

        let a = instance.downcast::<Vec<i32>>().unwrap();
        let b = clone.downcast::<Vec<i32>>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn trait_object_instances() {
        let square: Arc<dyn Shape> = Arc::new(Square);
        let instance = Instance::from_arc(square.clone());
        assert!(instance.is::<dyn Shape>());
        assert!(!instance.is::<Square>());

        let shape = instance.downcast::<dyn Shape>().unwrap();
        assert_eq!(shape.sides(), 4);
        assert!(Arc::ptr_eq(&shape, &square));
    }

    #[test]
    fn failed_downcast_is_a_type_mismatch() {
        let instance = Instance::new(1i32);
        let err = instance.downcast::<String>().unwrap_err();
        assert_eq!(
            err,
            RegistryError::TypeMismatch {
                expected: any::type_name::<String>().into(),
                actual: "i32".into(),
            }
        );
    }

    #[test]
    fn distinct_values_are_not_ptr_eq() {
        assert!(!Instance::new(1u8).ptr_eq(&Instance::new(1u8)));
    }
}
