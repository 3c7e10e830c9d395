//! Typed write access to a leaf field.

use std::any::Any;

use crate::types::TypeKey;

trait Storage {
    fn key(&self) -> TypeKey;
    fn is_optional(&self) -> bool;
    fn current(&self) -> Option<&dyn Any>;
    fn assign(&mut self, value: Box<dyn Any>) -> Result<(), Box<dyn Any>>;
}

struct Plain<'a, T>(&'a mut T);

struct Optional<'a, T>(&'a mut Option<T>);

impl<T: Any> Storage for Plain<'_, T> {
    fn key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn is_optional(&self) -> bool {
        false
    }

    fn current(&self) -> Option<&dyn Any> {
        let value: &dyn Any = &*self.0;
        Some(value)
    }

    fn assign(&mut self, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        *self.0 = *value.downcast::<T>()?;
        Ok(())
    }
}

impl<T: Any> Storage for Optional<'_, T> {
    fn key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn current(&self) -> Option<&dyn Any> {
        self.0.as_ref().map(|value| value as &dyn Any)
    }

    fn assign(&mut self, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        *self.0 = Some(*value.downcast::<T>()?);
        Ok(())
    }
}

/// Mutable handle on a leaf field.
///
/// Optional fields (`Option<T>`) dispatch on `T`; the slot writes `Some`
/// when a value is assigned and leaves `None` otherwise.
pub struct Slot<'a> {
    storage: Box<dyn Storage + 'a>,
}

impl<'a> Slot<'a> {
    /// Slot for a plain field.
    #[must_use]
    pub fn new<T: Any>(target: &'a mut T) -> Self {
        Self {
            storage: Box::new(Plain(target)),
        }
    }

    /// Slot for an optional field.
    #[must_use]
    pub fn optional<T: Any>(target: &'a mut Option<T>) -> Self {
        Self {
            storage: Box::new(Optional(target)),
        }
    }

    /// Key of the value type, `T` for both `T` and `Option<T>` fields.
    #[must_use]
    pub fn type_key(&self) -> TypeKey {
        self.storage.key()
    }

    /// Returns `true` for `Option<T>` fields.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.storage.is_optional()
    }

    /// Current value, or `None` for an empty optional field.
    #[must_use]
    pub fn current(&self) -> Option<&dyn Any> {
        self.storage.current()
    }

    /// Store `value`, handing it back when its type does not match.
    pub(crate) fn assign(&mut self, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        self.storage.assign(value)
    }
}
