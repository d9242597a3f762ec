use std::{fmt, rc::Rc};

use derive_ex::derive_ex;

/// A subscriber callback with reference identity.
///
/// Clones of an `Observer` refer to the same callback.
/// Registering the same observer twice results in two registrations,
/// and [`Cell::unsubscribe`](crate::Cell::unsubscribe) removes every registration of it.
///
/// The callback receives the context of the cell and the new value.
#[derive_ex(Clone, bound())]
pub struct Observer<T: ?Sized + 'static, C: 'static = ()>(Rc<dyn Fn(&C, &T)>);

impl<T: ?Sized + 'static, C: 'static> Observer<T, C> {
    pub fn new(f: impl Fn(&C, &T) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Create an observer that ignores the context.
    pub fn from_value_fn(f: impl Fn(&T) + 'static) -> Self {
        Self::new(move |_, value| f(value))
    }

    /// Returns `true` if both observers refer to the same callback.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn call(&self, context: &C, value: &T) {
        (self.0)(context, value)
    }
}
impl<T: ?Sized, C> fmt::Debug for Observer<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observer({:p})", Rc::as_ptr(&self.0))
    }
}
