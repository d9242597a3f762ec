use std::{rc::Rc, sync::Arc};

#[cfg(test)]
mod tests;

/// The rule that decides whether a write is a change worth propagating.
pub trait EqualityPolicy<T: ?Sized>: 'static {
    /// Returns `true` if replacing `old` with `new` must notify subscribers.
    fn is_changed(&self, old: &T, new: &T) -> bool;
}

/// Values that can be compared by identity.
///
/// Plain values (numbers, `bool`, `char`, strings) are identical when they are equal.
/// Shared pointers are identical when they point to the same allocation.
/// Owned containers such as `Vec` and `Box` are always fresh values, so they are never identical,
/// even when their contents are equal.
pub trait Identity {
    fn is_identical(&self, other: &Self) -> bool;
}

macro_rules! impl_identity_by_eq {
    ($($t:ty),* $(,)?) => {
        $(
            impl Identity for $t {
                fn is_identical(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_identity_by_eq!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    str,
    String,
);

impl<T: Identity + ?Sized> Identity for &'static T {
    fn is_identical(&self, other: &Self) -> bool {
        T::is_identical(self, other)
    }
}
impl<T: Identity> Identity for Option<T> {
    fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.is_identical(b),
            (None, None) => true,
            _ => false,
        }
    }
}
impl<T: ?Sized> Identity for Rc<T> {
    fn is_identical(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}
impl<T: ?Sized> Identity for Arc<T> {
    fn is_identical(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}
impl<T> Identity for Vec<T> {
    fn is_identical(&self, _other: &Self) -> bool {
        false
    }
}
impl<T: ?Sized> Identity for Box<T> {
    fn is_identical(&self, _other: &Self) -> bool {
        false
    }
}

/// Notify unless the new value is identical to the current one.
///
/// This is the default policy of [`Cell`](crate::Cell) and [`DerivedCell`](crate::DerivedCell).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrictInequality;

impl<T: Identity + ?Sized> EqualityPolicy<T> for StrictInequality {
    fn is_changed(&self, old: &T, new: &T) -> bool {
        !old.is_identical(new)
    }
}

/// Notify unless the new value is equal to the current one according to [`PartialEq`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueEq;

impl<T: PartialEq + ?Sized> EqualityPolicy<T> for ValueEq {
    fn is_changed(&self, old: &T, new: &T) -> bool {
        old != new
    }
}

/// Notify on every write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysChanged;

impl<T: ?Sized> EqualityPolicy<T> for AlwaysChanged {
    fn is_changed(&self, _old: &T, _new: &T) -> bool {
        true
    }
}

/// A policy defined by a function that returns `true` when the value has changed.
#[derive(Debug, Clone, Copy)]
pub struct ChangedFn<F>(pub F);

impl<T: ?Sized, F> EqualityPolicy<T> for ChangedFn<F>
where
    F: Fn(&T, &T) -> bool + 'static,
{
    fn is_changed(&self, old: &T, new: &T) -> bool {
        (self.0)(old, new)
    }
}
