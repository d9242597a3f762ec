use std::{
    cell::Cell as StdCell,
    fmt,
    rc::{Rc, Weak},
};

use derive_ex::derive_ex;
use parse_display::Display;


thread_local! {
    static NEXT_ID: StdCell<u64> = const { StdCell::new(0) };
}

/// Identifier of a [`Cell`](crate::Cell) or [`DerivedCell`](crate::DerivedCell).
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("#{0}")]
pub struct CellId(u64);

impl CellId {
    pub(crate) fn new() -> Self {
        NEXT_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            CellId(id)
        })
    }
}

/// A listener registered by a [`DerivedCell`](crate::DerivedCell) on each of its dependencies.
///
/// Like [`Observer`](crate::Observer), identity is the identity of the shared callback.
#[derive_ex(Clone)]
pub struct Dependent(Rc<dyn Fn()>);

impl Dependent {
    pub(crate) fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
    pub(crate) fn call(&self) {
        (self.0)()
    }
    pub(crate) fn downgrade(&self) -> WeakDependent {
        WeakDependent(Rc::downgrade(&self.0))
    }
}

pub(crate) struct WeakDependent(Weak<dyn Fn()>);

impl WeakDependent {
    pub fn upgrade(&self) -> Option<Dependent> {
        self.0.upgrade().map(Dependent)
    }
}
impl fmt::Debug for Dependent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependent({:p})", Rc::as_ptr(&self.0))
    }
}

/// The untyped subscription surface shared by every cell.
pub trait Source {
    fn id(&self) -> CellId;

    /// Appends a dependent listener to the subscribers of this source.
    fn add_dependent(&self, dependent: Dependent);

    /// Removes every registration of `dependent`.
    ///
    /// Returns `true` if any registration was removed.
    fn remove_dependent(&self, dependent: &Dependent) -> bool;
}

/// A source whose current value can be read.
pub trait Readable: Source + 'static {
    type Value;
    fn read(&self) -> Self::Value;
}

/// An ordered list of dependencies of a [`DerivedCell`](crate::DerivedCell).
///
/// Implemented for single cells, and for tuples (up to 8 elements), arrays and `Vec`s of [`Readable`] values.
/// [`values`](Self::values) reads every dependency in order,
/// and the result is passed to the compute function.
pub trait Dependencies: 'static {
    type Values;
    fn values(&self) -> Self::Values;
    fn for_each_source(&self, f: &mut dyn FnMut(&dyn Source));
}

impl<S: Readable> Dependencies for Vec<S> {
    type Values = Vec<S::Value>;
    fn values(&self) -> Self::Values {
        self.iter().map(|s| s.read()).collect()
    }
    fn for_each_source(&self, f: &mut dyn FnMut(&dyn Source)) {
        for s in self {
            f(s)
        }
    }
}

impl<S: Readable, const N: usize> Dependencies for [S; N] {
    type Values = [S::Value; N];
    fn values(&self) -> Self::Values {
        self.each_ref().map(|s| s.read())
    }
    fn for_each_source(&self, f: &mut dyn FnMut(&dyn Source)) {
        for s in self {
            f(s)
        }
    }
}

macro_rules! impl_dependencies_for_tuple {
    ($($s:ident),*) => {
        impl<$($s: Readable),*> Dependencies for ($($s,)*) {
            type Values = ($($s::Value,)*);
            #[allow(non_snake_case)]
            fn values(&self) -> Self::Values {
                let ($($s,)*) = self;
                ($($s.read(),)*)
            }
            #[allow(non_snake_case)]
            fn for_each_source(&self, f: &mut dyn FnMut(&dyn Source)) {
                let ($($s,)*) = self;
                $(f($s);)*
            }
        }
    };
}

impl_dependencies_for_tuple!(S0);
impl_dependencies_for_tuple!(S0, S1);
impl_dependencies_for_tuple!(S0, S1, S2);
impl_dependencies_for_tuple!(S0, S1, S2, S3);
impl_dependencies_for_tuple!(S0, S1, S2, S3, S4);
impl_dependencies_for_tuple!(S0, S1, S2, S3, S4, S5);
impl_dependencies_for_tuple!(S0, S1, S2, S3, S4, S5, S6);
impl_dependencies_for_tuple!(S0, S1, S2, S3, S4, S5, S6, S7);
