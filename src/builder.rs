use crate::{Cell, Dependencies, DerivedCell, EqualityPolicy, StrictInequality};


/// A builder for creating a [`Cell`].
///
/// ```
/// use sigcell::{Cell, ValueEq};
///
/// let cell = Cell::builder(vec![1, 2, 3])
///     .policy(ValueEq)
///     .context("list")
///     .name("items")
///     .build();
/// assert_eq!(cell.name(), Some("items"));
/// assert_eq!(*cell.context(), "list");
/// ```
pub struct CellBuilder<T, C = (), P = StrictInequality> {
    value: T,
    context: C,
    policy: P,
    name: Option<String>,
}

impl<T: 'static> CellBuilder<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value,
            context: (),
            policy: StrictInequality,
            name: None,
        }
    }
}
impl<T: 'static, C: 'static, P> CellBuilder<T, C, P> {
    /// Sets the context passed to every subscriber.
    pub fn context<C2: 'static>(self, context: C2) -> CellBuilder<T, C2, P> {
        CellBuilder {
            value: self.value,
            context,
            policy: self.policy,
            name: self.name,
        }
    }

    /// Sets the rule that decides whether a write notifies the subscribers.
    pub fn policy<P2: EqualityPolicy<T>>(self, policy: P2) -> CellBuilder<T, C, P2> {
        CellBuilder {
            value: self.value,
            context: self.context,
            policy,
            name: self.name,
        }
    }

    /// Sets the name used in log records.
    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn build(self) -> Cell<T, C>
    where
        P: EqualityPolicy<T>,
    {
        Cell::from_parts(self.value, self.context, Box::new(self.policy), self.name)
    }
}

/// A builder for creating a [`DerivedCell`].
pub struct DerivedBuilder<D, F, C = (), P = StrictInequality> {
    dependencies: D,
    compute: F,
    context: C,
    policy: P,
    name: Option<String>,
}

impl<D: Dependencies, F> DerivedBuilder<D, F> {
    pub(crate) fn new(dependencies: D, compute: F) -> Self {
        Self {
            dependencies,
            compute,
            context: (),
            policy: StrictInequality,
            name: None,
        }
    }
}
impl<D: Dependencies, F, C: 'static, P> DerivedBuilder<D, F, C, P> {
    /// Sets the context passed to every subscriber.
    pub fn context<C2: 'static>(self, context: C2) -> DerivedBuilder<D, F, C2, P> {
        DerivedBuilder {
            dependencies: self.dependencies,
            compute: self.compute,
            context,
            policy: self.policy,
            name: self.name,
        }
    }

    /// Sets the rule that decides whether a recomputed value notifies the subscribers.
    pub fn policy<P2>(self, policy: P2) -> DerivedBuilder<D, F, C, P2> {
        DerivedBuilder {
            dependencies: self.dependencies,
            compute: self.compute,
            context: self.context,
            policy,
            name: self.name,
        }
    }

    /// Sets the name used in log records.
    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn build<T>(self) -> DerivedCell<T, C>
    where
        T: Clone + 'static,
        F: Fn(D::Values) -> T + 'static,
        P: EqualityPolicy<T>,
    {
        DerivedCell::from_parts(
            self.dependencies,
            self.compute,
            self.context,
            Box::new(self.policy),
            self.name,
        )
    }
}
