use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use derive_ex::derive_ex;

use crate::{
    propagation::RecomputeGuard, Cell, CellId, Dependencies, Dependent, DerivedBuilder,
    EqualityPolicy, Identity, Observer, Readable, Source, StrictInequality, Subscription,
    WeakDependent,
};


/// A read-only cell whose value is computed from other cells.
///
/// The compute function receives the current values of the dependencies.
/// Each time a dependency changes, the value is recomputed and written to an internal [`Cell`],
/// so subscribers of a `DerivedCell` are notified under the same equality policy as a `Cell`.
///
/// Recomputation is synchronous and is not batched.
/// A `DerivedCell` that depends on two cells recomputes once for each write to either of them.
///
/// ```
/// use sigcell::{Cell, DerivedCell};
///
/// let a = Cell::new(3);
/// let b = Cell::new(2);
/// let c = DerivedCell::new((a.clone(), b.clone()), |(a, b)| a + b);
/// assert_eq!(c.read(), 5);
///
/// a.write(9);
/// assert_eq!(c.read(), 11);
/// ```
///
/// A `DerivedCell` stays subscribed to its dependencies until [`detach`](Self::detach) is called.
/// The listener registered on each dependency holds the cell, so dropping every handle does not
/// stop recomputation. The cell and its dependencies refer to each other until `detach`.
#[derive_ex(Clone, bound())]
pub struct DerivedCell<T: 'static, C: 'static = ()>(Rc<DerivedNode<T, C>>);

impl<T: Clone + 'static> DerivedCell<T> {
    /// Create a `DerivedCell` from `dependencies` and `compute`.
    ///
    /// `compute` is called once immediately to produce the initial value.
    pub fn new<D: Dependencies>(
        dependencies: D,
        compute: impl Fn(D::Values) -> T + 'static,
    ) -> Self
    where
        T: Identity,
    {
        Self::from_parts(
            dependencies,
            compute,
            (),
            Box::new(StrictInequality),
            None,
        )
    }

    pub fn builder<D, F>(dependencies: D, compute: F) -> DerivedBuilder<D, F>
    where
        D: Dependencies,
        F: Fn(D::Values) -> T + 'static,
    {
        DerivedBuilder::new(dependencies, compute)
    }
}

impl<T: Clone + 'static, C: 'static> DerivedCell<T, C> {
    /// Create a `DerivedCell` whose subscribers are called with `context`.
    pub fn with_context<D: Dependencies>(
        dependencies: D,
        context: C,
        compute: impl Fn(D::Values) -> T + 'static,
    ) -> Self
    where
        T: Identity,
    {
        Self::from_parts(
            dependencies,
            compute,
            context,
            Box::new(StrictInequality),
            None,
        )
    }

    pub(crate) fn from_parts<D: Dependencies>(
        dependencies: D,
        compute: impl Fn(D::Values) -> T + 'static,
        context: C,
        policy: Box<dyn EqualityPolicy<T>>,
        name: Option<String>,
    ) -> Self {
        let compute = ComputeFn {
            dependencies,
            compute,
        };
        let cell = Cell::from_parts(compute.compute(), context, policy, name);
        let node = Rc::new(DerivedNode {
            cell,
            compute: Box::new(compute),
            listener: RefCell::new(None),
        });
        let listener = Dependent::new({
            let node = node.clone();
            move || {
                if node.is_attached() {
                    node.recompute();
                }
            }
        });
        let mut count = 0;
        node.compute.for_each_source(&mut |source| {
            source.add_dependent(listener.clone());
            count += 1;
        });
        *node.listener.borrow_mut() = Some(listener.downgrade());
        tracing::debug!(cell = %node.cell.id(), name = node.cell.name(), dependencies = count, "derived cell created");
        Self(node)
    }

    /// Gets the last computed value.
    pub fn read(&self) -> T {
        self.0.cell.read()
    }
}

impl<T: 'static, C: 'static> DerivedCell<T, C> {
    pub fn id(&self) -> CellId {
        self.0.cell.id()
    }
    pub fn name(&self) -> Option<&str> {
        self.0.cell.name()
    }
    pub fn context(&self) -> &C {
        self.0.cell.context()
    }

    /// Borrows the last computed value.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.cell.borrow()
    }

    /// Appends `observer` to the subscribers.
    pub fn subscribe(&self, observer: &Observer<T, C>) {
        self.0.cell.subscribe(observer)
    }

    /// Subscribes `f` and returns the observer to use with [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe_fn(&self, f: impl Fn(&C, &T) + 'static) -> Observer<T, C> {
        self.0.cell.subscribe_fn(f)
    }

    /// Subscribes `f` until the returned [`Subscription`] is dropped.
    pub fn subscribe_scoped(&self, f: impl Fn(&C, &T) + 'static) -> Subscription {
        self.0.cell.subscribe_scoped(f)
    }

    /// Removes every registration of `observer`.
    pub fn unsubscribe(&self, observer: &Observer<T, C>) -> bool {
        self.0.cell.unsubscribe(observer)
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.cell.subscriber_count()
    }

    /// Stops listening to the dependencies.
    ///
    /// The cell keeps its last value and its subscribers, but is never recomputed again.
    /// Returns `false` if the cell was already detached.
    pub fn detach(&self) -> bool {
        self.0.detach()
    }

    pub fn is_detached(&self) -> bool {
        !self.0.is_attached()
    }
}

impl<T: 'static, C: 'static> Source for DerivedCell<T, C> {
    fn id(&self) -> CellId {
        self.0.cell.id()
    }
    fn add_dependent(&self, dependent: Dependent) {
        self.0.cell.add_dependent(dependent)
    }
    fn remove_dependent(&self, dependent: &Dependent) -> bool {
        self.0.cell.remove_dependent(dependent)
    }
}
impl<T: Clone + 'static, C: 'static> Readable for DerivedCell<T, C> {
    type Value = T;
    fn read(&self) -> T {
        self.read()
    }
}
impl<T: Clone + 'static, C: 'static> Dependencies for DerivedCell<T, C> {
    type Values = T;
    fn values(&self) -> T {
        self.read()
    }
    fn for_each_source(&self, f: &mut dyn FnMut(&dyn Source)) {
        f(self)
    }
}
impl<T: std::fmt::Debug, C> std::fmt::Debug for DerivedCell<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0.cell, f)
    }
}

struct DerivedNode<T: 'static, C: 'static> {
    cell: Cell<T, C>,
    compute: Box<dyn Compute<T>>,
    listener: RefCell<Option<WeakDependent>>,
}
impl<T: Clone + 'static, C: 'static> DerivedNode<T, C> {
    fn recompute(&self) {
        let _guard = RecomputeGuard::enter(self.cell.id());
        let value = self.compute.compute();
        tracing::debug!(cell = %self.cell.id(), name = self.cell.name(), "recompute");
        self.cell.write(value);
    }
}
impl<T: 'static, C: 'static> DerivedNode<T, C> {
    fn is_attached(&self) -> bool {
        self.listener.borrow().is_some()
    }
    fn detach(&self) -> bool {
        let listener = self.listener.borrow_mut().take();
        let Some(listener) = listener.and_then(|l| l.upgrade()) else {
            return false;
        };
        self.compute.for_each_source(&mut |source| {
            source.remove_dependent(&listener);
        });
        tracing::debug!(cell = %self.cell.id(), name = self.cell.name(), "detached");
        true
    }
}

trait Compute<T> {
    fn compute(&self) -> T;
    fn for_each_source(&self, f: &mut dyn FnMut(&dyn Source));
}

struct ComputeFn<D, F> {
    dependencies: D,
    compute: F,
}
impl<T, D, F> Compute<T> for ComputeFn<D, F>
where
    D: Dependencies,
    F: Fn(D::Values) -> T,
{
    fn compute(&self) -> T {
        (self.compute)(self.dependencies.values())
    }
    fn for_each_source(&self, f: &mut dyn FnMut(&dyn Source)) {
        self.dependencies.for_each_source(f)
    }
}
