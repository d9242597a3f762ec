use std::{
    cell::{Ref, RefCell},
    mem::take,
    rc::Rc,
};

use derive_ex::derive_ex;
use serde::{Deserialize, Serialize};

use crate::{
    CellBuilder, CellId, Dependencies, Dependent, EqualityPolicy, Identity, Observer, Readable,
    Source, StrictInequality, Subscription,
};


/// A mutable value holder that notifies its subscribers when the value changes.
///
/// `Cell` is a handle; clones share the same value and subscribers.
///
/// Every subscriber is called with the context of the cell and the new value.
/// The context is fixed at construction and is `()` unless one is given explicitly.
#[derive_ex(Clone, bound())]
pub struct Cell<T: 'static, C: 'static = ()>(Rc<CellNode<T, C>>);

impl<T: 'static> Cell<T> {
    /// Create a new `Cell` with the given initial value.
    ///
    /// No notification is sent for the initial value.
    pub fn new(value: T) -> Self
    where
        T: Identity,
    {
        Self::from_parts(value, (), Box::new(StrictInequality), None)
    }

    pub fn builder(value: T) -> CellBuilder<T> {
        CellBuilder::new(value)
    }
}

impl<T: 'static, C: 'static> Cell<T, C> {
    /// Create a new `Cell` whose subscribers are called with `context`.
    pub fn with_context(value: T, context: C) -> Self
    where
        T: Identity,
    {
        Self::from_parts(value, context, Box::new(StrictInequality), None)
    }

    pub(crate) fn from_parts(
        value: T,
        context: C,
        policy: Box<dyn EqualityPolicy<T>>,
        name: Option<String>,
    ) -> Self {
        Self(Rc::new(CellNode {
            id: CellId::new(),
            name,
            value: RefCell::new(value),
            context,
            policy,
            subscribers: RefCell::new(Vec::new()),
        }))
    }

    pub fn id(&self) -> CellId {
        self.0.id
    }
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }
    pub fn context(&self) -> &C {
        &self.0.context
    }

    /// Borrows the current value.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.value.borrow()
    }

    /// Gets the current value.
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        self.0.value.borrow().clone()
    }

    /// Reads the value if `value` is `None`, otherwise writes it.
    ///
    /// `access(None)` is a pure getter: no comparison is made and no notification is sent.
    pub fn access(&self, value: Option<T>) -> T
    where
        T: Clone,
    {
        match value {
            None => self.read(),
            Some(value) => self.write(value),
        }
    }

    /// Sets the value and notifies the subscribers if the equality policy reports a change.
    ///
    /// Returns the value held by the cell after all subscribers have run.
    /// This differs from `value` if a subscriber wrote to this cell again.
    pub fn write(&self, value: T) -> T
    where
        T: Clone,
    {
        let changed = self.0.policy.is_changed(&self.0.value.borrow(), &value);
        if !changed {
            tracing::debug!(cell = %self.0.id, name = self.name(), "write skipped: unchanged");
            return self.read();
        }
        *self.0.value.borrow_mut() = value.clone();
        tracing::trace!(cell = %self.0.id, name = self.name(), "write");
        self.notify(&value);
        self.read()
    }

    /// Calls every subscriber, in subscription order, with `value`.
    ///
    /// The subscribers are those registered when the pass starts.
    /// Subscribers added or removed by a subscriber take effect from the next pass.
    pub fn notify(&self, value: &T) {
        let subscribers = self.0.subscribers.borrow().clone();
        tracing::trace!(cell = %self.0.id, subscribers = subscribers.len(), "notify");
        for subscriber in &subscribers {
            match subscriber {
                Subscriber::Observer(observer) => observer.call(&self.0.context, value),
                Subscriber::Dependent(dependent) => dependent.call(),
            }
        }
    }

    /// Appends `observer` to the subscribers.
    ///
    /// The same observer may be subscribed more than once; each registration is called.
    pub fn subscribe(&self, observer: &Observer<T, C>) {
        self.0.push(Subscriber::Observer(observer.clone()));
    }

    /// Subscribes `f` and returns the observer to use with [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe_fn(&self, f: impl Fn(&C, &T) + 'static) -> Observer<T, C> {
        let observer = Observer::new(f);
        self.subscribe(&observer);
        observer
    }

    /// Subscribes `f` until the returned [`Subscription`] is dropped.
    pub fn subscribe_scoped(&self, f: impl Fn(&C, &T) + 'static) -> Subscription {
        let observer = self.subscribe_fn(f);
        Subscription::from_weak_fn(Rc::downgrade(&self.0), move |node| {
            node.remove_where(|s| s.is_observer(&observer));
        })
    }

    /// Removes every registration of `observer`.
    ///
    /// Returns `true` if any registration was removed.
    /// Removing an observer that was never subscribed does nothing.
    pub fn unsubscribe(&self, observer: &Observer<T, C>) -> bool {
        self.0.remove_where(|s| s.is_observer(observer))
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.subscribers.borrow().len()
    }
}

impl<T: 'static, C: 'static> Source for Cell<T, C> {
    fn id(&self) -> CellId {
        self.0.id
    }
    fn add_dependent(&self, dependent: Dependent) {
        self.0.push(Subscriber::Dependent(dependent));
    }
    fn remove_dependent(&self, dependent: &Dependent) -> bool {
        self.0.remove_where(|s| s.is_dependent(dependent))
    }
}
impl<T: Clone + 'static, C: 'static> Readable for Cell<T, C> {
    type Value = T;
    fn read(&self) -> T {
        self.read()
    }
}
impl<T: Clone + 'static, C: 'static> Dependencies for Cell<T, C> {
    type Values = T;
    fn values(&self) -> T {
        self.read()
    }
    fn for_each_source(&self, f: &mut dyn FnMut(&dyn Source)) {
        f(self)
    }
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for Cell<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.value.try_borrow() {
            Ok(value) => std::fmt::Debug::fmt(&*value, f),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}
impl<T, C> Serialize for Cell<T, C>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self.0.value.try_borrow() {
            Ok(value) => T::serialize(&*value, serializer),
            Err(_) => Err(serde::ser::Error::custom("borrowed")),
        }
    }
}
impl<'de, T> Deserialize<'de> for Cell<T>
where
    T: Deserialize<'de> + Identity,
{
    fn deserialize<D>(deserializer: D) -> Result<Cell<T>, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Cell::new)
    }
}

struct CellNode<T: 'static, C: 'static> {
    id: CellId,
    name: Option<String>,
    value: RefCell<T>,
    context: C,
    policy: Box<dyn EqualityPolicy<T>>,
    subscribers: RefCell<Vec<Subscriber<T, C>>>,
}
impl<T: 'static, C: 'static> CellNode<T, C> {
    fn push(&self, subscriber: Subscriber<T, C>) {
        self.subscribers.borrow_mut().push(subscriber);
    }
    fn remove_where(&self, f: impl Fn(&Subscriber<T, C>) -> bool) -> bool {
        // Removed subscribers are dropped after the borrow ends,
        // since dropping one may release a derived cell that unsubscribes from this cell.
        let removed = {
            let mut subscribers = self.subscribers.borrow_mut();
            let (removed, kept): (Vec<_>, Vec<_>) =
                take(&mut *subscribers).into_iter().partition(|s| f(s));
            *subscribers = kept;
            removed
        };
        !removed.is_empty()
    }
}

#[derive_ex(Clone, bound())]
enum Subscriber<T: 'static, C: 'static> {
    Observer(Observer<T, C>),
    Dependent(Dependent),
}
impl<T: 'static, C: 'static> Subscriber<T, C> {
    fn is_observer(&self, observer: &Observer<T, C>) -> bool {
        matches!(self, Subscriber::Observer(o) if o.ptr_eq(observer))
    }
    fn is_dependent(&self, dependent: &Dependent) -> bool {
        matches!(self, Subscriber::Dependent(d) if d.ptr_eq(dependent))
    }
}
