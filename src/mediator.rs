//! A publish/subscribe hub with named channels.
//!
//! Handlers are registered on a channel and called synchronously, in registration order,
//! each time a payload is published on that channel.
//! Handlers registered on [`ALL_CHANNEL`] are called for every published payload.

use std::{any::Any, cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use derive_ex::derive_ex;
use parse_display::Display;

#[cfg(test)]
mod tests;

/// The channel whose handlers run on every [`Mediator::act`]. An empty channel name refers to it.
pub const ALL_CHANNEL: &str = "all";

#[non_exhaustive]
#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum MediatorError {
    #[display("unknown channel `{0}`")]
    UnknownChannel(String),
    #[display("handler not found on channel `{0}`")]
    HandlerNotFound(String),
}

impl std::error::Error for MediatorError {}

/// A callback together with the context it was registered with.
///
/// Two handlers are the same handler if they share both the callback and the context.
#[derive_ex(Clone, bound())]
pub struct Handler<P: ?Sized + 'static> {
    callback: Rc<dyn Fn(&P)>,
    context: Option<Rc<dyn Any>>,
}

impl<P: ?Sized + 'static> Handler<P> {
    /// Create a handler without a context.
    pub fn new(f: impl Fn(&P) + 'static) -> Self {
        Self {
            callback: Rc::new(f),
            context: None,
        }
    }

    /// Create a handler that is called with `context`.
    pub fn with_context<C: 'static>(context: Rc<C>, f: impl Fn(&C, &P) + 'static) -> Self {
        let this = context.clone();
        Self {
            callback: Rc::new(move |payload| f(&this, payload)),
            context: Some(context),
        }
    }

    /// Returns a handler with the same callback and a different context.
    ///
    /// The context is only used to tell handlers apart; the callback keeps its own.
    pub fn rebind<C: 'static>(&self, context: Rc<C>) -> Self {
        Self {
            callback: self.callback.clone(),
            context: Some(context),
        }
    }

    pub fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
            && match (&self.context, &other.context) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }

    fn call(&self, payload: &P) {
        (self.callback)(payload)
    }
}
impl<P: ?Sized> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.callback))
    }
}

pub struct Mediator<P: ?Sized + 'static> {
    channels: RefCell<BTreeMap<String, Vec<Handler<P>>>>,
}

impl<P: ?Sized + 'static> Mediator<P> {
    pub fn new() -> Self {
        let mut channels = BTreeMap::new();
        channels.insert(ALL_CHANNEL.to_string(), Vec::new());
        Self {
            channels: RefCell::new(channels),
        }
    }

    /// Registers `handler` on `channel`, creating the channel if needed.
    pub fn on(&self, channel: &str, handler: &Handler<P>) {
        let channel = channel_name(channel);
        tracing::debug!(channel, "register handler");
        self.channels
            .borrow_mut()
            .entry(channel.to_string())
            .or_default()
            .push(handler.clone());
    }

    /// Registers `f` on `channel` and returns the handler to use with [`remove`](Self::remove).
    pub fn on_fn(&self, channel: &str, f: impl Fn(&P) + 'static) -> Handler<P> {
        let handler = Handler::new(f);
        self.on(channel, &handler);
        handler
    }

    /// Removes the first registration of `handler` from `channel`.
    pub fn try_remove(&self, channel: &str, handler: &Handler<P>) -> Result<(), MediatorError> {
        let channel = channel_name(channel);
        let removed = {
            let mut channels = self.channels.borrow_mut();
            let handlers = channels
                .get_mut(channel)
                .ok_or_else(|| MediatorError::UnknownChannel(channel.to_string()))?;
            let index = handlers
                .iter()
                .position(|h| h.is_same(handler))
                .ok_or_else(|| MediatorError::HandlerNotFound(channel.to_string()))?;
            handlers.remove(index)
        };
        drop(removed);
        tracing::debug!(channel, "remove handler");
        Ok(())
    }

    /// Removes the first registration of `handler` from `channel`.
    ///
    /// An invalid request is logged and ignored.
    pub fn remove(&self, channel: &str, handler: &Handler<P>) {
        if let Err(e) = self.try_remove(channel, handler) {
            tracing::warn!(error = %e, "mediator remove ignored");
        }
    }

    /// Calls the handlers of `channel` with `payload`, then the handlers of [`ALL_CHANNEL`].
    ///
    /// Handlers registered or removed by a handler take effect from the next call.
    /// Returns the number of handlers called.
    pub fn act(&self, channel: &str, payload: &P) -> usize {
        let channel = channel_name(channel);
        let handlers = {
            let channels = self.channels.borrow();
            let mut handlers = channels.get(channel).cloned().unwrap_or_default();
            if channel != ALL_CHANNEL {
                if let Some(all) = channels.get(ALL_CHANNEL) {
                    handlers.extend(all.iter().cloned());
                }
            }
            handlers
        };
        if handlers.is_empty() {
            tracing::debug!(channel, "no handlers");
        }
        for handler in &handlers {
            handler.call(payload);
        }
        handlers.len()
    }

    pub fn handler_count(&self, channel: &str) -> usize {
        self.channels
            .borrow()
            .get(channel_name(channel))
            .map_or(0, |h| h.len())
    }

    /// Returns the names of the known channels in sorted order.
    pub fn channels(&self) -> Vec<String> {
        self.channels.borrow().keys().cloned().collect()
    }
}
impl<P: ?Sized + 'static> Default for Mediator<P> {
    fn default() -> Self {
        Self::new()
    }
}
impl<P: ?Sized + 'static> fmt::Debug for Mediator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.channels.try_borrow() {
            Ok(channels) => f
                .debug_map()
                .entries(channels.iter().map(|(k, v)| (k, v.len())))
                .finish(),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}

fn channel_name(channel: &str) -> &str {
    if channel.is_empty() {
        ALL_CHANNEL
    } else {
        channel
    }
}
