//! Attaches named event handlers to the elements of a [`Document`] that ask for them.
//!
//! An element opts in with attributes:
//!
//! - `data-bind`: the name of the handler.
//! - `data-event`: the event types, separated by `|`. Defaults to `click`.
//!
//! Bound elements are marked with `data-binded="true"` and are skipped by later passes.

use std::collections::HashMap;

use crate::dom::{Document, DomError, EventListener};


pub const BIND_ATTRIBUTE: &str = "data-bind";
pub const EVENT_ATTRIBUTE: &str = "data-event";
pub const BOUND_ATTRIBUTE: &str = "data-binded";
pub const DEFAULT_EVENT: &str = "click";

/// The outcome of [`EventBinder::bind_events`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Number of elements that were bound by this pass.
    pub bound: usize,
    /// Number of elements skipped because they were already bound.
    pub skipped: usize,
    /// Handler names that were requested by an element but are not registered.
    pub missing: Vec<String>,
}

pub struct EventBinder {
    handlers: HashMap<String, EventListener>,
}

impl EventBinder {
    pub fn new(handlers: impl IntoIterator<Item = (String, EventListener)>) -> Self {
        Self {
            handlers: handlers.into_iter().collect(),
        }
    }

    /// Creates a binder and binds the events of `document` at once.
    pub fn start(
        handlers: impl IntoIterator<Item = (String, EventListener)>,
        document: &Document,
    ) -> Result<(Self, BindReport), DomError> {
        let this = Self::new(handlers);
        let report = this.bind_events(document)?;
        Ok((this, report))
    }

    pub fn handler(&self, name: &str) -> Option<&EventListener> {
        self.handlers.get(name)
    }

    /// Attaches handlers to every element carrying [`BIND_ATTRIBUTE`] that is not bound yet.
    pub fn bind_events(&self, document: &Document) -> Result<BindReport, DomError> {
        let mut report = BindReport::default();
        for id in document.elements_with_attribute(BIND_ATTRIBUTE) {
            if document.has_attribute(id, BOUND_ATTRIBUTE)? {
                report.skipped += 1;
                continue;
            }
            let name = document.attribute(id, BIND_ATTRIBUTE)?.unwrap_or_default();
            let Some(handler) = self.handlers.get(&name) else {
                tracing::warn!(element = %id, handler = %name, "event handler is not registered");
                report.missing.push(name);
                continue;
            };
            let events = document.attribute(id, EVENT_ATTRIBUTE)?;
            for event_type in event_types(events.as_deref()) {
                document.add_event_listener(id, event_type, handler)?;
                tracing::debug!(element = %id, handler = %name, event_type, "bind event");
            }
            document.set_attribute(id, BOUND_ATTRIBUTE, "true")?;
            report.bound += 1;
        }
        Ok(report)
    }
}

/// Splits a `|`-delimited list of event types, falling back to [`DEFAULT_EVENT`].
pub fn event_types(value: Option<&str>) -> Vec<&str> {
    let types: Vec<_> = value
        .unwrap_or_default()
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if types.is_empty() {
        vec![DEFAULT_EVENT]
    } else {
        types
    }
}
