//! A headless document: elements with a tag, attributes, text and event listeners.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

use derive_ex::derive_ex;
use parse_display::Display;
use slabmap::SlabMap;


/// Tags of elements that hold an editable `value` instead of text content.
pub const INPUT_TAGS: &[&str] = &["input", "textarea", "select"];

#[derive(Clone, Copy, Display, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("<{0}>")]
pub struct ElementId(usize);

#[non_exhaustive]
#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[display("unknown element {0}")]
    UnknownElement(ElementId),
}

impl std::error::Error for DomError {}

/// An event delivered to the listeners of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_type: String,
    pub target: ElementId,
    /// The `value` of an input element or the text content of any other element,
    /// taken when the event is dispatched.
    pub value: String,
}

/// An event listener with reference identity.
#[derive_ex(Clone)]
pub struct EventListener(Rc<dyn Fn(&Event)>);

impl EventListener {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}
impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventListener({:p})", Rc::as_ptr(&self.0))
    }
}

/// A shared handle to a document.
///
/// Listeners run without any borrow of the document held, so they may read and modify it.
#[derive(Default)]
#[derive_ex(Clone)]
pub struct Document(Rc<RefCell<DocumentData>>);

/// A handle that does not keep the document alive.
#[derive_ex(Clone)]
pub struct WeakDocument(Weak<RefCell<DocumentData>>);

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.0.upgrade().map(Document)
    }
}

#[derive(Default)]
struct DocumentData {
    elements: SlabMap<Element>,
    next_seq: u64,
}

struct Element {
    seq: u64,
    tag: String,
    attributes: BTreeMap<String, String>,
    content: String,
    value: String,
    listeners: Vec<(String, EventListener)>,
}
impl Element {
    fn is_input(&self) -> bool {
        INPUT_TAGS.contains(&self.tag.as_str())
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument(Rc::downgrade(&self.0))
    }

    /// Appends a new element; the tag is stored in lowercase.
    pub fn create_element(&self, tag: &str) -> ElementId {
        let mut d = self.0.borrow_mut();
        let seq = d.next_seq;
        d.next_seq += 1;
        ElementId(d.elements.insert(Element {
            seq,
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            content: String::new(),
            value: String::new(),
            listeners: Vec::new(),
        }))
    }
    pub fn remove_element(&self, id: ElementId) -> Result<(), DomError> {
        self.0
            .borrow_mut()
            .elements
            .remove(id.0)
            .map(|_| ())
            .ok_or(DomError::UnknownElement(id))
    }
    pub fn contains(&self, id: ElementId) -> bool {
        self.0.borrow().elements.contains_key(id.0)
    }
    pub fn len(&self) -> usize {
        self.0.borrow().elements.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tag(&self, id: ElementId) -> Result<String, DomError> {
        self.with(id, |e| e.tag.clone())
    }
    /// Returns `true` for elements whose tag is one of [`INPUT_TAGS`].
    pub fn is_input(&self, id: ElementId) -> Result<bool, DomError> {
        self.with(id, |e| e.is_input())
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Result<Option<String>, DomError> {
        self.with(id, |e| e.attributes.get(name).cloned())
    }
    pub fn has_attribute(&self, id: ElementId, name: &str) -> Result<bool, DomError> {
        self.with(id, |e| e.attributes.contains_key(name))
    }
    pub fn set_attribute(&self, id: ElementId, name: &str, value: &str) -> Result<(), DomError> {
        self.with_mut(id, |e| {
            e.attributes.insert(name.to_string(), value.to_string());
        })
    }
    pub fn remove_attribute(&self, id: ElementId, name: &str) -> Result<Option<String>, DomError> {
        self.with_mut(id, |e| e.attributes.remove(name))
    }

    pub fn content(&self, id: ElementId) -> Result<String, DomError> {
        self.with(id, |e| e.content.clone())
    }
    pub fn set_content(&self, id: ElementId, content: &str) -> Result<(), DomError> {
        self.with_mut(id, |e| content.clone_into(&mut e.content))
    }
    pub fn value(&self, id: ElementId) -> Result<String, DomError> {
        self.with(id, |e| e.value.clone())
    }
    pub fn set_value(&self, id: ElementId, value: &str) -> Result<(), DomError> {
        self.with_mut(id, |e| value.clone_into(&mut e.value))
    }

    /// Returns the elements carrying the attribute `name`, in creation order.
    pub fn elements_with_attribute(&self, name: &str) -> Vec<ElementId> {
        let d = self.0.borrow();
        let mut items: Vec<_> = d
            .elements
            .iter()
            .filter(|(_, e)| e.attributes.contains_key(name))
            .map(|(key, e)| (e.seq, ElementId(key)))
            .collect();
        items.sort_unstable();
        items.into_iter().map(|(_, id)| id).collect()
    }

    pub fn add_event_listener(
        &self,
        id: ElementId,
        event_type: &str,
        listener: &EventListener,
    ) -> Result<(), DomError> {
        self.with_mut(id, |e| {
            e.listeners.push((event_type.to_string(), listener.clone()));
        })
    }
    /// Removes every registration of `listener` for `event_type`.
    pub fn remove_event_listener(
        &self,
        id: ElementId,
        event_type: &str,
        listener: &EventListener,
    ) -> Result<bool, DomError> {
        self.with_mut(id, |e| {
            let len = e.listeners.len();
            e.listeners
                .retain(|(t, l)| !(t == event_type && l.ptr_eq(listener)));
            e.listeners.len() != len
        })
    }
    pub fn listener_count(&self, id: ElementId, event_type: &str) -> Result<usize, DomError> {
        self.with(id, |e| {
            e.listeners.iter().filter(|(t, _)| t == event_type).count()
        })
    }

    /// Calls the listeners of `event_type` on the element in registration order.
    ///
    /// Returns the number of listeners called.
    pub fn dispatch(&self, id: ElementId, event_type: &str) -> Result<usize, DomError> {
        let (event, listeners) = self.with(id, |e| {
            let event = Event {
                event_type: event_type.to_string(),
                target: id,
                value: if e.is_input() {
                    e.value.clone()
                } else {
                    e.content.clone()
                },
            };
            let listeners: Vec<_> = e
                .listeners
                .iter()
                .filter(|(t, _)| t == event_type)
                .map(|(_, l)| l.clone())
                .collect();
            (event, listeners)
        })?;
        tracing::trace!(element = %id, event_type, listeners = listeners.len(), "dispatch");
        for listener in &listeners {
            listener.call(&event);
        }
        Ok(listeners.len())
    }

    /// Sets the value of an element as if the user edited it, then dispatches `input`.
    pub fn input(&self, id: ElementId, value: &str) -> Result<usize, DomError> {
        self.set_value(id, value)?;
        self.dispatch(id, "input")
    }

    fn with<U>(&self, id: ElementId, f: impl FnOnce(&Element) -> U) -> Result<U, DomError> {
        let d = self.0.borrow();
        let e = d.elements.get(id.0).ok_or(DomError::UnknownElement(id))?;
        Ok(f(e))
    }
    fn with_mut<U>(
        &self,
        id: ElementId,
        f: impl FnOnce(&mut Element) -> U,
    ) -> Result<U, DomError> {
        let mut d = self.0.borrow_mut();
        let e = d.elements.get_mut(id.0).ok_or(DomError::UnknownElement(id))?;
        Ok(f(e))
    }
}
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(d) => f
                .debug_list()
                .entries(d.elements.iter().map(|(key, e)| (ElementId(key), &e.tag)))
                .finish(),
            Err(_) => write!(f, "<borrowed>"),
        }
    }
}
