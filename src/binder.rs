//! Keeps elements of a [`Document`] in sync with cells.
//!
//! An input element shows the cell in its `value` and, when the cell is writable,
//! writes edits back to it. Any other element shows the cell as its text content.

use crate::{
    dom::{Document, DomError, ElementId, EventListener, WeakDocument},
    Cell, DerivedCell,
};


/// Conversion between a cell value and the text of an element.
pub trait BindValue: Sized + 'static {
    fn to_text(&self) -> String;
    fn from_text(text: &str) -> Self;
}

impl BindValue for String {
    fn to_text(&self) -> String {
        self.clone()
    }
    fn from_text(text: &str) -> Self {
        text.to_string()
    }
}

macro_rules! impl_bind_value_float {
    ($($t:ty),*) => {
        $(
            impl BindValue for $t {
                fn to_text(&self) -> String {
                    self.to_string()
                }
                fn from_text(text: &str) -> Self {
                    parse_float_prefix(text).unwrap_or(0.0) as $t
                }
            }
        )*
    };
}
impl_bind_value_float!(f32, f64);

macro_rules! impl_bind_value_int {
    ($($t:ty),*) => {
        $(
            impl BindValue for $t {
                fn to_text(&self) -> String {
                    self.to_string()
                }
                fn from_text(text: &str) -> Self {
                    match parse_float_prefix(text) {
                        Some(value) if value.is_finite() => value.trunc() as $t,
                        _ => 0,
                    }
                }
            }
        )*
    };
}
impl_bind_value_int!(i32, i64);

/// Parses the longest prefix of `text` that forms a decimal number.
///
/// Leading whitespace is skipped. `Infinity` with an optional sign is accepted.
/// Returns `None` if no number starts the text.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        let inf = f64::INFINITY;
        return Some(if b[0] == b'-' { -inf } else { inf });
    }
    let int_start = i;
    while b.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;
    if b.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while b.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while b.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    s[..i].parse().ok()
}

/// A cell that can be shown by an element.
pub trait BindTarget<T: BindValue> {
    fn current(&self) -> T;
    fn observe(&self, f: impl Fn(&T) + 'static);

    /// Returns a function that stores an edited value, or `None` for a read-only cell.
    fn writer(&self) -> Option<Box<dyn Fn(T)>>;
}

impl<T: BindValue + Clone, C: 'static> BindTarget<T> for Cell<T, C> {
    fn current(&self) -> T {
        self.read()
    }
    fn observe(&self, f: impl Fn(&T) + 'static) {
        self.subscribe_fn(move |_, value| f(value));
    }
    fn writer(&self) -> Option<Box<dyn Fn(T)>> {
        let this = self.clone();
        Some(Box::new(move |value| {
            this.write(value);
        }))
    }
}

impl<T: BindValue + Clone, C: 'static> BindTarget<T> for DerivedCell<T, C> {
    fn current(&self) -> T {
        self.read()
    }
    fn observe(&self, f: impl Fn(&T) + 'static) {
        self.subscribe_fn(move |_, value| f(value));
    }
    fn writer(&self) -> Option<Box<dyn Fn(T)>> {
        None
    }
}

/// Shows `target` in element `id` and keeps it up to date.
///
/// The binding holds the document weakly and lasts as long as the cell.
/// A bound `DerivedCell` keeps updating the element after its handle is dropped.
pub fn bind_cell<T: BindValue>(
    document: &Document,
    id: ElementId,
    target: &impl BindTarget<T>,
) -> Result<(), DomError> {
    let is_input = document.is_input(id)?;
    show(document, id, is_input, &target.current().to_text())?;

    let weak = document.downgrade();
    target.observe(move |value| refresh(&weak, id, is_input, value));

    if is_input {
        if let Some(write) = target.writer() {
            let listener = EventListener::new(move |event| write(T::from_text(&event.value)));
            document.add_event_listener(id, "input", &listener)?;
        }
    }
    tracing::debug!(element = %id, is_input, "bind cell");
    Ok(())
}

fn show(document: &Document, id: ElementId, is_input: bool, text: &str) -> Result<(), DomError> {
    if is_input {
        document.set_value(id, text)
    } else {
        document.set_content(id, text)
    }
}

fn refresh<T: BindValue>(document: &WeakDocument, id: ElementId, is_input: bool, value: &T) {
    let Some(document) = document.upgrade() else {
        return;
    };
    if let Err(e) = show(&document, id, is_input, &value.to_text()) {
        tracing::warn!(error = %e, "bound element is gone");
    }
}
