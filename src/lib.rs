//! Push-based observable cells.
//!
//! A [`Cell`] holds a value and notifies its subscribers when a write changes it.
//! A [`DerivedCell`] holds a value computed from other cells and recomputes it
//! each time one of them changes.
//!
//! Propagation is synchronous: every recompute and every subscriber call caused by
//! [`Cell::write`] has finished when `write` returns.
//!
//! The [`mediator`], [`dom`], [`eventer`] and [`binder`] modules provide a publish/subscribe hub
//! and a headless document with helpers that connect cells and event handlers to its elements.

mod builder;
mod cell;
mod derived;
mod equality;
mod observer;
mod propagation;
mod source;
mod subscription;

pub mod binder;
pub mod dom;
pub mod eventer;
pub mod mediator;

pub use builder::*;
pub use cell::*;
pub use derived::*;
pub use equality::*;
pub use observer::*;
pub use propagation::{recompute_depth, MAX_RECOMPUTE_REENTRY};
pub use source::*;
pub use subscription::*;
