#![allow(dead_code)]

use sigcell::*;
use std::{cell::RefCell, rc::Rc};

pub struct Recorder<T> {
    rc: Rc<RefCell<Vec<T>>>,
    unsubscribe: Subscription,
}

pub fn record<T: Clone + 'static, C: 'static>(s: &Cell<T, C>) -> Recorder<T> {
    let rc = Rc::new(RefCell::new(Vec::new()));
    let r = rc.clone();
    let unsubscribe = s.subscribe_scoped(move |_, x| r.borrow_mut().push(x.clone()));
    Recorder { rc, unsubscribe }
}
pub fn record_derived<T: Clone + 'static, C: 'static>(s: &DerivedCell<T, C>) -> Recorder<T> {
    let rc = Rc::new(RefCell::new(Vec::new()));
    let r = rc.clone();
    let unsubscribe = s.subscribe_scoped(move |_, x| r.borrow_mut().push(x.clone()));
    Recorder { rc, unsubscribe }
}
impl<T> Recorder<T> {
    pub fn finish(self) -> Vec<T> {
        let Recorder { rc, unsubscribe } = self;
        drop(unsubscribe);
        if let Ok(cell) = Rc::try_unwrap(rc) {
            cell.into_inner()
        } else {
            panic!("subscriber is still registered.");
        }
    }
}
