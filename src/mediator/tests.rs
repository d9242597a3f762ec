use std::rc::Rc;

use assert_call::{call, CallRecorder};

use crate::mediator::{Handler, Mediator, MediatorError, ALL_CHANNEL};

#[test]
fn new_has_all_channel() {
    let m = Mediator::<str>::new();
    assert_eq!(m.channels(), vec![ALL_CHANNEL.to_string()]);
    assert_eq!(m.handler_count(ALL_CHANNEL), 0);
}

#[test]
fn act_calls_handlers_in_order() {
    let mut cr = CallRecorder::new();
    let m = Mediator::<str>::new();
    m.on_fn("login", |p| call!("a {}", p));
    m.on_fn("login", |p| call!("b {}", p));
    m.on_fn("logout", |p| call!("c {}", p));

    assert_eq!(m.act("login", "alice"), 2);
    cr.verify(["a alice", "b alice"]);
}

#[test]
fn all_channel_receives_every_payload() {
    let mut cr = CallRecorder::new();
    let m = Mediator::<str>::new();
    m.on_fn(ALL_CHANNEL, |p| call!("all {}", p));
    m.on_fn("login", |p| call!("login {}", p));

    assert_eq!(m.act("login", "x"), 2);
    cr.verify(["login x", "all x"]);

    assert_eq!(m.act("other", "y"), 1);
    cr.verify("all y");

    assert_eq!(m.act(ALL_CHANNEL, "z"), 1);
    cr.verify("all z");
}

#[test]
fn empty_channel_name_is_all_channel() {
    let mut cr = CallRecorder::new();
    let m = Mediator::<i32>::new();
    m.on_fn("", |p| call!("{}", p));
    assert_eq!(m.handler_count(ALL_CHANNEL), 1);
    m.act("any", &1);
    cr.verify("1");
}

#[test]
fn act_unknown_channel_calls_nothing() {
    let m = Mediator::<i32>::new();
    assert_eq!(m.act("none", &1), 0);
    assert_eq!(m.channels(), vec![ALL_CHANNEL.to_string()]);
}

#[test]
fn remove_first_registration() {
    let mut cr = CallRecorder::new();
    let m = Mediator::<i32>::new();
    let h = Handler::new(|p: &i32| call!("h {}", p));
    m.on("ch", &h);
    m.on("ch", &h);

    m.remove("ch", &h);
    assert_eq!(m.handler_count("ch"), 1);
    m.act("ch", &1);
    cr.verify("h 1");

    m.remove("ch", &h);
    assert_eq!(m.handler_count("ch"), 0);
    assert_eq!(m.channels(), vec![ALL_CHANNEL.to_string(), "ch".to_string()]);
}

#[test]
fn try_remove_unknown_channel() {
    let m = Mediator::<i32>::new();
    let h = Handler::new(|_: &i32| {});
    assert_eq!(
        m.try_remove("nope", &h),
        Err(MediatorError::UnknownChannel("nope".to_string()))
    );
}

#[test]
fn try_remove_unknown_handler() {
    let m = Mediator::<i32>::new();
    m.on_fn("ch", |_| {});
    let h = Handler::new(|_: &i32| {});
    assert_eq!(
        m.try_remove("ch", &h),
        Err(MediatorError::HandlerNotFound("ch".to_string()))
    );
    assert_eq!(m.handler_count("ch"), 1);
}

#[test]
fn remove_requires_matching_context() {
    let mut cr = CallRecorder::new();
    let m = Mediator::<i32>::new();
    let ctx = Rc::new("user");
    let h = Handler::with_context(ctx.clone(), |c, p: &i32| call!("{} {}", c, p));
    m.on("ch", &h);

    let other = h.rebind(Rc::new("other"));
    assert!(!other.is_same(&h));
    m.remove("ch", &other);
    assert_eq!(m.handler_count("ch"), 1);

    let same = h.rebind(ctx);
    assert!(same.is_same(&h));
    m.act("ch", &1);
    cr.verify("user 1");
    m.remove("ch", &same);
    assert_eq!(m.handler_count("ch"), 0);
}

#[test]
fn handler_without_context_differs_from_bound_one() {
    let h = Handler::new(|_: &i32| {});
    assert!(h.is_same(&h.clone()));
    assert!(!h.is_same(&h.rebind(Rc::new(()))));
}

#[test]
fn registration_during_act_takes_effect_next_call() {
    let mut cr = CallRecorder::new();
    let m = Rc::new(Mediator::<i32>::new());
    let m0 = Rc::downgrade(&m);
    m.on_fn("ch", move |p| {
        call!("outer {}", p);
        if let Some(m) = m0.upgrade() {
            if *p == 1 {
                m.on_fn("ch", |p| call!("inner {}", p));
            }
        }
    });

    m.act("ch", &1);
    cr.verify("outer 1");
    m.act("ch", &2);
    cr.verify(["outer 2", "inner 2"]);
}

#[test]
fn debug() {
    let m = Mediator::<i32>::new();
    m.on_fn("a", |_| {});
    assert_eq!(format!("{m:?}"), r#"{"a": 1, "all": 0}"#);
}

#[test]
fn error_display() {
    assert_eq!(
        MediatorError::HandlerNotFound("x".to_string()).to_string(),
        "handler not found on channel `x`"
    );
}
