use sigcell::{
    binder::bind_cell,
    dom::{Document, EventListener},
    eventer::EventBinder,
    mediator::{Mediator, ALL_CHANNEL},
    *,
};
use std::{cell::RefCell, rc::Rc};

#[test]
fn calculator_page() {
    let doc = Document::new();
    let a_inputs = [doc.create_element("input"), doc.create_element("input")];
    let b_input = doc.create_element("input");
    let sum = doc.create_element("span");

    let a = Cell::new(3.0);
    let b = Cell::new(2.0);
    let c = DerivedCell::new((a.clone(), b.clone()), |(a, b)| a + b);
    for id in a_inputs {
        bind_cell(&doc, id, &a).unwrap();
    }
    bind_cell(&doc, b_input, &b).unwrap();
    bind_cell(&doc, sum, &c).unwrap();

    doc.input(a_inputs[0], "9").unwrap();
    assert_eq!(doc.value(a_inputs[1]).unwrap(), "9");
    assert_eq!(doc.content(sum).unwrap(), "11");

    doc.input(b_input, "x").unwrap();
    assert_eq!(doc.content(sum).unwrap(), "9");
}

#[test]
fn dropped_derived_cell_keeps_element_updated() {
    let doc = Document::new();
    let span = doc.create_element("span");
    let a = Cell::new(3.0);
    {
        let double = DerivedCell::new(a.clone(), |a| a * 2.0);
        bind_cell(&doc, span, &double).unwrap();
    }
    a.write(5.0);
    assert_eq!(doc.content(span).unwrap(), "10");
}

#[test]
fn button_publishes_to_mediator() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mediator = Rc::new(Mediator::<str>::new());
    let log0 = log.clone();
    mediator.on_fn("login", move |user| log0.borrow_mut().push(format!("login {user}")));
    let log0 = log.clone();
    mediator.on_fn(ALL_CHANNEL, move |p| log0.borrow_mut().push(format!("all {p}")));

    let doc = Document::new();
    let button = doc.create_element("button");
    doc.set_attribute(button, "data-bind", "login").unwrap();
    doc.set_content(button, "alice").unwrap();

    let m = mediator.clone();
    let handlers = [(
        "login".to_string(),
        EventListener::new(move |e| {
            m.act("login", &e.value);
        }),
    )];
    let (_binder, report) = EventBinder::start(handlers, &doc).unwrap();
    assert_eq!(report.bound, 1);

    doc.dispatch(button, "click").unwrap();
    assert_eq!(*log.borrow(), vec!["login alice", "all alice"]);
}
