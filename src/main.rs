use std::rc::Rc;

use sigcell::{
    binder::bind_cell,
    dom::{Document, EventListener},
    eventer::EventBinder,
    mediator::{Handler, Mediator, ALL_CHANNEL},
    Cell, DerivedCell,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    sum();
    arrays();
    users();
    mediator();
    page()?;
    Ok(())
}

fn sum() {
    let a = Cell::new(3);
    let b = Cell::new(2);
    let c = DerivedCell::new((a.clone(), b.clone()), |(a, b)| a + b);
    println!("a = {}, b = {}, c = {}", a.read(), b.read(), c.read());
    a.write(9);
    println!("a = {}, b = {}, c = {}", a.read(), b.read(), c.read());
}

fn arrays() {
    let x = Cell::new(vec![1, 2]);
    let y = Cell::new(vec![3]);
    let z = DerivedCell::new((x.clone(), y.clone()), |(mut x, y)| {
        x.extend(y);
        x
    });
    println!("x = {:?}, y = {:?}, z = {:?}", x, y, z);
    x.write(vec![7]);
    println!("x = {:?}, y = {:?}, z = {:?}", x, y, z);
}

struct User {
    name: &'static str,
}

fn users() {
    let u1 = Cell::new(Rc::new(User { name: "alice" }));
    let u2 = Cell::new(Rc::new(User { name: "bob" }));
    let check = DerivedCell::new((u1.clone(), u2.clone()), |(u1, u2)| {
        if u1.name == u2.name {
            "same user"
        } else {
            "different user"
        }
    });
    check.subscribe_fn(|_, v| println!("check changed: {v}"));
    println!("{} / {}: {}", u1.borrow().name, u2.borrow().name, check.read());
    u2.write(Rc::new(User { name: "alice" }));
    println!("{} / {}: {}", u1.borrow().name, u2.borrow().name, check.read());
}

fn mediator() {
    let m = Mediator::<str>::new();
    let session = Rc::new("session");
    let login = Handler::with_context(session, |ctx, user: &str| {
        println!("{ctx}: {user} logged in")
    });
    m.on("login", &login);
    m.on_fn(ALL_CHANNEL, |p| println!("audit: {p}"));
    m.act("login", "alice");
    m.remove("login", &login);
    m.act("login", "bob");
    m.remove("login", &login);
}

fn page() -> Result<(), Box<dyn std::error::Error>> {
    let doc = Document::new();
    let a_input = doc.create_element("input");
    let b_input = doc.create_element("input");
    let total = doc.create_element("span");
    let reset = doc.create_element("button");
    doc.set_attribute(reset, "data-bind", "reset")?;
    doc.set_attribute(reset, "data-event", "click|keyup")?;

    let a = Cell::new(3.0);
    let b = Cell::new(2.0);
    let c = DerivedCell::new((a.clone(), b.clone()), |(a, b)| a + b);
    bind_cell(&doc, a_input, &a)?;
    bind_cell(&doc, b_input, &b)?;
    bind_cell(&doc, total, &c)?;

    let (a0, b0) = (a.clone(), b.clone());
    let handlers = [(
        "reset".to_string(),
        EventListener::new(move |_| {
            a0.write(0.0);
            b0.write(0.0);
        }),
    )];
    EventBinder::start(handlers, &doc)?;

    println!("total = {}", doc.content(total)?);
    doc.input(a_input, "9")?;
    println!("total = {}", doc.content(total)?);
    doc.input(b_input, "1.5 apples")?;
    println!("total = {}", doc.content(total)?);
    doc.dispatch(reset, "keyup")?;
    println!("total = {}", doc.content(total)?);
    Ok(())
}
