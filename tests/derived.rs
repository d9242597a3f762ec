mod test_utils;

use self::test_utils::*;
use sigcell::*;
use std::rc::Rc;

#[test]
fn sum_of_two_cells() {
    let a = Cell::new(3);
    let b = Cell::new(2);
    let c = DerivedCell::new((a.clone(), b.clone()), |(a, b)| a + b);
    assert_eq!(c.read(), 5);

    a.write(9);
    assert_eq!(c.read(), 11);
}

#[test]
fn initial_value_is_computed_from_dependencies() {
    let x = Cell::new(vec![1, 2]);
    let y = Cell::new(vec![3]);
    let z = DerivedCell::new((x.clone(), y.clone()), |(x, y)| {
        let mut v = x;
        v.extend(y);
        v
    });
    assert_eq!(z.read(), vec![1, 2, 3]);

    y.write(vec![4, 5]);
    assert_eq!(z.read(), vec![1, 2, 4, 5]);
}

#[test]
fn chain_propagates_to_the_end() {
    let root = Cell::new(1);
    let a = DerivedCell::new(root.clone(), |r| r + 1);
    let b = DerivedCell::new(a.clone(), |a| a * 10);
    let r = record_derived(&b);
    root.write(2);
    root.write(3);

    assert_eq!(r.finish(), vec![30, 40]);
    assert_eq!(a.read(), 4);
}

#[test]
fn diamond_records_both_recomputes() {
    let r = Cell::new(1);
    let a = DerivedCell::new(r.clone(), |r| r + 1);
    let b = DerivedCell::new(r.clone(), |r| r * 2);
    let c = DerivedCell::new((a, b), |(a, b)| a + b);
    let rec = record_derived(&c);
    r.write(2);

    assert_eq!(rec.finish(), vec![5, 7]);
}

#[test]
fn same_user_check() {
    #[derive(Debug)]
    struct User {
        name: &'static str,
    }
    let u1 = Cell::new(Rc::new(User { name: "alice" }));
    let u2 = Cell::new(Rc::new(User { name: "bob" }));
    let check = DerivedCell::new((u1.clone(), u2.clone()), |(u1, u2)| {
        if u1.name == u2.name {
            "same user"
        } else {
            "different user"
        }
    });
    let r = record_derived(&check);
    assert_eq!(check.read(), "different user");

    u2.write(Rc::new(User { name: "alice" }));
    u1.write(Rc::new(User { name: "alice" }));

    assert_eq!(r.finish(), vec!["same user"]);
}

#[test]
fn dropped_handle_keeps_propagating() {
    let a = Cell::new(1);
    let d = DerivedCell::new(a.clone(), |a| a + 1);
    let r = record_derived(&d);
    drop(d);
    a.write(2);
    a.write(3);

    assert_eq!(r.finish(), vec![3, 4]);
    assert_eq!(a.subscriber_count(), 1);
}

#[test]
fn detach_releases_dependencies() {
    let a = Cell::new(1);
    let d = DerivedCell::new(a.clone(), |a| a + 1);
    let r = record_derived(&d);
    a.write(2);
    assert!(d.detach());
    a.write(3);

    assert_eq!(r.finish(), vec![3]);
    assert_eq!(a.subscriber_count(), 0);
    assert_eq!(d.read(), 3);
}

#[test]
fn observer_write_back_settles() {
    let r = Cell::new(1);
    let s = Cell::new(0);
    let d = DerivedCell::new((r.clone(), s.clone()), |(r, s)| r + s);
    let rec = record_derived(&d);
    let s0 = s.clone();
    d.subscribe_fn(move |_, v| {
        if *v > 10 {
            s0.write(0);
        }
    });
    s.write(20);

    assert_eq!(rec.finish(), vec![21, 1]);
    assert_eq!(d.read(), 1);
}
