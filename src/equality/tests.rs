use std::rc::Rc;

use rstest::rstest;

use super::*;

#[rstest]
#[case(1, 1, false)]
#[case(1, 2, true)]
#[case(-0, 0, false)]
fn strict_inequality_on_integers(#[case] old: i32, #[case] new: i32, #[case] changed: bool) {
    assert_eq!(StrictInequality.is_changed(&old, &new), changed);
}

#[test]
fn strict_inequality_on_floats() {
    assert!(!StrictInequality.is_changed(&0.0_f64, &-0.0));
    assert!(StrictInequality.is_changed(&f64::NAN, &f64::NAN));
}

#[test]
fn strict_inequality_on_strings() {
    assert!(!StrictInequality.is_changed(&String::from("a"), &String::from("a")));
    assert!(StrictInequality.is_changed("a", "b"));
    assert!(!StrictInequality.is_changed(&"same", &"same"));
}

#[test]
fn strict_inequality_on_rc_uses_pointer() {
    let a = Rc::new(vec![1, 2]);
    let b = Rc::new(vec![1, 2]);
    assert!(!StrictInequality.is_changed(&a, &a.clone()));
    assert!(StrictInequality.is_changed(&a, &b));
}

#[test]
fn strict_inequality_on_vec_is_always_changed() {
    assert!(StrictInequality.is_changed(&vec![1, 2, 3], &vec![1, 2, 3]));
    assert!(StrictInequality.is_changed(&Vec::<i32>::new(), &Vec::new()));
}

#[test]
fn strict_inequality_on_option() {
    assert!(!StrictInequality.is_changed(&Some(1), &Some(1)));
    assert!(!StrictInequality.is_changed(&None::<i32>, &None));
    assert!(StrictInequality.is_changed(&Some(1), &None));
}

#[test]
fn value_eq_compares_structure() {
    assert!(!ValueEq.is_changed(&vec![1, 2, 3], &vec![1, 2, 3]));
    assert!(ValueEq.is_changed(&vec![1, 2, 3], &vec![1, 2]));
}

#[test]
fn always_changed() {
    assert!(AlwaysChanged.is_changed(&1, &1));
}

#[test]
fn changed_fn() {
    let p = ChangedFn(|a: &i32, b: &i32| (a - b).abs() > 2);
    assert!(!p.is_changed(&1, &3));
    assert!(p.is_changed(&1, &4));
}
