#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn repeated_text_gets_one_name() {
    let interner = StringInterner::new();
    let a = interner.try_intern("widget").unwrap();
    let b = interner.try_intern("widget").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, interner.try_intern("gadget").unwrap());
    assert_eq!(interner.lookup(a).as_deref(), Some("widget"));
    assert_eq!(interner.len(), 3);
}

#[test]
fn empty_string_is_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.try_intern(""), Ok(Name::EMPTY));
    assert_eq!(interner.len(), 1);
}

#[test]
fn interned_text_shares_one_allocation() {
    let interner = SharedInterner::new();
    let first = interner.intern("count");
    let second = interner.intern("count");
    assert!(Arc::ptr_eq(
        first.as_shared().unwrap(),
        second.as_shared().unwrap()
    ));
}

#[test]
fn text_is_freed_with_its_last_holder() {
    let interner = SharedInterner::new();
    let text = interner.intern("transient_name");
    let weak = Arc::downgrade(text.as_shared().unwrap());
    let other_session = interner.clone();

    drop(interner);
    assert!(weak.upgrade().is_some());
    drop(other_session);
    assert!(weak.upgrade().is_some());
    drop(text);
    assert!(weak.upgrade().is_none());
}

#[test]
fn names_from_another_interner_do_not_resolve() {
    let small = StringInterner::new();
    let big = StringInterner::new();
    let name = big.try_intern("only_here").unwrap();
    assert_eq!(small.lookup(name), None);
}

#[test]
fn concurrent_sessions_agree_on_names() {
    let interner = SharedInterner::new();
    let names: Vec<Vec<Name>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let interner = interner.clone();
                s.spawn(move || {
                    ["alpha", "beta", "gamma", "delta"]
                        .iter()
                        .map(|text| interner.try_intern(text).unwrap())
                        .collect::<Vec<Name>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(names.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(interner.len(), 5);
}
