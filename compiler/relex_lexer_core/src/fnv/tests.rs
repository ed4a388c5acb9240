#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use proptest::prelude::*;

#[test]
fn empty_is_offset_basis() {
    assert_eq!(hash_chars(&[]), OFFSET_BASIS);
}

#[test]
fn order_matters() {
    assert_ne!(hash_str("ab"), hash_str("ba"));
}

proptest! {
    #[test]
    fn str_and_chars_agree(text in ".{0,32}") {
        let chars: Vec<char> = text.chars().collect();
        prop_assert_eq!(hash_chars(&chars), hash_str(&text));
    }
}
