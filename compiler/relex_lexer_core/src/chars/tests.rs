#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::INVALID_CHAR;

#[test]
fn sentinel_is_in_no_class() {
    assert!(!is_whitespace(INVALID_CHAR));
    assert!(!is_newline(INVALID_CHAR));
    assert!(!is_identifier_start(INVALID_CHAR));
    assert!(!is_identifier_part(INVALID_CHAR));
    assert!(!is_hex_digit(INVALID_CHAR));
}

#[test]
fn crlf_is_one_terminator() {
    assert_eq!(newline_width('\r', '\n'), 2);
    assert_eq!(newline_width('\r', 'x'), 1);
    assert_eq!(newline_width('\n', '\r'), 1);
    assert_eq!(newline_width('\u{2028}', '\n'), 1);
}

#[test]
fn identifiers_accept_unicode_letters() {
    assert!(is_identifier_start('é'));
    assert!(is_identifier_start('_'));
    assert!(!is_identifier_start('1'));
    assert!(is_identifier_part('1'));
}

#[test]
fn hex_values() {
    assert_eq!(hex_value('0'), Some(0));
    assert_eq!(hex_value('a'), Some(10));
    assert_eq!(hex_value('F'), Some(15));
    assert_eq!(hex_value('g'), None);
}
