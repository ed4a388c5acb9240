#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use relex_ir::SharedInterner;

use super::*;
use crate::SourceText;

fn window(text: &SourceText, capacity: usize) -> TextWindow<'_> {
    TextWindow::with_capacity(text, capacity, SharedInterner::new())
}

// === Reads ===

#[test]
fn reads_past_end_return_sentinel() {
    let text = SourceText::new("ab");
    let mut w = window(&text, 16);
    assert_eq!(w.char_at(0), 'a');
    assert_eq!(w.char_at(1), 'b');
    assert_eq!(w.char_at(2), INVALID_CHAR);
    assert_eq!(w.char_at(u32::MAX), INVALID_CHAR);
}

#[test]
fn empty_document_never_loads() {
    let text = SourceText::new("");
    let mut w = window(&text, 16);
    assert_eq!(w.peek(), INVALID_CHAR);
    assert!(w.is_really_at_end());
    assert_eq!(w.chunk_loads(), 0);
}

#[test]
fn first_read_loads_lazily() {
    let text = SourceText::new("hello");
    let mut w = window(&text, 16);
    assert_eq!(w.chunk_loads(), 0);
    assert_eq!(w.next_char(), 'h');
    assert_eq!(w.next_char(), 'e');
    assert_eq!(w.chunk_loads(), 1);
    assert_eq!(w.position(), 2);
}

#[test]
fn reload_at_document_offset_3000() {
    let source: String = (0..5000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let text = SourceText::new(&source);
    let mut w = window(&text, 2048);

    w.reset(3000);
    assert_eq!(w.chunk_loads(), 1);

    for pos in 3000..5048 {
        let expected = if pos < 5000 {
            char::from(b'a' + (pos % 26) as u8)
        } else {
            INVALID_CHAR
        };
        assert_eq!(w.char_at(pos), expected);
    }
    assert_eq!(w.chunk_loads(), 1);

    // Leaving the loaded range triggers the next reload.
    assert_eq!(w.char_at(2999), char::from(b'a' + (2999 % 26) as u8));
    assert_eq!(w.chunk_loads(), 2);
}

#[test]
fn reset_inside_chunk_does_not_reload() {
    let text = SourceText::new("0123456789");
    let mut w = window(&text, 16);
    w.reset(2);
    assert_eq!(w.chunk_loads(), 1);
    w.reset(7);
    assert_eq!(w.peek(), '7');
    assert_eq!(w.chunk_loads(), 1);
}

#[test]
fn reset_is_clamped() {
    let text = SourceText::new("abc");
    let mut w = window(&text, 16);
    w.reset(10);
    assert_eq!(w.position(), 3);
    assert!(w.is_really_at_end());
    assert_eq!(w.lexeme_start(), 3);
}

#[test]
fn advance_stops_at_end() {
    let text = SourceText::new("abc");
    let mut w = window(&text, 16);
    w.advance_by(10);
    assert_eq!(w.position(), 3);
    assert_eq!(w.next_char(), INVALID_CHAR);
    assert_eq!(w.position(), 3);
}

#[test]
fn newline_width_uses_lookahead() {
    let text = SourceText::new("\r\nx\ry\n");
    let mut w = window(&text, 16);
    assert_eq!(w.current_newline_width(), 2);
    w.reset(3);
    assert_eq!(w.current_newline_width(), 1);
    w.reset(5);
    assert_eq!(w.current_newline_width(), 1);
}

// === Text ===

#[test]
fn common_lexemes_are_constants() {
    let text = SourceText::new(" \n\r\n// x");
    let mut w = window(&text, 16);
    assert!(matches!(w.get_text(0, 0, false), TokenText::Static("")));
    assert!(matches!(w.get_text(0, 1, false), TokenText::Static(" ")));
    assert!(matches!(w.get_text(1, 1, false), TokenText::Static("\n")));
    assert!(matches!(w.get_text(2, 2, false), TokenText::Static("\r\n")));
    assert!(matches!(w.get_text(4, 2, false), TokenText::Static("//")));
    assert!(matches!(w.get_text(4, 3, false), TokenText::Static("// ")));
}

#[test]
fn interned_text_is_shared() {
    let text = SourceText::new("value value");
    let mut w = window(&text, 16);
    let a = w.get_text(0, 5, true);
    let b = w.get_text(6, 5, true);
    match (a, b) {
        (TokenText::Shared(a), TokenText::Shared(b)) => {
            assert_eq!(&*a, "value");
            assert!(Arc::ptr_eq(&a, &b));
        }
        other => panic!("expected interned text, got {other:?}"),
    }
}

#[test]
fn uninterned_text_is_owned() {
    let text = SourceText::new("value");
    let mut w = window(&text, 16);
    assert!(matches!(w.get_text(0, 5, false), TokenText::Owned(ref s) if s == "value"));
}

#[test]
fn text_straddling_chunk_comes_from_document() {
    let text = SourceText::new("abcdefghij");
    let mut w = window(&text, 4);
    w.reset(0);
    assert_eq!(w.get_text(2, 6, false), "cdefgh");
    assert_eq!(w.chunk_loads(), 1);
}

#[test]
fn lexeme_tracking() {
    let text = SourceText::new("int x");
    let mut w = window(&text, 16);
    w.start_lexeme();
    w.advance_by(3);
    assert_eq!(w.width(), 3);
    assert_eq!(w.lexeme_text(false), "int");
}

#[test]
fn chunk_slice_reloads_for_spans_past_chunk_end() {
    let text = SourceText::new("abcdefghij");
    let mut w = window(&text, 4);
    assert_eq!(w.chunk_slice(0, 3).unwrap(), &['a', 'b', 'c']);
    assert_eq!(w.chunk_slice(2, 4).unwrap(), &['c', 'd', 'e', 'f']);
    assert!(w.chunk_slice(0, 5).is_none());
    assert!(w.chunk_slice(8, 3).is_none());
    assert_eq!(w.chunk_slice(10, 0).unwrap(), &[] as &[char]);
}

#[test]
fn chunks_return_to_pool() {
    let text = SourceText::new("abc");
    // A capacity no other test uses, so the pool check is not racy.
    let capacity = 4099;
    drop(window(&text, capacity));
    let w = window(&text, capacity);
    assert_eq!(w.capacity(), capacity);
}

proptest! {
    #[test]
    fn window_agrees_with_document(
        source in "[a-z \n]{0,200}",
        capacity in 1usize..40,
        reads in prop::collection::vec(0u32..220, 1..50),
    ) {
        let text = SourceText::new(&source);
        let chars: Vec<char> = source.chars().collect();
        let mut w = window(&text, capacity);
        for pos in reads {
            let expected = chars.get(pos as usize).copied().unwrap_or(INVALID_CHAR);
            prop_assert_eq!(w.char_at(pos), expected);
        }
    }
}
