#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Whole-session behavior of the token stream.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use relex_ir::{Span, SyntaxKind, TextEdit};
use relex_lexer::{Lexer, LexerOptions};
use relex_lexer_core::SourceText;

use crate::test_support::{blend, fresh, Emitted};
use crate::{IncrementalStats, TokenStream};

fn kinds_and_texts(tokens: &[Emitted]) -> Vec<(SyntaxKind, String)> {
    tokens.iter().map(|t| (t.kind, t.text.clone())).collect()
}

#[test]
fn without_a_tree_everything_is_lexed() {
    let doc = SourceText::new("#if A\nX\n#endif\nY");
    let mut lexer = Lexer::new(&doc, LexerOptions::default());
    let mut stream = TokenStream::new(&mut lexer, None, &[]).unwrap();
    let tokens: Vec<Emitted> = stream.by_ref().map(|b| Emitted::from(&b)).collect();

    assert_eq!(
        kinds_and_texts(&tokens),
        vec![
            (SyntaxKind::IdentifierToken, "Y".to_owned()),
            (SyntaxKind::EndOfFileToken, String::new())
        ]
    );
    assert!(tokens.iter().all(|t| !t.reused));
    assert_eq!(tokens[0].full_text, "#if A\nX\n#endif\nY");
    assert!(stream.blender().directives().is_empty());
    assert_eq!(stream.stats().reused_count, 0);
    assert_eq!(stream.stats().relexed_count, 2);
}

#[test]
fn stream_ends_after_end_of_file() {
    let doc = SourceText::new("a");
    let mut lexer = Lexer::new(&doc, LexerOptions::default());
    let mut stream = TokenStream::new(&mut lexer, None, &[]).unwrap();
    assert_eq!(stream.next().map(|b| b.kind()), Some(SyntaxKind::IdentifierToken));
    assert_eq!(stream.next().map(|b| b.kind()), Some(SyntaxKind::EndOfFileToken));
    assert!(stream.next().is_none());
    assert!(stream.next().is_none());
}

#[test]
fn unchanged_document_is_reused_whole() {
    let result = blend("int x = 1;\nfoo(x);", &[]);
    let reused: Vec<bool> = result.tokens.iter().map(|t| t.reused).collect();
    assert_eq!(reused, vec![true, true, true, true, true, true, true, true, true, true, false]);
    assert_eq!(result.stats.skipped_count, 0);
    assert_eq!(
        kinds_and_texts(&result.tokens),
        kinds_and_texts(&fresh(&result.new_text, LexerOptions::default()))
    );
}

#[test]
fn reuse_rate_counts_emitted_tokens() {
    assert!(IncrementalStats::default().reuse_rate().abs() < f64::EPSILON);
    let stats = IncrementalStats {
        reused_count: 3,
        relexed_count: 1,
        skipped_count: 7,
    };
    assert!((stats.reuse_rate() - 75.0).abs() < f64::EPSILON);

    let result = blend("int x = 1;", &[TextEdit::new(Span::new(8, 9), "12")]);
    assert!((result.stats.reuse_rate() - 4.0 / 6.0 * 100.0).abs() < 1e-9);
}

#[test]
fn deleting_everything_leaves_end_of_file() {
    let result = blend("a; b;", &[TextEdit::delete(Span::new(0, 5))]);
    assert_eq!(result.new_text, "");
    assert_eq!(
        kinds_and_texts(&result.tokens),
        vec![(SyntaxKind::EndOfFileToken, String::new())]
    );
    assert_eq!(result.stats.reused_count, 0);
}

#[test]
fn empty_document_gains_text() {
    let result = blend("", &[TextEdit::insert(0, "x;")]);
    assert_eq!(
        kinds_and_texts(&result.tokens),
        kinds_and_texts(&fresh("x;", LexerOptions::default()))
    );
    assert!(result.tokens.iter().all(|t| !t.reused));
}

// === Agreement with fresh lexing ===

const WORDS: &[&str] = &[
    "int", "x", "=", "1", "12", ";", " ", "\n", "foo", "(", ")", "// c\n", "\"s\"", "+", "#if A\n",
    "#endif\n", "/* b */", ".",
];

/// Single tokens that lex cleanly between spaces.
const TOKEN_WORDS: &[&str] = &["int", "x", "=", "1", "12", ";", "foo", "(", ")", "+", "\"s\""];

/// Tokens that lex cleanly on their own.
const CLEAN_WORDS: &[&str] = &["int", "x", "=", "1", "12", ";", "foo", "(", ")", "+", "\"s\"", "// c\n"];

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..24).prop_map(|words| words.concat())
}

/// A document and one edit inside it.
fn edited_document() -> impl Strategy<Value = (String, TextEdit)> {
    (
        document(),
        any::<prop::sample::Index>(),
        0..6u32,
        prop::collection::vec(prop::sample::select(WORDS), 0..3),
    )
        .prop_map(|(old, at, len, insert)| {
            let old_len = u32::try_from(old.chars().count()).unwrap();
            let start = u32::try_from(at.index(old.chars().count() + 1)).unwrap();
            let end = (start + len).min(old_len);
            (old, TextEdit::new(Span::new(start, end), insert.concat()))
        })
}

proptest! {
    #[test]
    fn blended_tokens_cover_the_new_document((old, edit) in edited_document()) {
        let result = blend(&old, &[edit]);
        let mut position = 0;
        let mut text = String::new();
        for token in &result.tokens {
            prop_assert_eq!(token.position, position);
            position += u32::try_from(token.full_text.chars().count()).unwrap();
            text.push_str(&token.full_text);
        }
        prop_assert_eq!(text, result.new_text);
        prop_assert_eq!(result.tokens.last().map(|t| t.kind), Some(SyntaxKind::EndOfFileToken));
    }

    #[test]
    fn blended_tokens_match_fresh_lexing((old, edit) in edited_document()) {
        let result = blend(&old, &[edit]);
        let expected = fresh(&result.new_text, LexerOptions::default());
        prop_assert_eq!(kinds_and_texts(&result.tokens), kinds_and_texts(&expected));
    }

    #[test]
    fn clean_unchanged_documents_reuse_every_token(
        words in prop::collection::vec(prop::sample::select(CLEAN_WORDS), 1..16),
    ) {
        let text = words.join(" ");
        let result = blend(&text, &[]);
        let (end, rest) = result.tokens.split_last().unwrap();
        prop_assert!(!end.reused);
        prop_assert!(rest.iter().all(|t| t.reused));
        prop_assert_eq!(result.stats.relexed_count, 1);
    }

    #[test]
    fn replacing_a_word_relexes_only_that_word(
        words in prop::collection::vec(prop::sample::select(TOKEN_WORDS), 1..12),
        at in any::<prop::sample::Index>(),
        replacement in prop::sample::select(TOKEN_WORDS),
    ) {
        let text = words.join(" ");
        let index = at.index(words.len());
        let start: usize = words[..index].iter().map(|w| w.len() + 1).sum();
        let span = Span::new(
            u32::try_from(start).unwrap(),
            u32::try_from(start + words[index].len()).unwrap(),
        );
        let result = blend(&text, &[TextEdit::new(span, replacement)]);
        let relexed: Vec<&str> = result
            .tokens
            .iter()
            .filter(|t| !t.reused)
            .map(|t| t.text.as_str())
            .collect();
        prop_assert_eq!(relexed, vec![replacement, ""]);
    }
}
