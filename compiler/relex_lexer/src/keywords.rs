//! Keyword resolution.
//!
//! Two tables:
//! 1. **Reserved keywords** always lex as keyword tokens.
//! 2. **Contextual keywords** lex as identifiers carrying the keyword in
//!    their contextual kind; the grammar parser decides whether to promote.
//!
//! Lookups reject by length and first character before comparing text, so
//! ordinary identifiers rarely reach the string match.

use relex_ir::{SyntaxKind, MAX_KEYWORD_LENGTH};

/// Keyword classification of an identifier's text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Keyword {
    Reserved(SyntaxKind),
    Contextual(SyntaxKind),
}

/// Look up `text` as a reserved or contextual keyword.
#[inline]
pub fn lookup(text: &str) -> Option<Keyword> {
    let len = text.len();
    if !(2..=MAX_KEYWORD_LENGTH).contains(&len) {
        return None;
    }
    if !text.as_bytes()[0].is_ascii_lowercase() {
        return None;
    }
    if let Some(kind) = SyntaxKind::reserved_keyword(text) {
        return Some(Keyword::Reserved(kind));
    }
    SyntaxKind::contextual_keyword(text).map(Keyword::Contextual)
}

/// Look up a word following `#` on a directive line.
#[inline]
pub fn lookup_preprocessor(text: &str) -> Option<SyntaxKind> {
    if !(2..=MAX_KEYWORD_LENGTH).contains(&text.len()) {
        return None;
    }
    SyntaxKind::preprocessor_keyword(text)
}
