#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn fixed_text_round_trips_through_lookup() {
    assert_eq!(SyntaxKind::IntKeyword.text(), Some("int"));
    assert_eq!(SyntaxKind::reserved_keyword("int"), Some(SyntaxKind::IntKeyword));
    assert_eq!(SyntaxKind::contextual_keyword("var"), Some(SyntaxKind::VarKeyword));
    assert_eq!(SyntaxKind::reserved_keyword("var"), None);
    assert_eq!(SyntaxKind::IdentifierToken.text(), None);
}

#[test]
fn preprocessor_keywords_include_shared_ones() {
    assert_eq!(SyntaxKind::preprocessor_keyword("if"), Some(SyntaxKind::IfKeyword));
    assert_eq!(
        SyntaxKind::preprocessor_keyword("endregion"),
        Some(SyntaxKind::EndRegionKeyword)
    );
    assert_eq!(SyntaxKind::preprocessor_keyword("int"), None);
}

#[test]
fn fabricated_kinds() {
    assert!(SyntaxKind::GreaterThanGreaterThanToken.is_fabricated());
    assert!(SyntaxKind::GreaterThanGreaterThanEqualsToken.is_fabricated());
    assert!(SyntaxKind::AsyncKeyword.is_fabricated());
    assert!(!SyntaxKind::GreaterThanToken.is_fabricated());
    assert!(!SyntaxKind::IdentifierToken.is_fabricated());
    assert!(!SyntaxKind::IntKeyword.is_fabricated());
}

#[test]
fn classification_is_disjoint() {
    assert!(SyntaxKind::IfDirectiveTrivia.is_trivia());
    assert!(SyntaxKind::IfDirectiveTrivia.is_directive_trivia());
    assert!(!SyntaxKind::WhitespaceTrivia.is_directive_trivia());
    assert!(SyntaxKind::CompilationUnit.is_node());
    assert!(!SyntaxKind::CompilationUnit.is_token());
    assert!(SyntaxKind::EndOfFileToken.is_token());
    assert!(!SyntaxKind::None.is_token());
}

#[test]
fn no_keyword_exceeds_max_length() {
    for text in ["stackalloc", "descending", "ascending", "interface"] {
        assert!(text.len() <= MAX_KEYWORD_LENGTH);
    }
}
