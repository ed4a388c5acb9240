#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn kind_strips_driven_bits() {
    let mode = LexerMode::XML_DOC_COMMENT.with_location(DocCommentLocation::Exterior);
    assert_eq!(mode.kind(), LexerMode::XML_DOC_COMMENT);
    assert_eq!(mode.location(), DocCommentLocation::Exterior);
}

#[test]
fn location_and_style_are_independent() {
    let mode = LexerMode::XML_ELEMENT_TAG
        .with_style(DocCommentStyle::Delimited)
        .with_location(DocCommentLocation::Interior)
        .with_location(DocCommentLocation::End);
    assert_eq!(mode.location(), DocCommentLocation::End);
    assert_eq!(mode.style(), DocCommentStyle::Delimited);
    assert_eq!(
        mode.with_style(DocCommentStyle::SingleLine).style(),
        DocCommentStyle::SingleLine
    );
}

#[test]
fn doc_modes() {
    assert!(!LexerMode::SYNTAX.is_doc_comment());
    assert!(!LexerMode::DIRECTIVE.is_doc_comment());
    assert!(LexerMode::XML_DOC_COMMENT.is_doc_comment());
    assert!(LexerMode::XML_CHARACTER.is_doc_comment());
}

#[test]
fn merge_takes_kind_from_self() {
    let driven = LexerMode::XML_DOC_COMMENT
        .with_location(DocCommentLocation::Interior)
        .with_style(DocCommentStyle::Delimited);
    let merged = LexerMode::XML_ELEMENT_TAG.merge_lexer_driven(driven);
    assert_eq!(merged.kind(), LexerMode::XML_ELEMENT_TAG);
    assert_eq!(merged.location(), DocCommentLocation::Interior);
    assert_eq!(merged.style(), DocCommentStyle::Delimited);
}
