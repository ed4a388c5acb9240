#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use relex_ir::{DefineState, GreenElement, GreenNode, SyntaxKind};

use super::*;
use crate::test_support::{parse, spaced, token};

#[test]
fn flattening_records_parents_and_positions() {
    let tree = parse("a; b;");
    // root, two statements, end of file, four statement tokens
    assert_eq!(tree.element_count(), 8);
    assert_eq!(tree.full_width(), 5);
    assert_eq!(tree.child_count(ElementId::ROOT), 3);

    let second = tree.child(ElementId::ROOT, 1).unwrap();
    assert_eq!(tree.element(second).kind(), SyntaxKind::ExpressionStatement);
    assert_eq!(tree.parent(second), Some(ElementId::ROOT));
    assert_eq!(tree.index_in_parent(second), 1);
    assert_eq!(tree.position(second), 3);

    let semicolon = tree.child(second, 1).unwrap();
    assert_eq!(tree.element(semicolon).kind(), SyntaxKind::SemicolonToken);
    assert_eq!(tree.position(semicolon), 4);
    assert_eq!(tree.parent(semicolon), Some(second));

    let eof = tree.child(ElementId::ROOT, 2).unwrap();
    assert_eq!(tree.element(eof).kind(), SyntaxKind::EndOfFileToken);
    assert_eq!(tree.position(eof), 5);
    assert_eq!(tree.child(ElementId::ROOT, 3), None);
}

#[test]
fn children_are_contiguous() {
    let tree = parse("a b c; d;");
    let first = tree.child(ElementId::ROOT, 0).unwrap();
    let ids: Vec<usize> = (0..tree.child_count(first))
        .map(|i| tree.child(first, i).unwrap().index())
        .collect();
    assert_eq!(ids.len(), 4);
    for pair in ids.windows(2) {
        assert_eq!(pair[0] + 1, pair[1]);
    }
}

#[test]
fn interpolated_string_nodes_get_an_opaque_token() {
    let node = GreenNode::new(
        SyntaxKind::InterpolatedStringExpression,
        vec![
            GreenElement::Token(token(SyntaxKind::InterpolatedStringStartToken, "$\"")),
            GreenElement::Token(token(SyntaxKind::InterpolatedStringTextToken, "a")),
            GreenElement::Token(spaced(SyntaxKind::InterpolatedStringEndToken, "\"")),
        ],
    );
    let root = GreenNode::new(
        SyntaxKind::CompilationUnit,
        vec![node.into(), GreenElement::Token(token(SyntaxKind::EndOfFileToken, ""))],
    );
    let tree = SyntaxTree::new(Arc::new(root));

    let string = tree.child(ElementId::ROOT, 0).unwrap();
    let opaque = tree.opaque_token(string).unwrap().as_token().unwrap();
    assert_eq!(opaque.kind(), SyntaxKind::InterpolatedStringToken);
    assert_eq!(opaque.text(), "$\"a\"");
    assert_eq!(opaque.full_width(), 5);
    assert!(tree.opaque_token(ElementId::ROOT).is_none());
}

#[test]
fn directives_are_computed_once() {
    let tree = parse("#define A\nx;");
    let first = tree.directives();
    assert_eq!(first.len(), 1);
    assert_eq!(first.is_defined("A"), DefineState::Defined);
    assert!(first.ptr_eq(tree.directives()));
}

#[test]
fn deep_trees_flatten_without_recursion() {
    let mut node = GreenNode::new(
        SyntaxKind::ExpressionStatement,
        vec![GreenElement::Token(token(SyntaxKind::IdentifierToken, "x"))],
    );
    for _ in 0..1_000 {
        node = GreenNode::new(SyntaxKind::ExpressionStatement, vec![node.into()]);
    }
    let tree = SyntaxTree::new(Arc::new(node));
    assert_eq!(tree.element_count(), 1_002);
    assert_eq!(tree.to_full_string(), "x");
}
