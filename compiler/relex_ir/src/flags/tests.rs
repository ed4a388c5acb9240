#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn missing_is_not_inherited() {
    let flags = NodeFlags::IS_MISSING | NodeFlags::CONTAINS_DIAGNOSTICS;
    assert_eq!(flags.inherited(), NodeFlags::CONTAINS_DIAGNOSTICS);
}

#[test]
fn inherited_covers_all_presence_flags() {
    assert!(NodeFlags::INHERITED.contains(NodeFlags::CONTAINS_ANNOTATIONS));
    assert!(NodeFlags::INHERITED.contains(NodeFlags::CONTAINS_SKIPPED_TEXT));
    assert!(!NodeFlags::INHERITED.contains(NodeFlags::IS_MISSING));
}
