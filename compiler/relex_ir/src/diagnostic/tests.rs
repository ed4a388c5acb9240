#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn shifted_moves_offset_only() {
    let diag = Diagnostic::new(ErrorCode::UnterminatedString, 2, 0);
    assert_eq!(
        diag.shifted(3),
        Diagnostic::new(ErrorCode::UnterminatedString, 5, 0)
    );
}

#[test]
fn display_includes_code_and_severity() {
    let diag = Diagnostic::new(ErrorCode::WarningDirective, 0, 8);
    assert_eq!(diag.to_string(), "warning[E0111] at +0 (width 8)");
}
