#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

// === ChangeRange tests ===

#[test]
fn test_change_range_insert() {
    let change = ChangeRange::insert(10, 5);
    assert_eq!(change.span, Span::new(10, 10));
    assert_eq!(change.new_len, 5);
    assert_eq!(change.delta(), 5);
    assert_eq!(change.old_len(), 0);
    assert_eq!(change.new_end(), 15);
}

#[test]
fn test_change_range_delete() {
    let change = ChangeRange::delete(10, 5);
    assert_eq!(change.span, Span::new(10, 15));
    assert_eq!(change.new_len, 0);
    assert_eq!(change.delta(), -5);
    assert_eq!(change.old_len(), 5);
    assert_eq!(change.new_end(), 10);
}

#[test]
fn test_change_range_replace() {
    let change = ChangeRange::replace(8, 1, 2);
    assert_eq!(change.span, Span::new(8, 9));
    assert_eq!(change.delta(), 1);
    assert_eq!(change.new_end(), 10);
}

// === Validation ===

#[test]
fn test_validate_accepts_sorted_disjoint() {
    let changes = [
        ChangeRange::replace(0, 2, 3),
        ChangeRange::insert(2, 1),
        ChangeRange::delete(5, 2),
    ];
    assert_eq!(ChangeRange::validate(&changes, 10), Ok(()));
    assert_eq!(ChangeRange::validate(&[], 0), Ok(()));
}

#[test]
fn test_validate_rejects_overlap() {
    let changes = [ChangeRange::replace(0, 4, 1), ChangeRange::insert(3, 1)];
    assert_eq!(
        ChangeRange::validate(&changes, 10),
        Err(ChangeError::Overlapping {
            index: 1,
            start: 3,
            prev_end: 4
        })
    );
}

#[test]
fn test_validate_rejects_out_of_bounds() {
    let changes = [ChangeRange::delete(8, 4)];
    assert_eq!(
        ChangeRange::validate(&changes, 10),
        Err(ChangeError::OutOfBounds {
            index: 0,
            end: 12,
            len: 10
        })
    );
}

#[test]
fn test_change_error_display() {
    let err = ChangeError::OutOfBounds {
        index: 0,
        end: 12,
        len: 10,
    };
    assert_eq!(
        err.to_string(),
        "change #0 ends at 12, past the end of the old document (10)"
    );
}

// === TextEdit ===

#[test]
fn test_text_edit_counts_characters() {
    let edit = TextEdit::new(Span::new(1, 2), "é€");
    assert_eq!(edit.to_change_range(), ChangeRange::replace(1, 1, 2));
    assert_eq!(TextEdit::delete(Span::new(3, 5)).to_change_range().delta(), -2);
    assert_eq!(TextEdit::insert(4, "ab").to_change_range().delta(), 2);
}
