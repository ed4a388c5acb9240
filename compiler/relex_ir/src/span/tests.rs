#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn span_len_and_empty() {
    let span = Span::new(4, 9);
    assert_eq!(span.len(), 5);
    assert!(!span.is_empty());
    assert!(Span::point(3).is_empty());
    assert_eq!(Span::from_len(2, 3), Span::new(2, 5));
}

#[test]
fn span_overlaps_is_exclusive_at_edges() {
    let span = Span::new(4, 8);
    assert!(span.overlaps(Span::new(7, 10)));
    assert!(!span.overlaps(Span::new(8, 10)));
    assert!(!span.overlaps(Span::new(0, 4)));
    assert!(span.overlaps(Span::point(5)));
    assert!(!span.overlaps(Span::point(4)));
}

#[test]
fn span_touching_counts_shared_endpoints() {
    let span = Span::new(4, 8);
    assert!(span.intersects_or_touches(Span::new(8, 10)));
    assert!(span.intersects_or_touches(Span::point(4)));
    assert!(!span.intersects_or_touches(Span::new(9, 10)));
}

#[test]
fn span_try_from_range_rejects_inverted() {
    assert_eq!(Span::try_from_range(2..5), Ok(Span::new(2, 5)));
    assert_eq!(
        Span::try_from_range(5..2),
        Err(SpanError::Inverted { start: 5, end: 2 })
    );
}

#[test]
fn span_shift() {
    assert_eq!(Span::new(9, 10).shift(1), Span::new(10, 11));
    assert_eq!(Span::new(9, 10).shift(-2), Span::new(7, 8));
}
