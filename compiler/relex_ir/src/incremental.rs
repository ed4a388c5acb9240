//! Incremental Re-lexing Support
//!
//! Types describing how a document changed between two lexing sessions.
//!
//! # Architecture
//!
//! 1. **Text Edit** - an editor-level edit: replace a span with new text
//! 2. **Change Range** - the same edit reduced to `(old span, new length)`, which
//!    is all the blender needs to keep old-tree and new-text coordinates in sync
//!
//! # LSP Integration
//!
//! `TextEdit` maps directly to LSP's `TextDocumentContentChangeEvent` (with
//! positions already converted to character offsets).

use crate::Span;

/// One edit, reduced to the old span it replaced and the length of the
/// replacement.
///
/// # Examples
///
/// ```
/// use relex_ir::incremental::ChangeRange;
///
/// // Insert 5 characters at position 10
/// let insert = ChangeRange::insert(10, 5);
/// assert_eq!(insert.delta(), 5);
///
/// // Delete 3 characters starting at position 5
/// let delete = ChangeRange::delete(5, 3);
/// assert_eq!(delete.delta(), -3);
///
/// // Replace "foo" (3 chars) with "hello" (5 chars) at position 0
/// let replace = ChangeRange::replace(0, 3, 5);
/// assert_eq!(replace.delta(), 2);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ChangeRange {
    /// Replaced region in old-document coordinates.
    pub span: Span,
    /// Length of the replacement text in characters.
    pub new_len: u32,
}

impl ChangeRange {
    /// Create a new change range.
    #[inline]
    pub const fn new(span: Span, new_len: u32) -> Self {
        ChangeRange { span, new_len }
    }

    /// Create an insertion (no characters removed).
    #[inline]
    pub const fn insert(at: u32, len: u32) -> Self {
        ChangeRange {
            span: Span::point(at),
            new_len: len,
        }
    }

    /// Create a deletion (no characters inserted).
    #[inline]
    pub const fn delete(start: u32, len: u32) -> Self {
        ChangeRange {
            span: Span::from_len(start, len),
            new_len: 0,
        }
    }

    /// Create a replacement.
    #[inline]
    pub const fn replace(start: u32, old_len: u32, new_len: u32) -> Self {
        ChangeRange {
            span: Span::from_len(start, old_len),
            new_len,
        }
    }

    /// Net change in document length (positive = grew, negative = shrank).
    #[inline]
    pub fn delta(&self) -> i64 {
        i64::from(self.new_len) - i64::from(self.span.len())
    }

    /// Length of the removed region in the old text.
    #[inline]
    pub const fn old_len(&self) -> u32 {
        self.span.len()
    }

    /// End of the replacement in new-document coordinates.
    #[inline]
    pub const fn new_end(&self) -> u32 {
        self.span.start + self.new_len
    }

    /// Check that `changes` is a valid change list for a document of
    /// `old_len` characters: sorted by start, non-overlapping, in bounds.
    pub fn validate(changes: &[ChangeRange], old_len: u32) -> Result<(), ChangeError> {
        let mut prev_end = 0;
        for (index, change) in changes.iter().enumerate() {
            if change.span.end > old_len {
                return Err(ChangeError::OutOfBounds {
                    index,
                    end: change.span.end,
                    len: old_len,
                });
            }
            if index > 0 && change.span.start < prev_end {
                return Err(ChangeError::Overlapping {
                    index,
                    start: change.span.start,
                    prev_end,
                });
            }
            prev_end = change.span.end;
        }
        Ok(())
    }
}

/// Rejected change list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChangeError {
    #[error("change #{index} ends at {end}, past the end of the old document ({len})")]
    OutOfBounds { index: usize, end: u32, len: u32 },
    #[error("change #{index} starts at {start}, before the previous change ended ({prev_end})")]
    Overlapping {
        index: usize,
        start: u32,
        prev_end: u32,
    },
}

/// A single editor edit: replace `span` of the old text with `new_text`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TextEdit {
    /// Replaced region in old-document character offsets.
    pub span: Span,
    /// Replacement text.
    pub new_text: String,
}

impl TextEdit {
    #[inline]
    pub fn new(span: Span, new_text: impl Into<String>) -> Self {
        TextEdit {
            span,
            new_text: new_text.into(),
        }
    }

    #[inline]
    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        TextEdit::new(Span::point(at), text)
    }

    #[inline]
    pub fn delete(span: Span) -> Self {
        TextEdit::new(span, String::new())
    }

    /// Reduce to a [`ChangeRange`].
    pub fn to_change_range(&self) -> ChangeRange {
        let new_len = u32::try_from(self.new_text.chars().count()).unwrap_or(u32::MAX);
        ChangeRange::new(self.span, new_len)
    }
}

#[cfg(test)]
mod tests;
