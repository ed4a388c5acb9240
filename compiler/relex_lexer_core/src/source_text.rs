//! Source documents addressed by character offset.
//!
//! [`SourceDocument`] is the read-only interface the text window pulls
//! chunks from. [`SourceText`] is the in-memory implementation: an
//! `Arc<[char]>`, so cloning a document is cheap and offsets are O(1).
//!
//! # Encoding Normalization
//!
//! `U+FFFF` is reserved as the window's end-of-input sentinel and can never
//! appear in a document. Construction replaces it with `U+FFFD` and records
//! an [`EncodingIssue`]. A leading byte order mark is stripped and recorded
//! the same way.

use std::sync::Arc;

use relex_ir::{ChangeError, ChangeRange, TextEdit};

use crate::INVALID_CHAR;

/// UTF-8 encoding of the reserved sentinel `U+FFFF`.
const SENTINEL_UTF8: &[u8] = "\u{FFFF}".as_bytes();
const BOM: char = '\u{FEFF}';

/// Read-only, random-access character sequence.
pub trait SourceDocument: Send + Sync {
    /// Length in characters.
    fn len(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character at `pos`, or `None` at or past the end.
    fn char_at(&self, pos: u32) -> Option<char>;

    /// Copy `dest.len()` characters starting at `start` into `dest`.
    ///
    /// The caller keeps `start + dest.len()` within the document.
    fn copy_to(&self, start: u32, dest: &mut [char]);

    /// Text of `[start, start + len)`, clamped to the document.
    fn text(&self, start: u32, len: u32) -> String;
}

/// Normalization applied while building a [`SourceText`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodingIssue {
    pub kind: EncodingIssueKind,
    /// Character offset in the normalized text.
    pub pos: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodingIssueKind {
    /// Leading `U+FEFF`, removed.
    ByteOrderMark,
    /// `U+FFFF`, replaced by `U+FFFD`.
    ReservedSentinel,
}

/// Immutable in-memory document.
#[derive(Clone, Debug)]
pub struct SourceText {
    chars: Arc<[char]>,
    encoding_issues: Arc<[EncodingIssue]>,
}

impl SourceText {
    pub fn new(text: &str) -> Self {
        let mut issues = Vec::new();
        let text = match text.strip_prefix(BOM) {
            Some(rest) => {
                issues.push(EncodingIssue {
                    kind: EncodingIssueKind::ByteOrderMark,
                    pos: 0,
                });
                rest
            }
            None => text,
        };

        // Fast path: no reserved characters anywhere.
        let chars: Arc<[char]> = if memchr::memmem::find(text.as_bytes(), SENTINEL_UTF8).is_none() {
            text.chars().collect()
        } else {
            text.chars()
                .enumerate()
                .map(|(pos, ch)| {
                    if ch == INVALID_CHAR {
                        issues.push(EncodingIssue {
                            kind: EncodingIssueKind::ReservedSentinel,
                            pos: u32::try_from(pos).unwrap_or(u32::MAX),
                        });
                        char::REPLACEMENT_CHARACTER
                    } else {
                        ch
                    }
                })
                .collect()
        };

        SourceText {
            chars,
            encoding_issues: issues.into(),
        }
    }

    /// Build from characters that are already normalized.
    fn from_chars(chars: Vec<char>) -> Self {
        SourceText {
            chars: chars.into(),
            encoding_issues: Arc::new([]),
        }
    }

    pub fn as_chars(&self) -> &[char] {
        &self.chars
    }

    pub fn encoding_issues(&self) -> &[EncodingIssue] {
        &self.encoding_issues
    }

    /// Full text as a `String`.
    pub fn to_text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Apply editor edits and return the new document together with the
    /// change list the blender consumes.
    ///
    /// Edits are in old-document coordinates, sorted and non-overlapping.
    pub fn apply_edits(&self, edits: &[TextEdit]) -> Result<(SourceText, Vec<ChangeRange>), ChangeError> {
        let changes: Vec<ChangeRange> = edits.iter().map(TextEdit::to_change_range).collect();
        ChangeRange::validate(&changes, self.len())?;

        let mut out = Vec::with_capacity(self.chars.len());
        let mut copied = 0usize;
        for edit in edits {
            let range = edit.span.to_range();
            out.extend_from_slice(&self.chars[copied..range.start]);
            out.extend(edit.new_text.chars().map(|ch| {
                if ch == INVALID_CHAR {
                    char::REPLACEMENT_CHARACTER
                } else {
                    ch
                }
            }));
            copied = range.end;
        }
        out.extend_from_slice(&self.chars[copied..]);

        tracing::trace!(edits = edits.len(), old_len = self.len(), new_len = out.len(), "applied edits");
        Ok((SourceText::from_chars(out), changes))
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        SourceText::new(text)
    }
}

impl SourceDocument for SourceText {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "documents are limited to u32::MAX characters"
    )]
    fn len(&self) -> u32 {
        self.chars.len() as u32
    }

    fn char_at(&self, pos: u32) -> Option<char> {
        self.chars.get(pos as usize).copied()
    }

    fn copy_to(&self, start: u32, dest: &mut [char]) {
        let start = start as usize;
        dest.copy_from_slice(&self.chars[start..start + dest.len()]);
    }

    fn text(&self, start: u32, len: u32) -> String {
        let start = (start as usize).min(self.chars.len());
        let end = start.saturating_add(len as usize).min(self.chars.len());
        self.chars[start..end].iter().collect()
    }
}
