//! Sliding window over a [`SourceDocument`].
//!
//! The window keeps one fixed-capacity chunk of the document in memory and
//! serves character reads from it. A read outside the chunk reloads it at
//! the requested position; reads at or past the end of the document return
//! [`INVALID_CHAR`] without touching the chunk.
//!
//! # Chunk Ownership
//!
//! Chunks come from a process-wide [`Pool`] and go back to it when the
//! window is dropped, so back-to-back lexing sessions reuse the same
//! allocation.
//!
//! # Lexemes
//!
//! The scanner marks the start of each lexeme with [`TextWindow::start_lexeme`]
//! and reads its text back with [`TextWindow::lexeme_text`] or, for cache
//! lookups, [`TextWindow::chunk_slice`].

use relex_ir::{SharedInterner, TokenText};

use crate::chars;
use crate::pool::{Pool, Pooled};
use crate::SourceDocument;

/// Returned for every read at or past the end of the document.
///
/// Never present in a [`SourceText`](crate::SourceText).
pub const INVALID_CHAR: char = '\u{FFFF}';

/// Chunk size used by [`TextWindow::new`].
pub const DEFAULT_CHUNK_CAPACITY: usize = 2048;

static CHUNK_POOL: Pool<Box<[char]>> = Pool::new(16);

/// Random-access reader over a document, one chunk at a time.
pub struct TextWindow<'a> {
    document: &'a dyn SourceDocument,
    text_len: u32,
    chunk: Pooled<'static, Box<[char]>>,
    /// Document offset of `chunk[0]`.
    basis: u32,
    /// Valid characters in `chunk`.
    count: u32,
    position: u32,
    lexeme_start: u32,
    chunk_loads: u32,
    interner: SharedInterner,
}

impl<'a> TextWindow<'a> {
    pub fn new(document: &'a dyn SourceDocument, interner: SharedInterner) -> Self {
        Self::with_capacity(document, DEFAULT_CHUNK_CAPACITY, interner)
    }

    /// Window with a chunk of `capacity` characters (at least one).
    pub fn with_capacity(
        document: &'a dyn SourceDocument,
        capacity: usize,
        interner: SharedInterner,
    ) -> Self {
        let capacity = capacity.max(1);
        let chunk = CHUNK_POOL.take(
            |chunk| chunk.len() == capacity,
            || vec![INVALID_CHAR; capacity].into_boxed_slice(),
        );
        TextWindow {
            document,
            text_len: document.len(),
            chunk,
            basis: 0,
            count: 0,
            position: 0,
            lexeme_start: 0,
            chunk_loads: 0,
            interner,
        }
    }

    // === Position ===

    #[inline]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Length of the underlying document.
    #[inline]
    pub fn document_len(&self) -> u32 {
        self.text_len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.chunk.len()
    }

    /// Number of times the chunk has been (re)filled from the document.
    #[inline]
    pub fn chunk_loads(&self) -> u32 {
        self.chunk_loads
    }

    /// Move to `pos`, clamped to the document length, and start a lexeme there.
    ///
    /// Loads the chunk at `pos` if `pos` is outside it.
    pub fn reset(&mut self, pos: u32) {
        let pos = pos.min(self.text_len);
        self.position = pos;
        self.lexeme_start = pos;
        if !self.in_chunk(pos) && pos < self.text_len {
            self.load(pos);
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.advance_by(1);
    }

    /// Advance `n` characters, stopping at the end of the document.
    #[inline]
    pub fn advance_by(&mut self, n: u32) {
        self.position = self.position.saturating_add(n).min(self.text_len);
    }

    /// Position is at the end of the document.
    #[inline]
    pub fn is_really_at_end(&self) -> bool {
        self.position >= self.text_len
    }

    // === Lexemes ===

    #[inline]
    pub fn lexeme_start(&self) -> u32 {
        self.lexeme_start
    }

    #[inline]
    pub fn start_lexeme(&mut self) {
        self.lexeme_start = self.position;
    }

    /// Characters consumed since [`start_lexeme`](Self::start_lexeme).
    #[inline]
    pub fn width(&self) -> u32 {
        self.position - self.lexeme_start
    }

    pub fn lexeme_text(&mut self, intern: bool) -> TokenText {
        self.get_text(self.lexeme_start, self.width(), intern)
    }

    // === Reads ===

    /// Character at the current position.
    #[inline]
    pub fn peek(&mut self) -> char {
        self.char_at(self.position)
    }

    /// Character `delta` positions ahead.
    #[inline]
    pub fn peek_at(&mut self, delta: u32) -> char {
        self.char_at(self.position.saturating_add(delta))
    }

    /// Consume and return the current character.
    #[inline]
    pub fn next_char(&mut self) -> char {
        let ch = self.peek();
        self.advance();
        ch
    }

    /// Consume `expected` if it is the current character.
    #[inline]
    pub fn try_advance(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Character at absolute position `pos`.
    pub fn char_at(&mut self, pos: u32) -> char {
        if pos >= self.text_len {
            return INVALID_CHAR;
        }
        if !self.in_chunk(pos) {
            self.load(pos);
        }
        self.chunk[(pos - self.basis) as usize]
    }

    /// Width of the line terminator at the current position.
    pub fn current_newline_width(&mut self) -> u32 {
        let first = self.peek();
        let second = self.peek_at(1);
        chars::newline_width(first, second)
    }

    /// Characters of `[start, start + len)` straight from the chunk.
    ///
    /// Reloads the chunk at `start` if needed; returns `None` if the span is
    /// longer than the chunk or runs past the document.
    pub fn chunk_slice(&mut self, start: u32, len: u32) -> Option<&[char]> {
        if len == 0 {
            return Some(&[]);
        }
        let end = start.checked_add(len)?;
        if end > self.text_len || len as usize > self.chunk.len() {
            return None;
        }
        if !(self.in_chunk(start) && end <= self.basis + self.count) {
            self.load(start);
        }
        let from = (start - self.basis) as usize;
        Some(&self.chunk[from..from + len as usize])
    }

    /// Text of `[start, start + len)`.
    ///
    /// Very common short lexemes come back as shared constants. Otherwise the
    /// text is read from the chunk, or from the document when the span
    /// straddles the chunk boundary, and interned when `intern` is set.
    pub fn get_text(&mut self, start: u32, len: u32, intern: bool) -> TokenText {
        if let Some(text) = self.common_text(start, len) {
            return TokenText::Static(text);
        }
        let end = start.saturating_add(len).min(self.text_len);
        let text: String = if self.in_chunk(start) && end <= self.basis + self.count {
            let from = (start - self.basis) as usize;
            let to = (end - self.basis) as usize;
            self.chunk[from..to].iter().collect()
        } else {
            self.document.text(start, len)
        };
        if intern {
            self.interner.intern(&text)
        } else {
            TokenText::Owned(text)
        }
    }

    fn common_text(&mut self, start: u32, len: u32) -> Option<&'static str> {
        match len {
            0 => Some(""),
            1 => match self.char_at(start) {
                ' ' => Some(" "),
                '\n' => Some("\n"),
                _ => None,
            },
            2 => match (self.char_at(start), self.char_at(start + 1)) {
                ('\r', '\n') => Some("\r\n"),
                ('/', '/') => Some("//"),
                _ => None,
            },
            3 => match (
                self.char_at(start),
                self.char_at(start + 1),
                self.char_at(start + 2),
            ) {
                ('/', '/', ' ') => Some("// "),
                _ => None,
            },
            _ => None,
        }
    }

    // === Chunk ===

    #[inline]
    fn in_chunk(&self, pos: u32) -> bool {
        pos >= self.basis && pos < self.basis + self.count
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "chunk capacity is bounded by the document length when used"
    )]
    fn load(&mut self, pos: u32) {
        let count = (self.text_len - pos).min(self.chunk.len() as u32);
        self.document
            .copy_to(pos, &mut self.chunk[..count as usize]);
        self.basis = pos;
        self.count = count;
        self.chunk_loads += 1;
        tracing::trace!(pos, count, "text window reload");
    }
}

#[cfg(test)]
mod tests;
