//! Relex lexer core - text access for the scanner
//!
//! Everything the scanner needs to read source text, and nothing about
//! tokens:
//! - [`SourceDocument`] and the in-memory [`SourceText`]
//! - [`TextWindow`], a pooled chunked reader with an end-of-input sentinel
//! - [`Pool`], the lock-guarded object pool behind window chunks and lexer caches
//! - [`chars`] classification and [`fnv`] hashing

pub mod chars;
pub mod fnv;
mod pool;
mod source_text;
mod text_window;

pub use pool::{Pool, Pooled};
pub use source_text::{EncodingIssue, EncodingIssueKind, SourceDocument, SourceText};
pub use text_window::{TextWindow, DEFAULT_CHUNK_CAPACITY, INVALID_CHAR};
