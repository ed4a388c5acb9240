//! Relex fresh lexer
//!
//! Scans source text into green tokens with attached trivia, one token per
//! call. The incremental blender in `relex_parse` drives it through
//! [`Lexer::reset`] and [`Lexer::lex`] wherever an old tree cannot be
//! reused.
//!
//! # Modes
//!
//! [`LexerMode`] selects what a call scans: ordinary syntax, directive
//! lines, or one of the documentation comment modes. Documentation modes
//! carry lexer-driven location and style bits between calls.
//!
//! # Caching
//!
//! Small tokens, whitespace trivia and keyword lookups are interned per
//! session in a pooled [`LexerCache`], so repeated lexemes share one
//! allocation.

mod cache;
mod keywords;
mod lexer;
mod mode;
mod options;

pub use cache::{LexerCache, TextKeyedCache, MAX_CACHED_TOKEN_SIZE};
pub use keywords::Keyword;
pub use lexer::{rescan_interpolated_string, Lexer};
pub use mode::{DocCommentLocation, DocCommentStyle, LexerMode};
pub use options::{DocumentationMode, LexerOptions};
