//! Relex IR - shared syntax data model
//!
//! This crate holds the types every other relex crate speaks:
//! - Spans and change ranges over character offsets
//! - Token text and the session string interner
//! - Syntax kinds, node flags and lexical diagnostics
//! - The preprocessor directive stack
//! - Green trivia, tokens and nodes
//!
//! # Design Philosophy
//!
//! - **Characters, not bytes**: every offset and width counts Unicode scalar
//!   values, matching the text window the lexer reads from.
//! - **Immutable and shared**: green elements and directive stacks are
//!   `Arc`-shared and never mutated, so the blender can hand old subtrees to
//!   a new tree without copying.
//! - **Flags up front**: reuse decisions read pre-computed [`NodeFlags`]
//!   instead of walking subtrees.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod diagnostic;
mod directive;
mod flags;
mod green;
pub mod incremental;
mod interner;
mod kind;
mod name;
mod span;
mod text;

pub use diagnostic::{Diagnostic, ErrorCode, Severity};
pub use directive::{DefineState, Directive, DirectiveKind, DirectiveSlot, DirectiveStack};
pub use flags::NodeFlags;
pub use green::{
    fixed_or_owned, Annotation, GreenElement, GreenNode, GreenToken, GreenTrivia, TokenValue,
    Tokens, TriviaList,
};
pub use incremental::{ChangeError, ChangeRange, TextEdit};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use kind::{SyntaxKind, MAX_KEYWORD_LENGTH};
pub use name::Name;
pub use span::{Span, SpanError};
pub use text::TokenText;

static_assert_size!(Diagnostic, 12);
static_assert_size!(SyntaxKind, 2);
