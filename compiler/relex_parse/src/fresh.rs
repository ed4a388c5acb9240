//! The lexer as the blender sees it.

use std::sync::Arc;

use relex_ir::{DirectiveStack, GreenToken};
use relex_lexer::{Lexer, LexerMode};

/// A lexer the blender can reposition and pull single tokens from.
pub trait FreshLexer {
    /// Current position in the new document.
    fn position(&self) -> u32;

    /// Directive history at [`position`](FreshLexer::position).
    fn directives(&self) -> &DirectiveStack;

    /// Continue at `position` as if `directives` had been lexed before it.
    fn reset(&mut self, position: u32, directives: DirectiveStack);

    /// Lex one token. Documentation modes update the lexer-driven bits of
    /// `mode`.
    fn lex(&mut self, mode: &mut LexerMode) -> Arc<GreenToken>;
}

impl FreshLexer for Lexer<'_> {
    #[inline]
    fn position(&self) -> u32 {
        Lexer::position(self)
    }

    #[inline]
    fn directives(&self) -> &DirectiveStack {
        Lexer::directives(self)
    }

    fn reset(&mut self, position: u32, directives: DirectiveStack) {
        Lexer::reset(self, position, directives);
    }

    fn lex(&mut self, mode: &mut LexerMode) -> Arc<GreenToken> {
        Lexer::lex(self, mode)
    }
}
