//! The fresh lexer.
//!
//! One call to [`Lexer::lex`] produces one green token: leading trivia, the
//! token text, trailing trivia up to and including the first line break.
//! What counts as a token depends on the requested [`LexerMode`].
//!
//! # Layout
//!
//! - this file: session state, mode dispatch, identifiers, punctuation and
//!   token construction
//! - `trivia`: whitespace, line breaks and comments
//! - `directive`: directive lines, disabled text and directive-mode tokens
//! - `literals`: numbers, characters, regular and verbatim strings
//! - `raw_string`: `"""` literals and their indentation rules
//! - `interpolated`: interpolated strings as one opaque token
//! - `xml_doc`: the documentation comment modes
//!
//! # Diagnostics
//!
//! Scan methods record problems with absolute positions in `errors`. When
//! the token is built they are rebased onto the token's full start, so a
//! token reused at another position keeps valid offsets. Trivia that own
//! their diagnostics (an unterminated comment, a directive line) carry them
//! directly.
//!
//! # Token Interning
//!
//! Tokens without leading trivia, with only whitespace and line breaks
//! trailing, and without diagnostics are deduplicated through the session
//! cache, keyed by their full text. The cache is emptied when the lexer is
//! dropped, so nothing lexed in a session outlives it through the pool.

use std::sync::Arc;

use relex_ir::{
    Diagnostic, DirectiveStack, ErrorCode, GreenToken, SharedInterner, SyntaxKind, TokenText,
    TokenValue, TriviaList,
};
use relex_lexer_core::{chars, fnv, Pooled, SourceDocument, TextWindow, INVALID_CHAR};

use crate::cache::{LexerCache, CACHE_POOL, MAX_CACHED_TOKEN_SIZE};
use crate::keywords::{self, Keyword};
use crate::{LexerMode, LexerOptions};

mod directive;
mod interpolated;
mod literals;
mod raw_string;
mod trivia;
mod xml_doc;

pub use interpolated::rescan_interpolated_string;

/// What a scan method found, before trivia and diagnostics are attached.
struct TokenInfo {
    kind: SyntaxKind,
    contextual_kind: SyntaxKind,
    /// `None` for fixed-text kinds.
    text: Option<TokenText>,
    value: Option<TokenValue>,
}

impl TokenInfo {
    fn fixed(kind: SyntaxKind) -> Self {
        TokenInfo {
            kind,
            contextual_kind: kind,
            text: None,
            value: None,
        }
    }

    fn text(kind: SyntaxKind, text: TokenText) -> Self {
        TokenInfo {
            kind,
            contextual_kind: kind,
            text: Some(text),
            value: None,
        }
    }

    fn with_value(mut self, value: TokenValue) -> Self {
        self.value = Some(value);
        self
    }
}

/// Scanner over one document.
///
/// A lexer is positioned with [`reset`](Lexer::reset) and then asked for one
/// token at a time. Its directive stack advances as directive trivia are
/// lexed; the blender reads and restores it around reused subtrees.
pub struct Lexer<'a> {
    window: TextWindow<'a>,
    cache: Pooled<'static, LexerCache>,
    options: LexerOptions,
    directives: DirectiveStack,
    mode: LexerMode,
    /// Set by a reset that lands after text on the same line.
    mid_line: bool,
    /// Diagnostics of the token being scanned, at absolute positions.
    errors: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    pub fn new(document: &'a dyn SourceDocument, options: LexerOptions) -> Self {
        Self::with_interner(document, options, SharedInterner::new())
    }

    /// Lexer sharing `interner` with other sessions over the same workspace.
    #[tracing::instrument(level = "debug", skip_all, fields(len = document.len()))]
    pub fn with_interner(
        document: &'a dyn SourceDocument,
        options: LexerOptions,
        interner: SharedInterner,
    ) -> Self {
        let window = TextWindow::with_capacity(document, options.window_capacity, interner);
        let cache = CACHE_POOL.take(|cache| !cache.is_oversized(), LexerCache::new);
        Lexer {
            window,
            cache,
            options,
            directives: DirectiveStack::EMPTY,
            mode: LexerMode::SYNTAX,
            mid_line: false,
            errors: Vec::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.window.position()
    }

    /// Directive history at the current position.
    #[inline]
    pub fn directives(&self) -> &DirectiveStack {
        &self.directives
    }

    #[inline]
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Length of the document being lexed.
    #[inline]
    pub fn document_len(&self) -> u32 {
        self.window.document_len()
    }

    /// Times the text window reloaded its chunk.
    #[inline]
    pub fn chunk_loads(&self) -> u32 {
        self.window.chunk_loads()
    }

    /// Tokens currently held by the session's token cache.
    pub fn cached_tokens(&self) -> usize {
        self.cache.cached_tokens()
    }

    /// Continue lexing at `position` with `directives` as the history.
    ///
    /// A position that does not start a line behaves as if a token came
    /// before it on that line, so a `#` there is not a directive.
    pub fn reset(&mut self, position: u32, directives: DirectiveStack) {
        tracing::trace!(position, "lexer reset");
        self.mid_line = position > 0 && !chars::is_newline(self.window.char_at(position - 1));
        self.window.reset(position);
        self.directives = directives;
        self.errors.clear();
    }

    /// Lex one token in `mode`.
    ///
    /// Documentation modes read and update the location and style fields of
    /// `mode`; other modes leave it unchanged.
    pub fn lex(&mut self, mode: &mut LexerMode) -> Arc<GreenToken> {
        self.mode = *mode;
        let mid_line = std::mem::take(&mut self.mid_line);
        let kind = mode.kind();
        if kind == LexerMode::SYNTAX || kind == LexerMode::DEBUGGER_SYNTAX {
            self.lex_syntax_token(mid_line)
        } else if kind == LexerMode::DIRECTIVE {
            self.lex_directive_token()
        } else {
            self.lex_xml_token(mode)
        }
    }

    // === Syntax tokens ===

    fn lex_syntax_token(&mut self, mid_line: bool) -> Arc<GreenToken> {
        let full_start = self.window.position();
        self.lex_syntax_trivia(full_start > 0, !mid_line, false);
        let leading: TriviaList = self.cache.leading.drain(..).collect();

        self.window.start_lexeme();
        let info = self.scan_syntax_token();

        let trailing: TriviaList = if info.kind == SyntaxKind::EndOfFileToken {
            self.report_unfinished_directives();
            TriviaList::new()
        } else {
            self.lex_syntax_trivia(true, false, true);
            self.cache.trailing.drain(..).collect()
        };

        let token = self.build_token(full_start, info, leading, trailing);
        self.intern_token(full_start, token)
    }

    fn scan_syntax_token(&mut self) -> TokenInfo {
        let ch = self.window.peek();
        match ch {
            '"' => {
                if self.window.peek_at(1) == '"' && self.window.peek_at(2) == '"' {
                    self.scan_raw_string_literal()
                } else {
                    self.scan_string_literal()
                }
            }
            '\'' => self.scan_char_literal(),
            '@' | '$' if self.interpolated_string_prefix().is_some() => {
                self.scan_interpolated_string()
            }
            '@' => match self.window.peek_at(1) {
                '"' => self.scan_verbatim_string_literal(),
                next if chars::is_identifier_start(next) => self.scan_identifier_or_keyword(),
                _ => self.scan_bad_character(),
            },
            '$' if self.mode.kind() == LexerMode::DEBUGGER_SYNTAX
                && chars::is_identifier_start(self.window.peek_at(1)) =>
            {
                self.scan_identifier_or_keyword()
            }
            '0'..='9' => self.scan_numeric_literal(),
            '.' if chars::is_decimal_digit(self.window.peek_at(1)) => self.scan_numeric_literal(),
            INVALID_CHAR if self.window.is_really_at_end() => {
                TokenInfo::fixed(SyntaxKind::EndOfFileToken)
            }
            ch if chars::is_identifier_start(ch) => self.scan_identifier_or_keyword(),
            _ => self.scan_punctuation(ch),
        }
    }

    // === Identifiers ===

    fn scan_identifier_or_keyword(&mut self) -> TokenInfo {
        let start = self.window.position();
        let verbatim = self.window.try_advance('@');
        let debugger_local = !verbatim && self.window.try_advance('$');
        self.window.advance();
        while chars::is_identifier_part(self.window.peek()) {
            self.window.advance();
        }
        let len = self.window.position() - start;
        let text = self.window.get_text(start, len, true);

        if verbatim {
            let value = TokenText::Owned(text[1..].to_owned());
            return TokenInfo::text(SyntaxKind::IdentifierToken, text)
                .with_value(TokenValue::Text(value));
        }

        if !debugger_local {
            let keyword = match self.window.chunk_slice(start, len) {
                Some(key) => {
                    let hash = fnv::hash_chars(key);
                    self.cache.try_get_keyword_kind(key, hash)
                }
                None => keywords::lookup(&text),
            };
            match keyword {
                Some(Keyword::Reserved(kind)) => return TokenInfo::fixed(kind),
                Some(Keyword::Contextual(kind)) => {
                    return TokenInfo {
                        kind: SyntaxKind::IdentifierToken,
                        contextual_kind: kind,
                        value: Some(TokenValue::Text(text.clone())),
                        text: Some(text),
                    };
                }
                None => {}
            }
        }

        TokenInfo::text(SyntaxKind::IdentifierToken, text.clone()).with_value(TokenValue::Text(text))
    }

    // === Punctuation ===

    fn scan_punctuation(&mut self, ch: char) -> TokenInfo {
        use SyntaxKind as K;

        let next = self.window.peek_at(1);
        let (kind, len) = match ch {
            '~' => (K::TildeToken, 1),
            '!' if next == '=' => (K::ExclamationEqualsToken, 2),
            '!' => (K::ExclamationToken, 1),
            '%' if next == '=' => (K::PercentEqualsToken, 2),
            '%' => (K::PercentToken, 1),
            '^' if next == '=' => (K::CaretEqualsToken, 2),
            '^' => (K::CaretToken, 1),
            '&' if next == '&' => (K::AmpersandAmpersandToken, 2),
            '&' if next == '=' => (K::AmpersandEqualsToken, 2),
            '&' => (K::AmpersandToken, 1),
            '*' if next == '=' => (K::AsteriskEqualsToken, 2),
            '*' => (K::AsteriskToken, 1),
            '(' => (K::OpenParenToken, 1),
            ')' => (K::CloseParenToken, 1),
            '-' if next == '-' => (K::MinusMinusToken, 2),
            '-' if next == '=' => (K::MinusEqualsToken, 2),
            '-' if next == '>' => (K::MinusGreaterThanToken, 2),
            '-' => (K::MinusToken, 1),
            '+' if next == '+' => (K::PlusPlusToken, 2),
            '+' if next == '=' => (K::PlusEqualsToken, 2),
            '+' => (K::PlusToken, 1),
            '=' if next == '=' => (K::EqualsEqualsToken, 2),
            '=' if next == '>' => (K::EqualsGreaterThanToken, 2),
            '=' => (K::EqualsToken, 1),
            '{' => (K::OpenBraceToken, 1),
            '}' => (K::CloseBraceToken, 1),
            '[' => (K::OpenBracketToken, 1),
            ']' => (K::CloseBracketToken, 1),
            '|' if next == '|' => (K::BarBarToken, 2),
            '|' if next == '=' => (K::BarEqualsToken, 2),
            '|' => (K::BarToken, 1),
            ':' if next == ':' => (K::ColonColonToken, 2),
            ':' => (K::ColonToken, 1),
            ';' => (K::SemicolonToken, 1),
            '<' if next == '=' => (K::LessThanEqualsToken, 2),
            '<' if next == '<' && self.window.peek_at(2) == '=' => (K::LessThanLessThanEqualsToken, 3),
            '<' if next == '<' => (K::LessThanLessThanToken, 2),
            '<' => (K::LessThanToken, 1),
            ',' => (K::CommaToken, 1),
            // `>>` and friends are merged by the grammar parser.
            '>' if next == '=' => (K::GreaterThanEqualsToken, 2),
            '>' => (K::GreaterThanToken, 1),
            '.' if next == '.' => (K::DotDotToken, 2),
            '.' => (K::DotToken, 1),
            '?' if next == '?' && self.window.peek_at(2) == '=' => (K::QuestionQuestionEqualsToken, 3),
            '?' if next == '?' => (K::QuestionQuestionToken, 2),
            '?' => (K::QuestionToken, 1),
            '/' if next == '=' => (K::SlashEqualsToken, 2),
            '/' => (K::SlashToken, 1),
            _ => return self.scan_bad_character(),
        };
        self.window.advance_by(len);
        TokenInfo::fixed(kind)
    }

    /// One character that starts no token.
    fn scan_bad_character(&mut self) -> TokenInfo {
        let start = self.window.position();
        self.window.advance();
        let len = self.window.position() - start;
        self.error(ErrorCode::UnexpectedCharacter, start, len);
        TokenInfo::text(SyntaxKind::BadToken, self.window.get_text(start, len, false))
    }

    /// Consecutive `ch` characters at the current position.
    fn run_of(&mut self, ch: char) -> u32 {
        let mut run = 0;
        while self.window.peek_at(run) == ch {
            run += 1;
        }
        run
    }

    // === Construction ===

    /// Record a diagnostic at absolute position `pos`.
    fn error(&mut self, code: ErrorCode, pos: u32, width: u32) {
        self.errors.push(Diagnostic::new(code, pos, width));
    }

    fn report_unfinished_directives(&mut self) {
        let pos = self.window.position();
        if self.directives.has_unfinished_if() {
            self.error(ErrorCode::EndIfDirectiveExpected, pos, 0);
        }
        if self.directives.has_unfinished_region() {
            self.error(ErrorCode::EndRegionDirectiveExpected, pos, 0);
        }
    }

    fn build_token(
        &mut self,
        full_start: u32,
        info: TokenInfo,
        leading: TriviaList,
        trailing: TriviaList,
    ) -> GreenToken {
        let mut token = match info.text {
            Some(text) => GreenToken::new(info.kind, text, leading, trailing),
            None => GreenToken::fixed(info.kind, leading, trailing),
        };
        if info.contextual_kind != info.kind {
            token = token.with_contextual_kind(info.contextual_kind);
        }
        if let Some(value) = info.value {
            token = token.with_value(value);
        }
        if !self.errors.is_empty() {
            let diagnostics: Vec<Diagnostic> = self
                .errors
                .drain(..)
                .map(|d| Diagnostic::new(d.code, d.offset.saturating_sub(full_start), d.width))
                .collect();
            token = token.with_diagnostics(diagnostics);
        }
        token
    }

    fn intern_token(&mut self, full_start: u32, token: GreenToken) -> Arc<GreenToken> {
        let token = Arc::new(token);
        if !is_cacheable(&token) {
            return token;
        }
        match self.window.chunk_slice(full_start, token.full_width()) {
            Some(key) => {
                let hash = fnv::hash_chars(key);
                self.cache.lookup_token(key, hash, || Arc::clone(&token))
            }
            None => token,
        }
    }
}

impl Drop for Lexer<'_> {
    /// Empties the cache before it returns to the pool, releasing every
    /// token and trivia of this session.
    fn drop(&mut self) {
        self.cache.reset();
    }
}

fn is_cacheable(token: &GreenToken) -> bool {
    token.full_width() <= MAX_CACHED_TOKEN_SIZE
        && token.kind() != SyntaxKind::EndOfFileToken
        && token.leading().is_empty()
        && token.flags().is_empty()
        && token.trailing().iter().all(|trivia| {
            matches!(
                trivia.kind(),
                SyntaxKind::WhitespaceTrivia | SyntaxKind::EndOfLineTrivia
            )
        })
}
