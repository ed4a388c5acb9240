//! Directive lines, disabled text and directive-mode tokens.
//!
//! A directive line is lexed as a sequence of directive-mode tokens that the
//! [`DirectiveParser`] consumes; the line (from `#` through its line break)
//! becomes one directive trivia carrying the parsed [`Directive`] and any
//! diagnostics, with offsets relative to the `#`.
//!
//! After an `#if`, `#elif` or `#else` whose branch is not taken, everything up
//! to the next taken branch or the matching `#endif` is disabled text. Nested
//! `#if` blocks inside disabled text are tracked with an explicit stack.

use std::sync::Arc;

use relex_ir::{
    DefineState, Diagnostic, Directive, DirectiveKind, ErrorCode, GreenToken, GreenTrivia,
    SyntaxKind, TokenValue, TriviaList,
};
use relex_lexer_core::{chars, INVALID_CHAR};

use super::{Lexer, TokenInfo};
use crate::keywords;

/// Nesting limit for `#if` expressions.
const MAX_EXPRESSION_DEPTH: u32 = 256;

impl Lexer<'_> {
    pub(super) fn lex_directive_and_excluded_trivia(
        &mut self,
        after_first_token: bool,
        after_non_whitespace: bool,
        is_trailing: bool,
    ) {
        let directive = self.lex_single_directive(
            true,
            true,
            after_first_token,
            after_non_whitespace,
            is_trailing,
        );
        if directive.kind.is_branch() && !directive.branch_taken {
            self.lex_excluded_directives_and_trivia(is_trailing);
        }
    }

    /// Disabled text and the directives inside it, up to the directive that
    /// re-enables lexing or the end of the document.
    fn lex_excluded_directives_and_trivia(&mut self, is_trailing: bool) {
        // `end_is_active` of each open excluded block, innermost last.
        let mut blocks = vec![true];
        while let Some(&end_is_active) = blocks.last() {
            if !self.lex_disabled_text(is_trailing) {
                break;
            }
            let directive = self.lex_single_directive(false, end_is_active, false, false, is_trailing);
            if directive.kind == DirectiveKind::EndIf
                || (directive.kind.is_branch() && directive.branch_taken)
            {
                blocks.pop();
            } else if directive.kind == DirectiveKind::If {
                blocks.push(false);
            }
        }
    }

    /// Lex disabled text up to the start of the next directive line.
    ///
    /// Returns `true` if a directive follows. Whitespace before the `#` is
    /// left for the directive.
    fn lex_disabled_text(&mut self, is_trailing: bool) -> bool {
        let start = self.window.position();
        let mut line_start = start;
        let mut only_whitespace = true;
        let followed_by_directive = loop {
            let ch = self.window.peek();
            if ch == INVALID_CHAR && self.window.is_really_at_end() {
                break false;
            }
            if ch == '#' && only_whitespace && self.options.allow_directives {
                self.window.reset(line_start);
                break true;
            }
            if chars::is_newline(ch) {
                let width = self.window.current_newline_width();
                self.window.advance_by(width);
                line_start = self.window.position();
                only_whitespace = true;
                continue;
            }
            if !chars::is_whitespace(ch) {
                only_whitespace = false;
            }
            self.window.advance();
        };

        let len = self.window.position() - start;
        if len > 0 {
            let text = self.window.get_text(start, len, false);
            let trivia = Arc::new(GreenTrivia::new(SyntaxKind::DisabledTextTrivia, text));
            self.push_trivia(is_trailing, trivia);
        }
        followed_by_directive
    }

    /// Lex one directive line and fold it into the directive stack.
    fn lex_single_directive(
        &mut self,
        is_active: bool,
        end_is_active: bool,
        after_first_token: bool,
        after_non_whitespace: bool,
        is_trailing: bool,
    ) -> Directive {
        if chars::is_whitespace(self.window.peek()) {
            let trivia = self.scan_whitespace_trivia();
            self.push_trivia(is_trailing, trivia);
        }

        let hash_start = self.window.position();
        let context = DirectiveContext {
            is_active,
            end_is_active,
            after_first_token,
            after_non_whitespace,
        };
        let (directive, diagnostics) = DirectiveParser::new(self).parse(context);

        let len = self.window.position() - hash_start;
        let text = self.window.get_text(hash_start, len, false);
        let mut trivia = GreenTrivia::directive(text, directive.clone());
        if !diagnostics.is_empty() {
            trivia = trivia.with_diagnostics(diagnostics);
        }
        self.push_trivia(is_trailing, Arc::new(trivia));

        tracing::trace!(kind = ?directive.kind, is_active, branch_taken = directive.branch_taken, "directive");
        self.directives = self.directives.add(directive.clone());
        directive
    }

    // === Directive-mode tokens ===

    /// Lex one token of a directive line.
    ///
    /// At a line break or the end of the document this is an end-of-directive
    /// token whose trailing trivia hold the line break.
    pub(super) fn lex_directive_token(&mut self) -> Arc<GreenToken> {
        let mut leading = TriviaList::new();
        loop {
            let ch = self.window.peek();
            if chars::is_whitespace(ch) {
                leading.push(self.scan_whitespace_trivia());
            } else if ch == '/' && self.window.peek_at(1) == '/' {
                let start = self.window.position();
                self.skip_to_end_of_line();
                let len = self.window.position() - start;
                let text = self.window.get_text(start, len, false);
                leading.push(Arc::new(GreenTrivia::new(SyntaxKind::SingleLineCommentTrivia, text)));
            } else {
                break;
            }
        }

        self.window.start_lexeme();
        let ch = self.window.peek();
        if chars::is_newline(ch) || (ch == INVALID_CHAR && self.window.is_really_at_end()) {
            let mut trailing = TriviaList::new();
            if chars::is_newline(ch) {
                trailing.push(self.scan_end_of_line_trivia());
            }
            return Arc::new(GreenToken::new(SyntaxKind::EndOfDirectiveToken, "", leading, trailing));
        }

        let info = self.scan_directive_token(ch);
        let mut trailing = TriviaList::new();
        if chars::is_whitespace(self.window.peek()) {
            trailing.push(self.scan_whitespace_trivia());
        }
        let token = match info.text {
            Some(text) => GreenToken::new(info.kind, text, leading, trailing),
            None => GreenToken::fixed(info.kind, leading, trailing),
        };
        Arc::new(match info.value {
            Some(value) => token.with_value(value),
            None => token,
        })
    }

    fn scan_directive_token(&mut self, ch: char) -> TokenInfo {
        use SyntaxKind as K;

        let next = self.window.peek_at(1);
        let (kind, len) = match ch {
            '#' => (K::HashToken, 1),
            '!' if next == '=' => (K::ExclamationEqualsToken, 2),
            '!' => (K::ExclamationToken, 1),
            '=' if next == '=' => (K::EqualsEqualsToken, 2),
            '=' => (K::EqualsToken, 1),
            '&' if next == '&' => (K::AmpersandAmpersandToken, 2),
            '&' => (K::AmpersandToken, 1),
            '|' if next == '|' => (K::BarBarToken, 2),
            '|' => (K::BarToken, 1),
            '(' => (K::OpenParenToken, 1),
            ')' => (K::CloseParenToken, 1),
            ',' => (K::CommaToken, 1),
            '"' => return self.scan_directive_string(),
            ch if chars::is_decimal_digit(ch) => return self.scan_directive_number(),
            ch if chars::is_identifier_start(ch) => return self.scan_directive_word(),
            _ => {
                let start = self.window.position();
                self.window.advance();
                let text = self.window.get_text(start, 1, false);
                return TokenInfo::text(K::BadToken, text);
            }
        };
        self.window.advance_by(len);
        TokenInfo::fixed(kind)
    }

    fn scan_directive_word(&mut self) -> TokenInfo {
        let start = self.window.position();
        while chars::is_identifier_part(self.window.peek()) {
            self.window.advance();
        }
        let text = self.window.get_text(start, self.window.position() - start, true);
        match keywords::lookup_preprocessor(&text) {
            Some(kind) => TokenInfo::fixed(kind),
            None => TokenInfo::text(SyntaxKind::IdentifierToken, text.clone())
                .with_value(TokenValue::Text(text)),
        }
    }

    fn scan_directive_number(&mut self) -> TokenInfo {
        let start = self.window.position();
        while chars::is_decimal_digit(self.window.peek()) {
            self.window.advance();
        }
        let text = self.window.get_text(start, self.window.position() - start, false);
        let info = TokenInfo::text(SyntaxKind::NumericLiteralToken, text.clone());
        match text.parse::<u64>() {
            Ok(value) => info.with_value(TokenValue::Integer(value)),
            Err(_) => info,
        }
    }

    /// `"..."` without escapes, ending at the quote or the end of the line.
    fn scan_directive_string(&mut self) -> TokenInfo {
        let start = self.window.position();
        self.window.advance();
        loop {
            let ch = self.window.peek();
            if ch == '"' {
                self.window.advance();
                break;
            }
            if chars::is_newline(ch) || (ch == INVALID_CHAR && self.window.is_really_at_end()) {
                break;
            }
            self.window.advance();
        }
        let text = self.window.get_text(start, self.window.position() - start, false);
        let value = text.trim_start_matches('"').trim_end_matches('"').to_owned();
        TokenInfo::text(SyntaxKind::StringLiteralToken, text).with_value(TokenValue::Text(value.into()))
    }
}

#[derive(Copy, Clone)]
struct DirectiveContext {
    /// The directive itself is in included text.
    is_active: bool,
    /// Text after an `#elif`/`#else`/`#endif` here would be included if its
    /// condition allows.
    end_is_active: bool,
    after_first_token: bool,
    after_non_whitespace: bool,
}

/// Recursive-descent parser for one directive line.
///
/// Diagnostic offsets are relative to the `#`.
struct DirectiveParser<'l, 'a> {
    lexer: &'l mut Lexer<'a>,
    hash_start: u32,
    current: Arc<GreenToken>,
    /// Offset of `current`'s text from the `#`.
    current_offset: u32,
    diagnostics: Vec<Diagnostic>,
    /// An expression error was reported; the rest of the line is skipped.
    failed: bool,
}

impl<'l, 'a> DirectiveParser<'l, 'a> {
    fn new(lexer: &'l mut Lexer<'a>) -> Self {
        let hash_start = lexer.window.position();
        let (current, current_offset) = Self::lex(lexer, hash_start);
        DirectiveParser {
            lexer,
            hash_start,
            current,
            current_offset,
            diagnostics: Vec::new(),
            failed: false,
        }
    }

    fn lex(lexer: &mut Lexer<'a>, hash_start: u32) -> (Arc<GreenToken>, u32) {
        let full_start = lexer.window.position();
        let token = lexer.lex_directive_token();
        let offset = full_start - hash_start + token.leading_width();
        (token, offset)
    }

    fn bump(&mut self) {
        let (token, offset) = Self::lex(self.lexer, self.hash_start);
        self.current = token;
        self.current_offset = offset;
    }

    #[inline]
    fn kind(&self) -> SyntaxKind {
        self.current.kind()
    }

    fn at_end(&self) -> bool {
        self.kind() == SyntaxKind::EndOfDirectiveToken
    }

    fn error_at_current(&mut self, code: ErrorCode) {
        self.diagnostics
            .push(Diagnostic::new(code, self.current_offset, self.current.width()));
    }

    fn skip_to_end(&mut self) {
        while !self.at_end() {
            self.bump();
        }
    }

    fn expect_end(&mut self) {
        if !self.at_end() {
            if !self.failed {
                self.error_at_current(ErrorCode::EndOfDirectiveExpected);
            }
            self.skip_to_end();
        }
    }

    /// Rest of the line as free text (`#region` names, `#error` messages).
    fn skip_message(&mut self) {
        self.lexer.skip_to_end_of_line();
        self.bump();
    }

    fn parse(mut self, cx: DirectiveContext) -> (Directive, Vec<Diagnostic>) {
        debug_assert_eq!(self.kind(), SyntaxKind::HashToken);
        self.bump();

        if cx.after_non_whitespace {
            self.diagnostics
                .push(Diagnostic::new(ErrorCode::BadDirectivePlacement, 0, 1));
            self.skip_to_end();
            return (
                Directive::new(DirectiveKind::Bad, cx.is_active, false),
                self.diagnostics,
            );
        }

        let directive = match self.kind() {
            SyntaxKind::IfKeyword => {
                self.bump();
                let value = self.parse_expression();
                self.expect_end();
                Directive::new(DirectiveKind::If, cx.is_active, cx.is_active && value)
            }
            SyntaxKind::ElifKeyword => self.parse_elif(cx),
            SyntaxKind::ElseKeyword => self.parse_else(cx),
            SyntaxKind::EndIfKeyword => {
                if self.lexer.directives.has_unfinished_if() {
                    self.bump();
                    self.expect_end();
                    Directive::new(DirectiveKind::EndIf, cx.end_is_active, false)
                } else {
                    self.unexpected(cx)
                }
            }
            SyntaxKind::RegionKeyword => {
                self.skip_message();
                Directive::new(DirectiveKind::Region, cx.is_active, false)
            }
            SyntaxKind::EndRegionKeyword => {
                if self.lexer.directives.has_unfinished_region() {
                    self.skip_message();
                    Directive::new(DirectiveKind::EndRegion, cx.is_active, false)
                } else {
                    self.unexpected(cx)
                }
            }
            SyntaxKind::DefineKeyword | SyntaxKind::UndefKeyword => self.parse_define_or_undef(cx),
            SyntaxKind::ErrorKeyword | SyntaxKind::WarningKeyword => {
                let (kind, code) = if self.kind() == SyntaxKind::ErrorKeyword {
                    (DirectiveKind::Error, ErrorCode::ErrorDirective)
                } else {
                    (DirectiveKind::Warning, ErrorCode::WarningDirective)
                };
                let keyword_end = self.current_offset + self.current.width();
                self.skip_message();
                if cx.is_active {
                    self.diagnostics.push(Diagnostic::new(code, 0, keyword_end));
                }
                Directive::new(kind, cx.is_active, false)
            }
            SyntaxKind::LineKeyword => {
                self.skip_message();
                Directive::new(DirectiveKind::Line, cx.is_active, false)
            }
            SyntaxKind::PragmaKeyword => {
                self.skip_message();
                Directive::new(DirectiveKind::Pragma, cx.is_active, false)
            }
            SyntaxKind::NullableKeyword => {
                self.skip_message();
                Directive::new(DirectiveKind::Nullable, cx.is_active, false)
            }
            _ => {
                if cx.is_active {
                    self.error_at_current(ErrorCode::PreprocessorDirectiveExpected);
                }
                self.skip_to_end();
                Directive::new(DirectiveKind::Bad, cx.is_active, false)
            }
        };
        (directive, self.diagnostics)
    }

    fn parse_elif(&mut self, cx: DirectiveContext) -> Directive {
        if !self.lexer.directives.has_previous_if_or_elif() {
            return self.unexpected(cx);
        }
        self.bump();
        let value = self.parse_expression();
        self.expect_end();
        let taken = cx.end_is_active && !self.lexer.directives.previous_branch_taken() && value;
        Directive::new(DirectiveKind::Elif, cx.end_is_active, taken)
    }

    fn parse_else(&mut self, cx: DirectiveContext) -> Directive {
        if !self.lexer.directives.has_previous_if_or_elif() {
            return self.unexpected(cx);
        }
        self.bump();
        self.expect_end();
        let taken = cx.end_is_active && !self.lexer.directives.previous_branch_taken();
        Directive::new(DirectiveKind::Else, cx.end_is_active, taken)
    }

    /// `#elif`/`#else`/`#endif`/`#endregion` with nothing to match.
    fn unexpected(&mut self, cx: DirectiveContext) -> Directive {
        self.error_at_current(ErrorCode::UnexpectedDirective);
        self.bump();
        self.skip_to_end();
        Directive::new(DirectiveKind::Bad, cx.is_active, false)
    }

    fn parse_define_or_undef(&mut self, cx: DirectiveContext) -> Directive {
        let kind = if self.kind() == SyntaxKind::DefineKeyword {
            DirectiveKind::Define
        } else {
            DirectiveKind::Undef
        };
        if cx.after_first_token {
            self.error_at_current(ErrorCode::DefineAfterFirstToken);
        }
        self.bump();

        let identifier = if is_symbol_word(self.kind()) {
            let text = self.current.shared_text();
            self.bump();
            self.expect_end();
            Some(text)
        } else {
            self.error_at_current(ErrorCode::IdentifierExpected);
            self.skip_to_end();
            None
        };

        let mut directive = Directive::new(kind, cx.is_active, false);
        directive.identifier = identifier;
        directive
    }

    // === Expressions ===

    fn parse_expression(&mut self) -> bool {
        self.parse_or(0)
    }

    fn parse_or(&mut self, depth: u32) -> bool {
        let mut value = self.parse_and(depth);
        while self.kind() == SyntaxKind::BarBarToken {
            self.bump();
            let rhs = self.parse_and(depth);
            value = value || rhs;
        }
        value
    }

    fn parse_and(&mut self, depth: u32) -> bool {
        let mut value = self.parse_equality(depth);
        while self.kind() == SyntaxKind::AmpersandAmpersandToken {
            self.bump();
            let rhs = self.parse_equality(depth);
            value = value && rhs;
        }
        value
    }

    fn parse_equality(&mut self, depth: u32) -> bool {
        let mut value = self.parse_unary(depth);
        loop {
            let equals = match self.kind() {
                SyntaxKind::EqualsEqualsToken => true,
                SyntaxKind::ExclamationEqualsToken => false,
                _ => return value,
            };
            self.bump();
            let rhs = self.parse_unary(depth);
            value = (value == rhs) == equals;
        }
    }

    fn parse_unary(&mut self, depth: u32) -> bool {
        if depth > MAX_EXPRESSION_DEPTH {
            self.expression_error();
            return false;
        }
        if self.kind() == SyntaxKind::ExclamationToken {
            self.bump();
            return !self.parse_unary(depth + 1);
        }
        self.parse_primary(depth)
    }

    fn parse_primary(&mut self, depth: u32) -> bool {
        match self.kind() {
            SyntaxKind::OpenParenToken => {
                self.bump();
                let value = self.parse_or(depth + 1);
                if self.kind() == SyntaxKind::CloseParenToken {
                    self.bump();
                } else {
                    self.expression_error();
                }
                value
            }
            SyntaxKind::TrueKeyword => {
                self.bump();
                true
            }
            SyntaxKind::FalseKeyword => {
                self.bump();
                false
            }
            kind if is_symbol_word(kind) => {
                let defined = self.is_defined(self.current.text());
                self.bump();
                defined
            }
            _ => {
                self.expression_error();
                false
            }
        }
    }

    fn expression_error(&mut self) {
        if !self.failed {
            self.failed = true;
            self.error_at_current(ErrorCode::InvalidPreprocessorExpression);
        }
        self.skip_to_end();
    }

    fn is_defined(&self, symbol: &str) -> bool {
        match self.lexer.directives.is_defined(symbol) {
            DefineState::Defined => true,
            DefineState::Undefined => false,
            DefineState::Unspecified => self.lexer.options.is_symbol_defined(symbol),
        }
    }
}

/// Token usable as a conditional symbol.
///
/// Directive names and the shared keywords are ordinary symbols once the
/// directive name has been read.
fn is_symbol_word(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::IdentifierToken
        || kind.is_preprocessor_keyword()
        || matches!(
            kind,
            SyntaxKind::IfKeyword | SyntaxKind::ElseKeyword | SyntaxKind::DefaultKeyword
        )
}
