//! Whitespace, line breaks and comments.

use std::sync::Arc;

use relex_ir::{Diagnostic, ErrorCode, GreenTrivia, SyntaxKind};
use relex_lexer_core::{chars, fnv, INVALID_CHAR};

use super::xml_doc;
use super::Lexer;
use crate::DocumentationMode;

impl Lexer<'_> {
    /// Lex trivia into the cache's leading or trailing builder.
    ///
    /// Trailing trivia stop after the first line break, after a directive
    /// line, and before a documentation comment (which always leads the
    /// next token).
    pub(super) fn lex_syntax_trivia(&mut self, after_first_token: bool, at_line_start: bool, is_trailing: bool) {
        let mut only_whitespace_on_line = at_line_start;
        loop {
            self.window.start_lexeme();
            let ch = self.window.peek();
            if chars::is_whitespace(ch) {
                self.lex_whitespace(is_trailing);
                continue;
            }
            if chars::is_newline(ch) {
                self.lex_end_of_line(is_trailing);
                if is_trailing {
                    break;
                }
                only_whitespace_on_line = true;
                continue;
            }
            match ch {
                '/' => match self.window.peek_at(1) {
                    '/' => {
                        if self.at_single_line_doc_comment() {
                            if is_trailing {
                                break;
                            }
                            self.lex_single_line_doc_comment();
                        } else {
                            self.lex_single_line_comment(is_trailing);
                        }
                        only_whitespace_on_line = false;
                    }
                    '*' => {
                        if self.at_delimited_doc_comment() {
                            if is_trailing {
                                break;
                            }
                            self.lex_delimited_comment(true, false);
                        } else {
                            self.lex_delimited_comment(false, is_trailing);
                        }
                        only_whitespace_on_line = false;
                    }
                    _ => break,
                },
                '#' if self.options.allow_directives => {
                    self.lex_directive_and_excluded_trivia(
                        after_first_token,
                        is_trailing || !only_whitespace_on_line,
                        is_trailing,
                    );
                    if is_trailing {
                        break;
                    }
                    only_whitespace_on_line = true;
                }
                _ => break,
            }
        }
    }

    pub(super) fn push_trivia(&mut self, is_trailing: bool, trivia: Arc<GreenTrivia>) {
        if is_trailing {
            self.cache.trailing.push(trivia);
        } else {
            self.cache.leading.push(trivia);
        }
    }

    /// Whitespace or line-break trivia over `[start, start + len)`, shared
    /// through the session cache when the text fits in the window.
    pub(super) fn cached_trivia(&mut self, kind: SyntaxKind, start: u32, len: u32) -> Arc<GreenTrivia> {
        if let Some(key) = self.window.chunk_slice(start, len) {
            let hash = fnv::hash_chars(key);
            return self.cache.lookup_trivia(key, hash, || {
                Arc::new(GreenTrivia::new(kind, key.iter().collect::<String>()))
            });
        }
        let text = self.window.get_text(start, len, false);
        Arc::new(GreenTrivia::new(kind, text))
    }

    pub(super) fn scan_whitespace_trivia(&mut self) -> Arc<GreenTrivia> {
        let start = self.window.position();
        while chars::is_whitespace(self.window.peek()) {
            self.window.advance();
        }
        let len = self.window.position() - start;
        self.cached_trivia(SyntaxKind::WhitespaceTrivia, start, len)
    }

    pub(super) fn scan_end_of_line_trivia(&mut self) -> Arc<GreenTrivia> {
        let start = self.window.position();
        let width = self.window.current_newline_width();
        self.window.advance_by(width);
        self.cached_trivia(SyntaxKind::EndOfLineTrivia, start, width)
    }

    fn lex_whitespace(&mut self, is_trailing: bool) {
        let trivia = self.scan_whitespace_trivia();
        self.push_trivia(is_trailing, trivia);
    }

    fn lex_end_of_line(&mut self, is_trailing: bool) {
        let trivia = self.scan_end_of_line_trivia();
        self.push_trivia(is_trailing, trivia);
    }

    /// Advance to the next line break or the end of the document.
    pub(super) fn skip_to_end_of_line(&mut self) {
        loop {
            let ch = self.window.peek();
            if chars::is_newline(ch) || (ch == INVALID_CHAR && self.window.is_really_at_end()) {
                return;
            }
            self.window.advance();
        }
    }

    // === Comments ===

    /// `///` but not `////`.
    fn at_single_line_doc_comment(&mut self) -> bool {
        self.options.parses_documentation()
            && self.window.peek_at(2) == '/'
            && self.window.peek_at(3) != '/'
    }

    /// `/**` but not `/***` or `/**/`.
    fn at_delimited_doc_comment(&mut self) -> bool {
        self.options.parses_documentation()
            && self.window.peek_at(2) == '*'
            && self.window.peek_at(3) != '*'
            && self.window.peek_at(3) != '/'
    }

    fn lex_single_line_comment(&mut self, is_trailing: bool) {
        let start = self.window.position();
        self.skip_to_end_of_line();
        let len = self.window.position() - start;
        let text = self.window.get_text(start, len, false);
        let trivia = Arc::new(GreenTrivia::new(SyntaxKind::SingleLineCommentTrivia, text));
        self.push_trivia(is_trailing, trivia);
    }

    /// Consecutive `///` lines, joined with the line breaks between them.
    ///
    /// The final line break is left for ordinary trivia.
    fn lex_single_line_doc_comment(&mut self) {
        let start = self.window.position();
        loop {
            self.skip_to_end_of_line();
            let line_end = self.window.position();
            if !chars::is_newline(self.window.peek()) {
                break;
            }
            let width = self.window.current_newline_width();
            self.window.advance_by(width);
            while chars::is_whitespace(self.window.peek()) {
                self.window.advance();
            }
            let continues = self.window.peek() == '/'
                && self.window.peek_at(1) == '/'
                && self.window.peek_at(2) == '/'
                && self.window.peek_at(3) != '/';
            if !continues {
                self.window.reset(line_end);
                break;
            }
        }
        self.push_doc_comment(SyntaxKind::SingleLineDocumentationCommentTrivia, start);
    }

    /// `/* ... */`, or `/** ... */` when `is_doc`.
    fn lex_delimited_comment(&mut self, is_doc: bool, is_trailing: bool) {
        let start = self.window.position();
        self.window.advance_by(2);
        let mut terminated = false;
        loop {
            let ch = self.window.peek();
            if ch == INVALID_CHAR && self.window.is_really_at_end() {
                break;
            }
            if ch == '*' && self.window.peek_at(1) == '/' {
                self.window.advance_by(2);
                terminated = true;
                break;
            }
            self.window.advance();
        }

        if is_doc {
            self.push_doc_comment(SyntaxKind::MultiLineDocumentationCommentTrivia, start);
            return;
        }
        let len = self.window.position() - start;
        let text = self.window.get_text(start, len, false);
        let mut trivia = GreenTrivia::new(SyntaxKind::MultiLineCommentTrivia, text);
        if !terminated {
            trivia = trivia.with_diagnostics([Diagnostic::new(ErrorCode::UnterminatedComment, 0, 2)]);
        }
        self.push_trivia(is_trailing, Arc::new(trivia));
    }

    fn push_doc_comment(&mut self, kind: SyntaxKind, start: u32) {
        let len = self.window.position() - start;
        let text = self.window.get_text(start, len, false);
        let mut diagnostics = Vec::new();
        if kind == SyntaxKind::MultiLineDocumentationCommentTrivia && !text.ends_with("*/") {
            diagnostics.push(Diagnostic::new(ErrorCode::UnterminatedComment, 0, 3));
        }
        if self.options.documentation_mode == DocumentationMode::Diagnose {
            diagnostics.extend(xml_doc::check_comment_text(&text));
        }
        let mut trivia = GreenTrivia::new(kind, text);
        if !diagnostics.is_empty() {
            trivia = trivia.with_diagnostics(diagnostics);
        }
        self.push_trivia(false, Arc::new(trivia));
    }
}
