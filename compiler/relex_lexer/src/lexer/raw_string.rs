//! Raw string literals: `"""text"""` and the multi-line form.
//!
//! The opening delimiter is three or more quotes; the closing delimiter is
//! the same number of quotes. A literal whose opening delimiter is followed
//! only by whitespace up to the line break is multi-line: its closing
//! delimiter must sit alone on the last line, and the whitespace before it
//! is removed from the start of every content line.
//!
//! Only the first indentation problem is reported.

use relex_ir::{ErrorCode, SyntaxKind, TokenValue};
use relex_lexer_core::chars;

use super::{Lexer, TokenInfo};

struct RawLine {
    /// Document position of the first character.
    start: u32,
    text: String,
    /// Line break after the line.
    eol: String,
}

impl Lexer<'_> {
    pub(super) fn scan_raw_string_literal(&mut self) -> TokenInfo {
        let start = self.window.position();
        let quotes = self.run_of('"');
        self.window.advance_by(quotes);

        let mut lookahead = 0;
        while chars::is_whitespace(self.window.peek_at(lookahead)) {
            lookahead += 1;
        }
        let (kind, value) = if chars::is_newline(self.window.peek_at(lookahead)) {
            self.window.advance_by(lookahead);
            (SyntaxKind::MultiLineRawStringLiteralToken, self.scan_multi_line_raw(quotes))
        } else {
            (SyntaxKind::SingleLineRawStringLiteralToken, self.scan_single_line_raw(quotes))
        };

        let len = self.window.position() - start;
        TokenInfo::text(kind, self.window.get_text(start, len, false))
            .with_value(TokenValue::Text(value.into()))
    }

    /// Consume a closing run of `run >= quotes` quotes.
    fn close_raw(&mut self, quotes: u32, run: u32) {
        let pos = self.window.position();
        self.window.advance_by(run);
        if run > quotes {
            self.error(ErrorCode::TooManyClosingQuotesForRawString, pos + quotes, run - quotes);
        }
    }

    fn scan_single_line_raw(&mut self, quotes: u32) -> String {
        let mut value = String::new();
        loop {
            let ch = self.window.peek();
            if self.at_line_end(ch) {
                self.error(ErrorCode::UnterminatedRawString, self.window.position(), 0);
                return value;
            }
            if ch == '"' {
                let run = self.run_of('"');
                if run >= quotes {
                    self.close_raw(quotes, run);
                    return value;
                }
                value.extend(std::iter::repeat('"').take(run as usize));
                self.window.advance_by(run);
                continue;
            }
            value.push(ch);
            self.window.advance();
        }
    }

    fn scan_multi_line_raw(&mut self, quotes: u32) -> String {
        // Line break after the opening delimiter.
        let width = self.window.current_newline_width();
        self.window.advance_by(width);

        let mut lines: Vec<RawLine> = Vec::new();
        let indent = loop {
            let line_start = self.window.position();
            let mut text = String::new();
            while chars::is_whitespace(self.window.peek()) {
                text.push(self.window.next_char());
            }
            if self.window.peek() == '"' {
                let run = self.run_of('"');
                if run >= quotes {
                    self.close_raw(quotes, run);
                    break Some(text);
                }
            }

            loop {
                let ch = self.window.peek();
                if self.at_line_end(ch) {
                    break;
                }
                if ch == '"' {
                    let run = self.run_of('"');
                    if run >= quotes {
                        self.error(ErrorCode::RawStringDelimiterNotOnOwnLine, self.window.position(), run);
                        self.close_raw(quotes, run);
                        lines.push(RawLine {
                            start: line_start,
                            text,
                            eol: String::new(),
                        });
                        return join_lines(&lines, 0);
                    }
                    text.extend(std::iter::repeat('"').take(run as usize));
                    self.window.advance_by(run);
                    continue;
                }
                text.push(ch);
                self.window.advance();
            }

            if !chars::is_newline(self.window.peek()) {
                self.error(ErrorCode::UnterminatedRawString, self.window.position(), 0);
                lines.push(RawLine {
                    start: line_start,
                    text,
                    eol: String::new(),
                });
                break None;
            }
            let eol_start = self.window.position();
            let width = self.window.current_newline_width();
            self.window.advance_by(width);
            let eol = self.window.get_text(eol_start, width, false).into_string();
            lines.push(RawLine {
                start: line_start,
                text,
                eol,
            });
        };

        let Some(indent) = indent else {
            return join_lines(&lines, 0);
        };
        let indent: Vec<char> = indent.chars().collect();
        self.check_raw_indentation(&lines, &indent);
        join_lines(&lines, indent.len())
    }

    fn check_raw_indentation(&mut self, lines: &[RawLine], indent: &[char]) {
        for line in lines {
            if line.text.chars().all(chars::is_whitespace) {
                continue;
            }
            let prefix: Vec<char> = line.text.chars().take_while(|&c| chars::is_whitespace(c)).collect();
            let common = prefix.len().min(indent.len());
            if let Some(i) = (0..common).find(|&i| prefix[i] != indent[i]) {
                self.error(ErrorCode::LineContainsDifferentWhitespace, line.start + to_u32(i), 1);
                return;
            }
            if prefix.len() < indent.len() {
                self.error(
                    ErrorCode::LineDoesNotStartWithExpectedWhitespace,
                    line.start,
                    to_u32(prefix.len()),
                );
                return;
            }
        }
    }
}

/// Content lines with `indent` characters removed, joined by their own line
/// breaks. The break before the closing line is not content.
fn join_lines(lines: &[RawLine], indent: usize) -> String {
    let mut value = String::new();
    for (i, line) in lines.iter().enumerate() {
        if !line.text.chars().all(chars::is_whitespace) {
            value.extend(line.text.chars().skip(indent));
        }
        if i + 1 < lines.len() {
            value.push_str(&line.eol);
        }
    }
    value
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "line lengths are bounded by the document length"
)]
fn to_u32(n: usize) -> u32 {
    n as u32
}
