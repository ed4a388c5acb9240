//! Numeric, character, string and verbatim string literals.

use relex_ir::{ErrorCode, SyntaxKind, TokenText, TokenValue};
use relex_lexer_core::{chars, INVALID_CHAR};

use super::{Lexer, TokenInfo};

/// Digits read by [`Lexer::scan_digits`].
struct DigitRun {
    count: u32,
    trailing_separator: bool,
}

impl Lexer<'_> {
    // === Numbers ===

    pub(super) fn scan_numeric_literal(&mut self) -> TokenInfo {
        let start = self.window.position();
        let mut digits = self.take_scratch();
        let mut radix = 10;
        let mut is_real = false;
        let mut malformed = false;

        let prefix = (self.window.peek(), self.window.peek_at(1));
        match prefix {
            ('0', 'x' | 'X') => {
                self.window.advance_by(2);
                radix = 16;
                let run = self.scan_digits(&mut digits, chars::is_hex_digit);
                malformed |= run.count == 0 || run.trailing_separator;
            }
            ('0', 'b' | 'B') => {
                self.window.advance_by(2);
                radix = 2;
                let run = self.scan_digits(&mut digits, chars::is_binary_digit);
                malformed |= run.count == 0 || run.trailing_separator;
            }
            _ => {
                let run = self.scan_digits(&mut digits, chars::is_decimal_digit);
                malformed |= run.trailing_separator;
                if self.window.peek() == '.' && chars::is_decimal_digit(self.window.peek_at(1)) {
                    is_real = true;
                    self.window.advance();
                    digits.push('.');
                    let run = self.scan_digits(&mut digits, chars::is_decimal_digit);
                    malformed |= run.trailing_separator;
                }
                if matches!(self.window.peek(), 'e' | 'E') {
                    is_real = true;
                    self.window.advance();
                    digits.push('e');
                    if let sign @ ('+' | '-') = self.window.peek() {
                        self.window.advance();
                        digits.push(sign);
                    }
                    let run = self.scan_digits(&mut digits, chars::is_decimal_digit);
                    malformed |= run.count == 0 || run.trailing_separator;
                }
            }
        }

        let first = self.window.peek().to_ascii_lowercase();
        let second = self.window.peek_at(1).to_ascii_lowercase();
        match (first, second) {
            ('u', 'l') | ('l', 'u') => {
                self.window.advance_by(2);
                malformed |= is_real;
            }
            ('u' | 'l', _) => {
                self.window.advance();
                malformed |= is_real;
            }
            ('f' | 'd' | 'm', _) if radix == 10 => {
                self.window.advance();
                is_real = true;
            }
            _ => {}
        }

        let len = self.window.position() - start;
        let value = if malformed {
            self.error(ErrorCode::InvalidNumber, start, len);
            None
        } else if is_real {
            match digits.parse::<f64>() {
                Ok(value) if value.is_finite() => Some(TokenValue::Real(value)),
                _ => {
                    self.error(ErrorCode::InvalidNumber, start, len);
                    None
                }
            }
        } else {
            match u64::from_str_radix(&digits, radix) {
                Ok(value) => Some(TokenValue::Integer(value)),
                Err(_) => {
                    self.error(ErrorCode::IntegerOverflow, start, len);
                    Some(TokenValue::Integer(0))
                }
            }
        };
        self.restore_scratch(digits);

        let info = TokenInfo::text(SyntaxKind::NumericLiteralToken, self.window.get_text(start, len, false));
        match value {
            Some(value) => info.with_value(value),
            None => info,
        }
    }

    /// Digits matching `is_digit`, with `_` separators dropped.
    fn scan_digits(&mut self, out: &mut String, is_digit: fn(char) -> bool) -> DigitRun {
        let mut run = DigitRun {
            count: 0,
            trailing_separator: false,
        };
        loop {
            let ch = self.window.peek();
            if is_digit(ch) {
                out.push(ch);
                run.count += 1;
                run.trailing_separator = false;
            } else if ch == '_' {
                run.trailing_separator = true;
            } else {
                return run;
            }
            self.window.advance();
        }
    }

    // === Characters and strings ===

    pub(super) fn scan_char_literal(&mut self) -> TokenInfo {
        let start = self.window.position();
        self.window.advance();
        let mut value = None;

        let ch = self.window.peek();
        if ch == '\'' {
            self.window.advance();
            self.error(ErrorCode::EmptyCharacterLiteral, start, 2);
        } else if self.at_line_end(ch) {
            self.error(ErrorCode::UnterminatedCharacter, self.window.position(), 0);
        } else {
            let mut scratch = self.take_scratch();
            self.scan_literal_char(&mut scratch);
            let decoded = scratch.chars().next();
            self.restore_scratch(scratch);

            if self.window.try_advance('\'') {
                value = decoded;
            } else {
                // Look for a closing quote later on the line.
                loop {
                    let ch = self.window.peek();
                    if ch == '\'' || self.at_line_end(ch) {
                        break;
                    }
                    self.window.advance();
                    if ch == '\\' && !self.peek_is_line_end() {
                        self.window.advance();
                    }
                }
                if self.window.try_advance('\'') {
                    let len = self.window.position() - start;
                    self.error(ErrorCode::TooManyCharactersInCharacterLiteral, start, len);
                } else {
                    self.error(ErrorCode::UnterminatedCharacter, self.window.position(), 0);
                }
            }
        }

        let len = self.window.position() - start;
        let info = TokenInfo::text(SyntaxKind::CharacterLiteralToken, self.window.get_text(start, len, false));
        match value {
            Some(ch) => info.with_value(TokenValue::Char(ch)),
            None => info,
        }
    }

    pub(super) fn scan_string_literal(&mut self) -> TokenInfo {
        let start = self.window.position();
        self.window.advance();
        let mut scratch = self.take_scratch();
        loop {
            let ch = self.window.peek();
            if ch == '"' {
                self.window.advance();
                break;
            }
            if self.at_line_end(ch) {
                self.error(ErrorCode::UnterminatedString, self.window.position(), 0);
                break;
            }
            self.scan_literal_char(&mut scratch);
        }
        let value = self.finish_scratch(scratch);
        let len = self.window.position() - start;
        TokenInfo::text(SyntaxKind::StringLiteralToken, self.window.get_text(start, len, false))
            .with_value(TokenValue::Text(value))
    }

    /// `@"..."`: no escapes, `""` is a quote, line breaks allowed.
    pub(super) fn scan_verbatim_string_literal(&mut self) -> TokenInfo {
        let start = self.window.position();
        self.window.advance_by(2);
        let mut scratch = self.take_scratch();
        loop {
            let ch = self.window.peek();
            if ch == '"' {
                self.window.advance();
                if self.window.try_advance('"') {
                    scratch.push('"');
                    continue;
                }
                break;
            }
            if ch == INVALID_CHAR && self.window.is_really_at_end() {
                self.error(ErrorCode::UnterminatedString, self.window.position(), 0);
                break;
            }
            scratch.push(ch);
            self.window.advance();
        }
        let value = self.finish_scratch(scratch);
        let len = self.window.position() - start;
        TokenInfo::text(SyntaxKind::StringLiteralToken, self.window.get_text(start, len, false))
            .with_value(TokenValue::Text(value))
    }

    /// Line break, or the end of the document.
    pub(super) fn at_line_end(&self, ch: char) -> bool {
        chars::is_newline(ch) || (ch == INVALID_CHAR && self.window.is_really_at_end())
    }

    pub(super) fn peek_is_line_end(&mut self) -> bool {
        let ch = self.window.peek();
        self.at_line_end(ch)
    }

    /// One literal character or escape sequence, decoded into `out`.
    fn scan_literal_char(&mut self, out: &mut String) {
        let ch = self.window.peek();
        if ch != '\\' {
            out.push(ch);
            self.window.advance();
            return;
        }

        let start = self.window.position();
        self.window.advance();
        let escape = self.window.peek();
        if self.at_line_end(escape) {
            self.error(ErrorCode::IllegalEscape, start, 1);
            return;
        }
        self.window.advance();
        let decoded = match escape {
            '\'' => Some('\''),
            '"' => Some('"'),
            '\\' => Some('\\'),
            '0' => Some('\0'),
            'a' => Some('\u{7}'),
            'b' => Some('\u{8}'),
            'e' => Some('\u{1B}'),
            'f' => Some('\u{C}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{B}'),
            'u' => self.scan_hex_escape(4, 4),
            'U' => self.scan_hex_escape(8, 8),
            'x' => self.scan_hex_escape(1, 4),
            _ => None,
        };
        match decoded {
            Some(ch) => out.push(ch),
            None => {
                let len = self.window.position() - start;
                self.error(ErrorCode::IllegalEscape, start, len);
            }
        }
    }

    fn scan_hex_escape(&mut self, min: u32, max: u32) -> Option<char> {
        let mut value = 0u32;
        let mut count = 0;
        while count < max {
            let Some(digit) = chars::hex_value(self.window.peek()) else {
                break;
            };
            value = (value << 4) | digit;
            count += 1;
            self.window.advance();
        }
        if count < min {
            return None;
        }
        char::from_u32(value)
    }

    // === Scratch ===

    pub(super) fn take_scratch(&mut self) -> String {
        let mut scratch = std::mem::take(&mut self.cache.scratch);
        scratch.clear();
        scratch
    }

    pub(super) fn restore_scratch(&mut self, mut scratch: String) {
        scratch.clear();
        self.cache.scratch = scratch;
    }

    /// Copy the decoded text out and give the buffer back.
    pub(super) fn finish_scratch(&mut self, scratch: String) -> TokenText {
        let text = TokenText::Owned(scratch.as_str().to_owned());
        self.restore_scratch(scratch);
        text
    }
}
