//! Interpolated strings as one opaque token.
//!
//! `$"..."`, `$@"..."`, `@$"..."` and raw `$"""..."""` (with one `$` per
//! brace needed to open a hole) are scanned to their closing delimiter,
//! holes and nested literals included, and returned as a single
//! `InterpolatedStringToken`. The grammar parser splits the text itself.
//!
//! Nesting (holes inside strings inside holes) is tracked on an explicit
//! frame stack.

use relex_ir::{ErrorCode, GreenNode, GreenToken, SyntaxKind, TriviaList};
use relex_lexer_core::{chars, INVALID_CHAR};

use super::{Lexer, TokenInfo};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Style {
    Regular,
    Verbatim,
    Raw { quotes: u32 },
}

#[derive(Copy, Clone, Debug)]
enum Frame {
    /// Literal text of an interpolated string.
    Text { style: Style, dollars: u32 },
    /// An interpolation hole.
    Hole {
        /// Open `(`, `[` and `{` inside the hole.
        depth: u32,
        /// Braces that close the hole.
        dollars: u32,
        /// Inside the `:format` part.
        format: bool,
    },
}

/// Prefix of an interpolated string.
struct Prefix {
    len: u32,
    dollars: u32,
    verbatim: bool,
}

impl Lexer<'_> {
    /// Length of the `$`/`@` prefix if an interpolated string starts here.
    pub(super) fn interpolated_string_prefix(&mut self) -> Option<u32> {
        self.interpolated_prefix().map(|prefix| prefix.len)
    }

    fn interpolated_prefix(&mut self) -> Option<Prefix> {
        let mut len = 0;
        let mut verbatim = false;
        if self.window.peek_at(len) == '@' {
            verbatim = true;
            len += 1;
        }
        let mut dollars = 0;
        while self.window.peek_at(len) == '$' {
            dollars += 1;
            len += 1;
        }
        if !verbatim && self.window.peek_at(len) == '@' {
            verbatim = true;
            len += 1;
        }
        if dollars == 0 || self.window.peek_at(len) != '"' {
            return None;
        }
        Some(Prefix {
            len,
            dollars,
            verbatim,
        })
    }

    /// Consume a prefix and opening quotes; the frame for the string text.
    fn open_interpolated(&mut self, prefix: &Prefix) -> Frame {
        self.window.advance_by(prefix.len);
        let quotes = self.run_of('"');
        let style = if quotes >= 3 {
            Style::Raw { quotes }
        } else if prefix.verbatim {
            Style::Verbatim
        } else {
            Style::Regular
        };
        self.window.advance_by(if quotes >= 3 { quotes } else { 1 });
        Frame::Text {
            style,
            dollars: prefix.dollars,
        }
    }

    pub(super) fn scan_interpolated_string(&mut self) -> TokenInfo {
        let start = self.window.position();
        let Some(prefix) = self.interpolated_prefix() else {
            return self.scan_bad_character();
        };
        let mut stack = vec![self.open_interpolated(&prefix)];

        while let Some(frame) = stack.last().copied() {
            let ch = self.window.peek();
            if ch == INVALID_CHAR && self.window.is_really_at_end() {
                self.error(ErrorCode::UnterminatedInterpolatedString, self.window.position(), 0);
                break;
            }
            match frame {
                Frame::Text { style, dollars } => {
                    if !self.step_text(&mut stack, style, dollars, ch) {
                        self.error(ErrorCode::UnterminatedInterpolatedString, self.window.position(), 0);
                        break;
                    }
                }
                Frame::Hole {
                    depth,
                    dollars,
                    format,
                } => self.step_hole(&mut stack, depth, dollars, format, ch),
            }
        }

        let len = self.window.position() - start;
        TokenInfo::text(SyntaxKind::InterpolatedStringToken, self.window.get_text(start, len, false))
    }

    /// Advance through string text. Returns `false` if a regular string
    /// reaches a line break.
    fn step_text(&mut self, stack: &mut Vec<Frame>, style: Style, dollars: u32, ch: char) -> bool {
        match (style, ch) {
            (Style::Raw { quotes }, '"') => {
                let run = self.run_of('"');
                self.window.advance_by(run);
                if run >= quotes {
                    stack.pop();
                }
            }
            (Style::Raw { .. }, '{') => {
                let run = self.run_of('{');
                self.window.advance_by(run);
                if run >= dollars {
                    stack.push(Frame::Hole {
                        depth: 0,
                        dollars,
                        format: false,
                    });
                }
            }
            (Style::Raw { .. }, _) => self.window.advance(),
            (_, '"') => {
                self.window.advance();
                if style == Style::Verbatim && self.window.peek() == '"' {
                    self.window.advance();
                } else {
                    stack.pop();
                }
            }
            (_, '{') | (_, '}') if self.window.peek_at(1) == ch => self.window.advance_by(2),
            (_, '{') => {
                self.window.advance();
                stack.push(Frame::Hole {
                    depth: 0,
                    dollars: 1,
                    format: false,
                });
            }
            (Style::Regular, '\\') => {
                self.window.advance();
                if !self.peek_is_line_end() {
                    self.window.advance();
                }
            }
            (Style::Regular, ch) if chars::is_newline(ch) => return false,
            _ => self.window.advance(),
        }
        true
    }

    fn step_hole(&mut self, stack: &mut Vec<Frame>, depth: u32, dollars: u32, format: bool, ch: char) {
        let set = |stack: &mut Vec<Frame>, depth: u32, format: bool| {
            if let Some(top) = stack.last_mut() {
                *top = Frame::Hole {
                    depth,
                    dollars,
                    format,
                };
            }
        };

        if ch == '}' && (format || depth == 0) {
            let run = self.run_of('}').min(dollars);
            self.window.advance_by(run);
            stack.pop();
            return;
        }
        if format {
            self.window.advance();
            return;
        }

        match ch {
            '(' | '[' | '{' => {
                self.window.advance();
                set(stack, depth + 1, false);
            }
            ')' | ']' | '}' => {
                self.window.advance();
                set(stack, depth.saturating_sub(1), false);
            }
            ':' if depth == 0 && self.window.peek_at(1) != ':' => {
                self.window.advance();
                set(stack, depth, true);
            }
            ':' if depth == 0 => self.window.advance_by(2),
            '$' | '@' => match self.interpolated_prefix() {
                Some(prefix) => {
                    let frame = self.open_interpolated(&prefix);
                    stack.push(frame);
                }
                None if ch == '@' && self.window.peek_at(1) == '"' => self.skip_nested_verbatim(),
                None => self.window.advance(),
            },
            '"' => self.skip_nested_string(),
            '\'' => self.skip_nested_char(),
            '/' if self.window.peek_at(1) == '/' => self.skip_to_end_of_line(),
            _ => self.window.advance(),
        }
    }

    /// Plain `"..."` inside a hole.
    fn skip_nested_string(&mut self) {
        let quotes = self.run_of('"');
        if quotes >= 3 {
            self.window.advance_by(quotes);
            loop {
                let ch = self.window.peek();
                if ch == INVALID_CHAR && self.window.is_really_at_end() {
                    return;
                }
                if ch == '"' {
                    let run = self.run_of('"');
                    self.window.advance_by(run);
                    if run >= quotes {
                        return;
                    }
                    continue;
                }
                self.window.advance();
            }
        }
        self.skip_quoted('"');
    }

    fn skip_nested_char(&mut self) {
        self.skip_quoted('\'');
    }

    /// `quote ... quote` with backslash escapes, stopping at a line end.
    fn skip_quoted(&mut self, quote: char) {
        self.window.advance();
        loop {
            let ch = self.window.peek();
            if self.at_line_end(ch) {
                return;
            }
            self.window.advance();
            if ch == quote {
                return;
            }
            if ch == '\\' && !self.peek_is_line_end() {
                self.window.advance();
            }
        }
    }

    fn skip_nested_verbatim(&mut self) {
        self.window.advance_by(2);
        loop {
            let ch = self.window.peek();
            if ch == INVALID_CHAR && self.window.is_really_at_end() {
                return;
            }
            self.window.advance();
            if ch == '"' {
                if self.window.peek() == '"' {
                    self.window.advance();
                } else {
                    return;
                }
            }
        }
    }
}

/// Collapse an interpolated-string node of an old tree into the single token
/// the fresh lexer would produce for it.
///
/// The token's leading and trailing trivia are those of the node's first and
/// last tokens; everything between becomes token text. The node's presence
/// flags carry over so the blender treats the token like the subtree.
pub fn rescan_interpolated_string(node: &GreenNode) -> GreenToken {
    let tokens: Vec<_> = node.tokens().collect();
    let last = tokens.len().saturating_sub(1);
    let mut text = String::new();
    let mut leading = TriviaList::new();
    let mut trailing = TriviaList::new();

    for (i, token) in tokens.iter().enumerate() {
        if i == 0 {
            leading.extend(token.leading().iter().cloned());
        } else {
            for trivia in token.leading() {
                text.push_str(trivia.text());
            }
        }
        text.push_str(token.text());
        if i == last {
            trailing.extend(token.trailing().iter().cloned());
        } else {
            for trivia in token.trailing() {
                text.push_str(trivia.text());
            }
        }
    }

    GreenToken::new(SyntaxKind::InterpolatedStringToken, text, leading, trailing)
        .with_carried_flags(node.flags())
}
