//! Documentation comment modes.
//!
//! In syntax mode a documentation comment is one trivia. A caller that wants
//! its structure repositions the lexer at the comment start and asks for
//! tokens in the documentation modes instead. The location and style fields
//! of the mode tell the lexer where it is: before a line's `///` or `*`
//! exterior, inside the text, or past the end. Every token call reads and
//! updates them.
//!
//! Documentation tokens never carry trailing trivia. Exterior markers and,
//! in tag-like modes, whitespace and line breaks lead the next token.

use std::sync::Arc;

use relex_ir::{Diagnostic, ErrorCode, GreenToken, GreenTrivia, SyntaxKind, TokenValue, TriviaList};
use relex_lexer_core::{chars, INVALID_CHAR};

use super::{Lexer, TokenInfo};
use crate::{DocCommentLocation, DocCommentStyle, DocumentationMode, LexerMode};

impl Lexer<'_> {
    pub(super) fn lex_xml_token(&mut self, mode: &mut LexerMode) -> Arc<GreenToken> {
        let full_start = self.window.position();
        let kind = mode.kind();
        let mut leading = TriviaList::new();
        if takes_whitespace_trivia(kind) {
            self.lex_doc_trivia_with_whitespace(mode, &mut leading);
        } else {
            self.lex_doc_exterior(mode, &mut leading);
        }

        self.window.start_lexeme();
        let info = if mode.location() == DocCommentLocation::End || self.at_document_end() {
            self.report_unterminated_section(kind);
            TokenInfo::fixed(SyntaxKind::EndOfDocumentationCommentToken)
        } else {
            self.scan_xml_token(mode)
        };

        Arc::new(self.build_token(full_start, info, leading, TriviaList::new()))
    }

    fn scan_xml_token(&mut self, mode: &mut LexerMode) -> TokenInfo {
        let kind = mode.kind();
        let delimited = mode.style() == DocCommentStyle::Delimited;
        let ch = self.window.peek();
        if chars::is_newline(ch) {
            return self.scan_doc_newline(mode);
        }

        if kind == LexerMode::XML_ELEMENT_TAG {
            self.scan_element_tag_token(ch)
        } else if kind == LexerMode::XML_ATTRIBUTE_TEXT_QUOTE || kind == LexerMode::XML_ATTRIBUTE_TEXT_DOUBLE_QUOTE {
            let quote = if kind == LexerMode::XML_ATTRIBUTE_TEXT_QUOTE { '\'' } else { '"' };
            self.scan_attribute_text_token(ch, quote, delimited)
        } else if kind == LexerMode::XML_CREF_QUOTE || kind == LexerMode::XML_NAME_QUOTE {
            self.scan_reference_token(ch, '\'')
        } else if kind == LexerMode::XML_CREF_DOUBLE_QUOTE || kind == LexerMode::XML_NAME_DOUBLE_QUOTE {
            self.scan_reference_token(ch, '"')
        } else if kind == LexerMode::XML_CDATA_SECTION_TEXT {
            if self.at_str("]]>") {
                self.fixed_token(SyntaxKind::XmlCDataEndToken)
            } else {
                self.scan_doc_text(delimited, |ahead| ahead == [']', ']', '>'])
            }
        } else if kind == LexerMode::XML_COMMENT_TEXT {
            if self.at_str("-->") {
                self.fixed_token(SyntaxKind::XmlCommentEndToken)
            } else if self.at_str("--") {
                self.fixed_token(SyntaxKind::MinusMinusToken)
            } else {
                self.scan_doc_text(delimited, |ahead| ahead[0] == '-' && ahead[1] == '-')
            }
        } else if kind == LexerMode::XML_PROCESSING_INSTRUCTION_TEXT {
            if self.at_str("?>") {
                self.fixed_token(SyntaxKind::XmlProcessingInstructionEndToken)
            } else {
                self.scan_doc_text(delimited, |ahead| ahead[0] == '?' && ahead[1] == '>')
            }
        } else if kind == LexerMode::XML_CHARACTER {
            if ch == '&' {
                self.scan_xml_entity()
            } else {
                let start = self.window.position();
                self.window.advance();
                let text = self.window.get_text(start, 1, false);
                TokenInfo::text(SyntaxKind::XmlTextLiteralToken, text.clone()).with_value(TokenValue::Text(text))
            }
        } else {
            self.scan_content_token(ch, delimited)
        }
    }

    // === Exterior ===

    /// Consume the exterior of the current line (`///`, `/**`, `*`, `*/`)
    /// into `leading` and update the location.
    fn lex_doc_exterior(&mut self, mode: &mut LexerMode, leading: &mut TriviaList) {
        let start = self.window.position();
        let style = mode.style();
        match (mode.location(), style) {
            (DocCommentLocation::Start, DocCommentStyle::Delimited) => {
                if self.at_str("/**") && self.window.peek_at(3) != '*' {
                    self.window.advance_by(3);
                    self.push_exterior(leading, start);
                    *mode = mode.with_location(DocCommentLocation::Interior);
                }
            }
            (DocCommentLocation::Start | DocCommentLocation::Exterior, _) => {
                while chars::is_whitespace(self.window.peek()) {
                    self.window.advance();
                }
                match style {
                    DocCommentStyle::SingleLine => {
                        if self.at_str("///") && self.window.peek_at(3) != '/' {
                            self.window.advance_by(3);
                            self.push_exterior(leading, start);
                            *mode = mode.with_location(DocCommentLocation::Interior);
                        } else {
                            // The comment ended with the previous line.
                            self.window.reset(start);
                            *mode = mode.with_location(DocCommentLocation::End);
                        }
                    }
                    DocCommentStyle::Delimited => {
                        while self.window.peek() == '*' && self.window.peek_at(1) != '/' {
                            self.window.advance();
                        }
                        self.push_exterior(leading, start);
                        *mode = mode.with_location(DocCommentLocation::Interior);
                        self.lex_doc_comment_close(mode, leading);
                    }
                }
            }
            (DocCommentLocation::Interior, DocCommentStyle::Delimited) => {
                self.lex_doc_comment_close(mode, leading);
            }
            _ => {}
        }
    }

    /// `*/` ending a delimited comment.
    fn lex_doc_comment_close(&mut self, mode: &mut LexerMode, leading: &mut TriviaList) {
        if self.at_str("*/") {
            let start = self.window.position();
            self.window.advance_by(2);
            self.push_exterior(leading, start);
            *mode = mode.with_location(DocCommentLocation::End);
        }
    }

    fn push_exterior(&mut self, leading: &mut TriviaList, start: u32) {
        let len = self.window.position() - start;
        if len > 0 {
            let text = self.window.get_text(start, len, true);
            leading.push(Arc::new(GreenTrivia::new(
                SyntaxKind::DocumentationCommentExteriorTrivia,
                text,
            )));
        }
    }

    /// Exterior plus whitespace and line breaks, for modes where those
    /// separate tokens instead of being text.
    fn lex_doc_trivia_with_whitespace(&mut self, mode: &mut LexerMode, leading: &mut TriviaList) {
        loop {
            self.lex_doc_exterior(mode, leading);
            if mode.location() != DocCommentLocation::Interior {
                return;
            }
            let ch = self.window.peek();
            if chars::is_whitespace(ch) {
                let trivia = self.scan_whitespace_trivia();
                leading.push(trivia);
            } else if chars::is_newline(ch) {
                let trivia = self.scan_end_of_line_trivia();
                leading.push(trivia);
                *mode = mode.with_location(DocCommentLocation::Exterior);
            } else {
                return;
            }
        }
    }

    // === Tokens ===

    fn fixed_token(&mut self, kind: SyntaxKind) -> TokenInfo {
        let len = kind.text().map_or(0, char_count);
        self.window.advance_by(len);
        TokenInfo::fixed(kind)
    }

    /// The next characters are exactly `text`.
    fn at_str(&mut self, text: &str) -> bool {
        text.chars()
            .zip(0..)
            .all(|(expected, offset)| self.window.peek_at(offset) == expected)
    }

    fn at_document_end(&mut self) -> bool {
        self.window.peek() == INVALID_CHAR && self.window.is_really_at_end()
    }

    fn scan_doc_newline(&mut self, mode: &mut LexerMode) -> TokenInfo {
        let start = self.window.position();
        let width = self.window.current_newline_width();
        self.window.advance_by(width);
        *mode = mode.with_location(DocCommentLocation::Exterior);
        let text = self.window.get_text(start, width, false);
        TokenInfo::text(SyntaxKind::XmlTextLiteralNewLineToken, text.clone()).with_value(TokenValue::Text(text))
    }

    /// Text up to a line break, the end of the document, `*/` in a delimited
    /// comment, or wherever `stops` matches the next three characters.
    fn scan_doc_text(&mut self, delimited: bool, stops: fn([char; 3]) -> bool) -> TokenInfo {
        let start = self.window.position();
        loop {
            let ahead = [self.window.peek(), self.window.peek_at(1), self.window.peek_at(2)];
            if self.at_line_end(ahead[0]) || stops(ahead) || (delimited && ahead[0] == '*' && ahead[1] == '/') {
                break;
            }
            self.window.advance();
        }
        let len = self.window.position() - start;
        let text = self.window.get_text(start, len, false);
        TokenInfo::text(SyntaxKind::XmlTextLiteralToken, text.clone()).with_value(TokenValue::Text(text))
    }

    /// `<`, `</`, `<!--`, `<![CDATA[` or `<?`.
    fn scan_tag_start(&mut self) -> TokenInfo {
        let kind = if self.at_str("<!--") {
            SyntaxKind::XmlCommentStartToken
        } else if self.at_str("<![CDATA[") {
            SyntaxKind::XmlCDataStartToken
        } else if self.at_str("</") {
            SyntaxKind::LessThanSlashToken
        } else if self.at_str("<?") {
            SyntaxKind::XmlProcessingInstructionStartToken
        } else {
            SyntaxKind::LessThanToken
        };
        self.fixed_token(kind)
    }

    /// Element content: text, entities and tag starts.
    fn scan_content_token(&mut self, ch: char, delimited: bool) -> TokenInfo {
        match ch {
            '&' => self.scan_xml_entity(),
            '<' => self.scan_tag_start(),
            ']' if self.at_str("]]>") => {
                let start = self.window.position();
                self.window.advance_by(3);
                let text = self.window.get_text(start, 3, false);
                TokenInfo::text(SyntaxKind::XmlTextLiteralToken, text.clone()).with_value(TokenValue::Text(text))
            }
            _ => self.scan_doc_text(delimited, |ahead| {
                matches!(ahead[0], '&' | '<') || ahead == [']', ']', '>']
            }),
        }
    }

    fn scan_element_tag_token(&mut self, ch: char) -> TokenInfo {
        match ch {
            '<' => self.scan_tag_start(),
            '>' => self.fixed_token(SyntaxKind::GreaterThanToken),
            '/' if self.window.peek_at(1) == '>' => self.fixed_token(SyntaxKind::SlashGreaterThanToken),
            '"' => self.fixed_token(SyntaxKind::DoubleQuoteToken),
            '\'' => self.fixed_token(SyntaxKind::SingleQuoteToken),
            '=' => self.fixed_token(SyntaxKind::EqualsToken),
            ':' => self.fixed_token(SyntaxKind::ColonToken),
            ch if is_xml_name_start(ch) => self.scan_xml_name(),
            _ => {
                let start = self.window.position();
                self.window.advance();
                self.error(ErrorCode::XmlInvalidCharacter, start, 1);
                TokenInfo::text(SyntaxKind::BadToken, self.window.get_text(start, 1, false))
            }
        }
    }

    fn scan_attribute_text_token(&mut self, ch: char, quote: char, delimited: bool) -> TokenInfo {
        match ch {
            '"' if quote == '"' => self.fixed_token(SyntaxKind::DoubleQuoteToken),
            '\'' if quote == '\'' => self.fixed_token(SyntaxKind::SingleQuoteToken),
            '&' => self.scan_xml_entity(),
            '<' => {
                self.error(ErrorCode::XmlInvalidCharacter, self.window.position(), 1);
                self.fixed_token(SyntaxKind::LessThanToken)
            }
            _ if quote == '"' => self.scan_doc_text(delimited, |ahead| matches!(ahead[0], '"' | '&' | '<')),
            _ => self.scan_doc_text(delimited, |ahead| matches!(ahead[0], '\'' | '&' | '<')),
        }
    }

    /// Inside a `cref` or `name` attribute value: names, entities and
    /// ordinary punctuation up to the closing quote.
    fn scan_reference_token(&mut self, ch: char, quote: char) -> TokenInfo {
        match ch {
            '"' if quote == '"' => self.fixed_token(SyntaxKind::DoubleQuoteToken),
            '\'' if quote == '\'' => self.fixed_token(SyntaxKind::SingleQuoteToken),
            '&' => self.scan_xml_entity(),
            ch if is_xml_name_start(ch) => self.scan_xml_name(),
            ch => self.scan_punctuation(ch),
        }
    }

    fn scan_xml_name(&mut self) -> TokenInfo {
        let start = self.window.position();
        while is_xml_name_char(self.window.peek()) {
            self.window.advance();
        }
        let len = self.window.position() - start;
        let text = self.window.get_text(start, len, true);
        TokenInfo::text(SyntaxKind::XmlNameToken, text.clone()).with_value(TokenValue::Text(text))
    }

    /// `&name;`, `&#123;` or `&#x7B;`.
    fn scan_xml_entity(&mut self) -> TokenInfo {
        let start = self.window.position();
        self.window.advance();

        let value = if is_xml_name_start(self.window.peek()) {
            let name_start = self.window.position();
            while is_xml_name_char(self.window.peek()) {
                self.window.advance();
            }
            let name = self
                .window
                .get_text(name_start, self.window.position() - name_start, false);
            match name.as_ref() {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "apos" => Some('\''),
                "quot" => Some('"'),
                _ => None,
            }
        } else if self.window.try_advance('#') {
            let radix = if self.window.try_advance('x') { 16 } else { 10 };
            let mut code = Some(0u32);
            let mut digits = 0;
            while let Some(digit) = self.window.peek().to_digit(radix) {
                code = code
                    .and_then(|code| code.checked_mul(radix))
                    .and_then(|code| code.checked_add(digit));
                digits += 1;
                self.window.advance();
            }
            code.filter(|_| digits > 0)
                .and_then(char::from_u32)
                .filter(|&ch| is_xml_char(ch))
        } else {
            None
        };

        let terminated = self.window.try_advance(';');
        let len = self.window.position() - start;
        let text = self.window.get_text(start, len, false);
        let value = match value {
            Some(ch) if terminated => TokenValue::Text(ch.to_string().into()),
            _ => {
                self.error(ErrorCode::XmlInvalidCharacter, start, len);
                TokenValue::Text(text.clone())
            }
        };
        TokenInfo::text(SyntaxKind::XmlEntityLiteralToken, text).with_value(value)
    }

    /// A comment or CDATA section still open when the documentation
    /// comment ends.
    fn report_unterminated_section(&mut self, kind: LexerMode) {
        if self.options.documentation_mode != DocumentationMode::Diagnose {
            return;
        }
        let pos = self.window.position();
        if kind == LexerMode::XML_COMMENT_TEXT {
            self.error(ErrorCode::XmlUnterminatedComment, pos, 0);
        } else if kind == LexerMode::XML_CDATA_SECTION_TEXT {
            self.error(ErrorCode::XmlUnterminatedCData, pos, 0);
        }
    }
}

/// Modes whose tokens are separated by whitespace rather than containing it.
fn takes_whitespace_trivia(kind: LexerMode) -> bool {
    kind == LexerMode::XML_ELEMENT_TAG
        || kind == LexerMode::XML_CHARACTER
        || kind == LexerMode::XML_CREF_QUOTE
        || kind == LexerMode::XML_CREF_DOUBLE_QUOTE
        || kind == LexerMode::XML_NAME_QUOTE
        || kind == LexerMode::XML_NAME_DOUBLE_QUOTE
}

fn is_xml_name_start(ch: char) -> bool {
    ch != INVALID_CHAR && chars::is_identifier_start(ch)
}

fn is_xml_name_char(ch: char) -> bool {
    ch != INVALID_CHAR && (chars::is_identifier_part(ch) || ch == '-' || ch == '.')
}

/// The XML 1.0 `Char` production.
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn char_count(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

/// `<!--` and `<![CDATA[` sections left open in a documentation comment's
/// text, with offsets relative to the comment start.
pub(super) fn check_comment_text(text: &str) -> Vec<Diagnostic> {
    const SECTIONS: [(&str, &str, ErrorCode); 2] = [
        ("<!--", "-->", ErrorCode::XmlUnterminatedComment),
        ("<![CDATA[", "]]>", ErrorCode::XmlUnterminatedCData),
    ];

    let mut diagnostics = Vec::new();
    let mut rest = text;
    let mut offset = 0;
    while let Some(lt) = rest.find('<') {
        offset += char_count(&rest[..lt]);
        rest = &rest[lt..];
        let Some(&(open, close, code)) = SECTIONS.iter().find(|(open, _, _)| rest.starts_with(open)) else {
            offset += 1;
            rest = &rest[1..];
            continue;
        };
        match rest[open.len()..].find(close) {
            Some(end) => {
                let skip = open.len() + end + close.len();
                offset += char_count(&rest[..skip]);
                rest = &rest[skip..];
            }
            None => {
                diagnostics.push(Diagnostic::new(code, offset, char_count(open)));
                break;
            }
        }
    }
    diagnostics
}
