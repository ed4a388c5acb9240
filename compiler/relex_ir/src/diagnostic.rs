//! Lexical diagnostics attached to tokens and trivia.
//!
//! Lexing never fails: every problem becomes a [`Diagnostic`] stored on the
//! trivia or token that contains it. Offsets are relative to the owning
//! element's full start (leading trivia included), so a diagnostic stays
//! valid when the element is reused at a different absolute position.

use std::fmt;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Error codes for lexical diagnostics.
///
/// Format: E#### where the second digit indicates the area:
/// - E00xx: token and trivia scanning
/// - E01xx: preprocessor directives
/// - E02xx: documentation comments
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // === Scanning (E00xx) ===
    /// `/*` without a closing `*/`.
    UnterminatedComment,
    /// String literal reaches end of line or file.
    UnterminatedString,
    /// Character literal without a closing quote.
    UnterminatedCharacter,
    /// `''`
    EmptyCharacterLiteral,
    /// More than one character between single quotes.
    TooManyCharactersInCharacterLiteral,
    /// Unknown escape sequence.
    IllegalEscape,
    /// Malformed numeric literal.
    InvalidNumber,
    /// Integer literal does not fit in 64 bits.
    IntegerOverflow,
    /// Character that starts no token.
    UnexpectedCharacter,
    /// Raw string literal without its closing delimiter.
    UnterminatedRawString,
    /// Closing raw-string delimiter is not alone on its line.
    RawStringDelimiterNotOnOwnLine,
    /// Closing delimiter has more quotes than the opening one.
    TooManyClosingQuotesForRawString,
    /// Multi-line raw string content line does not begin with the closing
    /// delimiter's indentation.
    LineDoesNotStartWithExpectedWhitespace,
    /// Content line's indentation differs from the closing delimiter's
    /// indentation at a specific whitespace character.
    LineContainsDifferentWhitespace,
    /// Interpolated string without its closing delimiter.
    UnterminatedInterpolatedString,

    // === Directives (E01xx) ===
    /// `#` directive not at the start of a line.
    BadDirectivePlacement,
    /// `#elif`, `#else`, `#endif` or `#endregion` with nothing to match.
    UnexpectedDirective,
    /// End of file inside an `#if`.
    EndIfDirectiveExpected,
    /// End of file inside a `#region`.
    EndRegionDirectiveExpected,
    /// `#define` or `#undef` after the first token of the file.
    DefineAfterFirstToken,
    /// Malformed `#if`/`#elif` condition.
    InvalidPreprocessorExpression,
    /// `#define`/`#undef` without a symbol.
    IdentifierExpected,
    /// Extra text after a complete directive.
    EndOfDirectiveExpected,
    /// `#` followed by an unknown directive name.
    PreprocessorDirectiveExpected,
    /// User-written `#error`.
    ErrorDirective,
    /// User-written `#warning`.
    WarningDirective,

    // === Documentation comments (E02xx) ===
    /// `<!--` without `-->` before the comment ends.
    XmlUnterminatedComment,
    /// `<![CDATA[` without `]]>` before the comment ends.
    XmlUnterminatedCData,
    /// Character not allowed in XML text.
    XmlInvalidCharacter,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnterminatedComment => "E0001",
            ErrorCode::UnterminatedString => "E0002",
            ErrorCode::UnterminatedCharacter => "E0003",
            ErrorCode::EmptyCharacterLiteral => "E0004",
            ErrorCode::TooManyCharactersInCharacterLiteral => "E0005",
            ErrorCode::IllegalEscape => "E0006",
            ErrorCode::InvalidNumber => "E0007",
            ErrorCode::IntegerOverflow => "E0008",
            ErrorCode::UnexpectedCharacter => "E0009",
            ErrorCode::UnterminatedRawString => "E0010",
            ErrorCode::RawStringDelimiterNotOnOwnLine => "E0011",
            ErrorCode::TooManyClosingQuotesForRawString => "E0012",
            ErrorCode::LineDoesNotStartWithExpectedWhitespace => "E0013",
            ErrorCode::LineContainsDifferentWhitespace => "E0014",
            ErrorCode::UnterminatedInterpolatedString => "E0015",
            ErrorCode::BadDirectivePlacement => "E0101",
            ErrorCode::UnexpectedDirective => "E0102",
            ErrorCode::EndIfDirectiveExpected => "E0103",
            ErrorCode::EndRegionDirectiveExpected => "E0104",
            ErrorCode::DefineAfterFirstToken => "E0105",
            ErrorCode::InvalidPreprocessorExpression => "E0106",
            ErrorCode::IdentifierExpected => "E0107",
            ErrorCode::EndOfDirectiveExpected => "E0108",
            ErrorCode::PreprocessorDirectiveExpected => "E0109",
            ErrorCode::ErrorDirective => "E0110",
            ErrorCode::WarningDirective => "E0111",
            ErrorCode::XmlUnterminatedComment => "E0201",
            ErrorCode::XmlUnterminatedCData => "E0202",
            ErrorCode::XmlInvalidCharacter => "E0203",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            ErrorCode::WarningDirective => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexical diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: ErrorCode,
    /// Offset from the owning element's full start.
    pub offset: u32,
    /// Width of the offending text; zero for a point of failure.
    pub width: u32,
}

impl Diagnostic {
    #[inline]
    pub const fn new(code: ErrorCode, offset: u32, width: u32) -> Self {
        Diagnostic {
            code,
            offset,
            width,
        }
    }

    /// Same diagnostic moved `delta` characters further from the element start.
    #[inline]
    #[must_use]
    pub const fn shifted(self, delta: u32) -> Self {
        Diagnostic {
            offset: self.offset + delta,
            ..self
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] at +{} (width {})",
            self.code.severity(),
            self.code,
            self.offset,
            self.width
        )
    }
}

#[cfg(test)]
mod tests;
