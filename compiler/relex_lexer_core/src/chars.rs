//! Character classification for the scanner.
//!
//! All predicates take a `char` and are `const`; the window's end sentinel
//! ([`INVALID_CHAR`](crate::INVALID_CHAR)) is none of these classes, so scan
//! loops terminate at end of input without a separate check.

/// Horizontal whitespace (not line terminators).
#[inline]
pub const fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{00A0}'
            | '\u{FEFF}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Line terminator: `\r`, `\n`, NEL, LS or PS.
#[inline]
pub const fn is_newline(ch: char) -> bool {
    matches!(ch, '\r' | '\n' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}

/// Width of the line terminator starting with `first`, given the character
/// after it: `\r\n` counts as one two-character terminator.
#[inline]
pub const fn newline_width(first: char, second: char) -> u32 {
    if first == '\r' && second == '\n' {
        2
    } else {
        1
    }
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric() || matches!(ch, '\u{200C}' | '\u{200D}')
}

#[inline]
pub const fn is_decimal_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub const fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[inline]
pub const fn is_binary_digit(ch: char) -> bool {
    matches!(ch, '0' | '1')
}

/// Numeric value of a hex digit, or `None`.
#[inline]
pub const fn hex_value(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => Some(ch as u32 - '0' as u32),
        'a'..='f' => Some(ch as u32 - 'a' as u32 + 10),
        'A'..='F' => Some(ch as u32 - 'A' as u32 + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
