//! 32-bit FNV-1a hashing over characters.
//!
//! Cache tables key lexemes by this hash so a lookup hashes the window's
//! characters in place instead of building a `String` first.

pub const OFFSET_BASIS: u32 = 0x811C_9DC5;
pub const PRIME: u32 = 0x0100_0193;

/// Fold one character into a running hash.
#[inline]
#[must_use]
pub const fn combine(ch: char, hash: u32) -> u32 {
    (hash ^ ch as u32).wrapping_mul(PRIME)
}

/// Hash a character slice.
#[inline]
pub fn hash_chars(chars: &[char]) -> u32 {
    chars.iter().fold(OFFSET_BASIS, |hash, &ch| combine(ch, hash))
}

/// Hash a string; agrees with [`hash_chars`] over the same characters.
#[inline]
pub fn hash_str(text: &str) -> u32 {
    text.chars().fold(OFFSET_BASIS, |hash, ch| combine(ch, hash))
}

#[cfg(test)]
mod tests;
