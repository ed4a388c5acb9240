//! Text carried by tokens, trivia and literal values.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Text of a token or trivia.
///
/// Fixed lexemes point at constants, interned identifiers share one
/// allocation with every other occurrence in the session, and everything
/// else owns its characters. The storage is released with the last holder.
///
/// Equality, ordering and hashing look only at the characters.
#[derive(Clone)]
pub enum TokenText {
    Static(&'static str),
    Shared(Arc<str>),
    Owned(String),
}

impl TokenText {
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            TokenText::Static(text) => text,
            TokenText::Shared(text) => text,
            TokenText::Owned(text) => text,
        }
    }

    /// The interned allocation, if this text is interned.
    #[inline]
    pub fn as_shared(&self) -> Option<&Arc<str>> {
        match self {
            TokenText::Shared(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            TokenText::Owned(text) => text,
            other => other.as_str().to_owned(),
        }
    }
}

impl Default for TokenText {
    fn default() -> Self {
        TokenText::Static("")
    }
}

impl Deref for TokenText {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for TokenText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for TokenText {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&'static str> for TokenText {
    fn from(text: &'static str) -> Self {
        TokenText::Static(text)
    }
}

impl From<String> for TokenText {
    fn from(text: String) -> Self {
        TokenText::Owned(text)
    }
}

impl From<Arc<str>> for TokenText {
    fn from(text: Arc<str>) -> Self {
        TokenText::Shared(text)
    }
}

impl PartialEq for TokenText {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TokenText {}

impl PartialEq<str> for TokenText {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for TokenText {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialOrd for TokenText {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TokenText {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for TokenText {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Debug for TokenText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for TokenText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
