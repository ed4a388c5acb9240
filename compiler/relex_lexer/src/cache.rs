//! Per-session interning of tokens, trivia and keyword lookups.
//!
//! Each table is a fixed-size array indexed by the FNV hash of the lexeme's
//! characters. A slot holds one `(hash, key, value)` entry and a colliding
//! insert overwrites it, so the tables never grow. Keys are compared as
//! character slices straight out of the text window.
//!
//! # Session Lifetime
//!
//! Caches are pooled. A lexer takes one and [`reset`](LexerCache::reset)s it
//! when dropped, just before the pool gets it back. A pooled cache whose
//! scratch storage grew past a bound is discarded at the next take.

use std::sync::Arc;

use relex_ir::{GreenToken, GreenTrivia, TriviaList, MAX_KEYWORD_LENGTH};
use relex_lexer_core::Pool;

use crate::keywords::{self, Keyword};

/// Longest token (full width) the token table holds.
pub const MAX_CACHED_TOKEN_SIZE: u32 = 42;

const TOKEN_TABLE_BITS: u32 = 12;
const TRIVIA_TABLE_BITS: u32 = 10;
const KEYWORD_TABLE_BITS: u32 = 10;

/// Scratch string capacity above which a cache is replaced, not reset.
const MAX_SCRATCH_CAPACITY: usize = 1 << 16;
/// Trivia builder capacity above which a cache is replaced, not reset.
const MAX_TRIVIA_CAPACITY: usize = 64;

pub(crate) static CACHE_POOL: Pool<LexerCache> = Pool::new(4);

struct Entry<T> {
    hash: u32,
    key: Box<[char]>,
    value: T,
}

/// Direct-mapped table keyed by character slices.
pub struct TextKeyedCache<T> {
    slots: Box<[Option<Entry<T>>]>,
    mask: usize,
}

impl<T: Clone> TextKeyedCache<T> {
    /// Table with `1 << bits` slots.
    pub fn new(bits: u32) -> Self {
        let len = 1usize << bits;
        TextKeyedCache {
            slots: (0..len).map(|_| None).collect(),
            mask: len - 1,
        }
    }

    #[inline]
    fn slot(&self, hash: u32) -> usize {
        hash as usize & self.mask
    }

    pub fn find(&self, key: &[char], hash: u32) -> Option<&T> {
        match &self.slots[self.slot(hash)] {
            Some(entry) if entry.hash == hash && *entry.key == *key => Some(&entry.value),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: &[char], hash: u32, value: T) {
        let slot = self.slot(hash);
        self.slots[slot] = Some(Entry {
            hash,
            key: key.into(),
            value,
        });
    }

    /// Cached value for `key`, or the result of `create` (now cached).
    pub fn lookup(&mut self, key: &[char], hash: u32, create: impl FnOnce() -> T) -> T {
        if let Some(value) = self.find(key, hash) {
            return value.clone();
        }
        let value = create();
        self.insert(key, hash, value.clone());
        value
    }

    pub fn clear(&mut self) {
        for slot in &mut *self.slots {
            *slot = None;
        }
    }

    /// Occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lexer-owned caches and scratch buffers.
pub struct LexerCache {
    tokens: TextKeyedCache<Arc<GreenToken>>,
    trivia: TextKeyedCache<Arc<GreenTrivia>>,
    keywords: TextKeyedCache<Option<Keyword>>,
    /// Decoded literal text under construction.
    pub(crate) scratch: String,
    pub(crate) leading: TriviaList,
    pub(crate) trailing: TriviaList,
}

impl LexerCache {
    pub fn new() -> Self {
        LexerCache {
            tokens: TextKeyedCache::new(TOKEN_TABLE_BITS),
            trivia: TextKeyedCache::new(TRIVIA_TABLE_BITS),
            keywords: TextKeyedCache::new(KEYWORD_TABLE_BITS),
            scratch: String::new(),
            leading: TriviaList::new(),
            trailing: TriviaList::new(),
        }
    }

    pub fn lookup_token(
        &mut self,
        key: &[char],
        hash: u32,
        create: impl FnOnce() -> Arc<GreenToken>,
    ) -> Arc<GreenToken> {
        self.tokens.lookup(key, hash, create)
    }

    pub fn lookup_trivia(
        &mut self,
        key: &[char],
        hash: u32,
        create: impl FnOnce() -> Arc<GreenTrivia>,
    ) -> Arc<GreenTrivia> {
        self.trivia.lookup(key, hash, create)
    }

    /// Keyword classification of an identifier, memoized.
    ///
    /// Text longer than the longest keyword is never looked up.
    pub fn try_get_keyword_kind(&mut self, key: &[char], hash: u32) -> Option<Keyword> {
        if key.len() > MAX_KEYWORD_LENGTH {
            return None;
        }
        self.keywords.lookup(key, hash, || {
            let text: String = key.iter().collect();
            keywords::lookup(&text)
        })
    }

    /// Clear every table and scratch buffer for a new session.
    pub fn reset(&mut self) {
        self.tokens.clear();
        self.trivia.clear();
        self.keywords.clear();
        self.scratch.clear();
        self.leading.clear();
        self.trailing.clear();
    }

    /// Scratch storage grew past the bound for reuse.
    pub fn is_oversized(&self) -> bool {
        self.scratch.capacity() > MAX_SCRATCH_CAPACITY
            || self.leading.capacity() > MAX_TRIVIA_CAPACITY
            || self.trailing.capacity() > MAX_TRIVIA_CAPACITY
    }

    /// Occupied token slots.
    pub fn cached_tokens(&self) -> usize {
        self.tokens.len()
    }
}

impl Default for LexerCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
