//! String interner for identifier text.
//!
//! The text window interns identifier lexemes so repeated identifiers share
//! one allocation. Strings are stored as `Arc<str>`: the interner's tables
//! hold one reference and every [`TokenText`] built from an entry holds
//! another, so the text is freed once the interner and the tokens are gone.
//!
//! Entries are spread over [`Name::SHARDS`] lock-guarded shards, which lets
//! sessions on different threads share one interner through
//! [`SharedInterner`].

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};

use crate::{Name, TokenText};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternError {
    #[error("interner shard {shard} is full ({count} strings)")]
    ShardFull { shard: usize, count: usize },
}

#[derive(Default)]
struct Shard {
    slots: FxHashMap<Arc<str>, u32>,
    strings: Vec<Arc<str>>,
}

impl Shard {
    fn find(&self, text: &str) -> Option<(u32, &Arc<str>)> {
        let slot = *self.slots.get(text)?;
        Some((slot, &self.strings[slot as usize]))
    }
}

pub struct StringInterner {
    shards: [RwLock<Shard>; Name::SHARDS],
    len: AtomicUsize,
}

impl StringInterner {
    /// An interner holding only the empty string.
    pub fn new() -> Self {
        let interner = StringInterner {
            shards: std::array::from_fn(|_| RwLock::new(Shard::default())),
            len: AtomicUsize::new(0),
        };
        // Shard 0 of the empty string is fixed by `shard_of`, so this is `Name::EMPTY`.
        let _ = interner.insert("");
        interner
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "only the low bits select a shard"
    )]
    fn shard_of(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let mut hasher = FxHasher::default();
        text.hash(&mut hasher);
        hasher.finish() as usize % Name::SHARDS
    }

    fn insert(&self, text: &str) -> Result<(Name, Arc<str>), InternError> {
        let shard = Self::shard_of(text);
        if let Some((slot, shared)) = self.shards[shard].read().find(text) {
            return Ok((Name::from_parts(shard, slot), Arc::clone(shared)));
        }

        let mut guard = self.shards[shard].write();
        if let Some((slot, shared)) = guard.find(text) {
            return Ok((Name::from_parts(shard, slot), Arc::clone(shared)));
        }
        let count = guard.strings.len();
        let slot = u32::try_from(count)
            .ok()
            .filter(|&slot| slot <= Name::MAX_SLOT)
            .ok_or(InternError::ShardFull { shard, count })?;
        let shared: Arc<str> = Arc::from(text);
        guard.strings.push(Arc::clone(&shared));
        guard.slots.insert(Arc::clone(&shared), slot);
        self.len.fetch_add(1, Ordering::Relaxed);
        Ok((Name::from_parts(shard, slot), shared))
    }

    pub fn try_intern(&self, text: &str) -> Result<Name, InternError> {
        self.insert(text).map(|(name, _)| name)
    }

    /// Interned text for `text`.
    ///
    /// A full shard yields an unshared copy instead of an error.
    pub fn intern(&self, text: &str) -> TokenText {
        match self.insert(text) {
            Ok((_, shared)) => TokenText::Shared(shared),
            Err(error) => {
                tracing::debug!(%error, "interning skipped");
                TokenText::Owned(text.to_owned())
            }
        }
    }

    /// Text of `name`, if this interner handed it out.
    pub fn lookup(&self, name: Name) -> Option<Arc<str>> {
        self.shards
            .get(name.shard())?
            .read()
            .strings
            .get(name.slot())
            .cloned()
    }

    /// Number of interned strings, the empty string included.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Nothing interned beyond the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Interner shared by the lexing sessions of one workspace.
///
/// Sessions that re-lex the same document can share one so identifier text
/// is deduplicated across incremental passes. The text lives as long as the
/// last handle or token that refers to it.
#[derive(Clone, Default)]
pub struct SharedInterner(Arc<StringInterner>);

impl SharedInterner {
    pub fn new() -> Self {
        SharedInterner(Arc::new(StringInterner::new()))
    }
}

impl std::ops::Deref for SharedInterner {
    type Target = StringInterner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests;
