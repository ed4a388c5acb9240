#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use relex_ir::{GreenTrivia, SyntaxKind};
use relex_lexer_core::fnv;

use super::*;

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

#[test]
fn lookup_returns_shared_instance() {
    let mut cache = LexerCache::new();
    let key = chars("    ");
    let hash = fnv::hash_chars(&key);
    let a = cache.lookup_trivia(&key, hash, || {
        Arc::new(GreenTrivia::new(SyntaxKind::WhitespaceTrivia, "    "))
    });
    let b = cache.lookup_trivia(&key, hash, || unreachable!("second lookup must hit"));
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn collisions_overwrite() {
    let mut table: TextKeyedCache<u32> = TextKeyedCache::new(1);
    table.insert(&chars("a"), 0, 1);
    table.insert(&chars("b"), 2, 2);
    assert_eq!(table.find(&chars("a"), 0), None);
    assert_eq!(table.find(&chars("b"), 2), Some(&2));
}

#[test]
fn same_hash_different_text_misses() {
    let mut table: TextKeyedCache<u32> = TextKeyedCache::new(4);
    table.insert(&chars("abc"), 7, 1);
    assert_eq!(table.find(&chars("abd"), 7), None);
}

#[test]
fn keyword_lookup_is_memoized() {
    let mut cache = LexerCache::new();
    let key = chars("while");
    let hash = fnv::hash_chars(&key);
    assert_eq!(
        cache.try_get_keyword_kind(&key, hash),
        Some(Keyword::Reserved(SyntaxKind::WhileKeyword))
    );
    assert_eq!(cache.keywords.len(), 1);
    assert_eq!(
        cache.try_get_keyword_kind(&key, hash),
        Some(Keyword::Reserved(SyntaxKind::WhileKeyword))
    );
}

#[test]
fn long_identifiers_skip_keyword_table() {
    let mut cache = LexerCache::new();
    let key = chars("averylongidentifier");
    assert_eq!(cache.try_get_keyword_kind(&key, fnv::hash_chars(&key)), None);
    assert!(cache.keywords.is_empty());
}

#[test]
fn reset_clears_tables() {
    let mut cache = LexerCache::new();
    let key = chars("x");
    cache.try_get_keyword_kind(&key, fnv::hash_chars(&key));
    cache.scratch.push_str("abc");
    cache.reset();
    assert!(cache.keywords.is_empty());
    assert!(cache.scratch.is_empty());
    assert!(!cache.is_oversized());
}

#[test]
fn oversized_scratch_is_detected() {
    let mut cache = LexerCache::new();
    cache.scratch.reserve(MAX_SCRATCH_CAPACITY + 1);
    assert!(cache.is_oversized());
}
