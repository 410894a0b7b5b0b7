//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use tzfanim::{
    CorpusProvider, LetterMapSet, SearchConfig, SearchEngine, SearchOptions, SearchResponse,
    TextCorpus,
};

// Re-export canonical fixtures from tzfanim::testing
pub use tzfanim::testing::{sample_corpus, synthetic_corpus, CountingCorpus, SAMPLE_CORPUS};

// ============================================================================
// CONFIG AND OPTIONS
// ============================================================================

/// Default config with small batches so even tiny corpora split into
/// several partitions.
pub fn config_with_workers(workers: usize) -> SearchConfig {
    SearchConfig {
        workers,
        batch_size_multiplier: 1,
        ..SearchConfig::default()
    }
}

pub fn loose() -> SearchOptions {
    SearchOptions {
        use_cache: false,
        strict_word_boundary: Some(false),
        ..SearchOptions::default()
    }
}

pub fn strict() -> SearchOptions {
    SearchOptions {
        use_cache: false,
        strict_word_boundary: Some(true),
        ..SearchOptions::default()
    }
}

// ============================================================================
// ENGINES
// ============================================================================

pub fn engine_for(text: &str, config: SearchConfig, letters: LetterMapSet) -> SearchEngine {
    let corpus: Arc<dyn CorpusProvider> = Arc::new(TextCorpus::from_text(text));
    SearchEngine::new(config, corpus, letters)
}

pub fn sample_engine() -> SearchEngine {
    SearchEngine::new(config_with_workers(4), sample_corpus(), LetterMapSet::standard())
}

// ============================================================================
// RESPONSE HELPERS
// ============================================================================

/// Every `(book, chapter, verse)` a response points at.
pub fn verse_keys(response: &SearchResponse) -> BTreeSet<(String, String, String)> {
    response
        .results
        .iter()
        .flat_map(|r| &r.locations)
        .map(|l| (l.book.clone(), l.chapter.clone(), l.verse.clone()))
        .collect()
}

/// Groups as `(variant, sorted locations)` pairs, for order-free comparison.
pub fn grouped(response: &SearchResponse) -> BTreeSet<(String, Vec<String>)> {
    response
        .results
        .iter()
        .map(|r| {
            let mut locations: Vec<String> = r
                .locations
                .iter()
                .map(|l| format!("{}|{}|{}|{}", l.book, l.chapter, l.verse, l.highlighted_text))
                .collect();
            locations.sort();
            (r.variant.clone(), locations)
        })
        .collect()
}
