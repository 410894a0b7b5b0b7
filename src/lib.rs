// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Letter-substitution ("cipher variant") phrase search over a verse corpus.
//!
//! A phrase is expanded into every rewriting allowed by eight classical
//! letter-substitution maps, and the corpus is searched for all of them at
//! once. Results are grouped by variant, each with the verses where it occurs
//! and the matched span marked in the verse text.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  utils.rs   │────▶│  letters.rs  │────▶│ variants.rs │
//! │ (normalize, │     │ (Map 1..8,   │     │ (product /  │
//! │  fold_final)│     │  options)    │     │  sampling)  │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                                                 │
//!        ┌────────────────────────────────────────┤
//!        ▼                                        ▼
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ matcher.rs  │────▶│   search/    │◀────│  index.rs   │
//! │ (automaton, │     │ (scan, fan-  │     │ (word-pos   │
//! │  boundaries)│     │  out, merge) │     │  index)     │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                        ▲         │
//!                        │         ▼
//!                 ┌──────────┐  ┌──────────┐
//!                 │ corpus/  │  │ cache.rs │
//!                 └──────────┘  └──────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tzfanim::{LetterMapSet, SearchConfig, SearchEngine, SearchOptions, TextCorpus};
//!
//! let corpus = Arc::new(TextCorpus::from_file("corpus.txt".as_ref())?);
//! let engine = SearchEngine::new(SearchConfig::default(), corpus, LetterMapSet::standard());
//! let response = engine.search("ברא", &SearchOptions::default())?;
//! for result in &response.results {
//!     println!("{} ({} locations)", result.variant, result.locations.len());
//! }
//! ```

pub mod cache;
pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod letters;
pub mod matcher;
pub mod search;
pub mod testing;
pub mod types;
pub mod utils;
pub mod variants;

pub use cache::{cache_key, CacheEntry, CacheStore, MemoryCacheStore, SearchCache};
pub use config::{PartitionStrategy, SearchConfig, WordBudgets};
pub use corpus::{CorpusProvider, CorpusStats, TextCorpus};
pub use error::{SearchError, StoreError};
pub use index::{MemoryWordIndex, WordIndexStore};
pub use letters::{LetterMapSet, LETTER_MAPS_VERSION};
pub use matcher::{BoundaryPolicy, VariantMatcher};
pub use search::{SearchEngine, SearchOptions};
pub use types::{
    Engine, Hit, IndexedWord, MatchLocation, PartialResult, RuleFamily, SearchMethod,
    SearchResponse, Variant, VariantResult, Verse,
};
pub use utils::{fold_final, normalize, prepare_phrase, prepare_query, strip_marks, AlignedText};
pub use variants::VariantGenerator;
