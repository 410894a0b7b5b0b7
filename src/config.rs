// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search configuration.
//!
//! Every knob has a default, and a TOML file only needs to name the ones it
//! changes:
//!
//! ```toml
//! workers = 8
//! strict_word_boundary = false
//!
//! [word_budgets]
//! significant = 2000
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// How the automaton engine splits the corpus into work units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// Contiguous line ranges, one per worker.
    #[default]
    LineBatch,
    /// One partition per book.
    BookPartition,
}

/// Per-word variant budgets for the indexed and multi-word paths.
///
/// Short words have few letters to vary, so they can afford a larger share
/// of their product; a handful of especially significant words always get
/// the large allowance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordBudgets {
    /// Budget for words of at most 3 characters.
    pub short: usize,
    /// Budget for words of 4-5 characters.
    pub medium: usize,
    /// Budget for words of 6-7 characters.
    pub long: usize,
    /// Budget for anything longer.
    pub very_long: usize,
    /// Budget for words in `significant_words`.
    pub significant: usize,
    /// Words that always get the `significant` budget (normalized form is compared).
    pub significant_words: Vec<String>,
}

impl Default for WordBudgets {
    fn default() -> Self {
        Self {
            short: 1000,
            medium: 500,
            long: 200,
            very_long: 100,
            significant: 1000,
            significant_words: [
                "בראשית", "אלהים", "יהוה", "משה", "אברהם", "יצחק", "יעקב", "ישראל",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Configuration consumed by the search core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Longest accepted phrase, in characters after whitespace collapsing.
    pub max_phrase_length: usize,
    /// Phrases with more words than this should be handed to background processing.
    pub max_words: usize,
    /// Cap on distinct variants in a response.
    pub max_results: usize,
    /// Cap on locations reported per variant.
    pub max_locations_per_variant: usize,
    /// Variant budget for a whole phrase in the single-automaton path.
    pub max_variants: usize,
    pub word_budgets: WordBudgets,
    /// Worker pool size for one search invocation.
    pub workers: usize,
    /// Minimum lines per line-batch partition.
    pub batch_size_multiplier: usize,
    pub partition_strategy: PartitionStrategy,
    /// Per-task timeout for line-batch partitions.
    pub line_batch_timeout_secs: u64,
    /// Per-task timeout for book partitions (books are uneven in size).
    pub book_partition_timeout_secs: u64,
    /// Cap on word-combination candidates per verse in multi-word scans.
    pub max_combinations_per_verse: usize,
    /// Default for `SearchOptions::strict_word_boundary`.
    pub strict_word_boundary: bool,
    /// Single-character prefixes that may be attached to a standalone word in
    /// strict mode.
    pub clitic_prefixes: Vec<char>,
    /// Seed mixed into variant sampling.
    pub sampling_seed: u64,
    pub cache_ttl_secs: u64,
    /// Searches slower than this are not written to the cache.
    pub cache_write_threshold_secs: f64,
    /// Capacity of the in-process cache tier.
    pub memory_cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_phrase_length: 100,
            max_words: 10,
            max_results: 1000,
            max_locations_per_variant: 100,
            max_variants: 10_000,
            word_budgets: WordBudgets::default(),
            workers: 12,
            batch_size_multiplier: 150,
            partition_strategy: PartitionStrategy::LineBatch,
            line_batch_timeout_secs: 30,
            book_partition_timeout_secs: 60,
            max_combinations_per_verse: 64,
            strict_word_boundary: true,
            clitic_prefixes: vec!['ל', 'מ', 'ו', 'ה', 'כ'],
            sampling_seed: 0x7a66_616e_696d,
            cache_ttl_secs: 3600,
            cache_write_threshold_secs: 300.0,
            memory_cache_capacity: 1000,
        }
    }
}

impl SearchConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SearchConfig =
            toml::from_str(raw).map_err(|e| SearchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_phrase_length", self.max_phrase_length),
            ("max_results", self.max_results),
            ("max_locations_per_variant", self.max_locations_per_variant),
            ("max_variants", self.max_variants),
            ("workers", self.workers),
            ("batch_size_multiplier", self.batch_size_multiplier),
            ("max_combinations_per_verse", self.max_combinations_per_verse),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(SearchError::Config(format!("{} must be at least 1", name)));
            }
        }
        if self.cache_write_threshold_secs.is_nan() || self.cache_write_threshold_secs < 0.0 {
            return Err(SearchError::Config(
                "cache_write_threshold_secs must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a phrase has too many words for an interactive search.
    pub fn requires_background(&self, phrase: &str) -> bool {
        phrase.split_whitespace().count() > self.max_words
    }

    /// Variant budget for one word of a multi-word or indexed search.
    pub fn word_budget(&self, word: &str) -> usize {
        let budgets = &self.word_budgets;
        if budgets
            .significant_words
            .iter()
            .any(|w| crate::utils::normalize(w) == word)
        {
            return budgets.significant;
        }
        match word.chars().count() {
            0..=3 => budgets.short,
            4..=5 => budgets.medium,
            6..=7 => budgets.long,
            _ => budgets.very_long,
        }
    }

    /// Task timeout for the given partitioning policy.
    pub fn task_timeout(&self, strategy: PartitionStrategy) -> Duration {
        match strategy {
            PartitionStrategy::LineBatch => Duration::from_secs(self.line_batch_timeout_secs),
            PartitionStrategy::BookPartition => {
                Duration::from_secs(self.book_partition_timeout_secs)
            }
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
