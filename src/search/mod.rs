// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search entry point: phrase in, grouped variant locations out.
//!
//! ```text
//! phrase ─► prepare ─► cache? ─► automaton engine ─┬─► aggregate ─► cache write ─► response
//!                                 indexed engine  ─┘
//! ```
//!
//! The automaton engine has two shapes. Normally the whole phrase is expanded
//! and one automaton scans every verse. When a multi-word phrase has more
//! combinations than the variant budget can hold, each word gets its own
//! automaton and budget instead, so the per-word variants stay complete.
//!
//! Collaborators (corpus, word index, cache) are injected at construction.

pub mod aggregate;
pub mod coordinator;
pub mod indexed;
pub mod scan;

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::cache::SearchCache;
use crate::config::{PartitionStrategy, SearchConfig};
use crate::corpus::{collect_verses, partition_lines, CorpusProvider, Partition};
use crate::error::{Result, SearchError};
use crate::index::{MemoryWordIndex, WordIndexStore};
use crate::letters::LetterMapSet;
use crate::matcher::{BoundaryPolicy, VariantMatcher};
use crate::types::{Engine, Hit, PartialResult, SearchMethod, SearchResponse, Variant};
use crate::utils::{char_len, prepare_phrase, prepare_query};
use crate::variants::{product_size, VariantGenerator};

pub use aggregate::{Aggregation, ResultAggregator};
pub use coordinator::{ScanCoordinator, ScanOutcome};
pub use indexed::{IndexedOutcome, IndexedSearch};
pub use scan::{MultiWordScan, PhraseScan, WordMatcher};

type PartitionScan = dyn Fn(&Partition) -> Result<Vec<Hit>> + Send + Sync;

/// Per-call options.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub use_cache: bool,
    /// Overrides `SearchConfig::strict_word_boundary` when set.
    pub strict_word_boundary: Option<bool>,
    pub engine: Engine,
    /// Restrict the search to one book. Filtered searches bypass the cache.
    pub book_filter: Option<String>,
    /// Stop waiting for partitions after this instant.
    pub deadline: Option<Instant>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            strict_word_boundary: None,
            engine: Engine::Automaton,
            book_filter: None,
            deadline: None,
        }
    }
}

/// Phrase search over an injected corpus.
pub struct SearchEngine {
    config: SearchConfig,
    corpus: Arc<dyn CorpusProvider>,
    generator: VariantGenerator,
    word_index: OnceLock<Arc<dyn WordIndexStore>>,
    cache: Option<Arc<SearchCache>>,
}

impl SearchEngine {
    pub fn new(config: SearchConfig, corpus: Arc<dyn CorpusProvider>, letters: LetterMapSet) -> Self {
        let generator = VariantGenerator::new(Arc::new(letters), config.sampling_seed);
        Self {
            config,
            corpus,
            generator,
            word_index: OnceLock::new(),
            cache: None,
        }
    }

    /// Use a persisted word index for the indexed engine. Without one, an
    /// in-memory index is built from the corpus on first use. A later call
    /// replaces an earlier one.
    pub fn with_word_index(mut self, store: Arc<dyn WordIndexStore>) -> Self {
        self.word_index = OnceLock::from(store);
        self
    }

    pub fn with_cache(mut self, cache: Arc<SearchCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&SearchCache> {
        self.cache.as_deref()
    }

    /// The variants a search for `phrase` would look for.
    pub fn variants(&self, phrase: &str) -> Vec<Variant> {
        self.generator
            .generate(&prepare_query(phrase), self.config.max_variants)
    }

    pub fn search(&self, phrase: &str, options: &SearchOptions) -> Result<SearchResponse> {
        self.search_with_partials(phrase, options, &mut |_| {})
    }

    /// Like [`search`](Self::search), but every error becomes a
    /// `success: false` response.
    pub fn respond(&self, phrase: &str, options: &SearchOptions) -> SearchResponse {
        match self.search(phrase, options) {
            Ok(response) => response,
            Err(e) => {
                if !e.is_user_visible() {
                    tracing::error!(phrase = %phrase, error = %e, "search_failed");
                }
                SearchResponse::failure(phrase, &e)
            }
        }
    }

    /// Search, reporting newly found variants as partitions complete.
    pub fn search_with_partials(
        &self,
        phrase: &str,
        options: &SearchOptions,
        on_partial: &mut dyn FnMut(&[PartialResult]),
    ) -> Result<SearchResponse> {
        let started = Instant::now();
        let prepared = self.validate(phrase)?;
        let query = prepare_query(phrase);
        let strict = options
            .strict_word_boundary
            .unwrap_or(self.config.strict_word_boundary);
        let cache = self
            .cache
            .as_deref()
            .filter(|_| options.use_cache && options.book_filter.is_none());

        if let Some(cache) = cache {
            if let Some(mut response) = cache.get(&prepared, options.engine, strict) {
                response.search_time_seconds = started.elapsed().as_secs_f64();
                return Ok(response);
            }
        }

        let (hits, method, complete) = match options.engine {
            Engine::Automaton => self.run_automaton(&query, strict, options, on_partial)?,
            Engine::Indexed => {
                let store = self.word_index()?;
                let outcome =
                    IndexedSearch::new(store.as_ref(), &self.generator, &self.config).run(&query, on_partial)?;
                let hits = match &options.book_filter {
                    Some(book) => outcome
                        .hits
                        .into_iter()
                        .filter(|h| &h.location.book == book)
                        .collect(),
                    None => outcome.hits,
                };
                (hits, outcome.method, true)
            }
        };

        let aggregation = ResultAggregator::from_config(&self.config).aggregate(hits);
        let search_time_seconds = started.elapsed().as_secs_f64();
        let response = SearchResponse {
            success: true,
            input_phrase: phrase.to_string(),
            results: aggregation.results,
            total_variants: aggregation.total_variants,
            search_time_seconds,
            method: Some(method),
            cached: false,
            error: None,
        };

        tracing::info!(
            phrase = %prepared,
            method = method.as_str(),
            variants = response.total_variants,
            locations = response.location_count(),
            search_time_seconds,
            "search_completed"
        );

        if let Some(cache) = cache {
            if complete {
                cache.put(&prepared, options.engine, strict, &response, search_time_seconds);
            } else {
                tracing::debug!(phrase = %prepared, "cache_write_skipped_incomplete");
            }
        }
        Ok(response)
    }

    /// Prepare a phrase and reject it if empty or too long.
    fn validate(&self, phrase: &str) -> Result<String> {
        let prepared = prepare_phrase(phrase);
        if prepared.is_empty() {
            return Err(SearchError::InvalidInput("phrase is empty".to_string()));
        }
        let len = char_len(&prepared);
        if len > self.config.max_phrase_length {
            return Err(SearchError::InvalidInput(format!(
                "phrase is {} characters, maximum is {}",
                len, self.config.max_phrase_length
            )));
        }
        if self.config.requires_background(&prepared) {
            tracing::warn!(
                words = prepared.split(' ').count(),
                max_words = self.config.max_words,
                "phrase_exceeds_interactive_word_limit"
            );
        }
        Ok(prepared)
    }

    /// Scan the corpus for `phrase` (a prepared query). The flag is false when
    /// some partition failed or was never waited for.
    fn run_automaton(
        &self,
        phrase: &str,
        strict: bool,
        options: &SearchOptions,
        on_partial: &mut dyn FnMut(&[PartialResult]),
    ) -> Result<(Vec<Hit>, SearchMethod, bool)> {
        let lines = self.corpus.get_lines(options.book_filter.as_deref())?;
        if lines.is_empty() {
            return Err(SearchError::CorpusUnavailable(match &options.book_filter {
                Some(book) => format!("no lines for book '{}'", book),
                None => "corpus has no lines".to_string(),
            }));
        }
        let full_text = self.corpus.get_normalized_text()?;
        let clitics = &self.config.clitic_prefixes;

        let words: Vec<&str> = phrase.split(' ').collect();
        let whole_phrase_size = product_size(&self.generator.option_table(phrase));
        let per_word = words.len() > 1 && whole_phrase_size > self.config.max_variants;

        let (scan, method): (Arc<PartitionScan>, SearchMethod) = if per_word {
            let mut matchers = Vec::with_capacity(words.len());
            for word in &words {
                let variants = self.generator.generate_word(word, &self.config);
                let policy = if strict {
                    BoundaryPolicy::strict(char_len(word), clitics)
                } else {
                    BoundaryPolicy::Loose
                };
                matchers.push(WordMatcher {
                    matcher: VariantMatcher::build(&variants)?,
                    policy,
                });
            }
            let scan = MultiWordScan::new(
                matchers,
                self.config.max_combinations_per_verse,
                phrase,
                full_text,
            );
            let scan: Arc<PartitionScan> = Arc::new(move |p: &Partition| scan.scan(p));
            (scan, SearchMethod::AutomatonMultiWord)
        } else {
            let variants = self.generator.generate(phrase, self.config.max_variants);
            let policy = if strict {
                BoundaryPolicy::strict(char_len(phrase), clitics)
            } else {
                BoundaryPolicy::Loose
            };
            let scan = PhraseScan::new(VariantMatcher::build(&variants)?, policy, phrase, full_text);
            let scan: Arc<PartitionScan> = Arc::new(move |p: &Partition| scan.scan(p));
            let method = match self.config.partition_strategy {
                PartitionStrategy::LineBatch => SearchMethod::AutomatonLineBatch,
                PartitionStrategy::BookPartition => SearchMethod::AutomatonBookPartition,
            };
            (scan, method)
        };

        let partitions = partition_lines(lines, &self.config);
        let coordinator = ScanCoordinator::new(
            self.config.workers,
            self.config.task_timeout(self.config.partition_strategy),
        )
        .with_deadline(options.deadline);
        let outcome = coordinator.run(partitions, Arc::new(move |p: &Partition| scan(p)), on_partial)?;

        let complete = outcome.failed.is_empty();
        if !complete {
            tracing::warn!(
                completed = outcome.completed,
                failed = outcome.failed.len(),
                "search_incomplete"
            );
        }
        Ok((outcome.hits, method, complete))
    }

    fn word_index(&self) -> Result<Arc<dyn WordIndexStore>> {
        if let Some(store) = self.word_index.get() {
            return Ok(Arc::clone(store));
        }
        let lines = self.corpus.get_lines(None)?;
        let verses = collect_verses(&lines);
        if verses.is_empty() {
            return Err(SearchError::CorpusUnavailable("corpus has no verses".to_string()));
        }
        let store: Arc<dyn WordIndexStore> = Arc::new(MemoryWordIndex::build(verses));
        Ok(Arc::clone(self.word_index.get_or_init(|| store)))
    }
}
