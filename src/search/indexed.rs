// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Phrase search over a word-position index.
//!
//! Instead of expanding the whole phrase and scanning every verse, each word
//! is expanded on its own (with its tiered budget) and looked up in the index:
//!
//! | Words | Method              | Strategy                                   |
//! |-------|---------------------|--------------------------------------------|
//! | 1     | `single_word_index` | lookup of the word's variants              |
//! | 2-3   | `phrase_index`      | positional join, `pos(k + 1) = pos(k) + 1` |
//! | 4+    | `text_search`       | substring match on normalized verse text   |
//!
//! A failed lookup or join falls back to `text_search`. The substring path
//! cannot see token boundaries, so it is the weaker answer, but it is still a
//! correct one for the literal phrase.

use std::collections::HashMap;

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::index::{word_span, WordIndexStore};
use crate::matcher::highlight;
use crate::types::{Hit, IndexedWord, MatchLocation, PartialResult, RuleFamily, SearchMethod, Variant, Verse};
use crate::utils::{normalize, AlignedText};
use crate::variants::VariantGenerator;

/// Longest phrase, in words, answered with positional joins.
pub const MAX_JOIN_WORDS: usize = 3;

/// Hits from the indexed engine and the path that produced them.
#[derive(Debug)]
pub struct IndexedOutcome {
    pub hits: Vec<Hit>,
    pub method: SearchMethod,
}

/// The indexed engine over a [`WordIndexStore`].
pub struct IndexedSearch<'a> {
    store: &'a dyn WordIndexStore,
    generator: &'a VariantGenerator,
    config: &'a SearchConfig,
}

impl<'a> IndexedSearch<'a> {
    pub fn new(
        store: &'a dyn WordIndexStore,
        generator: &'a VariantGenerator,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// Search a prepared query (single-spaced, marks stripped; final forms
    /// may still be present).
    pub fn run(
        &self,
        query: &str,
        on_partial: &mut dyn FnMut(&[PartialResult]),
    ) -> Result<IndexedOutcome> {
        let words: Vec<&str> = query.split(' ').filter(|w| !w.is_empty()).collect();
        let phrase = normalize(query);
        let phrase = phrase.as_str();

        let attempt = match words.len() {
            0 => Ok(IndexedOutcome {
                hits: Vec::new(),
                method: SearchMethod::SingleWordIndex,
            }),
            1 => self.single_word(words[0]),
            n if n <= MAX_JOIN_WORDS => self.phrase_join(&words),
            _ => self.text_search(phrase),
        };

        let outcome = match attempt {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(phrase = %phrase, error = %e, "index_join_failed");
                self.text_search(phrase)?
            }
        };

        let mut seen = std::collections::HashSet::new();
        let found: Vec<PartialResult> = outcome
            .hits
            .iter()
            .filter(|h| seen.insert(&h.variant))
            .map(|h| PartialResult::from(&h.variant))
            .collect();
        if !found.is_empty() {
            on_partial(&found);
        }

        tracing::debug!(
            words = words.len(),
            method = outcome.method.as_str(),
            hits = outcome.hits.len(),
            "indexed_search_completed"
        );
        Ok(outcome)
    }

    fn word_variants(&self, word: &str) -> HashMap<String, Variant> {
        self.generator
            .generate_word(word, self.config)
            .into_iter()
            .map(|v| (v.text.clone(), v))
            .collect()
    }

    fn lookup(&self, variants: &HashMap<String, Variant>) -> Result<Vec<IndexedWord>> {
        let keys: Vec<String> = variants.keys().cloned().collect();
        self.store
            .lookup(&keys)
            .map_err(|e| SearchError::IndexJoin(e.to_string()))
    }

    fn verse(&self, id: usize, cache: &mut HashMap<usize, Option<Verse>>) -> Result<Option<Verse>> {
        if let Some(v) = cache.get(&id) {
            return Ok(v.clone());
        }
        let verse = self
            .store
            .verse(id)
            .map_err(|e| SearchError::IndexJoin(e.to_string()))?;
        cache.insert(id, verse.clone());
        Ok(verse)
    }

    fn single_word(&self, word: &str) -> Result<IndexedOutcome> {
        let variants = self.word_variants(word);
        let rows = self.lookup(&variants)?;
        let mut verses = HashMap::new();
        let mut hits = Vec::with_capacity(rows.len());

        for row in rows {
            let Some(variant) = variants.get(&row.normalized) else {
                continue;
            };
            let Some(verse) = self.verse(row.verse_id, &mut verses)? else {
                continue;
            };
            let Some((start, end)) = word_span(&verse.normalized_text, row.position) else {
                continue;
            };
            hits.push(hit(variant.clone(), &verse, start, end));
        }

        Ok(IndexedOutcome {
            hits,
            method: SearchMethod::SingleWordIndex,
        })
    }

    fn phrase_join(&self, words: &[&str]) -> Result<IndexedOutcome> {
        let per_word: Vec<HashMap<String, Variant>> =
            words.iter().map(|w| self.word_variants(w)).collect();

        let first_rows = self.lookup(&per_word[0])?;
        let mut positions: Vec<HashMap<(usize, usize), IndexedWord>> = Vec::with_capacity(words.len() - 1);
        for variants in &per_word[1..] {
            let rows = self.lookup(variants)?;
            positions.push(rows.into_iter().map(|r| ((r.verse_id, r.position), r)).collect());
        }

        let mut verses = HashMap::new();
        let mut hits = Vec::new();
        'rows: for first in first_rows {
            let mut chain = vec![&first];
            for (k, table) in positions.iter().enumerate() {
                match table.get(&(first.verse_id, first.position + k + 1)) {
                    Some(row) => chain.push(row),
                    None => continue 'rows,
                }
            }

            let mut text = String::new();
            let mut sources = Vec::new();
            for (k, row) in chain.iter().enumerate() {
                let Some(variant) = per_word[k].get(&row.normalized) else {
                    continue 'rows;
                };
                if k > 0 {
                    text.push(' ');
                    sources.push(RuleFamily::Original);
                }
                text.push_str(&variant.text);
                sources.extend_from_slice(&variant.sources);
            }

            let Some(verse) = self.verse(first.verse_id, &mut verses)? else {
                continue;
            };
            let last = first.position + chain.len() - 1;
            let (Some((start, _)), Some((_, end))) = (
                word_span(&verse.normalized_text, first.position),
                word_span(&verse.normalized_text, last),
            ) else {
                continue;
            };
            hits.push(hit(Variant { text, sources }, &verse, start, end));
        }

        Ok(IndexedOutcome {
            hits,
            method: SearchMethod::PhraseIndex,
        })
    }

    fn text_search(&self, phrase: &str) -> Result<IndexedOutcome> {
        let verses = self
            .store
            .verses_containing(phrase, self.config.max_results)
            .map_err(|e| SearchError::IndexJoin(e.to_string()))?;
        let variant = Variant::original(phrase);
        let hits = verses
            .iter()
            .filter_map(|verse| {
                let start = verse.normalized_text.find(phrase)?;
                Some(hit(variant.clone(), verse, start, start + phrase.len()))
            })
            .collect();
        Ok(IndexedOutcome {
            hits,
            method: SearchMethod::TextSearch,
        })
    }
}

/// A hit on `[start, end)` of the verse's normalized text, bracketed in the
/// verse text as stored. A store whose verse text does not normalize to its
/// `normalized_text` gets the normalized text bracketed instead.
fn hit(variant: Variant, verse: &Verse, start: usize, end: usize) -> Hit {
    let aligned = AlignedText::new(&verse.text);
    let highlighted_text = if aligned.normalized == verse.normalized_text {
        let (raw_start, raw_end) = aligned.raw_span(start, end);
        highlight(&verse.text, raw_start, raw_end)
    } else {
        highlight(&verse.normalized_text, start, end)
    };
    Hit {
        variant,
        location: MatchLocation {
            book: verse.book.clone(),
            chapter: verse.chapter.clone(),
            verse: verse.verse.clone(),
            highlighted_text,
        },
        ordinal: verse.id as u64,
    }
}
