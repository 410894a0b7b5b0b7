// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Word-position index over verses.
//!
//! Each verse's normalized text is split on whitespace and every word is
//! stored with its 0-based position. The indexed engine answers single-word
//! queries with one lookup and phrase queries with positional joins
//! (`position(k + 1) == position(k) + 1` within a verse).
//!
//! # Invariants
//!
//! - **DETERMINISTIC_BUILD**: [`build_word_index`] depends only on the verses it
//!   is given, so rebuilding yields identical rows in identical order.
//! - **POSITION_DENSE**: positions within a verse are `0..word_count`.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::types::{IndexedWord, Verse};
use crate::utils::{char_len, AlignedText};

/// Read access to a persisted word index.
///
/// The relational store behind the indexed engine implements this; so does
/// [`MemoryWordIndex`].
pub trait WordIndexStore: Send + Sync {
    /// All rows whose normalized word is one of `words`, ordered by
    /// `(verse_id, position)`.
    fn lookup(&self, words: &[String]) -> Result<Vec<IndexedWord>, StoreError>;

    /// Verse metadata by id.
    fn verse(&self, id: usize) -> Result<Option<Verse>, StoreError>;

    /// Verses whose normalized text contains `needle`, in corpus order.
    fn verses_containing(&self, needle: &str, limit: usize) -> Result<Vec<Verse>, StoreError>;
}

/// Derive the index rows for a set of verses.
///
/// `original` is the verse's raw token (points and final forms intact) when
/// the stored normalized text lines up with the raw text; otherwise it falls
/// back to the normalized word.
pub fn build_word_index(verses: &[Verse]) -> Vec<IndexedWord> {
    verses
        .iter()
        .flat_map(|verse| {
            let aligned = AlignedText::new(&verse.text);
            let aligned = (aligned.normalized == verse.normalized_text).then_some(aligned);
            word_spans(&verse.normalized_text)
                .into_iter()
                .enumerate()
                .map(|(position, (start, end))| {
                    let word = &verse.normalized_text[start..end];
                    let original = match &aligned {
                        Some(aligned) => {
                            let (raw_start, raw_end) = aligned.raw_span(start, end);
                            verse.text[raw_start..raw_end].trim().to_string()
                        }
                        None => word.to_string(),
                    };
                    IndexedWord {
                        verse_id: verse.id,
                        original,
                        normalized: word.to_string(),
                        position,
                        length: char_len(word),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Byte spans of the whitespace-separated words in `text`.
pub fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Byte span of the word at `position` in `text` (whitespace split).
pub fn word_span(text: &str, position: usize) -> Option<(usize, usize)> {
    word_spans(text).get(position).copied()
}

/// In-memory [`WordIndexStore`].
#[derive(Debug, Default)]
pub struct MemoryWordIndex {
    verses: Vec<Verse>,
    by_id: HashMap<usize, usize>,
    rows: Vec<IndexedWord>,
    by_word: HashMap<String, Vec<usize>>,
}

impl MemoryWordIndex {
    pub fn build(verses: Vec<Verse>) -> Self {
        let rows = build_word_index(&verses);
        let mut by_word: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            by_word.entry(row.normalized.clone()).or_default().push(i);
        }
        let by_id = verses.iter().enumerate().map(|(i, v)| (v.id, i)).collect();

        tracing::info!(verses = verses.len(), words = rows.len(), "word_index_built");
        Self {
            verses,
            by_id,
            rows,
            by_word,
        }
    }

    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    pub fn word_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[IndexedWord] {
        &self.rows
    }
}

impl WordIndexStore for MemoryWordIndex {
    fn lookup(&self, words: &[String]) -> Result<Vec<IndexedWord>, StoreError> {
        let mut hits: Vec<usize> = words
            .iter()
            .filter_map(|w| self.by_word.get(w))
            .flatten()
            .copied()
            .collect();
        hits.sort_unstable();
        hits.dedup();
        Ok(hits.into_iter().map(|i| self.rows[i].clone()).collect())
    }

    fn verse(&self, id: usize) -> Result<Option<Verse>, StoreError> {
        Ok(self.by_id.get(&id).map(|&i| self.verses[i].clone()))
    }

    fn verses_containing(&self, needle: &str, limit: usize) -> Result<Vec<Verse>, StoreError> {
        Ok(self
            .verses
            .iter()
            .filter(|v| v.normalized_text.contains(needle))
            .take(limit)
            .cloned()
            .collect())
    }
}
