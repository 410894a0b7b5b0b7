// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verse corpus: raw lines, the delimiter convention, and providers.
//!
//! # Line format
//!
//! ```text
//! בראשית פרק-א
//! {א}בראשית ברא אלהים את השמים ואת הארץ{ב}והארץ היתה תהו ובהו
//! ```
//!
//! A header line `<book> פרק-<chapter>` switches the current book and chapter.
//! Every other line holds zero or more verses, each a `{number}` marker
//! followed by text up to the next marker or the end of the line. Lines seen
//! before the first header are attributed to book and chapter `?`.

pub mod partition;

use std::collections::HashSet;
use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::error::{Result, SearchError};
use crate::types::Verse;
use crate::utils::normalize;

pub use partition::{book_partitions, line_batches, partition_lines, Partition};

/// Book or chapter name used before any header has been seen.
pub const UNKNOWN: &str = "?";

/// Source of corpus text for the search core.
///
/// Implementations are read-only after load and shared across worker threads.
pub trait CorpusProvider: Send + Sync {
    /// Ordered lines of the corpus, or only those of `book`.
    fn get_lines(&self, book: Option<&str>) -> Result<Arc<[String]>>;

    /// The whole corpus as one string.
    fn get_full_text(&self) -> Result<Arc<str>>;

    /// The whole corpus, normalized. Implementations should cache this.
    fn get_normalized_text(&self) -> Result<Arc<str>> {
        Ok(Arc::from(normalize(&self.get_full_text()?)))
    }
}

// =============================================================================
// DELIMITER CONVENTION
// =============================================================================

fn header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\S+)\s+\x{05E4}\x{05E8}\x{05E7}-([\x{05D0}-\x{05EA}]+)$")
            .expect("header pattern is valid")
    })
}

fn verse_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{([^}]+)\}([^{}]+)")
            .expect("verse pattern is valid")
    })
}

/// Parse a header line into `(book, chapter)`.
pub fn parse_header(line: &str) -> Option<(&str, &str)> {
    let caps = header_regex().captures(line.trim())?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// A verse span of one line, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseSpan<'a> {
    pub number: &'a str,
    /// Verse text with the marker removed and surrounding whitespace trimmed.
    pub text: &'a str,
    /// Position of the verse in corpus order.
    pub ordinal: u64,
}

/// Verses on one line. `line_index` is the absolute line position.
pub fn parse_verses(line: &str, line_index: usize) -> impl Iterator<Item = VerseSpan<'_>> {
    verse_regex()
        .captures_iter(line)
        .enumerate()
        .filter_map(move |(k, caps)| {
            let text = caps.get(2)?.as_str().trim();
            Some(VerseSpan {
                number: caps.get(1).map_or(UNKNOWN, |m| m.as_str()),
                text,
                ordinal: verse_ordinal(line_index, k),
            })
        })
}

/// Corpus-order key of the `k`-th verse on a line.
#[inline]
pub fn verse_ordinal(line_index: usize, k: usize) -> u64 {
    ((line_index as u64) << 20) | (k as u64 & 0xF_FFFF)
}

/// Book and chapter in effect while walking lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookContext {
    pub book: String,
    pub chapter: String,
}

impl Default for BookContext {
    fn default() -> Self {
        Self {
            book: UNKNOWN.to_string(),
            chapter: UNKNOWN.to_string(),
        }
    }
}

impl BookContext {
    /// Apply a line. Returns true if it was a header (and holds no verses).
    pub fn advance(&mut self, line: &str) -> bool {
        match parse_header(line) {
            Some((book, chapter)) => {
                self.book = book.to_string();
                self.chapter = chapter.to_string();
                true
            }
            None => false,
        }
    }
}

/// Walk `lines`, starting at absolute line `offset` with `context`, and visit
/// every verse with the context it belongs to.
pub fn walk_verses<'a, F>(lines: &'a [String], offset: usize, mut context: BookContext, mut visit: F)
where
    F: FnMut(&BookContext, VerseSpan<'a>),
{
    for (i, line) in lines.iter().enumerate() {
        if context.advance(line) {
            continue;
        }
        for span in parse_verses(line, offset + i) {
            visit(&context, span);
        }
    }
}

/// Parse every verse of `lines`. Ids are assigned in corpus order from 0.
pub fn collect_verses(lines: &[String]) -> Vec<Verse> {
    let mut out = Vec::new();
    walk_verses(lines, 0, BookContext::default(), |ctx, span| {
        let normalized_text = normalize(span.text);
        out.push(Verse {
            id: out.len(),
            book: ctx.book.clone(),
            chapter: ctx.chapter.clone(),
            verse: span.number.to_string(),
            text: span.text.to_string(),
            word_count: normalized_text.split_whitespace().count(),
            normalized_text,
        });
    });
    out
}

// =============================================================================
// IN-MEMORY PROVIDER
// =============================================================================

/// Summary counts of a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorpusStats {
    pub lines: usize,
    pub books: usize,
    pub chapters: usize,
    pub verses: usize,
    pub words: usize,
}

/// A corpus held in memory, loaded from a string or a file.
#[derive(Debug)]
pub struct TextCorpus {
    lines: Arc<[String]>,
    full_text: Arc<str>,
    normalized: OnceLock<Arc<str>>,
    /// Line ranges of each book, in corpus order. A book may own several ranges.
    books: Vec<(String, Range<usize>)>,
}

impl TextCorpus {
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(|l| l.trim_end_matches('\r').to_string()).collect();

        let mut books: Vec<(String, Range<usize>)> = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if let Some((book, _)) = parse_header(line) {
                match books.last_mut() {
                    Some((current, range)) if current.as_str() == book => range.end = i + 1,
                    _ => books.push((book.to_string(), i..i + 1)),
                }
            } else if let Some((_, range)) = books.last_mut() {
                range.end = i + 1;
            }
        }

        Self {
            lines: lines.into(),
            full_text: Arc::from(text),
            normalized: OnceLock::new(),
            books,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            SearchError::CorpusUnavailable(format!("failed to read {}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), bytes = text.len(), "corpus_loaded");
        Ok(Self::from_text(&text))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Book names in corpus order, without repeats.
    pub fn books(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.books
            .iter()
            .map(|(b, _)| b.as_str())
            .filter(|b| seen.insert(*b))
            .collect()
    }

    /// Every verse, with its normalized text and word count.
    pub fn verses(&self) -> Vec<Verse> {
        collect_verses(&self.lines)
    }

    pub fn stats(&self) -> CorpusStats {
        let mut chapters = HashSet::new();
        let mut verses = 0;
        let mut words = 0;
        walk_verses(&self.lines, 0, BookContext::default(), |ctx, span| {
            chapters.insert(ctx.clone());
            verses += 1;
            words += span.text.split_whitespace().count();
        });
        CorpusStats {
            lines: self.lines.len(),
            books: self.books().len(),
            chapters: chapters.len(),
            verses,
            words,
        }
    }
}

impl CorpusProvider for TextCorpus {
    fn get_lines(&self, book: Option<&str>) -> Result<Arc<[String]>> {
        let Some(book) = book else {
            return Ok(Arc::clone(&self.lines));
        };
        let lines: Vec<String> = self
            .books
            .iter()
            .filter(|(name, _)| name == book)
            .flat_map(|(_, range)| self.lines[range.clone()].iter().cloned())
            .collect();
        Ok(lines.into())
    }

    fn get_full_text(&self) -> Result<Arc<str>> {
        Ok(Arc::clone(&self.full_text))
    }

    fn get_normalized_text(&self) -> Result<Arc<str>> {
        Ok(Arc::clone(
            self.normalized
                .get_or_init(|| Arc::from(normalize(&self.full_text))),
        ))
    }
}
