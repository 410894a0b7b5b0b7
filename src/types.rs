// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The data model shared by every search path.
//!
//! A search turns one phrase into many [`Variant`]s, finds [`Hit`]s for them in
//! the corpus, and folds the hits into a [`SearchResponse`]. Everything here is
//! plain data with fixed fields so the response shape is identical whether the
//! automaton engine or the indexed engine produced it.
//!
//! # Invariants
//!
//! - **Variant**: `sources.len() == text.chars().count()`. One label per
//!   character; a space is always labeled `Original`.
//! - **Verse**: `(book, chapter, verse)` is unique within a corpus.
//! - **IndexedWord**: derived from `Verse::normalized_text` alone, so rebuilding
//!   the word index from the same verses yields the same rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// RULE FAMILIES
// =============================================================================

/// The substitution rule family that produced one character of a variant.
///
/// Serialized with the labels users see (`"Map 1"` .. `"Map 8"`, `"Original"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleFamily {
    #[serde(rename = "Original")]
    Original,
    #[serde(rename = "Map 1")]
    Map1,
    #[serde(rename = "Map 2")]
    Map2,
    #[serde(rename = "Map 3")]
    Map3,
    #[serde(rename = "Map 4")]
    Map4,
    #[serde(rename = "Map 5")]
    Map5,
    #[serde(rename = "Map 6")]
    Map6,
    #[serde(rename = "Map 7")]
    Map7,
    #[serde(rename = "Map 8")]
    Map8,
    /// A clitic prefix letter attached in front of a strict-mode match.
    #[serde(rename = "Prefix")]
    Prefix,
}

impl RuleFamily {
    /// Substitution families in the order the sampler walks them.
    pub const SUBSTITUTIONS: [RuleFamily; 8] = [
        RuleFamily::Map1,
        RuleFamily::Map2,
        RuleFamily::Map3,
        RuleFamily::Map4,
        RuleFamily::Map5,
        RuleFamily::Map6,
        RuleFamily::Map7,
        RuleFamily::Map8,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RuleFamily::Original => "Original",
            RuleFamily::Map1 => "Map 1",
            RuleFamily::Map2 => "Map 2",
            RuleFamily::Map3 => "Map 3",
            RuleFamily::Map4 => "Map 4",
            RuleFamily::Map5 => "Map 5",
            RuleFamily::Map6 => "Map 6",
            RuleFamily::Map7 => "Map 7",
            RuleFamily::Map8 => "Map 8",
            RuleFamily::Prefix => "Prefix",
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// VARIANTS AND HITS
// =============================================================================

/// A candidate rewriting of the search phrase.
///
/// Also the grouping key of a result: two hits belong to the same group iff
/// their variants are equal (same text, same source labels).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variant {
    pub text: String,
    pub sources: Vec<RuleFamily>,
}

impl Variant {
    /// The all-`Original` variant of a phrase.
    pub fn original(text: &str) -> Self {
        Variant {
            text: text.to_string(),
            sources: vec![RuleFamily::Original; text.chars().count()],
        }
    }

    pub fn is_original(&self) -> bool {
        self.sources.iter().all(|s| *s == RuleFamily::Original)
    }

    /// Character length of the variant text.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Where a match was found, with the match bracketed in the verse text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchLocation {
    pub book: String,
    pub chapter: String,
    pub verse: String,
    pub highlighted_text: String,
}

/// One accepted match, before aggregation.
///
/// `ordinal` is the verse's position in corpus order. The aggregator sorts by
/// it so that results do not depend on which worker finished first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub variant: Variant,
    pub location: MatchLocation,
    pub ordinal: u64,
}

// =============================================================================
// CORPUS RECORDS
// =============================================================================

/// One verse of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Position of the verse in corpus order.
    pub id: usize,
    pub book: String,
    pub chapter: String,
    pub verse: String,
    pub text: String,
    pub normalized_text: String,
    pub word_count: usize,
}

/// A word of a verse with its 0-based position, as stored in the word index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexedWord {
    pub verse_id: usize,
    pub original: String,
    pub normalized: String,
    pub position: usize,
    /// Length in characters.
    pub length: usize,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// All locations found for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantResult {
    pub variant: String,
    pub sources: Vec<RuleFamily>,
    pub locations: Vec<MatchLocation>,
}

/// A variant reported before the search completes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialResult {
    pub variant: String,
    pub sources: Vec<RuleFamily>,
}

impl From<&Variant> for PartialResult {
    fn from(variant: &Variant) -> Self {
        PartialResult {
            variant: variant.text.clone(),
            sources: variant.sources.clone(),
        }
    }
}

/// Which search engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Multi-pattern scan over the raw corpus lines.
    #[default]
    Automaton,
    /// Positional joins over the word index.
    Indexed,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Automaton => "automaton",
            Engine::Indexed => "indexed",
        }
    }
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "automaton" | "memory" => Ok(Engine::Automaton),
            "indexed" | "index" => Ok(Engine::Indexed),
            other => Err(format!("unknown engine '{}'", other)),
        }
    }
}

/// The code path that produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    AutomatonLineBatch,
    AutomatonBookPartition,
    AutomatonMultiWord,
    SingleWordIndex,
    PhraseIndex,
    TextSearch,
}

impl SearchMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMethod::AutomatonLineBatch => "automaton_line_batch",
            SearchMethod::AutomatonBookPartition => "automaton_book_partition",
            SearchMethod::AutomatonMultiWord => "automaton_multi_word",
            SearchMethod::SingleWordIndex => "single_word_index",
            SearchMethod::PhraseIndex => "phrase_index",
            SearchMethod::TextSearch => "text_search",
        }
    }
}

/// The result of one search invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub input_phrase: String,
    pub results: Vec<VariantResult>,
    pub total_variants: usize,
    pub search_time_seconds: f64,
    pub method: Option<SearchMethod>,
    #[serde(default)]
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// The `success: false` shape returned for user-visible errors.
    pub fn failure(input_phrase: &str, error: &crate::error::SearchError) -> Self {
        SearchResponse {
            success: false,
            input_phrase: input_phrase.to_string(),
            results: Vec::new(),
            total_variants: 0,
            search_time_seconds: 0.0,
            method: None,
            cached: false,
            error: Some(error.to_string()),
        }
    }

    /// Total number of locations across all variants.
    pub fn location_count(&self) -> usize {
        self.results.iter().map(|r| r.locations.len()).sum()
    }
}
