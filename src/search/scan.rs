// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-partition scan tasks for the automaton engine.
//!
//! Both tasks walk their partition verse by verse, normalize the verse text,
//! skip verses too short to hold the phrase, and run the automaton over the
//! rest. Spans point into the normalized text and are mapped back through
//! [`AlignedText`] so the match is bracketed in the verse as stored.
//!
//! - [`PhraseScan`]: one automaton over whole-phrase variants, first accepted
//!   hit per verse.
//! - [`MultiWordScan`]: one automaton per word. A verse matches when every word
//!   has an accepted hit, and each non-overlapping combination of word hits
//!   becomes one space-joined variant.

use std::sync::Arc;

use crate::corpus::{walk_verses, BookContext, Partition, VerseSpan};
use crate::error::Result;
use crate::matcher::{highlight, highlight_spans, AcceptedMatch, BoundaryPolicy, VariantMatcher};
use crate::types::{Hit, MatchLocation, RuleFamily, Variant};
use crate::utils::{char_len, AlignedText};

fn location(ctx: &BookContext, span: &VerseSpan<'_>, highlighted_text: String) -> MatchLocation {
    MatchLocation {
        book: ctx.book.clone(),
        chapter: ctx.chapter.clone(),
        verse: span.number.to_string(),
        highlighted_text,
    }
}

// =============================================================================
// WHOLE-PHRASE SCAN
// =============================================================================

/// Scan with a single automaton over whole-phrase variants.
#[derive(Debug)]
pub struct PhraseScan {
    matcher: VariantMatcher,
    policy: BoundaryPolicy,
    /// Phrase length without spaces; shorter verses are skipped.
    min_len: usize,
    full_text: Arc<str>,
}

impl PhraseScan {
    pub fn new(
        matcher: VariantMatcher,
        policy: BoundaryPolicy,
        phrase: &str,
        full_text: Arc<str>,
    ) -> Self {
        Self {
            matcher,
            policy,
            min_len: phrase.chars().filter(|c| !c.is_whitespace()).count(),
            full_text,
        }
    }

    pub fn scan(&self, partition: &Partition) -> Result<Vec<Hit>> {
        let mut hits = Vec::new();
        walk_verses(
            partition.lines(),
            partition.offset(),
            partition.context.clone(),
            |ctx, span| {
                let aligned = AlignedText::new(span.text);
                let text = aligned.normalized.as_str();
                if char_len(text) < self.min_len {
                    return;
                }
                let Some(accepted) = self.matcher.first_match(text, &self.policy) else {
                    return;
                };
                if !self.full_text.contains(accepted.variant.text.as_str()) {
                    return;
                }
                let (start, end) = aligned.raw_span(accepted.start, accepted.end);
                let highlighted = highlight(span.text, start, end);
                hits.push(Hit {
                    variant: accepted.variant,
                    location: location(ctx, &span, highlighted),
                    ordinal: span.ordinal,
                });
            },
        );
        Ok(hits)
    }
}

// =============================================================================
// MULTI-WORD SCAN
// =============================================================================

/// One word of a multi-word phrase with its own automaton.
#[derive(Debug)]
pub struct WordMatcher {
    pub matcher: VariantMatcher,
    pub policy: BoundaryPolicy,
}

/// Scan with one automaton per word of the phrase.
#[derive(Debug)]
pub struct MultiWordScan {
    words: Vec<WordMatcher>,
    max_combinations: usize,
    min_len: usize,
    full_text: Arc<str>,
}

impl MultiWordScan {
    pub fn new(
        words: Vec<WordMatcher>,
        max_combinations: usize,
        phrase: &str,
        full_text: Arc<str>,
    ) -> Self {
        Self {
            words,
            max_combinations: max_combinations.max(1),
            min_len: phrase.chars().filter(|c| !c.is_whitespace()).count(),
            full_text,
        }
    }

    pub fn scan(&self, partition: &Partition) -> Result<Vec<Hit>> {
        let mut hits = Vec::new();
        walk_verses(
            partition.lines(),
            partition.offset(),
            partition.context.clone(),
            |ctx, span| {
                let aligned = AlignedText::new(span.text);
                let text = aligned.normalized.as_str();
                if char_len(text) < self.min_len {
                    return;
                }
                for combo in self.combinations(text) {
                    let spans: Vec<(usize, usize)> = combo
                        .iter()
                        .map(|m| aligned.raw_span(m.start, m.end))
                        .collect();
                    hits.push(Hit {
                        variant: join_variants(&combo),
                        location: location(ctx, &span, highlight_spans(span.text, &spans)),
                        ordinal: span.ordinal,
                    });
                }
            },
        );
        Ok(hits)
    }

    /// Non-overlapping combinations of per-word hits in `text`, at most
    /// `max_combinations` of them.
    fn combinations(&self, text: &str) -> Vec<Vec<AcceptedMatch>> {
        let mut candidates = Vec::with_capacity(self.words.len());
        for word in &self.words {
            let found: Vec<AcceptedMatch> = word
                .matcher
                .accepted_matches(text, &word.policy)
                .into_iter()
                .filter(|m| self.full_text.contains(m.variant.text.as_str()))
                .collect();
            if found.is_empty() {
                return Vec::new();
            }
            candidates.push(found);
        }

        let mut out = Vec::new();
        let mut chosen: Vec<usize> = Vec::with_capacity(candidates.len());
        extend(&candidates, &mut chosen, &mut out, self.max_combinations);
        out
    }
}

/// Depth-first product over candidate lists, rejecting overlapping spans.
fn extend(
    candidates: &[Vec<AcceptedMatch>],
    chosen: &mut Vec<usize>,
    out: &mut Vec<Vec<AcceptedMatch>>,
    cap: usize,
) {
    if out.len() >= cap {
        return;
    }
    let depth = chosen.len();
    if depth == candidates.len() {
        out.push(
            chosen
                .iter()
                .enumerate()
                .map(|(w, &i)| candidates[w][i].clone())
                .collect(),
        );
        return;
    }
    for (i, m) in candidates[depth].iter().enumerate() {
        let overlaps = chosen.iter().enumerate().any(|(w, &j)| {
            let other = &candidates[w][j];
            m.start < other.end && other.start < m.end
        });
        if overlaps {
            continue;
        }
        chosen.push(i);
        extend(candidates, chosen, out, cap);
        chosen.pop();
        if out.len() >= cap {
            return;
        }
    }
}

/// Space-join word variants; each space is labeled `Original`.
fn join_variants(words: &[AcceptedMatch]) -> Variant {
    let mut text = String::new();
    let mut sources = Vec::new();
    for (i, m) in words.iter().enumerate() {
        if i > 0 {
            text.push(' ');
            sources.push(RuleFamily::Original);
        }
        text.push_str(&m.variant.text);
        sources.extend_from_slice(&m.variant.sources);
    }
    Variant { text, sources }
}
