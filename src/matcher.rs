// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Multi-pattern matching of a variant set over verse text.
//!
//! One Aho-Corasick automaton is built per search from every variant text and
//! scanned once per verse. Hits come out in end-position order; at most one
//! hit is kept per end position.
//!
//! # Guards
//!
//! A hit is only reported when the matched slice equals the pattern text byte
//! for byte and the text belongs to the variant vocabulary the automaton was
//! built from.
//!
//! # Boundary policies
//!
//! - [`BoundaryPolicy::Loose`]: any substring hit.
//! - [`BoundaryPolicy::Strict`]: the hit must be a whole whitespace-delimited
//!   token, or a token made of one clitic prefix letter followed by the
//!   variant. In the prefixed case the whole token is reported, with a leading
//!   [`RuleFamily::Prefix`] label, so a variant still carries one label per
//!   character.
//!
//! All offsets are byte offsets into the scanned text.

use std::collections::HashSet;

use aho_corasick::{AhoCorasick, MatchKind};

use crate::error::Result;
use crate::types::{RuleFamily, Variant};
use crate::utils::char_len;

/// How a raw automaton hit must sit in its text to be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryPolicy {
    Loose,
    Strict {
        /// Character length of the (normalized) phrase or word being searched.
        original_len: usize,
        /// Single letters that may be attached in front of a standalone word.
        clitics: Vec<char>,
    },
}

/// A guarded automaton hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan<'a> {
    pub variant: &'a Variant,
    pub start: usize,
    pub end: usize,
}

/// A hit accepted by a [`BoundaryPolicy`], owning the variant it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedMatch {
    pub variant: Variant,
    pub start: usize,
    pub end: usize,
}

/// Automaton over a variant set.
#[derive(Debug, Clone)]
pub struct VariantMatcher {
    automaton: AhoCorasick,
    variants: Vec<Variant>,
    vocabulary: HashSet<String>,
}

impl VariantMatcher {
    /// Build from a variant set. Empty texts and repeated texts are skipped.
    pub fn build(variants: &[Variant]) -> Result<Self> {
        let mut vocabulary = HashSet::with_capacity(variants.len());
        let kept: Vec<Variant> = variants
            .iter()
            .filter(|v| !v.text.is_empty() && vocabulary.insert(v.text.clone()))
            .cloned()
            .collect();

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(kept.iter().map(|v| v.text.as_str()))?;

        Ok(Self {
            automaton,
            variants: kept,
            vocabulary,
        })
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn pattern_count(&self) -> usize {
        self.variants.len()
    }

    /// Every guarded hit in `unit`, in end-position order.
    pub fn scan<'a>(&'a self, unit: &'a str) -> Vec<MatchSpan<'a>> {
        self.hits(unit).collect()
    }

    /// The first hit in `unit` the policy accepts.
    pub fn first_match(&self, unit: &str, policy: &BoundaryPolicy) -> Option<AcceptedMatch> {
        self.hits(unit).find_map(|span| policy.accept(unit, span))
    }

    /// Every hit in `unit` the policy accepts.
    pub fn accepted_matches(&self, unit: &str, policy: &BoundaryPolicy) -> Vec<AcceptedMatch> {
        self.hits(unit)
            .filter_map(|span| policy.accept(unit, span))
            .collect()
    }

    fn hits<'a>(&'a self, unit: &'a str) -> impl Iterator<Item = MatchSpan<'a>> + 'a {
        let mut last_end = None;
        self.automaton
            .find_overlapping_iter(unit)
            .filter_map(move |m| {
                if last_end == Some(m.end()) {
                    return None;
                }
                let variant = &self.variants[m.pattern().as_usize()];
                let matched = &unit[m.start()..m.end()];
                if matched != variant.text || !self.vocabulary.contains(matched) {
                    return None;
                }
                last_end = Some(m.end());
                Some(MatchSpan {
                    variant,
                    start: m.start(),
                    end: m.end(),
                })
            })
    }
}

impl BoundaryPolicy {
    pub fn strict(original_len: usize, clitics: &[char]) -> Self {
        BoundaryPolicy::Strict {
            original_len,
            clitics: clitics.to_vec(),
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, BoundaryPolicy::Strict { .. })
    }

    /// Accept or reject one hit.
    pub fn accept(&self, unit: &str, span: MatchSpan<'_>) -> Option<AcceptedMatch> {
        let (original_len, clitics) = match self {
            BoundaryPolicy::Loose => {
                return Some(AcceptedMatch {
                    variant: span.variant.clone(),
                    start: span.start,
                    end: span.end,
                })
            }
            BoundaryPolicy::Strict {
                original_len,
                clitics,
            } => (*original_len, clitics),
        };

        if span.variant.char_len() != original_len {
            return None;
        }

        let (token_start, token_end) = token_bounds(unit, span.start, span.end);
        if token_end != span.end {
            return None;
        }
        if token_start == span.start {
            return Some(AcceptedMatch {
                variant: span.variant.clone(),
                start: span.start,
                end: span.end,
            });
        }

        let prefix = &unit[token_start..span.start];
        let mut chars = prefix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if clitics.contains(&c) => {
                let mut sources = Vec::with_capacity(span.variant.sources.len() + 1);
                sources.push(RuleFamily::Prefix);
                sources.extend_from_slice(&span.variant.sources);
                Some(AcceptedMatch {
                    variant: Variant {
                        text: unit[token_start..span.end].to_string(),
                        sources,
                    },
                    start: token_start,
                    end: span.end,
                })
            }
            _ => None,
        }
    }
}

/// Widen `[start, end)` to the whitespace-delimited token(s) around it.
fn token_bounds(unit: &str, start: usize, end: usize) -> (usize, usize) {
    let token_start = unit[..start]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let token_end = unit[end..]
        .find(char::is_whitespace)
        .map(|i| end + i)
        .unwrap_or(unit.len());
    (token_start, token_end)
}

/// Bracket `[start, end)` of `text`.
pub fn highlight(text: &str, start: usize, end: usize) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push_str(&text[..start]);
    out.push('[');
    out.push_str(&text[start..end]);
    out.push(']');
    out.push_str(&text[end..]);
    out
}

/// Bracket several non-overlapping spans of `text`.
pub fn highlight_spans(text: &str, spans: &[(usize, usize)]) -> String {
    let mut sorted = spans.to_vec();
    sorted.sort_unstable();
    let mut out = String::with_capacity(text.len() + 2 * spans.len());
    let mut cursor = 0;
    for (start, end) in sorted {
        out.push_str(&text[cursor..start]);
        out.push('[');
        out.push_str(&text[start..end]);
        out.push(']');
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Whether a variant's length is legal under strict mode: the phrase length,
/// or one more with a recognized clitic in front.
pub fn strict_length_ok(variant: &str, original_len: usize, clitics: &[char]) -> bool {
    let len = char_len(variant);
    len == original_len
        || (len == original_len + 1
            && variant.chars().next().is_some_and(|c| clitics.contains(&c)))
}
