// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Variant generation: the Cartesian product of per-character substitutions.
//!
//! # Budgeting
//!
//! The product grows as `k^n` for an `n`-character phrase with `k` options per
//! letter, so it is never materialized blindly. Its size is computed first
//! (saturating), and only when it fits the budget is [`CartesianVariants`]
//! walked. Otherwise the limited strategy picks, in order:
//!
//! 1. the original phrase
//! 2. every single-character substitution
//! 3. one representative per rule family
//! 4. seeded random combinations, until the budget is full or `2 × budget`
//!    draws have been spent
//!
//! Output is de-duplicated by text; the first label path to produce a text wins.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SearchConfig;
use crate::letters::LetterMapSet;
use crate::types::{RuleFamily, Variant};
use crate::utils::{fold_final, normalize, strip_marks};

/// Per-character option lists for one phrase.
pub type OptionTable = Vec<Vec<(char, RuleFamily)>>;

/// Expands phrases into variants using a [`LetterMapSet`].
#[derive(Debug, Clone)]
pub struct VariantGenerator {
    letters: Arc<LetterMapSet>,
    seed: u64,
}

impl VariantGenerator {
    pub fn new(letters: Arc<LetterMapSet>, seed: u64) -> Self {
        Self { letters, seed }
    }

    pub fn letters(&self) -> &LetterMapSet {
        &self.letters
    }

    /// Option lists for every character of a phrase.
    ///
    /// Marks are stripped but final forms are kept, so families keyed on a
    /// final form (Map 4, Map 5) still see it. Every option is folded.
    pub fn option_table(&self, phrase: &str) -> OptionTable {
        strip_marks(phrase)
            .chars()
            .map(|c| self.letters.options(c))
            .collect()
    }

    /// Generate at most `max_variants` variants of `phrase`.
    ///
    /// Variant texts are normalized. The all-`Original` variant (the
    /// normalized phrase) is always the first element, and appears exactly once.
    pub fn generate(&self, phrase: &str, max_variants: usize) -> Vec<Variant> {
        let raw = strip_marks(phrase);
        let phrase = normalize(&raw);
        let budget = max_variants.max(1);
        let table = self.option_table(&raw);
        let size = product_size(&table);

        let variants = if size <= budget {
            let mut seen = HashSet::with_capacity(size);
            CartesianVariants::new(&table)
                .filter(|v| seen.insert(v.text.clone()))
                .collect()
        } else {
            self.limited(&raw, &phrase, &table, budget)
        };

        tracing::debug!(
            phrase = %phrase,
            product = size,
            budget,
            generated = variants.len(),
            sampled = size > budget,
            "variants_generated"
        );
        variants
    }

    /// Generate variants of one word with its tiered budget.
    pub fn generate_word(&self, word: &str, config: &SearchConfig) -> Vec<Variant> {
        self.generate(word, config.word_budget(&normalize(word)))
    }

    /// `raw` is the mark-stripped phrase, `phrase` its normalized form.
    fn limited(&self, raw: &str, phrase: &str, table: &OptionTable, budget: usize) -> Vec<Variant> {
        let chars: Vec<char> = phrase.chars().collect();
        let mut picked = Picked::new(budget);

        picked.push(Variant::original(phrase));

        // Single-character substitutions
        'single: for (i, options) in table.iter().enumerate() {
            for &(target, family) in options.iter().skip(1) {
                if picked.is_full() {
                    break 'single;
                }
                let mut text = chars.clone();
                text[i] = target;
                let mut sources = vec![RuleFamily::Original; chars.len()];
                sources[i] = family;
                picked.push(Variant {
                    text: text.into_iter().collect(),
                    sources,
                });
            }
        }

        // One representative per family
        for family in RuleFamily::SUBSTITUTIONS {
            if picked.is_full() {
                break;
            }
            let mut text = String::with_capacity(phrase.len());
            let mut sources = Vec::with_capacity(chars.len());
            for c in raw.chars() {
                let hit = self
                    .letters
                    .possible_conversions(c)
                    .into_iter()
                    .find(|(_, f)| *f == family);
                match hit {
                    Some((target, f)) => {
                        text.push(target);
                        sources.push(f);
                    }
                    None => {
                        text.push(fold_final(c));
                        sources.push(RuleFamily::Original);
                    }
                }
            }
            picked.push(Variant { text, sources });
        }

        // Random fill
        let mut rng = StdRng::seed_from_u64(self.seed ^ u64::from(crc32fast::hash(phrase.as_bytes())));
        let mut attempts = 0usize;
        while !picked.is_full() && attempts < budget.saturating_mul(2) {
            attempts += 1;
            let mut text = String::with_capacity(phrase.len());
            let mut sources = Vec::with_capacity(table.len());
            for options in table {
                let (c, f) = options[rng.gen_range(0..options.len())];
                text.push(c);
                sources.push(f);
            }
            picked.push(Variant { text, sources });
        }

        picked.into_vec()
    }
}

/// Budgeted, text-deduplicated accumulator.
struct Picked {
    budget: usize,
    seen: HashSet<String>,
    out: Vec<Variant>,
}

impl Picked {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            seen: HashSet::new(),
            out: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.out.len() >= self.budget
    }

    fn push(&mut self, variant: Variant) {
        if !self.is_full() && self.seen.insert(variant.text.clone()) {
            self.out.push(variant);
        }
    }

    fn into_vec(self) -> Vec<Variant> {
        self.out
    }
}

/// Number of combinations in an option table, saturating at `usize::MAX`.
pub fn product_size(table: &OptionTable) -> usize {
    table
        .iter()
        .fold(1usize, |acc, options| acc.saturating_mul(options.len()))
}

// =============================================================================
// LAZY CARTESIAN PRODUCT
// =============================================================================

/// Odometer over an option table, yielding one [`Variant`] per combination.
///
/// The first combination is the all-`Original` one, since every option list
/// starts with the identity.
pub struct CartesianVariants<'a> {
    table: &'a [Vec<(char, RuleFamily)>],
    odometer: Vec<usize>,
    done: bool,
}

impl<'a> CartesianVariants<'a> {
    pub fn new(table: &'a [Vec<(char, RuleFamily)>]) -> Self {
        Self {
            table,
            odometer: vec![0; table.len()],
            done: table.iter().any(|o| o.is_empty()),
        }
    }

    fn advance(&mut self) {
        for pos in (0..self.odometer.len()).rev() {
            self.odometer[pos] += 1;
            if self.odometer[pos] < self.table[pos].len() {
                return;
            }
            self.odometer[pos] = 0;
        }
        self.done = true;
    }
}

impl Iterator for CartesianVariants<'_> {
    type Item = Variant;

    fn next(&mut self) -> Option<Variant> {
        if self.done {
            return None;
        }
        let mut text = String::new();
        let mut sources = Vec::with_capacity(self.table.len());
        for (options, &i) in self.table.iter().zip(&self.odometer) {
            let (c, f) = options[i];
            text.push(c);
            sources.push(f);
        }
        self.advance();
        Some(Variant { text, sources })
    }
}
