// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The fixed letter-substitution rule families.
//!
//! Eight families, each an old letter cipher:
//!
//! | Family  | Shape     | Lookup key         |
//! |---------|-----------|--------------------|
//! | Map 1-3 | pairwise  | folded character   |
//! | Map 4   | pairwise  | raw character (has entries for final forms) |
//! | Map 5-6 | groups    | raw character      |
//! | Map 7   | groups    | folded character   |
//! | Map 8   | groups    | raw character      |
//!
//! A pairwise family rewrites a letter to exactly one partner. A group family
//! rewrites a letter to every other member of each group containing it.
//! Targets are folded to base forms so a generated variant can be compared
//! with normalized corpus text directly.

use std::collections::HashMap;

use crate::types::RuleFamily;
use crate::utils::fold_final;

/// Version of the rule tables. Bump when a table changes; cached results
/// computed with another version are not comparable.
pub const LETTER_MAPS_VERSION: &str = "abgd-8.1";

const MAP_1: [(char, char); 22] = [
    ('א', 'ב'), ('ב', 'א'), ('ג', 'ד'), ('ד', 'ג'), ('ה', 'ו'), ('ו', 'ה'),
    ('ז', 'ח'), ('ח', 'ז'), ('ט', 'י'), ('י', 'ט'), ('כ', 'ל'), ('ל', 'כ'),
    ('מ', 'נ'), ('נ', 'מ'), ('ס', 'ע'), ('ע', 'ס'), ('פ', 'צ'), ('צ', 'פ'),
    ('ק', 'ר'), ('ר', 'ק'), ('ש', 'ת'), ('ת', 'ש'),
];

const MAP_2: [(char, char); 22] = [
    ('א', 'ת'), ('ת', 'א'), ('ב', 'ש'), ('ש', 'ב'), ('ג', 'ר'), ('ר', 'ג'),
    ('ד', 'ק'), ('ק', 'ד'), ('ה', 'צ'), ('צ', 'ה'), ('ו', 'פ'), ('פ', 'ו'),
    ('ז', 'ע'), ('ע', 'ז'), ('ח', 'ס'), ('ס', 'ח'), ('ט', 'נ'), ('נ', 'ט'),
    ('י', 'מ'), ('מ', 'י'), ('כ', 'ל'), ('ל', 'כ'),
];

const MAP_3: [(char, char); 22] = [
    ('א', 'ל'), ('ל', 'א'), ('ב', 'מ'), ('מ', 'ב'), ('ג', 'נ'), ('נ', 'ג'),
    ('ד', 'ס'), ('ס', 'ד'), ('ה', 'ע'), ('ע', 'ה'), ('ו', 'פ'), ('פ', 'ו'),
    ('ז', 'צ'), ('צ', 'ז'), ('ח', 'ק'), ('ק', 'ח'), ('ט', 'ר'), ('ר', 'ט'),
    ('י', 'ש'), ('ש', 'י'), ('כ', 'ת'), ('ת', 'כ'),
];

const MAP_4: [(char, char); 23] = [
    ('א', 'ט'), ('ט', 'א'), ('ב', 'ח'), ('ח', 'ב'), ('ג', 'ז'), ('ז', 'ג'),
    ('ד', 'ו'), ('ו', 'ד'), ('צ', 'י'), ('ה', 'ה'), ('פ', 'כ'), ('י', 'צ'),
    ('ל', 'ע'), ('כ', 'פ'), ('ס', 'מ'), ('ע', 'ל'), ('נ', 'נ'), ('מ', 'ס'),
    ('ן', 'ש'), ('ץ', 'ק'), ('ם', 'ת'), ('ף', 'ר'), ('ך', 'ך'),
];

const MAP_5: &[&[char]] = &[
    &['א', 'י', 'ק'], &['ב', 'כ', 'ר'], &['ג', 'ל', 'ש'],
    &['ד', 'מ', 'ת'], &['ה', 'נ', 'ך'], &['ו', 'ס', 'ם'],
    &['ז', 'ע', 'ן'], &['ח', 'פ', 'ף'], &['ת', 'צ', 'ץ'],
];

const MAP_6: &[&[char]] = &[
    &['א', 'ח', 'ס'], &['ב', 'ט', 'ע'], &['ג', 'י', 'פ'],
    &['ד', 'כ', 'צ'], &['ה', 'ל', 'ק'], &['ו', 'מ', 'ר'],
    &['ז', 'נ', 'ש'], &['ז', 'נ', 'ת'],
];

const MAP_7: &[&[char]] = &[
    &['א', 'ה', 'ח', 'ע'],
    &['ב', 'ו', 'מ', 'פ'],
    &['ג', 'י', 'כ', 'ק'],
    &['ד', 'ט', 'ל', 'נ', 'ת'],
    &['ז', 'ס', 'ש', 'ר', 'צ'],
];

const MAP_8: &[&[char]] = &[&['א', 'ה', 'ו', 'י']];

/// Which form of the input character a family is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Raw,
    Folded,
}

#[derive(Debug, Clone)]
struct PairwiseMap {
    family: RuleFamily,
    lookup: Lookup,
    table: HashMap<char, char>,
}

#[derive(Debug, Clone)]
struct GroupMap {
    family: RuleFamily,
    lookup: Lookup,
    groups: Vec<Vec<char>>,
}

/// A versioned collection of substitution rule families.
#[derive(Debug, Clone)]
pub struct LetterMapSet {
    pairwise: Vec<PairwiseMap>,
    groups: Vec<GroupMap>,
    version: &'static str,
}

impl LetterMapSet {
    /// The eight standard families.
    pub fn standard() -> Self {
        let pair = |family: RuleFamily, lookup: Lookup, entries: &[(char, char)]| PairwiseMap {
            family,
            lookup,
            table: entries.iter().copied().collect(),
        };
        let group = |family: RuleFamily, lookup: Lookup, groups: &[&[char]]| GroupMap {
            family,
            lookup,
            groups: groups.iter().map(|g| g.to_vec()).collect(),
        };

        LetterMapSet {
            pairwise: vec![
                pair(RuleFamily::Map1, Lookup::Folded, &MAP_1),
                pair(RuleFamily::Map2, Lookup::Folded, &MAP_2),
                pair(RuleFamily::Map3, Lookup::Folded, &MAP_3),
                pair(RuleFamily::Map4, Lookup::Raw, &MAP_4),
            ],
            groups: vec![
                group(RuleFamily::Map5, Lookup::Raw, MAP_5),
                group(RuleFamily::Map6, Lookup::Raw, MAP_6),
                group(RuleFamily::Map7, Lookup::Folded, MAP_7),
                group(RuleFamily::Map8, Lookup::Raw, MAP_8),
            ],
            version: LETTER_MAPS_VERSION,
        }
    }

    /// No substitution families: every character maps only to itself.
    pub fn identity() -> Self {
        LetterMapSet {
            pairwise: Vec::new(),
            groups: Vec::new(),
            version: "identity",
        }
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Every `(target, family)` a character may be rewritten to.
    ///
    /// The identity `(folded ch, Original)` always comes first. `ch` may be a
    /// final form, since some families are keyed on it, but every target
    /// (the identity included) is folded to its base form. A target equal to
    /// the folded input is dropped since it would only repeat `Original`. A
    /// space maps only to itself.
    pub fn possible_conversions(&self, ch: char) -> Vec<(char, RuleFamily)> {
        let folded = fold_final(ch);
        let mut out = vec![(folded, RuleFamily::Original)];
        if ch.is_whitespace() {
            return out;
        }

        let key = |lookup| match lookup {
            Lookup::Raw => ch,
            Lookup::Folded => folded,
        };
        let mut push = |target: char, family: RuleFamily| {
            let target = fold_final(target);
            if target != ch && target != folded && !out.contains(&(target, family)) {
                out.push((target, family));
            }
        };

        for map in &self.pairwise {
            if let Some(&target) = map.table.get(&key(map.lookup)) {
                push(target, map.family);
            }
        }

        for map in &self.groups {
            let k = key(map.lookup);
            for group in map.groups.iter().filter(|g| g.contains(&k)) {
                for &other in group.iter().filter(|&&c| c != k) {
                    push(other, map.family);
                }
            }
        }

        out
    }

    /// Substitution options for a character, de-duplicated by target.
    ///
    /// When two families produce the same target, the first family (in table
    /// order) is kept. `Original` is always first.
    pub fn options(&self, ch: char) -> Vec<(char, RuleFamily)> {
        let mut seen = Vec::new();
        self.possible_conversions(ch)
            .into_iter()
            .filter(|(target, _)| {
                if seen.contains(target) {
                    false
                } else {
                    seen.push(*target);
                    true
                }
            })
            .collect()
    }
}

impl Default for LetterMapSet {
    fn default() -> Self {
        Self::standard()
    }
}
