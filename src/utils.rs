// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text normalization shared by every search path.
//!
//! Vocalized verse text carries vowel points and cantillation marks that a user
//! never types, and five letters change shape at the end of a word. Both would
//! make `"בראשית"` fail to match `"בְּרֵאשִׁית"`, so everything that compares text
//! (the phrase, the corpus, the word index) goes through [`normalize`] first.
//!
//! # Algorithm
//!
//! 1. Canonically decompose each character (presentation forms such as `שׁ`
//!    become base + mark)
//! 2. Drop points and accents (U+0591..=U+05C7) and generic combining marks
//! 3. Fold final letter forms `ך ם ן ף ץ` to `כ מ נ פ צ`
//!
//! Decomposition is done one character at a time, so every normalized
//! character can be traced back to the raw character it came from. That is
//! what [`AlignedText`] records, and what lets a match found in normalized
//! text be bracketed in the verse as stored.
//!
//! Whitespace is left alone: [`prepare_phrase`] is the only place that collapses it.

use unicode_normalization::char::decompose_canonical;

/// Final (positional) letter forms and their base forms.
pub const FINAL_FORMS: [(char, char); 5] = [
    ('ך', 'כ'),
    ('ם', 'מ'),
    ('ן', 'נ'),
    ('ף', 'פ'),
    ('ץ', 'צ'),
];

/// Normalize text for comparison: strip marks, fold final letters.
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        decompose_canonical(c, |d| {
            if !is_mark(d) {
                out.push(fold_final(d));
            }
        });
    }
    out
}

/// Strip marks but keep final letter forms.
///
/// Used where the positional form of a letter still matters, such as
/// looking up substitution rules keyed on final forms.
pub fn strip_marks(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        decompose_canonical(c, |d| {
            if !is_mark(d) {
                out.push(d);
            }
        });
    }
    out
}

/// Normalized text with a map back to byte offsets in the raw text.
///
/// `normalized` is always equal to `normalize(raw)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedText {
    pub normalized: String,
    /// `(normalized byte offset, raw byte offset)` of every normalized character.
    origins: Vec<(usize, usize)>,
    raw_len: usize,
}

impl AlignedText {
    pub fn new(raw: &str) -> Self {
        let mut normalized = String::with_capacity(raw.len());
        let mut origins = Vec::with_capacity(raw.len() / 2);
        for (i, c) in raw.char_indices() {
            decompose_canonical(c, |d| {
                if !is_mark(d) {
                    origins.push((normalized.len(), i));
                    normalized.push(fold_final(d));
                }
            });
        }
        Self {
            normalized,
            origins,
            raw_len: raw.len(),
        }
    }

    /// Raw byte span of the normalized span `[start, end)`.
    ///
    /// The raw span runs up to the next raw character that survived
    /// normalization, so points and accents on the last letter are included.
    pub fn raw_span(&self, start: usize, end: usize) -> (usize, usize) {
        let first = self.origins.partition_point(|(n, _)| *n < start);
        let raw_start = self.origins.get(first).map_or(self.raw_len, |(_, r)| *r);
        let after = self.origins.partition_point(|(n, _)| *n < end);
        if after <= first {
            return (raw_start, raw_start);
        }
        let last = self.origins[after - 1].1;
        let raw_end = self.origins[after..]
            .iter()
            .map(|(_, r)| *r)
            .find(|r| *r > last)
            .unwrap_or(self.raw_len);
        (raw_start, raw_end)
    }
}

/// Fold a single final letter form to its base form. Other characters pass through.
#[inline]
pub fn fold_final(c: char) -> char {
    match c {
        'ך' => 'כ',
        'ם' => 'מ',
        'ן' => 'נ',
        'ף' => 'פ',
        'ץ' => 'צ',
        other => other,
    }
}

/// True for the five final letter forms.
#[inline]
pub fn is_final_form(c: char) -> bool {
    FINAL_FORMS.iter().any(|(f, _)| *f == c)
}

/// Normalize, trim, and collapse whitespace runs to a single space.
///
/// This is the form in which a user phrase is validated and hashed.
/// Marks are stripped before collapsing, so a stray point between two spaces
/// does not leave a double space behind.
pub fn prepare_phrase(value: &str) -> String {
    normalize(&prepare_query(value))
}

/// Like [`prepare_phrase`], but final letter forms are kept.
///
/// This is the form a phrase is expanded from. It has the same characters
/// as the prepared phrase except that final forms are not yet folded.
pub fn prepare_query(value: &str) -> String {
    strip_marks(value).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Points, accents and punctuation marks of the Hebrew block, plus generic
/// combining diacritics.
#[inline]
fn is_mark(c: char) -> bool {
    matches!(c,
        '\u{0591}'..='\u{05C7}' |  // Hebrew cantillation, points, maqaf, sof pasuq
        '\u{0300}'..='\u{036F}'    // Combining Diacritical Marks
    )
}

/// Number of characters (Unicode scalar values), not bytes.
#[inline]
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}
