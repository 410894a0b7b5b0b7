// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for text normalization.
//!
//! Every phrase and every verse passes through `normalize`, so it must never
//! panic, must be idempotent, and must never leave a point or a final letter
//! form behind.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tzfanim::{normalize, prepare_phrase, AlignedText};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    let once = normalize(&text);
    assert_eq!(normalize(&once), once, "normalize is not idempotent");
    for c in once.chars() {
        assert!(!('\u{0591}'..='\u{05C7}').contains(&c), "mark {:?} survived", c);
        assert!(!"ךםןףץ".contains(c), "final form {:?} survived", c);
    }

    let prepared = prepare_phrase(&text);
    assert!(!prepared.contains("  "));
    assert_eq!(prepare_phrase(&prepared), prepared);

    let aligned = AlignedText::new(&text);
    assert_eq!(aligned.normalized, once);
    let (start, end) = aligned.raw_span(0, once.len());
    assert!(start <= end && end <= text.len());
    assert!(text.is_char_boundary(start) && text.is_char_boundary(end));
});
