// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for phrase handling in the search engine.
//!
//! Arbitrary phrases (emoji, RTL marks, null bytes, stray points) go through
//! the whole pipeline against the sample corpus. The engine may reject a
//! phrase, but it must not panic, and a failed response carries no results.

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use tzfanim::testing::sample_corpus;
use tzfanim::{LetterMapSet, SearchConfig, SearchEngine, SearchOptions};

fuzz_target!(|data: &[u8]| {
    static ENGINE: OnceLock<SearchEngine> = OnceLock::new();
    let engine = ENGINE.get_or_init(|| {
        let config = SearchConfig {
            workers: 2,
            max_variants: 500,
            ..SearchConfig::default()
        };
        SearchEngine::new(config, sample_corpus(), LetterMapSet::standard())
    });

    let phrase = String::from_utf8_lossy(data);
    let options = SearchOptions {
        use_cache: false,
        ..SearchOptions::default()
    };
    let response = engine.respond(&phrase, &options);
    if !response.success {
        assert!(response.results.is_empty());
        assert!(response.error.is_some());
    }
    for result in &response.results {
        assert!(!result.locations.is_empty());
    }
});
