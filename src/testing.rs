// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures and collaborators to avoid duplication.

#![doc(hidden)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;
use crate::corpus::{CorpusProvider, TextCorpus};
use crate::error::{Result, SearchError, StoreError};

/// A small two-book corpus in the on-disk line format.
pub const SAMPLE_CORPUS: &str = "\
בראשית פרק-א
{א}בְּרֵאשִׁית בָּרָא אֱלֹהִים אֵת הַשָּׁמַיִם וְאֵת הָאָרֶץ{ב}וְהָאָרֶץ הָיְתָה תֹהוּ וָבֹהוּ וְחֹשֶׁךְ עַל פְּנֵי תְהוֹם
{ג}וַיֹּאמֶר אֱלֹהִים יְהִי אוֹר וַיְהִי אוֹר{ד}וַיַּרְא אֱלֹהִים אֶת הָאוֹר כִּי טוֹב
בראשית פרק-ב
{א}וַיְכֻלּוּ הַשָּׁמַיִם וְהָאָרֶץ וְכָל צְבָאָם{ב}וַיְכַל אֱלֹהִים בַּיּוֹם הַשְּׁבִיעִי מְלַאכְתּוֹ אֲשֶׁר עָשָׂה
שמות פרק-א
{א}וְאֵלֶּה שְׁמוֹת בְּנֵי יִשְׂרָאֵל הַבָּאִים מִצְרָיְמָה אֵת יַעֲקֹב{ב}רְאוּבֵן שִׁמְעוֹן לֵוִי וִיהוּדָה
{ג}וַיֹּאמֶר מֹשֶׁה אֶל הָאֱלֹהִים
";

/// The sample corpus as a provider.
pub fn sample_corpus() -> Arc<TextCorpus> {
    Arc::new(TextCorpus::from_text(SAMPLE_CORPUS))
}

/// Generate a corpus of `chapters` chapters with `verses` verses each, all in
/// one book, cycling through a few sentences.
pub fn synthetic_corpus(chapters: usize, verses: usize) -> String {
    const SENTENCES: [&str; 4] = [
        "בראשית ברא אלהים את השמים ואת הארץ",
        "ויאמר אלהים יהי אור ויהי אור",
        "וירא אלהים את האור כי טוב",
        "ויקרא אלהים לאור יום ולחשך קרא לילה",
    ];
    let letters: Vec<char> = "אבגדהוזחטיכלמנסעפצקרשת".chars().collect();
    let mut out = String::new();
    for c in 0..chapters {
        out.push_str(&format!("בראשית פרק-{}\n", letters[c % letters.len()]));
        for v in 0..verses {
            out.push_str(&format!("{{{}}}{}\n", v + 1, SENTENCES[(c + v) % SENTENCES.len()]));
        }
    }
    out
}

/// Wraps a provider and counts line requests.
pub struct CountingCorpus<P> {
    pub inner: P,
    pub line_requests: AtomicUsize,
}

impl<P: CorpusProvider> CountingCorpus<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            line_requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.line_requests.load(Ordering::SeqCst)
    }
}

impl<P: CorpusProvider> CorpusProvider for CountingCorpus<P> {
    fn get_lines(&self, book: Option<&str>) -> Result<Arc<[String]>> {
        self.line_requests.fetch_add(1, Ordering::SeqCst);
        self.inner.get_lines(book)
    }

    fn get_full_text(&self) -> Result<Arc<str>> {
        self.inner.get_full_text()
    }

    fn get_normalized_text(&self) -> Result<Arc<str>> {
        self.inner.get_normalized_text()
    }
}

/// A provider that has nothing to offer.
pub struct EmptyCorpus;

impl CorpusProvider for EmptyCorpus {
    fn get_lines(&self, _book: Option<&str>) -> Result<Arc<[String]>> {
        Ok(Arc::from(Vec::<String>::new()))
    }

    fn get_full_text(&self) -> Result<Arc<str>> {
        Err(SearchError::CorpusUnavailable("empty corpus".to_string()))
    }
}

/// A cache store whose every operation fails.
pub struct FailingCacheStore;

impl CacheStore for FailingCacheStore {
    fn get(&self, _key: &str) -> std::result::Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Backend("cache offline".to_string()))
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> std::result::Result<(), StoreError> {
        Err(StoreError::Backend("cache offline".to_string()))
    }

    fn delete(&self, _key: &str) -> std::result::Result<(), StoreError> {
        Err(StoreError::Backend("cache offline".to_string()))
    }
}
