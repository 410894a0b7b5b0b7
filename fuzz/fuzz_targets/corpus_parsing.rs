// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for corpus parsing and partitioning.
//!
//! Arbitrary corpus text must parse without panicking, and every way of
//! partitioning it must visit the same verses with the same book and chapter.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tzfanim::corpus::{book_partitions, line_batches, walk_verses, CorpusProvider, TextCorpus};

#[derive(Debug, Arbitrary)]
struct CorpusInput {
    text: String,
    workers: u8,
}

fuzz_target!(|input: CorpusInput| {
    let corpus = TextCorpus::from_text(&input.text);
    let stats = corpus.stats();
    let verses = corpus.verses();
    assert_eq!(stats.verses, verses.len());

    let Ok(lines) = corpus.get_lines(None) else {
        return;
    };

    let visit_all = |partitions: Vec<tzfanim::corpus::Partition>| {
        let mut seen = Vec::new();
        for p in &partitions {
            walk_verses(p.lines(), p.offset(), p.context.clone(), |ctx, span| {
                seen.push((ctx.book.clone(), ctx.chapter.clone(), span.ordinal));
            });
        }
        seen
    };

    let workers = usize::from(input.workers.max(1));
    let one = visit_all(line_batches(lines.clone(), 1, 1));
    let many = visit_all(line_batches(lines.clone(), workers, 1));
    let books = visit_all(book_partitions(lines));
    assert_eq!(one, many);
    assert_eq!(one, books);
    assert_eq!(one.len(), verses.len());
});
