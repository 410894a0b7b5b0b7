// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Splitting corpus lines into scan work units.
//!
//! A [`Partition`] is a range over the shared line array plus the book and
//! chapter in effect at its first line. Carrying the context means a verse is
//! attributed to the same book wherever the range boundaries fall, which is
//! what keeps results independent of the worker count.

use std::ops::Range;
use std::sync::Arc;

use crate::config::{PartitionStrategy, SearchConfig};

use super::{parse_header, BookContext};

/// Number of chunks used when book partitioning finds no headers.
pub const FALLBACK_CHUNKS: usize = 5;

/// One unit of scan work.
#[derive(Debug, Clone)]
pub struct Partition {
    pub index: usize,
    pub range: Range<usize>,
    pub context: BookContext,
    lines: Arc<[String]>,
}

impl Partition {
    pub fn lines(&self) -> &[String] {
        &self.lines[self.range.clone()]
    }

    /// Absolute index of the first line.
    pub fn offset(&self) -> usize {
        self.range.start
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Partition with the configured strategy.
pub fn partition_lines(lines: Arc<[String]>, config: &SearchConfig) -> Vec<Partition> {
    match config.partition_strategy {
        PartitionStrategy::LineBatch => {
            line_batches(lines, config.workers, config.batch_size_multiplier)
        }
        PartitionStrategy::BookPartition => book_partitions(lines),
    }
}

/// Contiguous batches, at most `workers` of them, each at least
/// `min_batch` lines long (except the last).
pub fn line_batches(lines: Arc<[String]>, workers: usize, min_batch: usize) -> Vec<Partition> {
    let total = lines.len();
    if total == 0 {
        return Vec::new();
    }
    let batch = total.div_ceil(workers.max(1)).max(min_batch).max(1);
    let ranges: Vec<Range<usize>> = (0..total)
        .step_by(batch)
        .map(|start| start..(start + batch).min(total))
        .collect();
    build(lines, ranges)
}

/// One partition per book, or [`FALLBACK_CHUNKS`] equal chunks if the lines
/// carry no headers. Lines before the first header join the first book.
pub fn book_partitions(lines: Arc<[String]>) -> Vec<Partition> {
    let total = lines.len();
    if total == 0 {
        return Vec::new();
    }

    let mut starts = Vec::new();
    let mut current: Option<&str> = None;
    for (i, line) in lines.iter().enumerate() {
        if let Some((book, _)) = parse_header(line) {
            if current != Some(book) {
                starts.push(i);
                current = Some(book);
            }
        }
    }

    let ranges: Vec<Range<usize>> = if starts.is_empty() {
        let chunk = total.div_ceil(FALLBACK_CHUNKS);
        (0..total)
            .step_by(chunk)
            .map(|start| start..(start + chunk).min(total))
            .collect()
    } else {
        starts[0] = 0;
        starts
            .iter()
            .enumerate()
            .map(|(k, &start)| start..starts.get(k + 1).copied().unwrap_or(total))
            .collect()
    };
    build(lines, ranges)
}

/// Attach the book context in effect at each range start.
fn build(lines: Arc<[String]>, ranges: Vec<Range<usize>>) -> Vec<Partition> {
    let mut context = BookContext::default();
    let mut cursor = 0;
    let mut out = Vec::with_capacity(ranges.len());
    for (index, range) in ranges.into_iter().enumerate() {
        for line in &lines[cursor..range.start] {
            context.advance(line);
        }
        cursor = range.start;
        out.push(Partition {
            index,
            range,
            context: context.clone(),
            lines: Arc::clone(&lines),
        });
    }
    out
}
