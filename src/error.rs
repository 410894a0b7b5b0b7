// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Only two kinds ever reach the user: a phrase we refuse to search
//! (`InvalidInput`) and a corpus we cannot search (`CorpusUnavailable`).
//! Everything else degrades to partial or fallback results and is logged
//! where it is swallowed.

use thiserror::Error;

/// Errors raised by the search core.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Empty phrase, or phrase longer than the configured maximum.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The corpus provider returned no lines.
    #[error("corpus unavailable: {0}")]
    CorpusUnavailable(String),

    /// One scan task panicked, failed or timed out.
    #[error("partition {partition} failed: {reason}")]
    PartitionTask { partition: usize, reason: String },

    /// The indexed engine's lookup or positional join failed.
    #[error("index join failed: {0}")]
    IndexJoin(String),

    /// Cache read or write failed.
    #[error("cache error: {0}")]
    Cache(String),

    /// The pattern automaton could not be built from the variant set.
    #[error("automaton build failed: {0}")]
    Automaton(#[from] aho_corasick::BuildError),

    /// The per-invocation worker pool could not be created.
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration could not be read or is out of range.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether this error is surfaced to the caller as a `success: false` response.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidInput(_) | SearchError::CorpusUnavailable(_)
        )
    }
}

/// Errors reported by store collaborators (word index, cache store).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend: {0}")]
    Backend(String),

    #[error("entry is corrupt: {0}")]
    Corrupt(String),

    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;
