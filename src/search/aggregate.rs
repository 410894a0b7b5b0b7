// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Grouping hits into per-variant results.
//!
//! Hits arrive in whatever order the workers finished. The aggregator sorts
//! them by corpus ordinal first, so grouping, de-duplication and truncation all
//! see the same sequence no matter how the corpus was partitioned.
//!
//! **Invariant**: a verse appears at most once per variant, and groups are
//! ordered by the corpus position of their first hit.
//!
//! **Verified by**:
//! - `determinism::results_do_not_depend_on_worker_count` (tests/search/determinism.rs)
//! - `prop_aggregation_is_order_independent` (tests/property/aggregation.rs)

use indexmap::IndexMap;

use crate::config::SearchConfig;
use crate::types::{Hit, MatchLocation, Variant, VariantResult};

/// Grouped, truncated results plus the group count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    pub results: Vec<VariantResult>,
    /// Number of groups after the `max_results` cap.
    pub total_variants: usize,
}

/// Groups hits by `(variant text, sources)`.
#[derive(Debug, Clone, Copy)]
pub struct ResultAggregator {
    max_results: usize,
    max_locations: usize,
}

impl ResultAggregator {
    pub fn new(max_results: usize, max_locations: usize) -> Self {
        Self {
            max_results,
            max_locations,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.max_results, config.max_locations_per_variant)
    }

    pub fn aggregate(&self, mut hits: Vec<Hit>) -> Aggregation {
        hits.sort_by(|a, b| {
            a.ordinal
                .cmp(&b.ordinal)
                .then_with(|| a.variant.cmp(&b.variant))
        });

        let mut groups: IndexMap<Variant, Vec<(u64, MatchLocation)>> = IndexMap::new();
        for hit in hits {
            if !groups.contains_key(&hit.variant) && groups.len() >= self.max_results {
                continue;
            }
            let locations = groups.entry(hit.variant).or_default();
            if locations.last().is_some_and(|(ord, _)| *ord == hit.ordinal) {
                continue;
            }
            if locations.len() < self.max_locations {
                locations.push((hit.ordinal, hit.location));
            }
        }

        let total_variants = groups.len();
        let results = groups
            .into_iter()
            .map(|(variant, locations)| VariantResult {
                variant: variant.text,
                sources: variant.sources,
                locations: locations.into_iter().map(|(_, loc)| loc).collect(),
            })
            .collect();

        Aggregation {
            results,
            total_variants,
        }
    }
}
