//! Partition failures and degraded searches.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::common::{config_with_workers, loose, sample_corpus, synthetic_corpus};
use tzfanim::corpus::{line_batches, Partition};
use tzfanim::search::{PhraseScan, ResultAggregator, ScanCoordinator};
use tzfanim::testing::EmptyCorpus;
use tzfanim::{
    BoundaryPolicy, CorpusProvider, Hit, LetterMapSet, SearchConfig, SearchEngine, SearchError,
    SearchOptions, TextCorpus, Variant, VariantMatcher,
};

fn scan_for(corpus: &TextCorpus, phrase: &str) -> PhraseScan {
    let matcher = VariantMatcher::build(&[Variant::original(phrase)]).unwrap();
    PhraseScan::new(
        matcher,
        BoundaryPolicy::Loose,
        phrase,
        corpus.get_normalized_text().unwrap(),
    )
}

#[test]
fn panicking_partition_is_excluded_from_results() {
    let corpus = TextCorpus::from_text(&synthetic_corpus(4, 5));
    let lines = corpus.get_lines(None).unwrap();
    let scan = scan_for(&corpus, "אלהימ");

    let healthy = ScanCoordinator::new(4, Duration::from_secs(10))
        .run(line_batches(Arc::clone(&lines), 4, 1), Arc::new(move |p: &Partition| scan.scan(p)), &mut |_| {})
        .unwrap();

    let scan = scan_for(&corpus, "אלהימ");
    let broken = ScanCoordinator::new(4, Duration::from_secs(10))
        .run(
            line_batches(lines, 4, 1),
            Arc::new(move |p: &Partition| -> tzfanim::error::Result<Vec<Hit>> {
                if p.index == 1 {
                    panic!("corrupt partition {}", p.index);
                }
                scan.scan(p)
            }),
            &mut |_| {},
        )
        .unwrap();

    assert_eq!(broken.completed, 3);
    assert_eq!(broken.failed.len(), 1);
    assert!(matches!(broken.failed[0], SearchError::PartitionTask { partition: 1, .. }));

    let aggregator = ResultAggregator::new(1000, 1000);
    let all = aggregator.aggregate(healthy.hits);
    let partial = aggregator.aggregate(broken.hits);
    let count = |a: &tzfanim::search::Aggregation| -> usize {
        a.results.iter().map(|r| r.locations.len()).sum()
    };
    assert!(count(&partial) > 0);
    assert!(count(&partial) < count(&all));
}

#[test]
fn search_still_succeeds_when_deadline_already_passed() {
    let engine = SearchEngine::new(config_with_workers(2), sample_corpus(), LetterMapSet::standard());
    let options = SearchOptions {
        deadline: Some(Instant::now()),
        ..loose()
    };
    let response = engine.search("ברא", &options).unwrap();
    assert!(response.success);
}

#[test]
fn empty_corpus_is_reported_as_unavailable() {
    let engine = SearchEngine::new(SearchConfig::default(), Arc::new(EmptyCorpus), LetterMapSet::standard());
    let response = engine.respond("ברא", &loose());
    assert!(!response.success);
    assert!(response.error.unwrap().starts_with("corpus unavailable"));
}

#[test]
fn missing_corpus_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = TextCorpus::from_file(&dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, SearchError::CorpusUnavailable(_)));
}

#[test]
fn partials_are_delivered_sequentially_and_without_repeats() {
    let corpus: Arc<dyn CorpusProvider> = Arc::new(TextCorpus::from_text(&synthetic_corpus(5, 6)));
    let engine = SearchEngine::new(config_with_workers(8), corpus, LetterMapSet::standard());
    let mut seen: Vec<(String, Vec<tzfanim::RuleFamily>)> = Vec::new();
    let response = engine
        .search_with_partials("אור", &loose(), &mut |batch| {
            assert!(!batch.is_empty());
            seen.extend(batch.iter().map(|p| (p.variant.clone(), p.sources.clone())));
        })
        .unwrap();

    let unique: std::collections::HashSet<_> = seen.iter().cloned().collect();
    assert_eq!(unique.len(), seen.len());
    assert_eq!(seen.len(), response.total_variants);
}
