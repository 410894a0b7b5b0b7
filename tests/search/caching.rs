//! Response caching through `SearchEngine`.

use std::sync::Arc;
use std::time::Instant;

use super::common::{config_with_workers, loose, sample_corpus};
use tzfanim::testing::FailingCacheStore;
use tzfanim::{
    Engine, LetterMapSet, SearchCache, SearchConfig, SearchEngine, SearchOptions,
};

fn cached_options() -> SearchOptions {
    SearchOptions {
        use_cache: true,
        ..loose()
    }
}

fn engine_with_cache(config: SearchConfig) -> (SearchEngine, Arc<SearchCache>) {
    let cache = Arc::new(SearchCache::in_memory(&config));
    let engine = SearchEngine::new(config, sample_corpus(), LetterMapSet::standard())
        .with_cache(Arc::clone(&cache));
    (engine, cache)
}

#[test]
fn second_request_is_served_from_cache() {
    let (engine, cache) = engine_with_cache(config_with_workers(2));

    let first = engine.search("אלהים", &cached_options()).unwrap();
    assert!(!first.cached);
    let entry = cache.entry("אלהים", Engine::Automaton, false).expect("entry written");
    assert_eq!(entry.hit_count, 0);

    let second = engine.search("אלהים", &cached_options()).unwrap();
    assert!(second.cached);
    assert_eq!(second.results, first.results);
    assert_eq!(second.method, first.method);
    assert!(second.search_time_seconds <= first.search_time_seconds + 0.05);

    let entry = cache.entry("אלהים", Engine::Automaton, false).unwrap();
    assert_eq!(entry.hit_count, 1);
}

#[test]
fn vocalized_and_plain_phrases_share_an_entry() {
    let (engine, _) = engine_with_cache(config_with_workers(2));
    engine.search("אלהים", &cached_options()).unwrap();
    let pointed = engine.search("אֱלֹהִים", &cached_options()).unwrap();
    assert!(pointed.cached);
}

#[test]
fn modes_do_not_share_entries() {
    let (engine, cache) = engine_with_cache(config_with_workers(2));
    engine.search("ברא", &cached_options()).unwrap();

    let strict = SearchOptions {
        strict_word_boundary: Some(true),
        ..cached_options()
    };
    assert!(!engine.search("ברא", &strict).unwrap().cached);

    let indexed = SearchOptions {
        engine: Engine::Indexed,
        ..cached_options()
    };
    assert!(!engine.search("ברא", &indexed).unwrap().cached);
    assert!(cache.entry("ברא", Engine::Indexed, false).is_some());
}

#[test]
fn cache_can_be_bypassed() {
    let (engine, cache) = engine_with_cache(config_with_workers(2));
    engine.search("ברא", &loose()).unwrap();
    assert!(cache.entry("ברא", Engine::Automaton, false).is_none());
}

#[test]
fn book_filtered_searches_are_not_cached() {
    let (engine, cache) = engine_with_cache(config_with_workers(2));
    let options = SearchOptions {
        book_filter: Some("שמות".to_string()),
        ..cached_options()
    };
    engine.search("משה", &options).unwrap();
    assert!(cache.entry("משה", Engine::Automaton, false).is_none());
}

#[test]
fn slow_searches_are_not_written() {
    let config = SearchConfig {
        cache_write_threshold_secs: 0.0,
        ..config_with_workers(2)
    };
    let (engine, cache) = engine_with_cache(config);
    engine.search("ברא", &cached_options()).unwrap();
    assert!(cache.entry("ברא", Engine::Automaton, false).is_none());
}

#[test]
fn deadline_cut_search_is_not_reused() {
    let (engine, cache) = engine_with_cache(config_with_workers(2));
    let cut = SearchOptions {
        deadline: Some(Instant::now()),
        ..cached_options()
    };
    let first = engine.search("ברא", &cut).unwrap();
    assert!(!first.cached);
    assert!(cache.entry("ברא", Engine::Automaton, false).is_none());

    let second = engine.search("ברא", &cached_options()).unwrap();
    assert!(!second.cached);
    assert!(second.total_variants > 0);
    assert!(second.results.iter().any(|r| r.variant == "ברא"));

    let third = engine.search("ברא", &cached_options()).unwrap();
    assert!(third.cached);
}

#[test]
fn failing_store_degrades_to_uncached_search() {
    let config = config_with_workers(2);
    let cache = Arc::new(SearchCache::new(Arc::new(FailingCacheStore), &config));
    cache.clear_memory();
    let engine = SearchEngine::new(config, sample_corpus(), LetterMapSet::standard()).with_cache(cache);

    let response = engine.search("ברא", &cached_options()).unwrap();
    assert!(response.success);
    assert!(!response.cached);
}
