//! End-to-end scenarios through `SearchEngine`.

use std::sync::Arc;

use super::common::{config_with_workers, engine_for, loose, sample_engine, strict, CountingCorpus};
use tzfanim::{
    LetterMapSet, RuleFamily, SearchConfig, SearchEngine, SearchError, SearchMethod, TextCorpus,
};

const GENESIS_1_1: &str = "בראשית פרק-א\n{1}בראשית ברא אלהים\n";

#[test]
fn original_phrase_found_and_highlighted() {
    let engine = engine_for(GENESIS_1_1, config_with_workers(2), LetterMapSet::standard());
    let response = engine.search("ברא", &loose()).unwrap();

    assert!(response.success);
    let original = response
        .results
        .iter()
        .find(|r| r.variant == "ברא")
        .expect("original variant should be found");
    assert!(original.sources.contains(&RuleFamily::Original));

    let location = &original.locations[0];
    assert_eq!(location.book, "בראשית");
    assert_eq!(location.chapter, "א");
    assert_eq!(location.verse, "1");
    assert!(location.highlighted_text.contains("[ברא]"));
}

#[test]
fn sources_serialize_with_user_labels() {
    let engine = engine_for(GENESIS_1_1, config_with_workers(1), LetterMapSet::standard());
    let response = engine.search("ברא", &loose()).unwrap();
    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains(r#""Original""#));
    assert!(json.contains(r#""method":"automaton_line_batch""#));
}

#[test]
fn overlong_phrase_fails_before_touching_corpus() {
    let corpus = Arc::new(CountingCorpus::new(TextCorpus::from_text(GENESIS_1_1)));
    let engine = SearchEngine::new(SearchConfig::default(), corpus.clone(), LetterMapSet::standard());

    let phrase = "אב".repeat(60);
    let response = engine.respond(&phrase, &loose());

    assert!(!response.success);
    assert!(response.results.is_empty());
    assert!(response.error.as_deref().is_some_and(|e| e.contains("maximum is 100")));
    assert_eq!(corpus.requests(), 0);
}

#[test]
fn empty_phrase_is_invalid_input() {
    let engine = sample_engine();
    let err = engine.search(" \t ", &loose()).unwrap_err();
    assert!(matches!(err, SearchError::InvalidInput(_)));
    assert!(err.is_user_visible());
}

#[test]
fn vocalized_query_matches_like_plain_query() {
    let engine = sample_engine();
    let plain = engine.search("ברא", &strict()).unwrap();
    let pointed = engine.search("בָּרָא", &strict()).unwrap();
    assert_eq!(plain.results, pointed.results);
}

#[test]
fn final_forms_in_query_are_folded() {
    let engine = sample_engine();
    let response = engine.search("אלהים", &strict()).unwrap();
    assert!(response.results.iter().any(|r| r.variant == "אלהימ"));
}

#[test]
fn highlight_brackets_the_verse_as_stored() {
    let engine = sample_engine();
    for options in [strict(), tzfanim::SearchOptions { engine: tzfanim::Engine::Indexed, ..strict() }] {
        let response = engine.search("אלהים", &options).unwrap();
        let group = response
            .results
            .iter()
            .find(|r| r.variant == "אלהימ")
            .expect("original variant should be found");
        let first = &group.locations[0];
        assert_eq!(first.verse, "א");
        assert!(first.highlighted_text.contains("[אֱלֹהִים]"), "{}", first.highlighted_text);
        assert!(first.highlighted_text.starts_with("בְּרֵאשִׁית"));
    }
}

#[test]
fn substituted_variant_is_reported_with_its_family() {
    // Map 2 pairs ת with א, so "תלהימ" searched loose finds "אלהימ"
    let engine = sample_engine();
    let response = engine.search("תלהימ", &loose()).unwrap();
    let hit = response
        .results
        .iter()
        .find(|r| r.variant == "אלהימ")
        .expect("substituted variant should be found");
    assert_eq!(hit.sources.len(), 5);
    assert_ne!(hit.sources[0], RuleFamily::Original);
}

#[test]
fn multi_word_phrase_is_found_whole() {
    let engine = SearchEngine::new(
        config_with_workers(2),
        super::common::sample_corpus(),
        LetterMapSet::identity(),
    );
    let response = engine.search("ויאמר אלהים", &strict()).unwrap();
    assert_eq!(response.method, Some(SearchMethod::AutomatonLineBatch));
    assert_eq!(response.total_variants, 1);
    let original = &response.results[0];
    assert_eq!(original.variant, "ויאמר אלהימ");
    assert_eq!(original.locations.len(), 1);
    assert!(original.locations[0].highlighted_text.contains("[וַיֹּאמֶר אֱלֹהִים]"));
}

#[test]
fn large_phrase_product_switches_to_per_word_scan() {
    let engine = sample_engine();
    let response = engine.search("ויאמר אלהים", &strict()).unwrap();
    assert_eq!(response.method, Some(SearchMethod::AutomatonMultiWord));
    let original = response
        .results
        .iter()
        .find(|r| r.variant == "ויאמר אלהימ")
        .expect("phrase should be found word by word");
    assert_eq!(original.sources[5], RuleFamily::Original);
    assert!(original.locations[0].highlighted_text.contains("[וַיֹּאמֶר] [אֱלֹהִים]"));
}

#[test]
fn book_partition_strategy_reports_its_method() {
    let config = SearchConfig {
        partition_strategy: tzfanim::PartitionStrategy::BookPartition,
        ..config_with_workers(2)
    };
    let engine = SearchEngine::new(config, super::common::sample_corpus(), LetterMapSet::standard());
    let response = engine.search("משה", &strict()).unwrap();
    assert_eq!(response.method, Some(SearchMethod::AutomatonBookPartition));
    assert!(response
        .results
        .iter()
        .any(|r| r.variant == "משה" && r.locations[0].book == "שמות"));
}
