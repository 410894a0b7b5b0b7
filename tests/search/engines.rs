//! The indexed engine against the automaton engine.

use std::sync::Arc;

use super::common::{config_with_workers, strict, verse_keys};
use tzfanim::{
    Engine, LetterMapSet, MemoryWordIndex, SearchEngine, SearchMethod, SearchOptions, TextCorpus,
};

/// No clitic-prefixed occurrences, so strict automaton hits and exact index
/// hits should coincide.
const CORPUS: &str = "\
בראשית פרק-א
{1}בראשית ברא אלהים את השמים
{2}ויאמר אלהים יהי אור
{3}אברא אלהים שם
שמות פרק-ב
{1}ויברא אלהים ברא אלהים
";

fn engine() -> SearchEngine {
    SearchEngine::new(
        config_with_workers(3),
        Arc::new(TextCorpus::from_text(CORPUS)),
        LetterMapSet::identity(),
    )
}

fn indexed() -> SearchOptions {
    SearchOptions {
        engine: Engine::Indexed,
        ..strict()
    }
}

#[test]
fn two_word_phrase_same_verses_in_both_engines() {
    let engine = engine();
    let automaton = engine.search("ברא אלהים", &strict()).unwrap();
    let index = engine.search("ברא אלהים", &indexed()).unwrap();

    assert_eq!(index.method, Some(SearchMethod::PhraseIndex));
    assert_eq!(verse_keys(&automaton), verse_keys(&index));
    assert_eq!(verse_keys(&index).len(), 2);
}

#[test]
fn single_word_same_verses_in_both_engines() {
    let engine = engine();
    let automaton = engine.search("אלהים", &strict()).unwrap();
    let index = engine.search("אלהים", &indexed()).unwrap();

    assert_eq!(index.method, Some(SearchMethod::SingleWordIndex));
    assert_eq!(verse_keys(&automaton), verse_keys(&index));
    assert_eq!(verse_keys(&index).len(), 4);
}

#[test]
fn long_phrase_uses_text_search() {
    let response = engine().search("בראשית ברא אלהים את", &indexed()).unwrap();
    assert_eq!(response.method, Some(SearchMethod::TextSearch));
    assert_eq!(response.total_variants, 1);
    assert!(response.results[0].locations[0]
        .highlighted_text
        .starts_with("[בראשית ברא אלהים את]"));
}

#[test]
fn injected_index_is_used() {
    let corpus = TextCorpus::from_text(CORPUS);
    let store = Arc::new(MemoryWordIndex::build(corpus.verses()));
    let engine = SearchEngine::new(config_with_workers(1), Arc::new(corpus), LetterMapSet::identity())
        .with_word_index(store);
    let response = engine.search("ויאמר", &indexed()).unwrap();
    assert_eq!(verse_keys(&response).len(), 1);
    assert_eq!(response.results[0].locations[0].highlighted_text, "[ויאמר] אלהים יהי אור");
}

#[test]
fn indexed_search_respects_book_filter() {
    let options = SearchOptions {
        book_filter: Some("שמות".to_string()),
        ..indexed()
    };
    let response = engine().search("אלהים", &options).unwrap();
    let keys = verse_keys(&response);
    assert_eq!(keys.len(), 1);
    assert!(keys.iter().all(|(book, _, _)| book == "שמות"));
}

#[test]
fn indexed_partials_report_found_variants_once() {
    let engine = engine();
    let mut batches: Vec<Vec<String>> = Vec::new();
    engine
        .search_with_partials("אלהים", &indexed(), &mut |found| {
            batches.push(found.iter().map(|p| p.variant.clone()).collect())
        })
        .unwrap();
    assert_eq!(batches, vec![vec!["אלהימ".to_string()]]);
}
