//! Loading configuration and corpora from disk.

use std::fs;
use std::sync::Arc;

use super::common::{strict, SAMPLE_CORPUS};
use tzfanim::{
    LetterMapSet, PartitionStrategy, SearchConfig, SearchEngine, SearchError, SearchMethod,
    TextCorpus,
};

#[test]
fn config_file_overrides_only_named_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tzfanim.toml");
    fs::write(
        &path,
        r#"
workers = 3
partition_strategy = "book_partition"
clitic_prefixes = ["ו"]

[word_budgets]
significant = 2000
"#,
    )
    .unwrap();

    let config = SearchConfig::load(&path).unwrap();
    assert_eq!(config.workers, 3);
    assert_eq!(config.partition_strategy, PartitionStrategy::BookPartition);
    assert_eq!(config.clitic_prefixes, vec!['ו']);
    assert_eq!(config.word_budgets.significant, 2000);
    assert_eq!(config.word_budgets.short, 1000);
    assert_eq!(config.max_phrase_length, 100);
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "workers = 0\n").unwrap();
    assert!(matches!(SearchConfig::load(&path), Err(SearchError::Config(_))));

    fs::write(&path, "workers = \"many\"\n").unwrap();
    assert!(matches!(SearchConfig::load(&path), Err(SearchError::Config(_))));
}

#[test]
fn search_over_corpus_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.txt");
    fs::write(&path, SAMPLE_CORPUS).unwrap();

    let config = SearchConfig::from_toml_str("partition_strategy = \"book_partition\"\n").unwrap();
    let corpus = Arc::new(TextCorpus::from_file(&path).unwrap());
    let engine = SearchEngine::new(config, corpus, LetterMapSet::standard());
    let response = engine.search("משה", &strict()).unwrap();

    assert_eq!(response.method, Some(SearchMethod::AutomatonBookPartition));
    assert!(response.results.iter().any(|r| r.variant == "משה"));
}
