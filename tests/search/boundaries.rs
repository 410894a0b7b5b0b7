//! Strict word-boundary mode and clitic prefixes.

use super::common::{config_with_workers, engine_for, loose, strict};
use tzfanim::{LetterMapSet, RuleFamily, SearchConfig};

const CORPUS: &str = "\
בראשית פרק-א
{1}בראשית ברא אלהים
{2}והארץ היתה תהו ובהו
{3}ויאמר הארץ לארץ
{4}ארץ טובה
";

fn identity_engine(config: SearchConfig) -> tzfanim::SearchEngine {
    engine_for(CORPUS, config, LetterMapSet::identity())
}

#[test]
fn loose_mode_matches_inside_words() {
    let response = identity_engine(config_with_workers(1)).search("ברא", &loose()).unwrap();
    let group = &response.results[0];
    assert_eq!(group.variant, "ברא");
    assert_eq!(group.locations[0].highlighted_text, "[ברא]שית ברא אלהים");
}

#[test]
fn strict_mode_requires_whole_tokens() {
    let response = identity_engine(config_with_workers(1)).search("ברא", &strict()).unwrap();
    let group = &response.results[0];
    assert_eq!(group.locations[0].highlighted_text, "בראשית [ברא] אלהים");
}

#[test]
fn clitic_prefixed_token_is_reported_with_prefix_label() {
    let response = identity_engine(config_with_workers(1)).search("ארץ", &strict()).unwrap();

    let prefixed = response
        .results
        .iter()
        .find(|r| r.variant == "הארצ")
        .expect("ה-prefixed token should be accepted");
    assert_eq!(prefixed.sources[0], RuleFamily::Prefix);
    assert_eq!(prefixed.sources.len(), 4);
    assert!(prefixed.sources[1..].iter().all(|s| *s == RuleFamily::Original));

    // Each verse is reported for its first accepted token only
    let verses: Vec<&str> = response
        .results
        .iter()
        .flat_map(|r| &r.locations)
        .map(|l| l.verse.as_str())
        .collect();
    assert_eq!(verses, vec!["3", "4"]);
}

#[test]
fn variants_stay_within_one_prefix_char_of_the_phrase() {
    let response = identity_engine(config_with_workers(2)).search("ארץ", &strict()).unwrap();
    for result in &response.results {
        let len = result.variant.chars().count();
        assert!(
            len == 3 || (len == 4 && result.sources[0] == RuleFamily::Prefix),
            "unexpected variant {}",
            result.variant
        );
    }
}

#[test]
fn clitic_set_is_configurable() {
    let config = SearchConfig {
        clitic_prefixes: Vec::new(),
        ..config_with_workers(1)
    };
    let response = identity_engine(config).search("ארץ", &strict()).unwrap();
    assert_eq!(response.total_variants, 1);
    assert_eq!(response.results[0].variant, "ארצ");
    assert_eq!(response.results[0].locations[0].verse, "4");
}

#[test]
fn two_letter_prefix_is_rejected() {
    // "וה" is two clitics in a row; only one is allowed
    let response = identity_engine(config_with_workers(1)).search("ארץ", &strict()).unwrap();
    assert!(response.results.iter().all(|r| r.variant != "והארצ"));
}
