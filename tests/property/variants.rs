//! Variant generation and boundary-mode properties.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use tzfanim::matcher::strict_length_ok;
use tzfanim::{
    normalize, prepare_phrase, LetterMapSet, RuleFamily, SearchConfig, SearchEngine, SearchOptions,
    VariantGenerator,
};

use super::common::sample_corpus;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Hebrew words including final forms.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::char::range('\u{05D0}', '\u{05EA}'), 1..6)
        .prop_map(|chars| chars.into_iter().collect())
}

/// One to three words separated by single spaces.
fn phrase_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..4).prop_map(|words| words.join(" "))
}

/// Words that occur in the sample corpus, some with clitic prefixes.
fn corpus_word_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "ברא", "אלהים", "ארץ", "שמים", "אור", "משה", "יהי", "טוב", "בני", "את",
    ])
}

fn generator() -> VariantGenerator {
    VariantGenerator::new(Arc::new(LetterMapSet::standard()), 7)
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_original_appears_exactly_once(phrase in phrase_strategy(), budget in 1usize..300) {
        let variants = generator().generate(&phrase, budget);
        let normalized = normalize(&phrase);
        prop_assert_eq!(&variants[0].text, &normalized);
        prop_assert!(variants[0].is_original());
        prop_assert_eq!(variants.iter().filter(|v| v.text == normalized).count(), 1);
    }

    #[test]
    fn prop_variants_fit_budget_and_are_unique(phrase in phrase_strategy(), budget in 1usize..300) {
        let variants = generator().generate(&phrase, budget);
        prop_assert!(variants.len() <= budget);
        let texts: HashSet<&str> = variants.iter().map(|v| v.text.as_str()).collect();
        prop_assert_eq!(texts.len(), variants.len());
    }

    #[test]
    fn prop_one_source_per_character(phrase in phrase_strategy()) {
        let normalized = normalize(&phrase);
        for variant in generator().generate(&phrase, 200) {
            prop_assert_eq!(variant.sources.len(), variant.text.chars().count());
            prop_assert_eq!(variant.text.chars().count(), normalized.chars().count());
            for ((c, o), s) in variant.text.chars().zip(normalized.chars()).zip(&variant.sources) {
                if c == ' ' {
                    prop_assert_eq!(o, ' ');
                    prop_assert_eq!(*s, RuleFamily::Original);
                }
                if *s == RuleFamily::Original {
                    prop_assert_eq!(c, o);
                }
                prop_assert!(!"ךםןףץ".contains(c));
            }
        }
    }

    #[test]
    fn prop_generation_is_deterministic(phrase in phrase_strategy()) {
        let a = generator().generate(&phrase, 50);
        let b = generator().generate(&phrase, 50);
        prop_assert_eq!(a, b);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_strict_results_keep_phrase_length(word in corpus_word_strategy()) {
        let config = SearchConfig { workers: 2, batch_size_multiplier: 1, ..SearchConfig::default() };
        let clitics = config.clitic_prefixes.clone();
        let engine = SearchEngine::new(config, sample_corpus(), LetterMapSet::standard());
        let options = SearchOptions {
            use_cache: false,
            strict_word_boundary: Some(true),
            ..SearchOptions::default()
        };
        let response = engine.search(word, &options).unwrap();
        let original_len = prepare_phrase(word).chars().count();
        for result in &response.results {
            prop_assert!(
                strict_length_ok(&result.variant, original_len, &clitics),
                "{} is not {} chars or a clitic plus {} chars",
                result.variant, original_len, original_len
            );
            let len = result.variant.chars().count();
            if len > original_len {
                prop_assert_eq!(result.sources[0], RuleFamily::Prefix);
            }
        }
    }
}
