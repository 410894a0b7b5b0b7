//! Normalization properties.

use proptest::prelude::*;
use tzfanim::{normalize, prepare_phrase};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Vocalized Hebrew-ish text: letters (final forms included), points,
/// cantillation marks and whitespace.
fn vocalized_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => prop::char::range('\u{05D0}', '\u{05EA}'),
            2 => prop::char::range('\u{0591}', '\u{05C7}'),
            1 => Just(' '),
            1 => Just('\t'),
            1 => prop::char::range('\u{0300}', '\u{036F}'),
        ],
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(text in vocalized_strategy()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_normalize_is_idempotent_on_any_text(text in "\\PC{0,40}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_normalized_text_has_no_marks_or_final_forms(text in vocalized_strategy()) {
        let out = normalize(&text);
        for c in out.chars() {
            prop_assert!(!('\u{0591}'..='\u{05C7}').contains(&c), "mark {:?} left in {:?}", c, out);
            prop_assert!(!"ךםןףץ".contains(c), "final form {:?} left in {:?}", c, out);
        }
    }

    #[test]
    fn prop_prepared_phrase_is_single_spaced(text in vocalized_strategy()) {
        let out = prepare_phrase(&text);
        prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
        prop_assert!(!out.contains("  "));
        prop_assert!(!out.contains('\t'));
        prop_assert_eq!(prepare_phrase(&out), out.clone());
    }
}
