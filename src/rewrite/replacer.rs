//! Case-preserving word substitution.
//!
//! Replaces every case-insensitive occurrence of "yale" with "fale" in a
//! single left-to-right pass, mirroring the casing pattern of each matched
//! occurrence. Occurrences inside the protected phrase "no yale references"
//! are copied byte-identically, casing included. The guard is evaluated per
//! occurrence from its local context, so a string holding both a protected
//! and an unprotected occurrence still gets the unprotected one replaced.

use regex::Regex;
use std::sync::LazyLock;

/// The target word, matched anywhere in the text with any casing.
static TARGET: LazyLock<Regex> = LazyLock::new(|| Regex::new("(?i)yale").expect("valid pattern"));

const SUBSTITUTE_UPPER: &str = "FALE";
const SUBSTITUTE_TITLE: &str = "Fale";
const SUBSTITUTE_LOWER: &str = "fale";

/// Replace every unprotected occurrence of the target word, preserving the
/// casing pattern of each occurrence.
///
/// Total over any input: empty strings and strings without occurrences come
/// back value-equal, which lets callers use a cheap `!=` changed check.
pub fn replace_preserving_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in TARGET.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        if in_protected_phrase(&text[..m.start()], &text[m.end()..]) {
            out.push_str(m.as_str());
        } else {
            out.push_str(substitute_for(m.as_str()));
        }
        last = m.end();
    }

    out.push_str(&text[last..]);
    out
}

/// Pick the substitute casing from the matched occurrence's pattern.
///
/// All uppercase -> all uppercase; first upper, rest lower -> title case;
/// anything else (all lower or irregular mixed case) -> all lowercase.
fn substitute_for(occurrence: &str) -> &'static str {
    let mut rest = occurrence.chars();
    let Some(first) = rest.next() else {
        return SUBSTITUTE_LOWER;
    };

    if first.is_ascii_uppercase() && rest.clone().all(|c| c.is_ascii_uppercase()) {
        SUBSTITUTE_UPPER
    } else if first.is_ascii_uppercase() && rest.all(|c| c.is_ascii_lowercase()) {
        SUBSTITUTE_TITLE
    } else {
        SUBSTITUTE_LOWER
    }
}

/// True when the occurrence sits inside the protected phrase: the word "no"
/// immediately before and the word "references" immediately after, both
/// case-insensitive and whitespace-flexible.
fn in_protected_phrase(before: &str, after: &str) -> bool {
    preceded_by_no(before) && followed_by_references(after)
}

fn preceded_by_no(before: &str) -> bool {
    let trimmed = before.trim_end();
    if trimmed.len() < 2 {
        return false;
    }
    let Some(tail) = trimmed.get(trimmed.len() - 2..) else {
        return false;
    };
    if !tail.eq_ignore_ascii_case("no") {
        return false;
    }
    // "no" must stand alone as a word, not end one like "casino"
    trimmed[..trimmed.len() - 2]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphanumeric())
}

fn followed_by_references(after: &str) -> bool {
    const WORD: &str = "references";
    let trimmed = after.trim_start();
    let Some(head) = trimmed.get(..WORD.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(WORD) {
        return false;
    }
    trimmed[WORD.len()..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(replace_preserving_case(""), "");
    }

    #[test]
    fn test_no_occurrence_returns_value_equal_string() {
        let text = "Harvard and Princeton have nothing to fear.";
        assert_eq!(replace_preserving_case(text), text);
    }

    #[test]
    fn test_casing_patterns() {
        assert_eq!(replace_preserving_case("YALE"), "FALE");
        assert_eq!(replace_preserving_case("Yale"), "Fale");
        assert_eq!(replace_preserving_case("yale"), "fale");
        // Irregular mixed case collapses to all-lowercase
        assert_eq!(replace_preserving_case("yAlE"), "fale");
        assert_eq!(replace_preserving_case("YAle"), "fale");
    }

    #[test]
    fn test_multiple_occurrences_single_pass() {
        assert_eq!(
            replace_preserving_case("Yale beat yale at YALE stadium"),
            "Fale beat fale at FALE stadium"
        );
    }

    #[test]
    fn test_surrounding_text_untouched() {
        assert_eq!(
            replace_preserving_case("Visit Yale. It's great!"),
            "Visit Fale. It's great!"
        );
    }

    #[test]
    fn test_protected_phrase_preserved() {
        let text = "This page has no Yale references on it.";
        assert_eq!(replace_preserving_case(text), text);
    }

    #[test]
    fn test_protected_phrase_whitespace_and_case_variants() {
        let text = "no  YALE   References";
        assert_eq!(replace_preserving_case(text), text);

        let text = "NO yale REFERENCES";
        assert_eq!(replace_preserving_case(text), text);
    }

    #[test]
    fn test_protected_and_unprotected_in_same_string() {
        // Only the occurrence inside the guard phrase survives
        assert_eq!(
            replace_preserving_case("Yale claims there are no Yale references here."),
            "Fale claims there are no Yale references here."
        );
    }

    #[test]
    fn test_guard_requires_standalone_no() {
        // "casino" ends in "no" but is not the word "no"
        assert_eq!(
            replace_preserving_case("casino Yale references"),
            "casino Fale references"
        );
    }

    #[test]
    fn test_guard_requires_standalone_references() {
        assert_eq!(
            replace_preserving_case("no Yale referencesque"),
            "no Fale referencesque"
        );
    }

    #[test]
    fn test_guard_needs_both_sides() {
        assert_eq!(replace_preserving_case("no Yale here"), "no Fale here");
        assert_eq!(
            replace_preserving_case("some Yale references"),
            "some Fale references"
        );
    }

    #[test]
    fn test_word_embedded_in_larger_word_still_replaced() {
        // Matches are not word-bounded, mirroring the original behavior
        assert_eq!(replace_preserving_case("yalies"), "falies");
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let once = replace_preserving_case("Yale, yale, YALE");
        assert_eq!(replace_preserving_case(&once), once);
    }

    #[test]
    fn test_non_ascii_text_around_matches() {
        assert_eq!(
            replace_preserving_case("café at Yale, naïve"),
            "café at Fale, naïve"
        );
    }
}
