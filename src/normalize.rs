//! Search-stable text transformations
//!
//! Match ranges are UTF-16 offsets computed on folded text and applied to the
//! original, so every fold here keeps each character's UTF-16 width. UTF-8
//! length may change (the Kelvin sign folds to a one-byte `k`).

use unicode_general_category::{get_general_category, GeneralCategory};

/// Lowercases `text` without moving any UTF-16 index.
///
/// Expansions such as `İ` -> `i̇` keep only their first character. A mapping
/// that would change the UTF-16 width leaves the character untouched.
pub fn lowercase_for_search(text: &str) -> String {
    if text.is_ascii() {
        return text.to_ascii_lowercase();
    }
    text.chars().map(fold_char).collect()
}

/// Splits a raw query into lowercase tokens.
///
/// Anything other than letters (L*), decimal digits (Nd) and apostrophes
/// separates tokens, so `"lord's,  SUPPER!"` becomes `["lord's", "supper"]`
/// and `"x²"` becomes `["x"]`.
pub fn query_tokens(query: &str) -> Vec<String> {
    let spaced: String = query
        .chars()
        .map(|c| if is_token_char(c) { c } else { ' ' })
        .collect();

    lowercase_for_search(&spaced)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

pub(crate) fn fold_char(ch: char) -> char {
    if ch.is_ascii() {
        return ch.to_ascii_lowercase();
    }
    match ch.to_lowercase().next() {
        Some(l) if l.len_utf16() == ch.len_utf16() => l,
        _ => ch,
    }
}

pub(crate) fn is_token_char(ch: char) -> bool {
    // Apostrophe stays so "lord's" is one token
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric() || ch == '\'';
    }
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lowercase_basic() {
        assert_eq!(lowercase_for_search("In The Beginning"), "in the beginning");
        assert_eq!(lowercase_for_search("ÉLOHÎM"), "élohîm");
        assert_eq!(lowercase_for_search("ΘΕΟΣ"), "θεοσ");
    }

    #[test]
    fn test_lowercase_width_changing_chars() {
        // U+0130 lowercases to "i\u{307}"; only the 'i' is kept
        assert_eq!(lowercase_for_search("İsaiah"), "isaiah");
        // Kelvin sign and U+023A change UTF-8 width but not UTF-16 width
        assert_eq!(lowercase_for_search("\u{212A}ING"), "king");
        assert_eq!(lowercase_for_search("\u{023A}"), "\u{2C65}");
        assert_eq!(lowercase_for_search("\u{212A}").encode_utf16().count(), 1);
    }

    #[test]
    fn test_query_tokens() {
        assert_eq!(query_tokens("In the Beginning"), vec!["in", "the", "beginning"]);
        assert_eq!(query_tokens("  lord's,  SUPPER! "), vec!["lord's", "supper"]);
        assert_eq!(query_tokens("john3:16"), vec!["john3", "16"]);
        assert_eq!(query_tokens("god god"), vec!["god", "god"]);
        assert_eq!(query_tokens("Élohim ΘΕΟΣ"), vec!["élohim", "θεοσ"]);
    }

    #[test]
    fn test_query_tokens_non_letter_numerics_split() {
        // No / Nl numerics and combining marks are separators
        assert_eq!(query_tokens("x² ½ Ⅻ"), vec!["x"]);
        assert_eq!(query_tokens("a\u{0345}b"), vec!["a", "b"]);
        // Nd digits outside ASCII stay
        assert_eq!(query_tokens("verse ٣"), vec!["verse", "٣"]);
    }

    #[test]
    fn test_query_tokens_empty() {
        assert!(query_tokens("").is_empty());
        assert!(query_tokens("    ").is_empty());
        assert!(query_tokens("!!! ... ---").is_empty());
        assert!(query_tokens("\t\n").is_empty());
    }

    proptest! {
        #[test]
        fn test_lowercase_preserves_alignment(s in "\\PC*") {
            let lowered = lowercase_for_search(&s);
            prop_assert_eq!(lowered.encode_utf16().count(), s.encode_utf16().count());
            for (orig, low) in s.chars().zip(lowered.chars()) {
                prop_assert_eq!(low, fold_char(orig));
                prop_assert_eq!(low.len_utf16(), orig.len_utf16());
            }
        }

        #[test]
        fn test_tokens_are_clean(q in "\\PC{0,40}") {
            for token in query_tokens(&q) {
                prop_assert!(!token.is_empty());
                prop_assert!(token.chars().all(is_token_char));
            }
        }
    }
}
