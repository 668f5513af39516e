//! Language hooks deciding whether an adjacent delete/insert pair reads as
//! one update.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language::Language;

static JSON_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""((?:\\.|[^"\\])*)"\s*:"#).expect("json key pattern is valid"));

/// Whether a delete immediately followed by an insert should be reported as
/// a single update.
///
/// JSON pairs only when both sides address the same object key, or when
/// neither side names a key (bare array values). Every other language
/// always pairs.
pub fn should_pair_delete_insert(old_text: &str, new_text: &str, language: Option<Language>) -> bool {
    match language {
        Some(Language::Json) => first_json_key(old_text) == first_json_key(new_text),
        _ => true,
    }
}

fn first_json_key(text: &str) -> Option<&str> {
    JSON_KEY
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_pairs_same_key() {
        assert!(should_pair_delete_insert(
            r#"  "name": "a","#,
            r#"  "name": "b","#,
            Some(Language::Json)
        ));
    }

    #[test]
    fn test_json_splits_different_keys() {
        assert!(!should_pair_delete_insert(
            r#""name": "a""#,
            r#""title": "a""#,
            Some(Language::Json)
        ));
        assert!(!should_pair_delete_insert(r#""name": 1"#, "2", Some(Language::Json)));
    }

    #[test]
    fn test_json_bare_values_pair() {
        assert!(should_pair_delete_insert("1,", "2,", Some(Language::Json)));
    }

    #[test]
    fn test_json_key_with_escaped_quote() {
        assert_eq!(first_json_key(r#""a\"b" : 1"#), Some(r#"a\"b"#));
    }

    #[test]
    fn test_other_languages_always_pair() {
        assert!(should_pair_delete_insert("a", "b", None));
        assert!(should_pair_delete_insert(r#""x": 1"#, r#""y": 1"#, Some(Language::TypeScript)));
    }
}
