//! Comparison text for tokens.

use std::borrow::Cow;

use crate::language::Language;
use crate::text::collapse_whitespace;

/// Build the form of `text` used for token equality.
///
/// For ts/tsx/js/jsx, internal whitespace is collapsed and single quotes
/// are folded to double quotes. Every other language, JSON included,
/// compares raw text.
pub fn build_compare_text(text: &str, language: Option<Language>) -> Cow<'_, str> {
    if !language.is_some_and(|lang| lang.is_cosmetic()) {
        return Cow::Borrowed(text);
    }

    if text.trim().is_empty() {
        return if text == " " {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(" ".to_string())
        };
    }

    let collapsed = collapse_whitespace(text);
    let folded = if collapsed.contains('\'') {
        collapsed.replace('\'', "\"")
    } else {
        collapsed
    };

    if folded == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(folded)
    }
}
