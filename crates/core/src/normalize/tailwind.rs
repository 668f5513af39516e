//! Static class list ordering.
//!
//! Utility-class frameworks make the order of tokens inside `class` and
//! `className` attributes irrelevant, so lists are compared sorted.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CLASS_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\b(?P<attr>class|className)\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|\{\s*"(?P<bdq>[^"]*)"\s*\}|\{\s*'(?P<bsq>[^']*)'\s*\})"#,
    )
    .expect("class attribute pattern is valid")
});

static ARBITRARY_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-\[var\((?P<name>--[\w-]+)\)\]").expect("arbitrary value pattern is valid")
});

/// Sort the tokens of every static class list in `text`.
///
/// Lists holding a dynamic expression (any token with `{` or `}`) are left
/// untouched. `-[var(--x)]` is rewritten to its shorthand `-(--x)` first so
/// both spellings compare equal.
pub fn sort_class_lists(text: &str) -> Cow<'_, str> {
    CLASS_ATTRIBUTE.replace_all(text, |caps: &Captures| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        let (quote, value) = ["dq", "sq", "bdq", "bsq"]
            .iter()
            .find_map(|name| caps.name(name).map(|m| (*name, m.as_str())))
            .unwrap_or(("dq", ""));

        let mut classes: Vec<String> = value
            .split_whitespace()
            .map(|class| ARBITRARY_VAR.replace_all(class, "-($name)").into_owned())
            .collect();
        if classes.iter().any(|c| c.contains('{') || c.contains('}')) {
            return whole.to_string();
        }
        classes.sort();

        let q = if quote.ends_with("sq") { '\'' } else { '"' };
        format!("{}={q}{}{q}", &caps["attr"], classes.join(" "))
    })
}
