//! Named import/export specifier ordering.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NAMED_SPECIFIERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?P<head>(?:import|export)(?:\s+type)?(?:\s+[A-Za-z_$][\w$]*\s*,)?\s*)\{(?P<body>[^{}]*)\}",
    )
    .expect("named specifier pattern is valid")
});

/// Sort key of one specifier: case-insensitive, ignoring a `type ` prefix
/// and an `as alias` suffix.
pub fn import_specifier_key(specifier: &str) -> String {
    let spec = specifier.trim();
    let spec = spec.strip_prefix("type ").unwrap_or(spec).trim_start();
    let name = spec.split(" as ").next().unwrap_or(spec);
    name.trim().to_lowercase()
}

/// Sort the named specifiers of every `import { … }` / `export { … }` in
/// `text`. Statements with at most one specifier are left untouched.
pub fn sort_import_specifiers(text: &str) -> Cow<'_, str> {
    NAMED_SPECIFIERS.replace_all(text, |caps: &Captures| {
        let mut specifiers: Vec<&str> = caps["body"]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if specifiers.len() <= 1 {
            return caps[0].to_string();
        }
        specifiers.sort_by(|a, b| {
            import_specifier_key(a)
                .cmp(&import_specifier_key(b))
                .then_with(|| a.cmp(b))
        });
        format!("{}{{ {} }}", &caps["head"], specifiers.join(", "))
    })
}
