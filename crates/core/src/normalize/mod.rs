//! Text normalization used to decide whether two texts are diff-equivalent.
//!
//! Each rule is an independent rewrite gated by one flag of the resolved
//! [`NormalizerRules`]. Rules run in a fixed order:
//!
//! - `numeric_literals`: canonical spelling of numeric literals
//! - `import_order`: sorted named import/export specifiers
//! - `tailwind`: sorted static class lists
//! - `whitespace`: collapsed whitespace
//!
//! Normalized text is only ever compared, never shown.

mod imports;
mod numeric;
mod tailwind;
mod whitespace;

use std::borrow::Cow;

use once_cell::sync::Lazy;

use crate::config::{resolve_normalizer_config, NormalizerRules, NormalizerSettings};
use crate::language::Language;

pub use imports::{import_specifier_key, sort_import_specifiers};
pub use numeric::normalize_numeric_literals;
pub use tailwind::sort_class_lists;
pub use whitespace::normalize_whitespace;

/// A single text rewrite rule.
pub trait NormalizationRule: Send + Sync {
    /// Rule name, matching its settings key.
    fn name(&self) -> &'static str;

    /// Whether the rule is switched on in `rules`.
    fn is_enabled(&self, rules: &NormalizerRules) -> bool;

    /// Rewrite `text`. Returns the input unchanged when nothing applies.
    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

struct NumericLiteralsRule;
struct ImportOrderRule;
struct TailwindRule;
struct WhitespaceRule;

impl NormalizationRule for NumericLiteralsRule {
    fn name(&self) -> &'static str {
        "numericLiterals"
    }

    fn is_enabled(&self, rules: &NormalizerRules) -> bool {
        rules.numeric_literals
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        normalize_numeric_literals(text)
    }
}

impl NormalizationRule for ImportOrderRule {
    fn name(&self) -> &'static str {
        "importOrder"
    }

    fn is_enabled(&self, rules: &NormalizerRules) -> bool {
        rules.import_order
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        sort_import_specifiers(text)
    }
}

impl NormalizationRule for TailwindRule {
    fn name(&self) -> &'static str {
        "tailwind"
    }

    fn is_enabled(&self, rules: &NormalizerRules) -> bool {
        rules.tailwind
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        sort_class_lists(text)
    }
}

impl NormalizationRule for WhitespaceRule {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn is_enabled(&self, rules: &NormalizerRules) -> bool {
        rules.whitespace
    }

    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        normalize_whitespace(text)
    }
}

/// Ordered rule pipeline. Built once, read-only afterwards.
pub struct NormalizerPipeline {
    rules: Vec<Box<dyn NormalizationRule>>,
}

static DEFAULT_PIPELINE: Lazy<NormalizerPipeline> = Lazy::new(NormalizerPipeline::with_defaults);

impl NormalizerPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Pipeline with all built-in rules in their canonical order.
    pub fn with_defaults() -> Self {
        let mut pipeline = Self::new();
        pipeline.register(Box::new(NumericLiteralsRule));
        pipeline.register(Box::new(ImportOrderRule));
        pipeline.register(Box::new(TailwindRule));
        pipeline.register(Box::new(WhitespaceRule));
        pipeline
    }

    /// Shared default pipeline.
    pub fn default_ref() -> &'static Self {
        &DEFAULT_PIPELINE
    }

    /// Append a rule; it runs after every rule registered before it.
    pub fn register(&mut self, rule: Box<dyn NormalizationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in execution order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every enabled rule over `text`.
    pub fn normalize<'a>(&self, text: &'a str, rules: &NormalizerRules) -> Cow<'a, str> {
        let mut current = Cow::Borrowed(text);
        for rule in self.rules.iter().filter(|r| r.is_enabled(rules)) {
            let rewritten = match rule.apply(&current) {
                Cow::Owned(rewritten) => Some(rewritten),
                Cow::Borrowed(_) => None,
            };
            if let Some(rewritten) = rewritten {
                log::trace!("normalizer rule {} rewrote text", rule.name());
                current = Cow::Owned(rewritten);
            }
        }
        current
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for NormalizerPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Normalize `text` with the rules resolved for `language`.
pub fn normalize_text_for_language<'a>(
    text: &'a str,
    settings: &NormalizerSettings,
    language: Option<Language>,
) -> Cow<'a, str> {
    let rules = resolve_normalizer_config(settings, language);
    NormalizerPipeline::default_ref().normalize(text, &rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialNormalizerRules;

    #[test]
    fn test_default_pipeline_order() {
        assert_eq!(
            NormalizerPipeline::default_ref().rule_names(),
            vec!["numericLiterals", "importOrder", "tailwind", "whitespace"]
        );
    }

    #[test]
    fn test_no_rules_is_identity() {
        let text = "import { b, a } from 'x';\n  const n = 1_000;";
        let out = NormalizerPipeline::default_ref().normalize(text, &NormalizerRules::none());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, text);
    }

    #[test]
    fn test_whitespace_on_by_default() {
        let settings = NormalizerSettings::default();
        assert_eq!(
            normalize_text_for_language("a   b\n\n c ", &settings, None),
            "a b c"
        );
    }

    #[test]
    fn test_class_order_equivalence() {
        let settings = NormalizerSettings::default();
        let a = normalize_text_for_language(r#"<div className="b a" />"#, &settings, Some(Language::Tsx));
        let b = normalize_text_for_language(r#"<div className="a b" />"#, &settings, Some(Language::Tsx));
        assert_eq!(a, b);
    }

    #[test]
    fn test_import_order_gated_by_setting() {
        let old = r#"import { b, a } from "lib";"#;
        let new = r#"import { a, b } from "lib";"#;

        let off = NormalizerSettings::default();
        assert_ne!(
            normalize_text_for_language(old, &off, None),
            normalize_text_for_language(new, &off, None)
        );

        let on = NormalizerSettings::with_global(NormalizerRules {
            import_order: true,
            ..Default::default()
        });
        assert_eq!(
            normalize_text_for_language(old, &on, None),
            normalize_text_for_language(new, &on, None)
        );
    }

    #[test]
    fn test_per_language_override() {
        let settings = NormalizerSettings::default().override_language(
            Language::JavaScript,
            PartialNormalizerRules {
                numeric_literals: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(
            normalize_text_for_language("1_000", &settings, Some(Language::JavaScript)),
            "1000"
        );
        assert_eq!(
            normalize_text_for_language("1_000", &settings, Some(Language::Python)),
            "1_000"
        );
    }
}
