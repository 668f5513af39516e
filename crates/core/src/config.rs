//! Normalizer configuration.
//!
//! A global rule set applies to every language; per-language overrides only
//! replace the rules they define.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::ConfigResult;
use crate::language::Language;

/// The effective on/off state of each normalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizerRules {
    /// Collapse whitespace runs and trim
    pub whitespace: bool,
    /// Sort static class lists in `class`/`className` attributes
    pub tailwind: bool,
    /// Sort named import/export specifiers
    pub import_order: bool,
    /// Canonicalize numeric literal spelling
    pub numeric_literals: bool,
}

impl Default for NormalizerRules {
    fn default() -> Self {
        Self {
            whitespace: true,
            tailwind: true,
            import_order: false,
            numeric_literals: false,
        }
    }
}

impl NormalizerRules {
    /// Rules with every normalization disabled.
    pub fn none() -> Self {
        Self {
            whitespace: false,
            tailwind: false,
            import_order: false,
            numeric_literals: false,
        }
    }

    /// Apply the defined fields of `overrides` on top of these rules.
    pub fn merged(mut self, overrides: &PartialNormalizerRules) -> Self {
        if let Some(v) = overrides.whitespace {
            self.whitespace = v;
        }
        if let Some(v) = overrides.tailwind {
            self.tailwind = v;
        }
        if let Some(v) = overrides.import_order {
            self.import_order = v;
        }
        if let Some(v) = overrides.numeric_literals {
            self.numeric_literals = v;
        }
        self
    }
}

/// Sparse per-language overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialNormalizerRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitespace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tailwind: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_order: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_literals: Option<bool>,
}

/// Global rules plus per-language overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizerSettings {
    pub global: NormalizerRules,
    pub per_language: BTreeMap<Language, PartialNormalizerRules>,
}

/// On-disk shape of [`NormalizerSettings`]; language keys are free-form ids.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawNormalizerSettings {
    global: NormalizerRules,
    per_language: HashMap<String, PartialNormalizerRules>,
}

impl NormalizerSettings {
    /// Settings with the given global rules and no overrides.
    pub fn with_global(global: NormalizerRules) -> Self {
        Self {
            global,
            per_language: BTreeMap::new(),
        }
    }

    /// Add or replace the overrides for one language.
    pub fn override_language(
        mut self,
        language: Language,
        overrides: PartialNormalizerRules,
    ) -> Self {
        self.per_language.insert(language, overrides);
        self
    }

    /// Decode settings from JSON such as
    /// `{"global": {"importOrder": true}, "perLanguage": {"tsx": {"tailwind": false}}}`.
    ///
    /// Language keys accept any alias understood by [`Language`]; `"*"`
    /// entries fold into the global rules.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let raw: RawNormalizerSettings = serde_json::from_str(json)?;
        let mut settings = Self::with_global(raw.global);

        let mut entries: Vec<_> = raw.per_language.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for (id, overrides) in entries {
            match Language::parse_optional(&id)? {
                Some(language) => {
                    settings.per_language.insert(language, overrides);
                }
                None => settings.global = settings.global.merged(&overrides),
            }
        }
        Ok(settings)
    }
}

/// Resolve the effective rules for a language.
///
/// Returns the global rules when `language` is `None`; otherwise the global
/// rules with that language's overrides applied.
pub fn resolve_normalizer_config(
    settings: &NormalizerSettings,
    language: Option<Language>,
) -> NormalizerRules {
    let Some(language) = language else {
        return settings.global;
    };
    match settings.per_language.get(&language) {
        Some(overrides) => settings.global.merged(overrides),
        None => settings.global,
    }
}
