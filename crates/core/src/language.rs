//! Supported languages and their identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// A language the diff pipeline knows how to treat specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(rename = "ts")]
    TypeScript,
    Tsx,
    #[serde(rename = "js")]
    JavaScript,
    Jsx,
    Json,
    Css,
    Python,
    Go,
    Rust,
    Markdown,
}

impl Language {
    /// All supported languages, in declaration order.
    pub const ALL: [Language; 10] = [
        Language::TypeScript,
        Language::Tsx,
        Language::JavaScript,
        Language::Jsx,
        Language::Json,
        Language::Css,
        Language::Python,
        Language::Go,
        Language::Rust,
        Language::Markdown,
    ];

    /// Canonical short identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "ts",
            Language::Tsx => "tsx",
            Language::JavaScript => "js",
            Language::Jsx => "jsx",
            Language::Json => "json",
            Language::Css => "css",
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Markdown => "markdown",
        }
    }

    /// Identifiers accepted by [`FromStr`], matched case-insensitively.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &["ts", "typescript", "mts", "cts"],
            Language::Tsx => &["tsx"],
            Language::JavaScript => &["js", "javascript", "mjs", "cjs"],
            Language::Jsx => &["jsx"],
            Language::Json => &["json", "jsonc"],
            Language::Css => &["css"],
            Language::Python => &["python", "py"],
            Language::Go => &["go", "golang"],
            Language::Rust => &["rust", "rs"],
            Language::Markdown => &["markdown", "md"],
        }
    }

    /// File extensions (without the leading dot) mapped to this language.
    pub fn file_extensions(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &["ts", "mts", "cts"],
            Language::Tsx => &["tsx"],
            Language::JavaScript => &["js", "mjs", "cjs"],
            Language::Jsx => &["jsx"],
            Language::Json => &["json", "jsonc"],
            Language::Css => &["css"],
            Language::Python => &["py", "pyi", "pyw"],
            Language::Go => &["go"],
            Language::Rust => &["rs"],
            Language::Markdown => &["md", "markdown"],
        }
    }

    /// Languages whose cosmetic-equivalence rules (quote folding, import
    /// reordering, JSX attribute order) apply.
    pub fn is_cosmetic(&self) -> bool {
        matches!(
            self,
            Language::TypeScript | Language::Tsx | Language::JavaScript | Language::Jsx
        )
    }

    /// Detect language from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|lang| {
            lang.file_extensions()
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
    }

    /// Parse an optional language id where `"*"` stands for "any language".
    pub fn parse_optional(id: &str) -> Result<Option<Self>, ConfigError> {
        if id.trim() == "*" {
            return Ok(None);
        }
        id.parse().map(Some)
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.aliases().iter().any(|a| a.eq_ignore_ascii_case(id)))
            .ok_or_else(|| ConfigError::UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an optional language enables cosmetic rules.
pub(crate) fn is_cosmetic(language: Option<Language>) -> bool {
    language.is_some_and(|lang| lang.is_cosmetic())
}
