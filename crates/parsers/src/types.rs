//! Inputs and outputs of the parser chain.

use std::path::Path;

use semdiff_core::{Language, SyntaxNode, TokenRange};

/// A file to parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseInput<'a> {
    pub content: &'a str,
    /// Used to detect the language when none is given
    pub path: Option<&'a Path>,
    pub language: Option<Language>,
}

impl<'a> ParseInput<'a> {
    /// Create a new input with no path or language.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            path: None,
            language: None,
        }
    }

    pub fn with_path(mut self, path: &'a Path) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    /// The explicit language, else the one detected from the path.
    pub fn resolved_language(&self) -> Option<Language> {
        self.language
            .or_else(|| self.path.and_then(Language::from_path))
    }
}

/// What a parser was able to provide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserCapabilities {
    /// A syntax tree is available
    pub structural: bool,
    /// Token ranges are available
    pub token_ranges: bool,
}

/// Result of parsing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    pub language: Option<Language>,
    pub root: Option<SyntaxNode>,
    pub tokens: Option<Vec<TokenRange>>,
    pub capabilities: ParserCapabilities,
}

impl ParseOutput {
    /// Output carrying a syntax tree.
    pub fn structural(language: Option<Language>, root: SyntaxNode) -> Self {
        Self {
            language,
            root: Some(root),
            tokens: None,
            capabilities: ParserCapabilities {
                structural: true,
                token_ranges: false,
            },
        }
    }

    /// Output carrying token ranges only.
    pub fn lexical(language: Option<Language>, tokens: Vec<TokenRange>) -> Self {
        Self {
            language,
            root: None,
            tokens: Some(tokens),
            capabilities: ParserCapabilities {
                structural: false,
                token_ranges: true,
            },
        }
    }

    /// Output with no structure at all.
    pub fn plain(language: Option<Language>) -> Self {
        Self {
            language,
            root: None,
            tokens: None,
            capabilities: ParserCapabilities::default(),
        }
    }

    /// Token ranges as a slice, for handing to the diff.
    pub fn token_ranges(&self) -> Option<&[TokenRange]> {
        self.tokens.as_deref()
    }
}
