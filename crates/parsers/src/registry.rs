//! Parser trait and the fallback chain over registered parsers.

use once_cell::sync::Lazy;
use semdiff_core::Language;

use crate::error::ParseResult;
use crate::lexical::LexicalParser;
use crate::structural::TreeSitterParser;
use crate::types::{ParseInput, ParseOutput};

/// Lazily initialized default parser chain.
static DEFAULT_PARSER_REGISTRY: Lazy<ParserRegistry> = Lazy::new(ParserRegistry::with_defaults);

/// A source of structure for the diff: a syntax tree, token ranges, or both.
pub trait LanguageParser: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this parser should be tried for `language`.
    fn supports(&self, language: Option<Language>) -> bool;

    /// Parse `content`. Errors make the registry try the next parser.
    fn parse(&self, content: &str, language: Option<Language>) -> ParseResult<ParseOutput>;
}

/// Ordered chain of parsers, tried until one succeeds.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn LanguageParser>>,
}

impl ParserRegistry {
    /// Create an empty registry. Parsing with it always yields plain text.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Get a reference to the lazily-initialized default registry.
    pub fn default_ref() -> &'static Self {
        &DEFAULT_PARSER_REGISTRY
    }

    /// Create a registry with tree-sitter first and the lexer behind it.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TreeSitterParser::new()));
        registry.register(Box::new(LexicalParser::new()));
        registry
    }

    /// Append a parser to the end of the chain.
    pub fn register(&mut self, parser: Box<dyn LanguageParser>) {
        self.parsers.push(parser);
    }

    /// Parse with the first parser that supports the language and succeeds.
    ///
    /// The language is taken from the input, else detected from its path.
    /// When every parser fails or none applies, the output carries no
    /// structure and the diff falls back to line tokens.
    pub fn parse(&self, input: &ParseInput<'_>) -> ParseOutput {
        let language = input.resolved_language();
        for parser in self.parsers.iter().filter(|p| p.supports(language)) {
            match parser.parse(input.content, language) {
                Ok(output) => {
                    log::debug!(
                        "{} parser handled {}",
                        parser.name(),
                        describe(language)
                    );
                    return output;
                }
                Err(e) => {
                    log::warn!("{} parser failed, falling back: {}", parser.name(), e);
                }
            }
        }
        log::debug!("no parser for {}, diffing as plain text", describe(language));
        ParseOutput::plain(language)
    }

    /// Get the number of registered parsers.
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn describe(language: Option<Language>) -> String {
    language.map_or_else(|| "plain text".to_string(), |l| l.to_string())
}
