//! Error types for parsing.

use thiserror::Error;

/// Errors a single parser can report. The registry recovers from all of
/// them by moving on to the next parser.
#[derive(Error, Debug)]
pub enum ParseError {
    /// No grammar for the language
    #[error("Language '{language}' is not supported by this parser")]
    UnsupportedLanguage { language: String },

    /// The grammar could not be loaded into a parser
    #[error("Failed to create parser for '{language}': {message}")]
    ParserCreation { language: String, message: String },

    /// The parser returned no tree
    #[error("Parser produced no tree for '{language}'")]
    ParseFailed { language: String },

    /// The tree contains error or missing nodes
    #[error("Found {count} syntax error(s) while parsing '{language}'")]
    SyntaxErrors { language: String, count: usize },

    /// The tree nests deeper than the diff will descend
    #[error("Syntax tree for '{language}' is {depth} levels deep, limit is {limit}")]
    TooDeep {
        language: String,
        depth: usize,
        limit: usize,
    },
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
