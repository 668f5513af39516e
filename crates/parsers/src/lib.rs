//! Parser collaborators for semdiff.
//!
//! [`ParserRegistry::parse`] turns a file into whatever structure is
//! available for it, walking a fallback chain:
//!
//! 1. [`TreeSitterParser`]: a full syntax tree
//! 2. [`LexicalParser`]: token ranges from a regex lexer
//! 3. plain text: neither, so the diff tokenizes by line
//!
//! Failures along the chain are logged and skipped, so parsing as a whole
//! never fails.

mod error;
mod lexical;
mod registry;
mod structural;
mod types;

pub use error::{ParseError, ParseResult};
pub use lexical::LexicalParser;
pub use registry::{LanguageParser, ParserRegistry};
pub use structural::TreeSitterParser;
pub use types::{ParseInput, ParseOutput, ParserCapabilities};

pub use semdiff_core::{Language, SyntaxNode, TokenRange};
