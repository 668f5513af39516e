//! Lexer-backed token ranges for languages without a usable tree.

use semdiff_core::tokenize::lex_ranges;
use semdiff_core::{Language, TokenRange};

use crate::error::ParseResult;
use crate::registry::LanguageParser;
use crate::types::ParseOutput;

/// Produces token ranges with the regex lexer, one line at a time so an
/// unterminated quote never swallows the rest of the file.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalParser;

impl LexicalParser {
    /// Create a new lexical parser.
    pub fn new() -> Self {
        Self
    }
}

impl LanguageParser for LexicalParser {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn supports(&self, _language: Option<Language>) -> bool {
        true
    }

    fn parse(&self, content: &str, language: Option<Language>) -> ParseResult<ParseOutput> {
        let mut tokens = Vec::new();
        let mut offset = 0;
        for line in content.split_inclusive('\n') {
            tokens.extend(
                lex_ranges(line)
                    .into_iter()
                    .map(|r| TokenRange::new(r.start_index + offset, r.end_index + offset)),
            );
            offset += line.len();
        }
        Ok(ParseOutput::lexical(language, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(content: &'a str, tokens: &[TokenRange]) -> Vec<&'a str> {
        tokens
            .iter()
            .map(|r| &content[r.start_index..r.end_index])
            .collect()
    }

    #[test]
    fn test_ranges_are_file_offsets() {
        let content = "let a = 1;\nlet b = a;\n";
        let output = LexicalParser::new().parse(content, None).unwrap();
        let tokens = output.tokens.unwrap();
        assert_eq!(
            texts(content, &tokens),
            vec!["let", "a", "=", "1", ";", "let", "b", "=", "a", ";"]
        );
        assert!(output.capabilities.token_ranges);
        assert!(!output.capabilities.structural);
    }

    #[test]
    fn test_unterminated_quote_stays_on_its_line() {
        let content = "x = \"open\ny = 2\n";
        let output = LexicalParser::new().parse(content, None).unwrap();
        let tokens = output.tokens.unwrap();
        assert!(texts(content, &tokens).contains(&"y"));
    }
}
