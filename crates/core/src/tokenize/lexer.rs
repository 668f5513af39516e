//! Regex lexer for single lines of code.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::TokenRange;

/// Fixed lexical grammar, tried leftmost-first:
/// identifiers, numbers, quoted strings (escape-aware), multi-character
/// operators, then any single punctuation character. Whitespace and
/// anything else unmatched is left for gap tokens.
static LEXEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[\p{L}_$][\p{L}\p{N}_$]*",
        r"|0[xXbBoO][0-9a-fA-F_]+n?",
        r"|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d[\d_]*)?n?",
        r#"|"(?:\\.|[^"\\])*""#,
        r"|'(?:\\.|[^'\\])*'",
        r"|`(?:\\.|[^`\\])*`",
        r"|>>>=|\.\.\.|===|!==|\*\*=|<<=|>>=|>>>|&&=|\|\|=|\?\?=",
        r"|=>|==|!=|<=|>=|&&|\|\||\?\?|\?\.|\+\+|--|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<|>>|\*\*|::|->",
        r"|[^\s\p{L}\p{N}_]",
    ))
    .expect("lexeme pattern is valid")
});

/// Byte ranges of every lexeme in `text`, in order. Gaps between ranges
/// are whitespace or characters outside the grammar.
pub fn lex_ranges(text: &str) -> Vec<TokenRange> {
    LEXEME
        .find_iter(text)
        .map(|m| TokenRange::new(m.start(), m.end()))
        .collect()
}

/// Lexemes of `text` as string slices.
pub fn lex(text: &str) -> Vec<&str> {
    LEXEME.find_iter(text).map(|m| m.as_str()).collect()
}

/// Whether a lexeme is an identifier.
pub fn is_identifier(lexeme: &str) -> bool {
    lexeme
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
}
