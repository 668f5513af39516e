//! Tree-sitter backed parsing.

use semdiff_core::{Language, SyntaxNode, MAX_AST_DEPTH};
use tree_sitter::{Node, Parser};

use crate::error::{ParseError, ParseResult};
use crate::registry::LanguageParser;
use crate::types::ParseOutput;

/// Parses with the bundled tree-sitter grammars and snapshots the tree.
///
/// A tree containing error or missing nodes is rejected so that callers
/// fall back to lexical tokens instead of diffing a damaged tree. So is a
/// tree nested deeper than [`MAX_AST_DEPTH`], which the tokenizer would
/// ignore anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterParser;

impl TreeSitterParser {
    /// Create a new tree-sitter parser.
    pub fn new() -> Self {
        Self
    }

    fn grammar(language: Language) -> Option<tree_sitter::Language> {
        let grammar: tree_sitter::Language = match language {
            Language::JavaScript | Language::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Json => tree_sitter_json::LANGUAGE.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Css | Language::Markdown => return None,
        };
        Some(grammar)
    }
}

impl LanguageParser for TreeSitterParser {
    fn name(&self) -> &'static str {
        "tree-sitter"
    }

    fn supports(&self, language: Option<Language>) -> bool {
        language.and_then(Self::grammar).is_some()
    }

    fn parse(&self, content: &str, language: Option<Language>) -> ParseResult<ParseOutput> {
        let Some(lang) = language else {
            return Err(ParseError::UnsupportedLanguage {
                language: "plain text".to_string(),
            });
        };
        let grammar = Self::grammar(lang).ok_or_else(|| ParseError::UnsupportedLanguage {
            language: lang.to_string(),
        })?;

        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| ParseError::ParserCreation {
                language: lang.to_string(),
                message: e.to_string(),
            })?;
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ParseError::ParseFailed {
                language: lang.to_string(),
            })?;

        let root = tree.root_node();
        let shape = TreeShape::of(root);
        if root.has_error() {
            return Err(ParseError::SyntaxErrors {
                language: lang.to_string(),
                count: shape.errors,
            });
        }
        if shape.depth > MAX_AST_DEPTH {
            return Err(ParseError::TooDeep {
                language: lang.to_string(),
                depth: shape.depth,
                limit: MAX_AST_DEPTH,
            });
        }

        let syntax = snapshot(root);
        log::trace!(
            "parsed {} bytes of {} into {} nodes",
            content.len(),
            lang,
            syntax.node_count()
        );
        Ok(ParseOutput::structural(Some(lang), syntax))
    }
}

/// Copy a tree into owned nodes. Callers bound the depth first.
fn snapshot(node: Node<'_>) -> SyntaxNode {
    let children = node
        .children(&mut node.walk())
        .map(snapshot)
        .collect::<Vec<_>>();
    SyntaxNode::new(node.kind(), node.start_byte(), node.end_byte(), children)
}

/// Depth and damage of a tree, gathered with a cursor so that arbitrarily
/// deep input cannot exhaust the stack.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct TreeShape {
    /// Edges from the root to the deepest node
    depth: usize,
    /// Error and missing nodes
    errors: usize,
}

impl TreeShape {
    fn of(root: Node<'_>) -> Self {
        let mut shape = Self::default();
        let mut cursor = root.walk();
        let mut depth = 0;
        loop {
            let node = cursor.node();
            shape.depth = shape.depth.max(depth);
            if node.is_error() || node.is_missing() {
                shape.errors += 1;
            }
            if cursor.goto_first_child() {
                depth += 1;
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return shape;
                }
                depth -= 1;
            }
        }
    }
}
