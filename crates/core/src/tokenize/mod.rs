//! Source text to token streams.
//!
//! A token stream always covers its text completely and contiguously:
//! concatenating every token's `text` reproduces the input. The tokenizer
//! picks the first strategy that yields tokens:
//!
//! 1. explicit token ranges from a parser
//! 2. leaf nodes of a parser-supplied AST
//! 3. the regex lexer, for single-line text
//! 4. one token per line

mod compare;
mod lexer;

use crate::language::Language;
use crate::text::{clamp_to_boundary, LineIndex};
use crate::types::{DiffToken, TokenRange};

pub use compare::build_compare_text;
pub use lexer::{is_identifier, lex, lex_ranges};

/// Deepest AST hint the tokenizer descends into. Deeper trees are ignored
/// and tokenization falls through to the lexer or to lines.
pub const MAX_AST_DEPTH: usize = 1024;

/// Minimal view of a syntax tree node.
///
/// Parser backends adapt their node types to this trait so the tokenizer
/// never depends on a concrete parser.
pub trait AstLeafSource {
    /// Start byte offset (inclusive)
    fn start_offset(&self) -> usize;

    /// End byte offset (exclusive)
    fn end_offset(&self) -> usize;

    /// Number of direct children; leaves report zero.
    fn child_count(&self) -> usize;

    /// Visit each direct child in source order.
    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn AstLeafSource));
}

/// An owned syntax tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: String,
    pub start: usize,
    pub end: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create an interior node.
    pub fn new(kind: impl Into<String>, start: usize, end: usize, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: kind.into(),
            start,
            end,
            children,
        }
    }

    /// Create a leaf node.
    pub fn leaf(kind: impl Into<String>, start: usize, end: usize) -> Self {
        Self::new(kind, start, end, Vec::new())
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::node_count).sum::<usize>()
    }
}

impl AstLeafSource for SyntaxNode {
    fn start_offset(&self) -> usize {
        self.start
    }

    fn end_offset(&self) -> usize {
        self.end
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn AstLeafSource)) {
        for child in &self.children {
            visit(child);
        }
    }
}

/// Tokenize `text`, optionally guided by a parser's AST root or token ranges.
pub fn tokenize<'a>(
    text: &'a str,
    root: Option<&dyn AstLeafSource>,
    token_ranges: Option<&[TokenRange]>,
    language: Option<Language>,
) -> Vec<DiffToken<'a>> {
    if text.is_empty() {
        return Vec::new();
    }
    let index = LineIndex::new(text);

    if let Some(ranges) = token_ranges.filter(|r| !r.is_empty()) {
        if let Some(tokens) = tokens_from_ranges(&index, ranges.to_vec(), language) {
            log::trace!("tokenized {} bytes from explicit token ranges", text.len());
            return tokens;
        }
    }

    if let Some(root) = root {
        let mut leaves = Vec::new();
        if !collect_leaves(root, 0, &mut leaves) {
            log::debug!("AST hint is deeper than {MAX_AST_DEPTH} levels, ignoring it");
        } else if let Some(tokens) = tokens_from_ranges(&index, leaves, language) {
            log::trace!("tokenized {} bytes from AST leaves", text.len());
            return tokens;
        }
    }

    if !text.contains('\n') {
        if let Some(tokens) = tokens_from_ranges(&index, lex_ranges(text), language) {
            return tokens;
        }
    }

    line_tokens(&index, language)
}

/// Whether a caller supplied anything structural to tokenize with.
pub fn has_structural_hints(
    root: Option<&dyn AstLeafSource>,
    token_ranges: Option<&[TokenRange]>,
) -> bool {
    root.is_some() || token_ranges.is_some_and(|r| !r.is_empty())
}

/// Collect leaf spans. Returns `false` once the tree goes deeper than
/// [`MAX_AST_DEPTH`], leaving `out` incomplete.
fn collect_leaves(node: &dyn AstLeafSource, depth: usize, out: &mut Vec<TokenRange>) -> bool {
    if depth > MAX_AST_DEPTH {
        return false;
    }
    if node.child_count() == 0 {
        out.push(TokenRange::new(node.start_offset(), node.end_offset()));
        return true;
    }
    let mut complete = true;
    node.for_each_child(&mut |child| {
        complete = complete && collect_leaves(child, depth + 1, out);
    });
    complete
}

/// Turn possibly overlapping, unsorted or out-of-range spans into a
/// gap-filled token stream. Returns `None` when no span survives clamping.
fn tokens_from_ranges<'a>(
    index: &LineIndex<'a>,
    mut ranges: Vec<TokenRange>,
    language: Option<Language>,
) -> Option<Vec<DiffToken<'a>>> {
    let text = index.text();
    for range in &mut ranges {
        range.start_index = clamp_to_boundary(text, range.start_index);
        range.end_index = clamp_to_boundary(text, range.end_index);
    }
    ranges.retain(|r| r.start_index < r.end_index);
    if ranges.is_empty() {
        return None;
    }
    ranges.sort();
    ranges.dedup();

    let mut tokens = Vec::with_capacity(ranges.len() * 2);
    let mut cursor = 0;
    for range in ranges {
        let start = range.start_index.max(cursor);
        if range.end_index <= start {
            continue;
        }
        if start > cursor {
            tokens.push(make_token(index, cursor, start, language));
        }
        tokens.push(make_token(index, start, range.end_index, language));
        cursor = range.end_index;
    }
    if cursor < text.len() {
        tokens.push(make_token(index, cursor, text.len(), language));
    }
    Some(tokens)
}

fn line_tokens<'a>(index: &LineIndex<'a>, language: Option<Language>) -> Vec<DiffToken<'a>> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    for line in index.text().split_inclusive('\n') {
        tokens.push(make_token(index, offset, offset + line.len(), language));
        offset += line.len();
    }
    tokens
}

fn make_token<'a>(
    index: &LineIndex<'a>,
    start: usize,
    end: usize,
    language: Option<Language>,
) -> DiffToken<'a> {
    let text = &index.text()[start..end];
    DiffToken {
        text,
        compare_text: build_compare_text(text, language),
        start_index: start,
        end_index: end,
        start: index.position(start),
        end: index.position(end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(tokens: &[DiffToken<'_>]) -> String {
        tokens.iter().map(|t| t.text).collect()
    }

    fn texts<'a>(tokens: &[DiffToken<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("", None, None, None).is_empty());
    }

    #[test]
    fn test_single_line_uses_lexer() {
        let tokens = tokenize("let x = 'a';", None, None, None);
        assert_eq!(texts(&tokens), vec!["let", " ", "x", " ", "=", " ", "'a'", ";"]);
        assert_eq!(joined(&tokens), "let x = 'a';");
    }

    #[test]
    fn test_multi_line_uses_lines() {
        let tokens = tokenize("a\nb c\nd", None, None, None);
        assert_eq!(texts(&tokens), vec!["a\n", "b c\n", "d"]);
        assert_eq!(tokens[1].start.line, 2);
        assert_eq!(tokens[2].end.column, 2);
    }

    #[test]
    fn test_whitespace_only_single_line() {
        let tokens = tokenize("   ", None, None, None);
        assert_eq!(texts(&tokens), vec!["   "]);
    }

    #[test]
    fn test_token_ranges_fill_gaps_and_clamp() {
        let text = "foo(bar)";
        let ranges = [
            TokenRange::new(4, 7),
            TokenRange::new(0, 3),
            TokenRange::new(0, 3),
            TokenRange::new(6, 100),
            TokenRange::new(5, 2),
        ];
        let tokens = tokenize(text, None, Some(&ranges), None);
        assert_eq!(texts(&tokens), vec!["foo", "(", "bar", ")"]);
        assert_eq!(joined(&tokens), text);
    }

    #[test]
    fn test_invalid_ranges_fall_through() {
        let ranges = [TokenRange::new(50, 60)];
        let tokens = tokenize("a b", None, Some(&ranges), None);
        assert_eq!(texts(&tokens), vec!["a", " ", "b"]);
    }

    #[test]
    fn test_ast_leaves() {
        let text = "x = 1;\ny = 2;\n";
        let root = SyntaxNode::new(
            "program",
            0,
            text.len(),
            vec![
                SyntaxNode::new(
                    "statement",
                    0,
                    6,
                    vec![
                        SyntaxNode::leaf("identifier", 0, 1),
                        SyntaxNode::leaf("=", 2, 3),
                        SyntaxNode::leaf("number", 4, 5),
                        SyntaxNode::leaf(";", 5, 6),
                    ],
                ),
                SyntaxNode::new(
                    "statement",
                    7,
                    13,
                    vec![
                        SyntaxNode::leaf("identifier", 7, 8),
                        SyntaxNode::leaf("=", 9, 10),
                        SyntaxNode::leaf("number", 11, 12),
                        SyntaxNode::leaf(";", 12, 13),
                    ],
                ),
            ],
        );
        let tokens = tokenize(text, Some(&root), None, None);
        assert_eq!(
            texts(&tokens),
            vec!["x", " ", "=", " ", "1", ";", "\n", "y", " ", "=", " ", "2", ";", "\n"]
        );
        assert_eq!(tokens[7].start.line, 2);
    }

    #[test]
    fn test_token_ranges_win_over_root() {
        let root = SyntaxNode::leaf("program", 0, 3);
        let ranges = [TokenRange::new(0, 1)];
        let tokens = tokenize("abc", Some(&root), Some(&ranges), None);
        assert_eq!(texts(&tokens), vec!["a", "bc"]);
    }

    #[test]
    fn test_compare_text_uses_language() {
        let tokens = tokenize("f('x')", None, None, Some(Language::JavaScript));
        assert_eq!(tokens[2].compare_text, "\"x\"");
        assert_eq!(tokens[2].text, "'x'");
    }

    #[test]
    fn test_utf8_ranges_snap_to_boundaries() {
        let text = "é=1";
        let ranges = [TokenRange::new(1, 2)];
        let tokens = tokenize(text, None, Some(&ranges), None);
        assert_eq!(joined(&tokens), text);
    }

    #[test]
    fn test_structural_hints() {
        let root = SyntaxNode::leaf("program", 0, 1);
        assert!(has_structural_hints(Some(&root), None));
        assert!(has_structural_hints(None, Some(&[TokenRange::new(0, 1)])));
        assert!(!has_structural_hints(None, Some(&[])));
        assert!(!has_structural_hints(None, None));
    }

    /// A single-leaf chain of `depth` nested nodes, built lazily while visiting.
    struct Chain {
        depth: usize,
        leaf_end: usize,
    }

    impl AstLeafSource for Chain {
        fn start_offset(&self) -> usize {
            0
        }

        fn end_offset(&self) -> usize {
            self.leaf_end
        }

        fn child_count(&self) -> usize {
            usize::from(self.depth > 0)
        }

        fn for_each_child(&self, visit: &mut dyn FnMut(&dyn AstLeafSource)) {
            if self.depth > 0 {
                visit(&Chain {
                    depth: self.depth - 1,
                    leaf_end: self.leaf_end,
                });
            }
        }
    }

    #[test]
    fn test_shallow_chain_uses_leaves() {
        let root = Chain { depth: 3, leaf_end: 1 };
        let tokens = tokenize("a b", Some(&root), None, None);
        assert_eq!(texts(&tokens), vec!["a", " b"]);
    }

    #[test]
    fn test_overly_deep_tree_falls_back_to_lexer() {
        let root = Chain {
            depth: 200_000,
            leaf_end: 1,
        };
        let tokens = tokenize("a b", Some(&root), None, None);
        assert_eq!(texts(&tokens), vec!["a", " ", "b"]);

        let at_limit = Chain {
            depth: MAX_AST_DEPTH,
            leaf_end: 1,
        };
        let tokens = tokenize("a b", Some(&at_limit), None, None);
        assert_eq!(texts(&tokens), vec!["a", " b"]);
    }
}
