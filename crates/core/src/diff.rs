//! The structural diff entry point.

use std::collections::BTreeSet;

use crate::coalesce::coalesce_operations;
use crate::config::{resolve_normalizer_config, NormalizerSettings};
use crate::cosmetic::{
    suppress_cosmetic_line_moves, suppress_cosmetic_moves, suppress_cosmetic_updates,
    suppress_moved_line_ops,
};
use crate::differ::diff_units;
use crate::language::{self, Language};
use crate::moves::{detect_moves, MoveDetection};
use crate::normalize::NormalizerPipeline;
use crate::pairing::should_pair_delete_insert;
use crate::renames::detect_renames;
use crate::text::LineIndex;
use crate::tokenize::{has_structural_hints, tokenize, AstLeafSource};
use crate::types::{
    BlockKind, DiffDocument, DiffOperation, IdAllocator, MoveGroup, OperationMeta, TokenRange,
    UnitBlock,
};

/// Options for [`structural_diff`].
///
/// `'h` is the lifetime of the optional parser hints. Hints that are
/// malformed or absent are ignored and the tokenizer falls back to its
/// regex and line strategies.
#[derive(Clone)]
pub struct DiffOptions<'h> {
    pub normalizers: NormalizerSettings,
    pub language: Option<Language>,
    pub old_root: Option<&'h dyn AstLeafSource>,
    pub new_root: Option<&'h dyn AstLeafSource>,
    pub old_tokens: Option<&'h [TokenRange]>,
    pub new_tokens: Option<&'h [TokenRange]>,
    /// Pair similar delete/insert blocks into moves (default: true)
    pub detect_moves: bool,
}

impl Default for DiffOptions<'_> {
    fn default() -> Self {
        Self {
            normalizers: NormalizerSettings::default(),
            language: None,
            old_root: None,
            new_root: None,
            old_tokens: None,
            new_tokens: None,
            detect_moves: true,
        }
    }
}

impl std::fmt::Debug for DiffOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffOptions")
            .field("normalizers", &self.normalizers)
            .field("language", &self.language)
            .field("old_root", &self.old_root.is_some())
            .field("new_root", &self.new_root.is_some())
            .field("old_tokens", &self.old_tokens.map(<[_]>::len))
            .field("new_tokens", &self.new_tokens.map(<[_]>::len))
            .field("detect_moves", &self.detect_moves)
            .finish()
    }
}

impl<'h> DiffOptions<'h> {
    /// Options for a language, everything else default.
    pub fn for_language(language: Language) -> Self {
        Self {
            language: Some(language),
            ..Self::default()
        }
    }

    pub fn with_normalizers(mut self, normalizers: NormalizerSettings) -> Self {
        self.normalizers = normalizers;
        self
    }

    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    /// Use parser-supplied syntax trees for tokenization.
    pub fn with_roots(
        mut self,
        old_root: Option<&'h dyn AstLeafSource>,
        new_root: Option<&'h dyn AstLeafSource>,
    ) -> Self {
        self.old_root = old_root;
        self.new_root = new_root;
        self
    }

    /// Use parser-supplied token ranges for tokenization.
    pub fn with_token_ranges(
        mut self,
        old_tokens: Option<&'h [TokenRange]>,
        new_tokens: Option<&'h [TokenRange]>,
    ) -> Self {
        self.old_tokens = old_tokens;
        self.new_tokens = new_tokens;
        self
    }

    pub fn with_move_detection(mut self, enabled: bool) -> Self {
        self.detect_moves = enabled;
        self
    }
}

/// Compute the structural diff between two texts.
///
/// Never fails: malformed hints degrade to plain tokenization and large
/// inputs switch the differencer algorithm. Identical inputs always yield
/// identical documents, ids included.
pub fn structural_diff(old_text: &str, new_text: &str, options: &DiffOptions<'_>) -> DiffDocument {
    let language = options.language;
    let rules = resolve_normalizer_config(&options.normalizers, language);
    let pipeline = NormalizerPipeline::default_ref();
    if pipeline.normalize(old_text, &rules) == pipeline.normalize(new_text, &rules) {
        log::debug!("texts are equal after normalization");
        return DiffDocument::empty();
    }

    let old = LineIndex::new(old_text);
    let new = LineIndex::new(new_text);
    let mut ids = IdAllocator::new();

    if old_text.is_empty() || new_text.is_empty() {
        return whole_text_change(&old, &new, &mut ids);
    }

    let old_tokens = tokenize(old_text, options.old_root, options.old_tokens, language);
    let new_tokens = tokenize(new_text, options.new_root, options.new_tokens, language);
    let blocks = diff_units(&old_tokens, &new_tokens);
    log::debug!(
        "{} old / {} new tokens, {} changed blocks",
        old_tokens.len(),
        new_tokens.len(),
        blocks.len()
    );

    let renames = detect_renames(old_text, new_text, &mut ids);
    let rename_group_id = renames.first().map(|group| group.id.as_str());

    let is_json = language == Some(Language::Json);
    let use_structural_tokens = !is_json
        && (has_structural_hints(options.old_root, options.old_tokens)
            || has_structural_hints(options.new_root, options.new_tokens));

    let detection = if options.detect_moves && !is_json {
        detect_moves(&blocks, old_text, new_text, rename_group_id, language, &mut ids)
    } else {
        MoveDetection::default()
    };

    let mut operations = block_operations(
        &blocks,
        &detection,
        &old,
        &new,
        rename_group_id,
        language,
        &mut ids,
    );
    if !use_structural_tokens {
        operations = suppress_moved_line_ops(operations, old_text, new_text);
    }

    let MoveDetection {
        mut moves,
        move_ops,
        nested_ops,
        ..
    } = detection;
    operations = coalesce_operations(operations, &moves, &old, &new);
    operations.extend(move_ops);
    operations.extend(nested_ops);

    if language::is_cosmetic(language) {
        operations = suppress_cosmetic_updates(operations);
        operations = suppress_cosmetic_moves(operations, &mut moves);
        operations = suppress_cosmetic_line_moves(operations, old_text, new_text);
    }
    retain_live_moves(&operations, &mut moves);

    DiffDocument::new(operations, moves, renames)
}

/// One insert or delete spanning the whole non-empty side.
fn whole_text_change(
    old: &LineIndex<'_>,
    new: &LineIndex<'_>,
    ids: &mut IdAllocator,
) -> DiffDocument {
    let operation = if old.is_empty() {
        DiffOperation::Insert {
            id: ids.operation(),
            new_range: new.full_range(),
            new_text: new.text().to_string(),
            meta: None,
        }
    } else {
        DiffOperation::Delete {
            id: ids.operation(),
            old_range: old.full_range(),
            old_text: old.text().to_string(),
            meta: None,
        }
    };
    DiffDocument::new(vec![operation], Vec::new(), Vec::new())
}

/// Turn the blocks not consumed by moves into positional operations.
fn block_operations(
    blocks: &[UnitBlock<'_, '_>],
    detection: &MoveDetection,
    old: &LineIndex<'_>,
    new: &LineIndex<'_>,
    rename_group_id: Option<&str>,
    language: Option<Language>,
    ids: &mut IdAllocator,
) -> Vec<DiffOperation> {
    let slice = |index: &LineIndex<'_>, block: &UnitBlock<'_, '_>| -> String {
        index.text()[block.start_index()..block.end_index()].to_string()
    };

    let mut operations = Vec::new();
    let mut i = 0;
    while i < blocks.len() {
        if detection.is_used(i) {
            i += 1;
            continue;
        }
        let block = &blocks[i];
        match block.kind {
            BlockKind::Delete => {
                let partner = blocks
                    .get(i + 1)
                    .filter(|next| next.kind == BlockKind::Insert && !detection.is_used(i + 1));
                if let Some(inserted) = partner {
                    let old_text = slice(old, block);
                    let new_text = slice(new, inserted);
                    if should_pair_delete_insert(&old_text, &new_text, language) {
                        operations.push(DiffOperation::Update {
                            id: ids.operation(),
                            old_range: block.range(),
                            new_range: inserted.range(),
                            old_text,
                            new_text,
                            meta: OperationMeta::for_rename(rename_group_id),
                        });
                    } else {
                        operations.push(DiffOperation::Delete {
                            id: ids.operation(),
                            old_range: block.range(),
                            old_text,
                            meta: OperationMeta::for_rename(rename_group_id),
                        });
                        operations.push(DiffOperation::Insert {
                            id: ids.operation(),
                            new_range: inserted.range(),
                            new_text,
                            meta: OperationMeta::for_rename(rename_group_id),
                        });
                    }
                    i += 2;
                    continue;
                }
                operations.push(DiffOperation::Delete {
                    id: ids.operation(),
                    old_range: block.range(),
                    old_text: slice(old, block),
                    meta: OperationMeta::for_rename(rename_group_id),
                });
            }
            BlockKind::Insert => {
                operations.push(DiffOperation::Insert {
                    id: ids.operation(),
                    new_range: block.range(),
                    new_text: slice(new, block),
                    meta: OperationMeta::for_rename(rename_group_id),
                });
            }
        }
        i += 1;
    }
    operations
}

/// Drop operation ids that no longer exist from each move group, and the
/// groups whose move operation is gone.
fn retain_live_moves(operations: &[DiffOperation], moves: &mut Vec<MoveGroup>) {
    let live: BTreeSet<&str> = operations.iter().map(DiffOperation::id).collect();
    for group in moves.iter_mut() {
        group.operations.retain(|id| live.contains(id.as_str()));
    }
    moves.retain(|group| {
        operations.iter().any(|op| {
            matches!(op, DiffOperation::Move { .. }) && op.move_id() == Some(group.id.as_str())
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NormalizerRules, PartialNormalizerRules};
    use crate::tokenize::SyntaxNode;
    use crate::types::OperationKind;

    #[test]
    fn test_identical_texts() {
        let doc = structural_diff("let a = 1;\n", "let a = 1;\n", &DiffOptions::default());
        assert!(doc.is_empty());
        assert_eq!(doc.version, "0.1.0");
    }

    #[test]
    fn test_whitespace_only_change_is_empty_by_default() {
        let doc = structural_diff("a  +  b", "a + b", &DiffOptions::default());
        assert!(doc.is_empty());

        let strict = DiffOptions::default()
            .with_normalizers(NormalizerSettings::with_global(NormalizerRules::none()));
        assert!(!structural_diff("a  +  b", "a + b", &strict).is_empty());
    }

    #[test]
    fn test_empty_old_side() {
        let doc = structural_diff("", "one\ntwo", &DiffOptions::default());
        assert_eq!(doc.operations.len(), 1);
        let op = &doc.operations[0];
        assert_eq!(op.kind(), OperationKind::Insert);
        assert_eq!(op.new_text(), Some("one\ntwo"));
        let range = op.new_range().unwrap();
        assert_eq!((range.start.line, range.start.column), (1, 1));
        assert_eq!((range.end.line, range.end.column), (2, 4));
    }

    #[test]
    fn test_empty_new_side() {
        let doc = structural_diff("gone", "", &DiffOptions::default());
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.operations[0].kind(), OperationKind::Delete);
        assert_eq!(doc.operations[0].old_text(), Some("gone"));
    }

    #[test]
    fn test_replacement_is_an_update() {
        let doc = structural_diff("let a = 1;", "let a = 2;", &DiffOptions::default());
        assert_eq!(doc.operations.len(), 1);
        let op = &doc.operations[0];
        assert_eq!(op.kind(), OperationKind::Update);
        assert_eq!(op.old_text(), Some("1"));
        assert_eq!(op.new_text(), Some("2"));
        assert_eq!(op.id(), "op-1");
    }

    #[test]
    fn test_json_splits_updates_across_keys() {
        let old = "{\n  \"name\": \"a\",\n  \"b\": 1\n}\n";
        let new = "{\n  \"title\": \"a\",\n  \"b\": 1\n}\n";
        let doc = structural_diff(old, new, &DiffOptions::for_language(Language::Json));
        assert_eq!(doc.count(OperationKind::Update), 0);
        assert_eq!(doc.count(OperationKind::Delete), 1);
        assert_eq!(doc.count(OperationKind::Insert), 1);

        let new = "{\n  \"name\": \"z\",\n  \"b\": 1\n}\n";
        let doc = structural_diff(old, new, &DiffOptions::for_language(Language::Json));
        assert_eq!(doc.count(OperationKind::Update), 1);
    }

    #[test]
    fn test_json_never_detects_moves() {
        let old = "[\n  1,\n  2,\n  3,\n  \"x\", \"y\",\n]\n";
        let new = "[\n  \"x\", \"y\",\n  1,\n  2,\n  3,\n]\n";
        let doc = structural_diff(old, new, &DiffOptions::for_language(Language::Json));
        assert!(doc.moves.is_empty());
        assert_eq!(doc.count(OperationKind::Move), 0);
    }

    #[test]
    fn test_move_detection_can_be_disabled() {
        let old = "a1\na2\na3\na4\nb1\nb2\n";
        let new = "b1\nb2\na1\na2\na3\na4\n";
        let doc = structural_diff(old, new, &DiffOptions::default());
        assert_eq!(doc.moves.len(), 1);
        assert_eq!(doc.count(OperationKind::Move), 1);

        let doc = structural_diff(old, new, &DiffOptions::default().with_move_detection(false));
        assert!(doc.moves.is_empty());
        assert_eq!(doc.count(OperationKind::Move), 0);
    }

    #[test]
    fn test_rename_group_threads_into_operations() {
        let doc = structural_diff(
            "const foo = foo + foo;",
            "const bar = bar + bar;",
            &DiffOptions::default(),
        );
        assert_eq!(doc.renames.len(), 1);
        assert!(!doc.operations.is_empty());
        for op in &doc.operations {
            assert_eq!(
                op.meta().and_then(|m| m.rename_group_id.as_deref()),
                Some("rename-1")
            );
        }
    }

    #[test]
    fn test_token_range_hints_are_used() {
        let old = "ab";
        let new = "ac";
        let old_ranges = [TokenRange::new(0, 1), TokenRange::new(1, 2)];
        let new_ranges = [TokenRange::new(0, 1), TokenRange::new(1, 2)];
        let options =
            DiffOptions::default().with_token_ranges(Some(&old_ranges), Some(&new_ranges));
        let doc = structural_diff(old, new, &options);
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.operations[0].old_text(), Some("b"));
        assert_eq!(doc.operations[0].new_text(), Some("c"));
    }

    #[test]
    fn test_ast_roots_are_used() {
        let leaves = || vec![SyntaxNode::leaf("a", 0, 1), SyntaxNode::leaf("b", 1, 3)];
        let old_root = SyntaxNode::new("p", 0, 3, leaves());
        let new_root = SyntaxNode::new("p", 0, 3, leaves());
        let options = DiffOptions::default().with_roots(Some(&old_root), Some(&new_root));
        let doc = structural_diff("xyz", "xzz", &options);
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.operations[0].old_text(), Some("yz"));
    }

    #[test]
    fn test_numeric_override_for_language() {
        let settings = NormalizerSettings::default().override_language(
            Language::Python,
            PartialNormalizerRules {
                numeric_literals: Some(true),
                ..Default::default()
            },
        );
        let options = DiffOptions::for_language(Language::Python).with_normalizers(settings);
        assert!(structural_diff("x = 1_000", "x = 1000", &options).is_empty());
    }

    #[test]
    fn test_cosmetic_quote_update_is_suppressed() {
        let doc = structural_diff(
            "import x from 'x';\nfoo();\n",
            "import x from \"x\";\nfoo();\n",
            &DiffOptions::for_language(Language::TypeScript),
        );
        assert!(doc.is_empty());
    }

    #[test]
    fn test_options_debug_hides_hints() {
        let ranges = [TokenRange::new(0, 1)];
        let options = DiffOptions::default().with_token_ranges(Some(&ranges), None);
        let rendered = format!("{options:?}");
        assert!(rendered.contains("old_tokens: Some(1)"));
    }

    #[test]
    fn test_relocated_line_dropped_without_structural_tokens() {
        let old = "y\nz\nx\n";
        let new = "x\ny\nz\n";
        let options = DiffOptions::default().with_move_detection(false);
        let doc = structural_diff(old, new, &options);
        assert!(doc.is_empty(), "{:?}", doc.operations);
    }

    #[test]
    fn test_relocated_line_reported_with_structural_tokens() {
        let old = "y\nz\nx\n";
        let new = "x\ny\nz\n";
        let lines = [
            TokenRange::new(0, 2),
            TokenRange::new(2, 4),
            TokenRange::new(4, 6),
        ];
        let options = DiffOptions::default()
            .with_move_detection(false)
            .with_token_ranges(Some(&lines), Some(&lines));
        let doc = structural_diff(old, new, &options);
        assert_eq!(doc.count(OperationKind::Insert), 1);
        assert_eq!(doc.count(OperationKind::Delete), 1);
        assert_eq!(doc.operations[0].new_text(), Some("x\n"));
        assert_eq!(doc.operations[1].old_text(), Some("x\n"));

        let json = options.with_language(Some(Language::Json));
        assert!(structural_diff(old, new, &json).is_empty());
    }

    /// A chain of single-child nodes generated while it is walked.
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
    fn test_deep_ast_roots_do_not_overflow() {
        let root = Chain {
            depth: 200_000,
            leaf_end: 2,
        };
        let options = DiffOptions::default().with_roots(Some(&root), Some(&root));
        let doc = structural_diff("ab", "ac", &options);
        assert_eq!(doc.operations.len(), 1);
        assert_eq!(doc.operations[0].kind(), OperationKind::Update);
        assert_eq!(doc.operations[0].old_text(), Some("ab"));
        assert_eq!(doc.operations[0].new_text(), Some("ac"));
    }
}
