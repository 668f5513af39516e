//! Core types of a diff pass.
//!
//! Tokens and blocks borrow from the source buffers they were cut from;
//! operations and groups own their text so a [`DiffDocument`] can outlive
//! the inputs and be serialized as-is.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Version stamped onto every [`DiffDocument`].
pub const DIFF_DOCUMENT_VERSION: &str = "0.1.0";

/// A position in source text (1-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 1-indexed line number
    pub line: usize,
    /// 1-indexed column, counted in UTF-8 bytes from the line start
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open span between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Number of lines touched, counting a trailing line terminator as part
    /// of the line it ends.
    pub fn line_span(&self) -> usize {
        self.end.line.saturating_sub(self.start.line) + 1
    }
}

/// A byte span supplied by a parser collaborator.
///
/// Malformed spans (reversed, out of bounds, splitting a character) are
/// clamped by the tokenizer rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl TokenRange {
    /// Create a new token range.
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }
}

/// Smallest unit of comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffToken<'a> {
    /// Exact source slice
    pub text: &'a str,
    /// Form used for equality checks
    pub compare_text: Cow<'a, str>,
    /// Start byte offset (inclusive)
    pub start_index: usize,
    /// End byte offset (exclusive)
    pub end_index: usize,
    pub start: Position,
    pub end: Position,
}

impl DiffToken<'_> {
    /// Whether the token carries no visible content.
    pub fn is_whitespace(&self) -> bool {
        self.compare_text.trim().is_empty()
    }
}

/// Which side a block of unmatched tokens belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Tokens present only in the old stream
    Delete,
    /// Tokens present only in the new stream
    Insert,
}

/// A maximal run of unmatched tokens from one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitBlock<'t, 'a> {
    pub kind: BlockKind,
    /// Index of the first unit in its token stream
    pub start: usize,
    pub units: &'t [DiffToken<'a>],
}

impl UnitBlock<'_, '_> {
    /// Byte offset where the block begins.
    pub fn start_index(&self) -> usize {
        self.units.first().map_or(0, |t| t.start_index)
    }

    /// Byte offset where the block ends.
    pub fn end_index(&self) -> usize {
        self.units.last().map_or(0, |t| t.end_index)
    }

    /// Range spanned by the block.
    pub fn range(&self) -> Range {
        match (self.units.first(), self.units.last()) {
            (Some(first), Some(last)) => Range::new(first.start, last.end),
            _ => Range::new(Position::new(1, 1), Position::new(1, 1)),
        }
    }

    /// Number of tokens in the block.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the block holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// The kind of a [`DiffOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Insert,
    Delete,
    Update,
    Move,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "insert",
            OperationKind::Delete => "delete",
            OperationKind::Update => "update",
            OperationKind::Move => "move",
        }
    }
}

/// Optional annotations attached to an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename_group_id: Option<String>,
}

impl OperationMeta {
    /// Meta carrying only a rename group, or `None` when there is none.
    pub fn for_rename(rename_group_id: Option<&str>) -> Option<Self> {
        rename_group_id.map(|id| Self {
            rename_group_id: Some(id.to_string()),
            ..Self::default()
        })
    }
}

/// An atomic, user-visible change.
///
/// Each variant carries only the sides it addresses: inserts have no old
/// side, deletes have no new side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DiffOperation {
    Insert {
        id: String,
        new_range: Range,
        new_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<OperationMeta>,
    },
    Delete {
        id: String,
        old_range: Range,
        old_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<OperationMeta>,
    },
    Update {
        id: String,
        old_range: Range,
        new_range: Range,
        old_text: String,
        new_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<OperationMeta>,
    },
    Move {
        id: String,
        old_range: Range,
        new_range: Range,
        old_text: String,
        new_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<OperationMeta>,
    },
}

impl DiffOperation {
    pub fn id(&self) -> &str {
        match self {
            DiffOperation::Insert { id, .. }
            | DiffOperation::Delete { id, .. }
            | DiffOperation::Update { id, .. }
            | DiffOperation::Move { id, .. } => id,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            DiffOperation::Insert { .. } => OperationKind::Insert,
            DiffOperation::Delete { .. } => OperationKind::Delete,
            DiffOperation::Update { .. } => OperationKind::Update,
            DiffOperation::Move { .. } => OperationKind::Move,
        }
    }

    pub fn old_range(&self) -> Option<&Range> {
        match self {
            DiffOperation::Insert { .. } => None,
            DiffOperation::Delete { old_range, .. }
            | DiffOperation::Update { old_range, .. }
            | DiffOperation::Move { old_range, .. } => Some(old_range),
        }
    }

    pub fn new_range(&self) -> Option<&Range> {
        match self {
            DiffOperation::Delete { .. } => None,
            DiffOperation::Insert { new_range, .. }
            | DiffOperation::Update { new_range, .. }
            | DiffOperation::Move { new_range, .. } => Some(new_range),
        }
    }

    pub fn old_text(&self) -> Option<&str> {
        match self {
            DiffOperation::Insert { .. } => None,
            DiffOperation::Delete { old_text, .. }
            | DiffOperation::Update { old_text, .. }
            | DiffOperation::Move { old_text, .. } => Some(old_text),
        }
    }

    pub fn new_text(&self) -> Option<&str> {
        match self {
            DiffOperation::Delete { .. } => None,
            DiffOperation::Insert { new_text, .. }
            | DiffOperation::Update { new_text, .. }
            | DiffOperation::Move { new_text, .. } => Some(new_text),
        }
    }

    pub fn meta(&self) -> Option<&OperationMeta> {
        match self {
            DiffOperation::Insert { meta, .. }
            | DiffOperation::Delete { meta, .. }
            | DiffOperation::Update { meta, .. }
            | DiffOperation::Move { meta, .. } => meta.as_ref(),
        }
    }

    /// The move group this operation belongs to, if any.
    pub fn move_id(&self) -> Option<&str> {
        self.meta().and_then(|m| m.move_id.as_deref())
    }

    /// Text of whichever side the operation addresses, old side first.
    pub fn primary_text(&self) -> &str {
        self.old_text().or(self.new_text()).unwrap_or_default()
    }
}

/// A relocated block, with the ids of the operations describing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveGroup {
    pub id: String,
    pub old_range: Range,
    pub new_range: Range,
    /// Similarity of the two sides, 0 to 1
    pub confidence: f64,
    pub operations: Vec<String>,
}

/// An identifier renamed consistently across the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameGroup {
    pub id: String,
    pub from: String,
    pub to: String,
    pub occurrences: usize,
    pub confidence: f64,
}

/// The versioned result of a diff pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffDocument {
    pub version: String,
    pub operations: Vec<DiffOperation>,
    pub moves: Vec<MoveGroup>,
    pub renames: Vec<RenameGroup>,
}

impl DiffDocument {
    /// A document describing no changes.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn new(
        operations: Vec<DiffOperation>,
        moves: Vec<MoveGroup>,
        renames: Vec<RenameGroup>,
    ) -> Self {
        Self {
            version: DIFF_DOCUMENT_VERSION.to_string(),
            operations,
            moves,
            renames,
        }
    }

    /// Whether the document reports no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Find an operation by id.
    pub fn operation(&self, id: &str) -> Option<&DiffOperation> {
        self.operations.iter().find(|op| op.id() == id)
    }

    /// Count operations of a given kind.
    pub fn count(&self, kind: OperationKind) -> usize {
        self.operations.iter().filter(|op| op.kind() == kind).count()
    }
}

/// Hands out operation and group ids for a single diff pass.
///
/// Ids restart for every pass, so identical inputs yield identical ids.
#[derive(Debug, Default)]
pub struct IdAllocator {
    operations: usize,
    moves: usize,
    renames: usize,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operation(&mut self) -> String {
        self.operations += 1;
        format!("op-{}", self.operations)
    }

    pub fn move_group(&mut self) -> String {
        self.moves += 1;
        format!("move-{}", self.moves)
    }

    pub fn rename_group(&mut self) -> String {
        self.renames += 1;
        format!("rename-{}", self.renames)
    }
}
