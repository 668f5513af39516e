//! Structural, language-aware diffing.
//!
//! [`structural_diff`] compares two versions of a file at token level and
//! reports the change as a [`DiffDocument`]: inserts, deletes and updates,
//! relocated blocks, consistent identifier renames, and nothing at all for
//! purely cosmetic rewrites.
//!
//! ```
//! use semdiff_core::{structural_diff, DiffOptions, Language};
//!
//! let doc = structural_diff(
//!     r#"<div className="b a" />"#,
//!     r#"<div className="a b" />"#,
//!     &DiffOptions::for_language(Language::Tsx),
//! );
//! assert!(doc.operations.is_empty());
//! ```

pub mod coalesce;
pub mod config;
pub mod cosmetic;
pub mod diff;
pub mod differ;
pub mod error;
pub mod language;
pub mod moves;
pub mod normalize;
pub mod pairing;
pub mod renames;
pub mod text;
pub mod tokenize;
pub mod types;

pub use config::{
    resolve_normalizer_config, NormalizerRules, NormalizerSettings, PartialNormalizerRules,
};
pub use diff::{structural_diff, DiffOptions};
pub use differ::{diff_units, LCS_CELL_LIMIT};
pub use error::{ConfigError, ConfigResult};
pub use language::Language;
pub use moves::{detect_moves, MoveDetection};
pub use normalize::{normalize_text_for_language, NormalizationRule, NormalizerPipeline};
pub use renames::detect_renames;
pub use text::LineIndex;
pub use tokenize::{tokenize, AstLeafSource, SyntaxNode, MAX_AST_DEPTH};
pub use types::{
    DiffDocument, DiffOperation, DiffToken, IdAllocator, MoveGroup, OperationKind, OperationMeta,
    Position, Range, RenameGroup, TokenRange, UnitBlock, DIFF_DOCUMENT_VERSION,
};
