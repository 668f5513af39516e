//! Relocated block detection.
//!
//! Matching is greedy: each delete block, in order, takes its best-scoring
//! unused insert block and never gives it back. This keeps the pass
//! deterministic and close to linear in the number of blocks, at the cost
//! of occasionally missing a better global assignment.

use std::collections::BTreeSet;

use crate::cosmetic::normalize_cosmetic_block;
use crate::differ::lcs_length;
use crate::language::{self, Language};
use crate::types::{BlockKind, DiffOperation, IdAllocator, MoveGroup, OperationMeta, UnitBlock};

/// Minimum similarity for a delete/insert pair to count as a move.
pub const MOVE_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Result of [`detect_moves`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MoveDetection {
    pub moves: Vec<MoveGroup>,
    /// One `move` operation per group
    pub move_ops: Vec<DiffOperation>,
    /// `update` operations for moves whose content also changed
    pub nested_ops: Vec<DiffOperation>,
    /// Indices into the block list consumed as move sources
    pub used_deletes: BTreeSet<usize>,
    /// Indices into the block list consumed as move targets
    pub used_inserts: BTreeSet<usize>,
}

impl MoveDetection {
    /// Whether block `index` was consumed by a move.
    pub fn is_used(&self, index: usize) -> bool {
        self.used_deletes.contains(&index) || self.used_inserts.contains(&index)
    }
}

/// Pair delete blocks with similar insert blocks.
pub fn detect_moves(
    blocks: &[UnitBlock<'_, '_>],
    old_text: &str,
    new_text: &str,
    rename_group_id: Option<&str>,
    language: Option<Language>,
    ids: &mut IdAllocator,
) -> MoveDetection {
    let mut detection = MoveDetection::default();

    let deletes: Vec<(usize, &UnitBlock<'_, '_>)> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind == BlockKind::Delete)
        .collect();
    let inserts: Vec<(usize, &UnitBlock<'_, '_>)> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind == BlockKind::Insert)
        .collect();
    if deletes.is_empty() || inserts.is_empty() {
        return detection;
    }

    for &(delete_index, deleted) in &deletes {
        let mut best: Option<(usize, &UnitBlock<'_, '_>, f64)> = None;
        for &(insert_index, inserted) in &inserts {
            if detection.used_inserts.contains(&insert_index) {
                continue;
            }
            let score = similarity(deleted, inserted);
            if best.map_or(true, |(_, _, best_score)| score > best_score) {
                best = Some((insert_index, inserted, score));
            }
        }

        let Some((insert_index, inserted, score)) = best else {
            break;
        };
        if score < MOVE_SIMILARITY_THRESHOLD || !is_substantial(deleted, inserted) {
            continue;
        }

        detection.used_deletes.insert(delete_index);
        detection.used_inserts.insert(insert_index);
        record_move(
            &mut detection,
            deleted,
            inserted,
            score,
            old_text,
            new_text,
            rename_group_id,
            language,
            ids,
        );
    }

    if !detection.moves.is_empty() {
        log::debug!("detected {} moved block(s)", detection.moves.len());
    }
    detection
}

#[allow(clippy::too_many_arguments)]
fn record_move(
    detection: &mut MoveDetection,
    deleted: &UnitBlock<'_, '_>,
    inserted: &UnitBlock<'_, '_>,
    score: f64,
    old_text: &str,
    new_text: &str,
    rename_group_id: Option<&str>,
    language: Option<Language>,
    ids: &mut IdAllocator,
) {
    let move_id = ids.move_group();
    let old_slice = &old_text[deleted.start_index()..deleted.end_index()];
    let new_slice = &new_text[inserted.start_index()..inserted.end_index()];
    let meta = OperationMeta {
        confidence: Some(score),
        move_id: Some(move_id.clone()),
        rename_group_id: rename_group_id.map(str::to_string),
    };

    let move_op_id = ids.operation();
    detection.move_ops.push(DiffOperation::Move {
        id: move_op_id.clone(),
        old_range: deleted.range(),
        new_range: inserted.range(),
        old_text: old_slice.to_string(),
        new_text: new_slice.to_string(),
        meta: Some(meta.clone()),
    });
    let mut operations = vec![move_op_id];

    let edited = if language::is_cosmetic(language) {
        normalize_cosmetic_block(old_slice) != normalize_cosmetic_block(new_slice)
    } else {
        old_slice != new_slice
    };
    if edited {
        let update_id = ids.operation();
        detection.nested_ops.push(DiffOperation::Update {
            id: update_id.clone(),
            old_range: deleted.range(),
            new_range: inserted.range(),
            old_text: old_slice.to_string(),
            new_text: new_slice.to_string(),
            meta: Some(meta),
        });
        operations.push(update_id);
    }

    detection.moves.push(MoveGroup {
        id: move_id,
        old_range: deleted.range(),
        new_range: inserted.range(),
        confidence: score,
        operations,
    });
}

/// LCS ratio of the visible tokens of two blocks.
fn similarity(a: &UnitBlock<'_, '_>, b: &UnitBlock<'_, '_>) -> f64 {
    let left = visible_keys(a);
    let right = visible_keys(b);
    let longest = left.len().max(right.len()).max(1);
    lcs_length(&left, &right) as f64 / longest as f64
}

fn visible_keys<'t>(block: &'t UnitBlock<'_, '_>) -> Vec<&'t str> {
    block
        .units
        .iter()
        .filter(|t| !t.is_whitespace())
        .map(|t| t.compare_text.as_ref())
        .collect()
}

/// Rejects trivial matches such as a lone repeated `x`.
fn is_substantial(a: &UnitBlock<'_, '_>, b: &UnitBlock<'_, '_>) -> bool {
    a.len().min(b.len()) >= 2 || trimmed_chars(a).min(trimmed_chars(b)) >= 3
}

fn trimmed_chars(block: &UnitBlock<'_, '_>) -> usize {
    let text: String = block.units.iter().map(|t| t.text).collect();
    text.trim().chars().count()
}
