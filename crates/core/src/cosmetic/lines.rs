//! Line-level relocation cleanup for line-tokenized diffs.

use std::collections::BTreeSet;

use crate::text::{count_line_occurrences, is_single_line};
use crate::types::DiffOperation;

/// Clean up operations that describe a whole line moving within the file.
///
/// A single-line update whose old line reappears verbatim as a separate
/// insert becomes a plain insert of its new text. A single-line delete
/// and insert of the same line are dropped. Both only apply when the line
/// occurs as many times in the new text as in the old one, so real
/// duplication is still reported. Operations linked to a move are left
/// alone.
pub fn suppress_moved_line_ops(
    ops: Vec<DiffOperation>,
    old_text: &str,
    new_text: &str,
) -> Vec<DiffOperation> {
    let relocated = |line: &str| -> bool {
        let line = line.trim();
        if line.is_empty() {
            return false;
        }
        let before = count_line_occurrences(old_text, line);
        before > 0 && before == count_line_occurrences(new_text, line)
    };
    let is_line_op = |op: &DiffOperation| op.move_id().is_none() && is_single_line(op.primary_text());

    let inserted: Vec<(usize, &str)> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| matches!(op, DiffOperation::Insert { .. }) && is_line_op(*op))
        .map(|(index, op)| (index, op.primary_text().trim()))
        .collect();

    let mut claimed: BTreeSet<usize> = BTreeSet::new();
    let mut rewrite: BTreeSet<usize> = BTreeSet::new();
    let mut dropped: BTreeSet<usize> = BTreeSet::new();

    for (index, op) in ops.iter().enumerate() {
        let DiffOperation::Update {
            old_text: old_line,
            new_text: new_line,
            ..
        } = op
        else {
            continue;
        };
        if !is_line_op(op) || !is_single_line(new_line) || !relocated(old_line.as_str()) {
            continue;
        }
        let target = old_line.trim();
        if let Some(&(insert_index, _)) = inserted
            .iter()
            .find(|(i, text)| !claimed.contains(i) && *text == target)
        {
            claimed.insert(insert_index);
            rewrite.insert(index);
        }
    }

    for (index, op) in ops.iter().enumerate() {
        if !matches!(op, DiffOperation::Delete { .. }) || !is_line_op(op) {
            continue;
        }
        let target = op.primary_text().trim();
        if !relocated(target) {
            continue;
        }
        if let Some(&(insert_index, _)) = inserted
            .iter()
            .find(|(i, text)| !claimed.contains(i) && *text == target)
        {
            claimed.insert(insert_index);
            dropped.insert(index);
            dropped.insert(insert_index);
        }
    }

    if rewrite.is_empty() && dropped.is_empty() {
        return ops;
    }
    log::debug!(
        "rewrote {} relocated line update(s), dropped {} relocated line op(s)",
        rewrite.len(),
        dropped.len()
    );

    ops.into_iter()
        .enumerate()
        .filter(|(index, _)| !dropped.contains(index))
        .map(|(index, op)| {
            if !rewrite.contains(&index) {
                return op;
            }
            match op {
                DiffOperation::Update {
                    id,
                    new_range,
                    new_text,
                    meta,
                    ..
                } => DiffOperation::Insert {
                    id,
                    new_range,
                    new_text,
                    meta,
                },
                other => other,
            }
        })
        .collect()
}
