//! Merging of adjacent same-kind operations.

use crate::text::LineIndex;
use crate::types::{DiffOperation, MoveGroup, Position, Range};

/// Merge runs of adjacent operations of the same kind.
///
/// Updates merge when both their old and new ranges are line-adjacent.
/// Inserts and deletes merge only when nothing lies between them on their
/// side, so unchanged text never ends up inside an insert or delete.
/// Operations linked to a move never merge, and no merge spans a moved
/// range. Merged text is re-sliced from the sources.
pub fn coalesce_operations(
    ops: Vec<DiffOperation>,
    moves: &[MoveGroup],
    old: &LineIndex<'_>,
    new: &LineIndex<'_>,
) -> Vec<DiffOperation> {
    let before = ops.len();
    let mut merged: Vec<DiffOperation> = Vec::with_capacity(ops.len());
    for op in ops {
        if let Some(last) = merged.last_mut() {
            if let Some(combined) = try_merge(last, &op, moves, old, new) {
                *last = combined;
                continue;
            }
        }
        merged.push(op);
    }
    if merged.len() != before {
        log::trace!("coalesced {} operations into {}", before, merged.len());
    }
    merged
}

fn try_merge(
    prev: &DiffOperation,
    next: &DiffOperation,
    moves: &[MoveGroup],
    old: &LineIndex<'_>,
    new: &LineIndex<'_>,
) -> Option<DiffOperation> {
    if prev.kind() != next.kind() || prev.move_id().is_some() || next.move_id().is_some() {
        return None;
    }
    if crosses_move(prev, next, moves) {
        return None;
    }

    match (prev, next) {
        (
            DiffOperation::Insert {
                id,
                new_range: a,
                meta,
                ..
            },
            DiffOperation::Insert { new_range: b, .. },
        ) if a.end == b.start => {
            let new_range = Range::new(a.start, b.end);
            Some(DiffOperation::Insert {
                id: id.clone(),
                new_range,
                new_text: new.slice(&new_range).to_string(),
                meta: meta.clone(),
            })
        }
        (
            DiffOperation::Delete {
                id,
                old_range: a,
                meta,
                ..
            },
            DiffOperation::Delete { old_range: b, .. },
        ) if a.end == b.start => {
            let old_range = Range::new(a.start, b.end);
            Some(DiffOperation::Delete {
                id: id.clone(),
                old_range,
                old_text: old.slice(&old_range).to_string(),
                meta: meta.clone(),
            })
        }
        (
            DiffOperation::Update {
                id,
                old_range: old_a,
                new_range: new_a,
                meta,
                ..
            },
            DiffOperation::Update {
                old_range: old_b,
                new_range: new_b,
                ..
            },
        ) if line_adjacent(old_a, old_b) && line_adjacent(new_a, new_b) => {
            let old_range = Range::new(old_a.start, old_b.end);
            let new_range = Range::new(new_a.start, new_b.end);
            Some(DiffOperation::Update {
                id: id.clone(),
                old_range,
                new_range,
                old_text: old.slice(&old_range).to_string(),
                new_text: new.slice(&new_range).to_string(),
                meta: meta.clone(),
            })
        }
        _ => None,
    }
}

/// `b` starts after `a` and at most one line past where `a` ends.
fn line_adjacent(a: &Range, b: &Range) -> bool {
    b.start >= a.end && b.start.line <= a.end.line + 1
}

/// Whether a moved range sits between the two operations on either side.
fn crosses_move(prev: &DiffOperation, next: &DiffOperation, moves: &[MoveGroup]) -> bool {
    let between = |a: Option<&Range>, b: Option<&Range>, moved: &Range| match (a, b) {
        (Some(a), Some(b)) => within(moved, a.end, b.start),
        _ => false,
    };
    moves.iter().any(|group| {
        between(prev.old_range(), next.old_range(), &group.old_range)
            || between(prev.new_range(), next.new_range(), &group.new_range)
    })
}

fn within(range: &Range, from: Position, to: Position) -> bool {
    range.start >= from && range.end <= to
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationMeta;

    fn update(id: &str, old: Range, new: Range) -> DiffOperation {
        DiffOperation::Update {
            id: id.into(),
            old_range: old,
            new_range: new,
            old_text: String::new(),
            new_text: String::new(),
            meta: None,
        }
    }

    fn range(l1: usize, c1: usize, l2: usize, c2: usize) -> Range {
        Range::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    #[test]
    fn test_adjacent_updates_merge_with_resliced_text() {
        let old_text = "let a = 1;\nlet b = 2;\n";
        let new_text = "let a = 10;\nlet b = 20;\n";
        let old = LineIndex::new(old_text);
        let new = LineIndex::new(new_text);
        let ops = vec![
            update("op-1", old.range(8, 9), new.range(8, 10)),
            update("op-2", old.range(19, 20), new.range(20, 22)),
        ];
        let merged = coalesce_operations(ops, &[], &old, &new);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id(), "op-1");
        assert_eq!(merged[0].old_text(), Some("1;\nlet b = 2"));
        assert_eq!(merged[0].new_text(), Some("10;\nlet b = 20"));
    }

    #[test]
    fn test_distant_updates_stay_apart() {
        let old_text = "a\nx\ny\nb\n";
        let old = LineIndex::new(old_text);
        let ops = vec![
            update("op-1", range(1, 1, 1, 2), range(1, 1, 1, 2)),
            update("op-2", range(4, 1, 4, 2), range(4, 1, 4, 2)),
        ];
        assert_eq!(coalesce_operations(ops, &[], &old, &old).len(), 2);
    }

    #[test]
    fn test_inserts_merge_only_without_gap() {
        let new_text = "abc def";
        let new = LineIndex::new(new_text);
        let old = LineIndex::new("");
        let insert = |id: &str, start: usize, end: usize| DiffOperation::Insert {
            id: id.into(),
            new_range: new.range(start, end),
            new_text: new_text[start..end].to_string(),
            meta: None,
        };
        let merged = coalesce_operations(
            vec![insert("op-1", 0, 3), insert("op-2", 3, 4), insert("op-3", 5, 7)],
            &[],
            &old,
            &new,
        );
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].new_text(), Some("abc "));
        assert_eq!(merged[1].new_text(), Some("ef"));
    }

    #[test]
    fn test_no_merge_across_move_or_with_move_id() {
        let text = "a\nb\nc\nd\n";
        let index = LineIndex::new(text);
        let moves = vec![MoveGroup {
            id: "move-1".into(),
            old_range: range(2, 1, 3, 1),
            new_range: range(4, 1, 5, 1),
            confidence: 1.0,
            operations: vec![],
        }];
        let ops = vec![
            update("op-1", range(1, 1, 2, 1), range(1, 1, 2, 1)),
            update("op-2", range(3, 1, 4, 1), range(2, 1, 3, 1)),
        ];
        assert_eq!(coalesce_operations(ops, &moves, &index, &index).len(), 2);

        let mut linked = update("op-4", range(2, 1, 3, 1), range(2, 1, 3, 1));
        if let DiffOperation::Update { meta, .. } = &mut linked {
            *meta = Some(OperationMeta {
                move_id: Some("move-1".into()),
                ..Default::default()
            });
        }
        let ops = vec![update("op-3", range(1, 1, 2, 1), range(1, 1, 2, 1)), linked];
        assert_eq!(coalesce_operations(ops, &[], &index, &index).len(), 2);
    }
}
