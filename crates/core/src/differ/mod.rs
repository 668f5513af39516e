//! Token-level edit scripts.
//!
//! Equality is always decided on `compare_text`. Small inputs use a full
//! LCS table; when the table would exceed [`LCS_CELL_LIMIT`] cells the
//! Myers O(ND) algorithm takes over. Both produce coalesced delete/insert
//! blocks with the same boundary semantics.

mod lcs;
mod myers;

use crate::types::{BlockKind, DiffToken, UnitBlock};

pub(crate) use lcs::lcs_length;

/// Largest `old.len() * new.len()` handled with the LCS table.
pub const LCS_CELL_LIMIT: usize = 2_000_000;

/// One step of an edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edit {
    Equal,
    Delete,
    Insert,
}

/// Compute delete/insert blocks between two token streams.
pub fn diff_units<'t, 'a>(
    old_tokens: &'t [DiffToken<'a>],
    new_tokens: &'t [DiffToken<'a>],
) -> Vec<UnitBlock<'t, 'a>> {
    let script = edit_script(&compare_keys(old_tokens), &compare_keys(new_tokens));
    blocks_from_script(&script, old_tokens, new_tokens)
}

/// Edit script over two key sequences, picking the algorithm by size.
pub(crate) fn edit_script(old: &[&str], new: &[&str]) -> Vec<Edit> {
    let cells = old.len().saturating_mul(new.len());
    if cells <= LCS_CELL_LIMIT {
        log::trace!("diffing {} x {} keys with LCS table", old.len(), new.len());
        lcs::edit_script(old, new)
    } else {
        log::debug!(
            "diffing {} x {} keys with Myers ({} cells over LCS limit)",
            old.len(),
            new.len(),
            cells
        );
        myers::edit_script(old, new)
    }
}

fn compare_keys<'t>(tokens: &'t [DiffToken<'_>]) -> Vec<&'t str> {
    tokens.iter().map(|t| t.compare_text.as_ref()).collect()
}

/// Replay an edit script, merging consecutive same-kind steps into blocks.
fn blocks_from_script<'t, 'a>(
    script: &[Edit],
    old_tokens: &'t [DiffToken<'a>],
    new_tokens: &'t [DiffToken<'a>],
) -> Vec<UnitBlock<'t, 'a>> {
    let mut blocks: Vec<UnitBlock<'t, 'a>> = Vec::new();
    let mut open: Option<(BlockKind, usize, usize)> = None;
    let (mut i, mut j) = (0, 0);

    let close = |open: &mut Option<(BlockKind, usize, usize)>, blocks: &mut Vec<UnitBlock<'t, 'a>>| {
        if let Some((kind, start, end)) = open.take() {
            let stream = match kind {
                BlockKind::Delete => old_tokens,
                BlockKind::Insert => new_tokens,
            };
            blocks.push(UnitBlock {
                kind,
                start,
                units: &stream[start..end],
            });
        }
    };

    for edit in script {
        let (kind, position) = match edit {
            Edit::Equal => {
                close(&mut open, &mut blocks);
                i += 1;
                j += 1;
                continue;
            }
            Edit::Delete => {
                i += 1;
                (BlockKind::Delete, i - 1)
            }
            Edit::Insert => {
                j += 1;
                (BlockKind::Insert, j - 1)
            }
        };
        if let Some((open_kind, _, end)) = open.as_mut() {
            if *open_kind == kind {
                *end = position + 1;
                continue;
            }
        }
        close(&mut open, &mut blocks);
        open = Some((kind, position, position + 1));
    }
    close(&mut open, &mut blocks);
    blocks
}

#[cfg(test)]
pub(crate) fn diff_units_with(
    old_tokens: &[DiffToken<'_>],
    new_tokens: &[DiffToken<'_>],
    use_myers: bool,
) -> Vec<(BlockKind, usize, usize)> {
    let old = compare_keys(old_tokens);
    let new = compare_keys(new_tokens);
    let script = if use_myers {
        myers::edit_script(&old, &new)
    } else {
        lcs::edit_script(&old, &new)
    };
    blocks_from_script(&script, old_tokens, new_tokens)
        .into_iter()
        .map(|b| (b.kind, b.start, b.len()))
        .collect()
}
