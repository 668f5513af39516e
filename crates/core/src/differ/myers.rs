//! Myers' O(ND) edit script for inputs too large for the LCS table.

use similar::{capture_diff_slices, Algorithm, DiffOp};

use super::Edit;

/// Shortest edit script between `old` and `new`, in linear space.
///
/// Within every run of changes, deletions are emitted before insertions so
/// the blocks line up with the ones the LCS table produces.
pub(super) fn edit_script(old: &[&str], new: &[&str]) -> Vec<Edit> {
    let mut script = Vec::with_capacity(old.len().max(new.len()));
    let (mut deletes, mut inserts) = (0, 0);

    let flush = |script: &mut Vec<Edit>, deletes: &mut usize, inserts: &mut usize| {
        script.extend(std::iter::repeat(Edit::Delete).take(*deletes));
        script.extend(std::iter::repeat(Edit::Insert).take(*inserts));
        *deletes = 0;
        *inserts = 0;
    };

    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        match op {
            DiffOp::Equal { len, .. } => {
                flush(&mut script, &mut deletes, &mut inserts);
                script.extend(std::iter::repeat(Edit::Equal).take(len));
            }
            DiffOp::Delete { old_len, .. } => deletes += old_len,
            DiffOp::Insert { new_len, .. } => inserts += new_len,
            DiffOp::Replace {
                old_len, new_len, ..
            } => {
                deletes += old_len;
                inserts += new_len;
            }
        }
    }
    flush(&mut script, &mut deletes, &mut inserts);
    script
}
