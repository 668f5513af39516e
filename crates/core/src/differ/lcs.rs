//! Longest-common-subsequence table.

use super::Edit;

/// Edit script from a full bottom-up LCS table.
///
/// `table[i][j]` holds the LCS length of `old[i..]` and `new[j..]`. The walk
/// goes forward from the origin; on a mismatch it follows the larger
/// remaining LCS, preferring deletion on ties.
pub(super) fn edit_script(old: &[&str], new: &[&str]) -> Vec<Edit> {
    let (n, m) = (old.len(), new.len());
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut script = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            script.push(Edit::Equal);
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            script.push(Edit::Delete);
            i += 1;
        } else {
            script.push(Edit::Insert);
            j += 1;
        }
    }
    script.extend(std::iter::repeat(Edit::Delete).take(n - i));
    script.extend(std::iter::repeat(Edit::Insert).take(m - j));
    script
}

/// Length of the longest common subsequence, in two rolling rows.
pub(crate) fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_prefer_delete() {
        assert_eq!(
            edit_script(&["a"], &["b"]),
            vec![Edit::Delete, Edit::Insert]
        );
    }

    #[test]
    fn test_script_consumes_both_sides() {
        let script = edit_script(&["a", "b", "c"], &["b", "c", "d"]);
        assert_eq!(
            script,
            vec![Edit::Delete, Edit::Equal, Edit::Equal, Edit::Insert]
        );
    }

    #[test]
    fn test_lcs_length() {
        assert_eq!(lcs_length(&["a", "b", "c", "d"], &["b", "d", "x"]), 2);
        assert_eq!(lcs_length::<&str>(&[], &["a"]), 0);
        assert_eq!(lcs_length(&[1, 2, 3], &[1, 2, 3]), 3);
    }
}
