//! Identifier rename detection.
//!
//! Identifiers of both texts are aligned with the same edit-script machinery
//! the block differencer uses. Inside every replaced run with as many
//! removed as added identifiers, identifiers are paired by position and
//! each differing pair counts as one substitution. A substitution
//! `from -> to` becomes a [`RenameGroup`] when it happens at least
//! [`MIN_RENAME_OCCURRENCES`] times, `from` is gone from the new text and
//! `to` did not exist in the old text.
//!
//! Confidence is `consistency * exp(-0.32 * occurrences) / sqrt(candidates)`,
//! clamped to `[0.01, 0.99]`, where `consistency` is the share of `from`'s
//! substitutions that went to `to` and `candidates` is the number of
//! distinct targets `from` was substituted with.

use std::collections::{BTreeMap, BTreeSet};

use crate::differ::{edit_script, Edit};
use crate::tokenize::{is_identifier, lex};
use crate::types::{IdAllocator, RenameGroup};

/// Substitutions needed before a pair is reported as a rename.
pub const MIN_RENAME_OCCURRENCES: usize = 2;

const OCCURRENCE_DECAY: f64 = 0.32;

/// Find consistently renamed identifiers between two texts.
///
/// Groups are ordered by occurrence count (descending), then by name, and
/// take ids from `ids` in that order.
pub fn detect_renames(old_text: &str, new_text: &str, ids: &mut IdAllocator) -> Vec<RenameGroup> {
    let old_idents = identifiers(old_text);
    let new_idents = identifiers(new_text);
    if old_idents.is_empty() || new_idents.is_empty() {
        return Vec::new();
    }

    let substitutions = substitutions(&old_idents, &new_idents);
    if substitutions.is_empty() {
        return Vec::new();
    }

    let old_names: BTreeSet<&str> = old_idents.iter().copied().collect();
    let new_names: BTreeSet<&str> = new_idents.iter().copied().collect();

    let mut per_source: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for (&(from, _), &count) in &substitutions {
        let entry = per_source.entry(from).or_default();
        entry.0 += count;
        entry.1 += 1;
    }

    let mut candidates: Vec<(&str, &str, usize, f64)> = substitutions
        .iter()
        .filter(|&(&(from, to), &count)| {
            count >= MIN_RENAME_OCCURRENCES && !new_names.contains(from) && !old_names.contains(to)
        })
        .map(|(&(from, to), &count)| {
            let (total, targets) = per_source[from];
            (from, to, count, confidence(count, total, targets))
        })
        .collect();
    candidates.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(b.0)).then(a.1.cmp(b.1)));

    let groups: Vec<RenameGroup> = candidates
        .into_iter()
        .map(|(from, to, occurrences, confidence)| RenameGroup {
            id: ids.rename_group(),
            from: from.to_string(),
            to: to.to_string(),
            occurrences,
            confidence,
        })
        .collect();
    if !groups.is_empty() {
        log::debug!("detected {} rename group(s)", groups.len());
    }
    groups
}

fn identifiers(text: &str) -> Vec<&str> {
    lex(text).into_iter().filter(|l| is_identifier(l)).collect()
}

/// Count positional `(from, to)` substitutions inside replaced runs.
fn substitutions<'a>(old: &[&'a str], new: &[&'a str]) -> BTreeMap<(&'a str, &'a str), usize> {
    let mut counts = BTreeMap::new();
    let mut removed: Vec<&str> = Vec::new();
    let mut added: Vec<&str> = Vec::new();
    let (mut i, mut j) = (0, 0);

    let mut flush = |removed: &mut Vec<&'a str>, added: &mut Vec<&'a str>| {
        if !removed.is_empty() && removed.len() == added.len() {
            for (from, to) in removed.iter().zip(added.iter()) {
                if from != to {
                    *counts.entry((*from, *to)).or_insert(0) += 1;
                }
            }
        }
        removed.clear();
        added.clear();
    };

    for edit in edit_script(old, new) {
        match edit {
            Edit::Equal => {
                flush(&mut removed, &mut added);
                i += 1;
                j += 1;
            }
            Edit::Delete => {
                removed.push(old[i]);
                i += 1;
            }
            Edit::Insert => {
                added.push(new[j]);
                j += 1;
            }
        }
    }
    flush(&mut removed, &mut added);
    counts
}

fn confidence(occurrences: usize, total: usize, targets: usize) -> f64 {
    let consistency = occurrences as f64 / total.max(1) as f64;
    let ambiguity = (targets.max(1) as f64).sqrt();
    (consistency * (-OCCURRENCE_DECAY * occurrences as f64).exp() / ambiguity).clamp(0.01, 0.99)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renames(old: &str, new: &str) -> Vec<RenameGroup> {
        detect_renames(old, new, &mut IdAllocator::new())
    }

    #[test]
    fn test_single_identifier_rename() {
        let groups = renames("const foo = foo + foo;", "const bar = bar + bar;");
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.id, "rename-1");
        assert_eq!(group.from, "foo");
        assert_eq!(group.to, "bar");
        assert_eq!(group.occurrences, 3);
        assert!((group.confidence - 0.383).abs() < 0.01, "{}", group.confidence);
    }

    #[test]
    fn test_confidence_decreases_with_occurrences() {
        assert!(confidence(2, 2, 1) > confidence(3, 3, 1));
        assert!(confidence(3, 3, 1) > confidence(6, 6, 1));
        assert!(confidence(50, 50, 1) >= 0.01);
    }

    #[test]
    fn test_confidence_decreases_with_ambiguity() {
        assert!(confidence(2, 2, 1) > confidence(2, 4, 2));
    }

    #[test]
    fn test_surviving_old_name_is_not_a_rename() {
        let groups = renames("f(a, a, a)", "f(b, b, a)");
        assert!(groups.is_empty());
    }

    #[test]
    fn test_preexisting_new_name_is_not_a_rename() {
        let groups = renames("g(x); h(a); h(a);", "g(x); h(x); h(x);");
        assert!(groups.is_empty());
    }

    #[test]
    fn test_single_substitution_is_ignored() {
        assert!(renames("let a = 1;", "let b = 1;").is_empty());
    }

    #[test]
    fn test_groups_ordered_by_occurrences() {
        let old = "p(a); p(a); p(b); p(b); p(b);";
        let new = "p(x); p(x); p(y); p(y); p(y);";
        let groups = renames(old, new);
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].from.as_str(), groups[0].to.as_str()), ("b", "y"));
        assert_eq!(groups[0].id, "rename-1");
        assert_eq!((groups[1].from.as_str(), groups[1].to.as_str()), ("a", "x"));
    }

    #[test]
    fn test_no_identifiers() {
        assert!(renames("1 + 2", "3 + 4").is_empty());
    }
}
