//! Suppression of operations that only change how code is written.
//!
//! Everything here compares texts through [`normalize_cosmetic_block`],
//! which folds the rewrites formatters and import sorters commonly make:
//! import statement order, specifier order, `=> { return x; }` bodies, JSX
//! attribute order, quote style and whitespace.

mod lines;

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::normalize::sort_import_specifiers;
use crate::text::{collapse_whitespace, count_line_occurrences, is_single_line};
use crate::types::{DiffOperation, MoveGroup, OperationKind};

pub use lines::suppress_moved_line_ops;

/// Longest line still treated as a cosmetic move.
const COSMETIC_LINE_LIMIT: usize = 160;
/// Signature length cap for import-like content.
const IMPORT_SIGNATURE_LIMIT: usize = 160;
/// Signature length cap for anything else.
const SIGNATURE_LIMIT: usize = 80;

static ARROW_RETURN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"=>\s*\{\s*return\s+([^;{}]+?)\s*;?\s*\}").expect("arrow return pattern is valid")
});

static JSX_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"<(?P<name>[A-Za-z][\w.:-]*)",
        r#"(?P<attrs>(?:\s+[A-Za-z_][\w:.-]*(?:\s*=\s*(?:"[^"]*"|\{[^{}]*\}))?)+)"#,
        r"\s*(?P<close>/?)>",
    ))
    .expect("jsx tag pattern is valid")
});

static JSX_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[A-Za-z_][\w:.-]*(?:\s*=\s*(?:"[^"]*"|\{[^{}]*\}))?"#)
        .expect("jsx attribute pattern is valid")
});

static PROP_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$.-]*\s*=\s*[^=\s]").expect("prop assignment pattern is valid")
});

/// Canonical form of a block of JavaScript-family code for cosmetic
/// comparisons. The result is only ever compared, never shown.
pub fn normalize_cosmetic_block(text: &str) -> String {
    let folded = text.replace('\'', "\"");
    let imports = sort_import_runs(&folded);
    let arrows = ARROW_RETURN.replace_all(&imports, "=> $1");
    let attributes = sort_jsx_attributes(&arrows);
    collapse_whitespace(&attributes)
}

/// Sort every run of consecutive import lines, and the specifiers in them.
fn sort_import_runs(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut run: Vec<String> = Vec::new();
    for line in text.lines() {
        if is_import(line) {
            run.push(sort_import_specifiers(line.trim()).into_owned());
            continue;
        }
        run.sort();
        out.append(&mut run);
        out.push(line.to_string());
    }
    run.sort();
    out.append(&mut run);
    out.join("\n")
}

fn sort_jsx_attributes(text: &str) -> String {
    JSX_TAG
        .replace_all(text, |caps: &Captures| {
            let attrs = &caps["attrs"];
            if attrs.contains("...") {
                return caps[0].to_string();
            }
            let mut sorted: Vec<&str> = JSX_ATTR.find_iter(attrs).map(|m| m.as_str()).collect();
            sorted.sort_unstable();
            let close = if caps["close"].is_empty() { "" } else { " /" };
            format!("<{} {}{}>", &caps["name"], sorted.join(" "), close)
        })
        .into_owned()
}

fn is_import(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("import ") || line.starts_with("import{")
}

/// Whether a single line is the kind of line formatters shuffle around:
/// a `"use client"` directive, an import with bindings, or a prop
/// assignment.
pub fn is_cosmetic_move_line(line: &str) -> bool {
    let line = line.trim();
    let directive = line.trim_end_matches(';').replace('\'', "\"");
    if directive == "\"use client\"" {
        return true;
    }
    if is_import(line) {
        return line.contains(" from ") || line.contains("}from");
    }
    PROP_ASSIGNMENT.is_match(line)
}

/// Drop updates whose two sides normalize to the same cosmetic block.
pub fn suppress_cosmetic_updates(ops: Vec<DiffOperation>) -> Vec<DiffOperation> {
    let before = ops.len();
    let kept: Vec<DiffOperation> = ops
        .into_iter()
        .filter(|op| match op {
            DiffOperation::Update {
                old_text, new_text, ..
            } => normalize_cosmetic_block(old_text) != normalize_cosmetic_block(new_text),
            _ => true,
        })
        .collect();
    if kept.len() != before {
        log::debug!("suppressed {} cosmetic update(s)", before - kept.len());
    }
    kept
}

/// Drop cosmetic moves together with every operation of their group, and
/// the groups themselves.
pub fn suppress_cosmetic_moves(
    ops: Vec<DiffOperation>,
    moves: &mut Vec<MoveGroup>,
) -> Vec<DiffOperation> {
    let cosmetic: BTreeSet<String> = ops
        .iter()
        .filter_map(|op| match op {
            DiffOperation::Move {
                old_text, new_text, ..
            } if is_cosmetic_move(old_text, new_text) => op.move_id().map(str::to_string),
            _ => None,
        })
        .collect();
    if cosmetic.is_empty() {
        return ops;
    }
    log::debug!("suppressed {} cosmetic move(s)", cosmetic.len());
    moves.retain(|group| !cosmetic.contains(&group.id));
    ops.into_iter()
        .filter(|op| op.move_id().map_or(true, |id| !cosmetic.contains(id)))
        .collect()
}

fn is_cosmetic_move(old_text: &str, new_text: &str) -> bool {
    let old_norm = normalize_cosmetic_block(old_text);
    let new_norm = normalize_cosmetic_block(new_text);

    if old_norm == new_norm {
        if old_norm.is_empty() {
            return true;
        }
        if is_single_line(old_text)
            && is_single_line(new_text)
            && old_norm.len() <= COSMETIC_LINE_LIMIT
            && is_cosmetic_move_line(&old_norm)
        {
            return true;
        }
    }

    let signature = move_signature(&old_norm);
    if signature.is_empty() || signature != move_signature(&new_norm) {
        return false;
    }
    let import_like = is_import(&old_norm);
    let limit = if import_like {
        IMPORT_SIGNATURE_LIMIT
    } else {
        SIGNATURE_LIMIT
    };
    signature.len() <= limit && (import_like || PROP_ASSIGNMENT.is_match(&old_norm))
}

/// Normalized text without structural punctuation or quotes.
fn move_signature(normalized: &str) -> String {
    let stripped: String = normalized
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '(' | ')' | '[' | ']' | ';' | ',' | '"' | '\''))
        .collect();
    collapse_whitespace(&stripped)
}

/// Drop single-line delete/insert pairs that only relocate a cosmetic-move
/// line, provided the line occurs as often in the new text as in the old.
pub fn suppress_cosmetic_line_moves(
    ops: Vec<DiffOperation>,
    old_text: &str,
    new_text: &str,
) -> Vec<DiffOperation> {
    let candidates = |kind: OperationKind| -> Vec<(usize, String)> {
        ops.iter()
            .enumerate()
            .filter(|(_, op)| op.kind() == kind && op.move_id().is_none())
            .filter(|(_, op)| is_single_line(op.primary_text()))
            .map(|(index, op)| (index, normalize_cosmetic_block(op.primary_text())))
            .collect()
    };
    let deletes = candidates(OperationKind::Delete);
    let inserts = candidates(OperationKind::Insert);

    let mut dropped = BTreeSet::new();
    for (delete_index, delete_norm) in &deletes {
        let deleted = ops[*delete_index].primary_text();
        if delete_norm.is_empty() || !is_cosmetic_move_line(deleted) {
            continue;
        }
        let partner = inserts.iter().find(|(insert_index, insert_norm)| {
            !dropped.contains(insert_index)
                && insert_norm == delete_norm
                && count_line_occurrences(old_text, deleted)
                    == count_line_occurrences(new_text, ops[*insert_index].primary_text())
        });
        if let Some((insert_index, _)) = partner {
            dropped.insert(*delete_index);
            dropped.insert(*insert_index);
        }
    }

    if dropped.is_empty() {
        return ops;
    }
    log::debug!("suppressed {} cosmetic line move(s)", dropped.len() / 2);
    ops.into_iter()
        .enumerate()
        .filter(|(index, _)| !dropped.contains(index))
        .map(|(_, op)| op)
        .collect()
}
