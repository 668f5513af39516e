//! Human-readable rendering of a diff document.

use std::fmt::Write;

use semdiff_core::{DiffDocument, DiffOperation, Range};

const PREVIEW_CHARS: usize = 48;

/// One line per operation, then renames, then a count footer.
///
/// ```text
/// ~ 3:5-3:9 -> 3:5-3:10  "a + b" -> "a - b"
/// + 7:1-8:1  "return total;"
/// > 1:1-4:1 -> 9:1-12:1  (move-1, 0.92)
/// rename foo -> bar (3x, 0.38)
/// 3 operation(s), 1 move(s), 1 rename(s)
/// ```
pub fn summary(doc: &DiffDocument) -> String {
    if doc.is_empty() {
        return "no changes\n".to_string();
    }

    let mut out = String::new();
    for op in &doc.operations {
        let line = match op {
            DiffOperation::Insert {
                new_range,
                new_text,
                ..
            } => format!("+ {}  {}", span(new_range), preview(new_text)),
            DiffOperation::Delete {
                old_range,
                old_text,
                ..
            } => format!("- {}  {}", span(old_range), preview(old_text)),
            DiffOperation::Update {
                old_range,
                new_range,
                old_text,
                new_text,
                ..
            } => format!(
                "~ {} -> {}  {} -> {}",
                span(old_range),
                span(new_range),
                preview(old_text),
                preview(new_text)
            ),
            DiffOperation::Move {
                old_range,
                new_range,
                meta,
                ..
            } => {
                let mut line = format!("> {} -> {}", span(old_range), span(new_range));
                if let Some(meta) = meta {
                    if let (Some(id), Some(confidence)) = (&meta.move_id, meta.confidence) {
                        let _ = write!(line, "  ({id}, {confidence:.2})");
                    }
                }
                line
            }
        };
        out.push_str(&line);
        out.push('\n');
    }

    for rename in &doc.renames {
        let _ = writeln!(
            out,
            "rename {} -> {} ({}x, {:.2})",
            rename.from, rename.to, rename.occurrences, rename.confidence
        );
    }

    let _ = writeln!(
        out,
        "{} operation(s), {} move(s), {} rename(s)",
        doc.operations.len(),
        doc.moves.len(),
        doc.renames.len()
    );
    out
}

fn span(range: &Range) -> String {
    format!(
        "{}:{}-{}:{}",
        range.start.line, range.start.column, range.end.line, range.end.column
    )
}

/// First non-blank line of `text`, quoted and shortened.
fn preview(text: &str) -> String {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let mut shown: String = line.chars().take(PREVIEW_CHARS).collect();
    if line.chars().count() > PREVIEW_CHARS || text.trim().lines().count() > 1 {
        shown.push_str("...");
    }
    format!("{shown:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use semdiff_core::{structural_diff, DiffOptions, Position};

    #[test]
    fn test_empty_document() {
        assert_eq!(summary(&DiffDocument::empty()), "no changes\n");
    }

    #[test]
    fn test_update_line_and_footer() {
        let doc = structural_diff("a + b", "a - b", &DiffOptions::default());
        let text = summary(&doc);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], r#"~ 1:3-1:4 -> 1:3-1:4  "+" -> "-""#);
        assert_eq!(lines.last(), Some(&"1 operation(s), 0 move(s), 0 rename(s)"));
    }

    #[test]
    fn test_insert_and_delete_markers() {
        let doc = structural_diff("", "hello\n", &DiffOptions::default());
        assert!(summary(&doc).starts_with("+ 1:1-2:1  \"hello\""));
        let doc = structural_diff("bye\n", "", &DiffOptions::default());
        assert!(summary(&doc).starts_with("- 1:1-2:1  \"bye\""));
    }

    #[test]
    fn test_preview_shortens() {
        assert_eq!(preview("  \n  first\nsecond\n"), "\"first...\"");
        let long = "x".repeat(60);
        assert_eq!(preview(&long), format!("\"{}...\"", "x".repeat(48)));
        assert_eq!(span(&Range::new(Position::new(2, 1), Position::new(3, 7))), "2:1-3:7");
    }
}
