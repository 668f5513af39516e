//! Whitespace collapsing.

use std::borrow::Cow;

use crate::text::collapse_whitespace;

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> Cow<'_, str> {
    let collapsed = collapse_whitespace(text);
    if collapsed == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(collapsed)
    }
}
