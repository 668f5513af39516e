//! Numeric literal spelling.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:0[xXbBoO][0-9a-fA-F_]+|\d[\d_]*(?:\.\d[\d_]*)?(?:[eE][+-]?\d[\d_]*)?)n?\b",
    )
    .expect("numeric literal pattern is valid")
});

/// Canonicalize numeric literals: drop `_` separators, lowercase radix
/// prefixes and hex digits, lowercase the exponent marker and drop an
/// explicit `+` exponent sign.
pub fn normalize_numeric_literals(text: &str) -> Cow<'_, str> {
    NUMERIC_LITERAL.replace_all(text, |caps: &Captures| {
        let literal = caps[0].replace('_', "");
        let is_radix = literal.len() > 1
            && literal.starts_with('0')
            && matches!(literal.as_bytes()[1], b'x' | b'X' | b'b' | b'B' | b'o' | b'O');
        if is_radix {
            literal.to_lowercase()
        } else {
            literal.replace('E', "e").replace("e+", "e")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_separators() {
        assert_eq!(normalize_numeric_literals("1_000_000"), "1000000");
        assert_eq!(normalize_numeric_literals("3.141_59"), "3.14159");
    }

    #[test]
    fn test_radix_case() {
        assert_eq!(normalize_numeric_literals("0XFF_EC"), "0xffec");
        assert_eq!(normalize_numeric_literals("0B1010"), "0b1010");
        assert_eq!(normalize_numeric_literals("0O17n"), "0o17n");
    }

    #[test]
    fn test_exponent_sign() {
        assert_eq!(normalize_numeric_literals("1e+4"), "1e4");
        assert_eq!(normalize_numeric_literals("2.5E-3"), "2.5e-3");
        assert_eq!(
            normalize_numeric_literals("1e4"),
            normalize_numeric_literals("1E+4")
        );
    }

    #[test]
    fn test_identifiers_untouched() {
        assert_eq!(normalize_numeric_literals("item_1_000 + x2"), "item_1_000 + x2");
    }
}
