//! Reading diff inputs from disk.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Bytes inspected when sniffing for binary content.
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Default upper bound on input size.
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;

/// Read a text file for diffing.
///
/// Rejects files larger than `max_bytes`, files with a NUL byte near the
/// start, and files that are not UTF-8.
pub fn read_source(path: &Path, max_bytes: u64) -> Result<String> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;
    if metadata.len() > max_bytes {
        bail!(
            "{} is {} bytes, above the limit of {} bytes",
            path.display(),
            metadata.len(),
            max_bytes
        );
    }

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if looks_binary(&bytes) {
        bail!("{} looks like a binary file", path.display());
    }
    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", path.display()))
}

fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn test_reads_text() {
        let file = file_with(b"let a = 1;\n");
        assert_eq!(
            read_source(file.path(), DEFAULT_MAX_BYTES).unwrap(),
            "let a = 1;\n"
        );
    }

    #[test]
    fn test_rejects_binary() {
        let file = file_with(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR");
        let err = read_source(file.path(), DEFAULT_MAX_BYTES).unwrap_err();
        assert!(err.to_string().contains("binary"));
    }

    #[test]
    fn test_nul_past_sniff_window_is_text() {
        let mut bytes = vec![b'a'; BINARY_SNIFF_LEN];
        bytes.push(0);
        assert!(!looks_binary(&bytes));
    }

    #[test]
    fn test_rejects_oversize() {
        let file = file_with(b"0123456789");
        let err = read_source(file.path(), 4).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_source(Path::new("/nonexistent/semdiff/input.ts"), 10).unwrap_err();
        assert!(err.to_string().contains("input.ts"));
    }
}
