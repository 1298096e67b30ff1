//! Small shared helpers: byte-offset to line/column mapping, display-path
//! normalization, and Python file discovery.

use ruff_text_size::TextSize;
use std::path::{Path, PathBuf};

/// A utility struct to convert byte offsets to line and column numbers.
///
/// The AST parser works with byte offsets, but findings are reported with
/// line/column positions which are more human-readable.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: TextSize) -> usize {
        let offset = offset.to_usize();
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a `TextSize` (byte offset) to a 1-indexed byte column.
    #[must_use]
    pub fn column_index(&self, offset: TextSize) -> usize {
        let line = self.line_index(offset);
        let line_start = self.line_starts.get(line - 1).copied().unwrap_or(0);
        offset.to_usize() - line_start + 1
    }
}

/// Normalizes a path for display and pattern matching.
///
/// - Converts backslashes to forward slashes (for cross-platform consistency)
/// - Strips a leading "./" prefix (for cleaner output)
#[must_use]
pub fn normalize_display_path(path: &Path) -> String {
    let s = path.to_string_lossy();
    let normalized = s.replace('\\', "/");
    normalized
        .strip_prefix("./")
        .unwrap_or(&normalized)
        .to_owned()
}

/// Collects every `*.py` file under `root`, sorted for deterministic runs.
///
/// Uses the gitignore-aware walker when `respect_gitignore` is set; a plain
/// recursive walk otherwise. A `root` that is itself a file is yielded as-is
/// when it has a `.py` extension.
#[must_use]
pub fn collect_python_files(root: &Path, respect_gitignore: bool) -> Vec<PathBuf> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder.standard_filters(respect_gitignore);

    let mut files: Vec<PathBuf> = builder
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|file_type| file_type.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "py"))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_positions() {
        let index = LineIndex::new("a = 1\nbb = 2\n\nc = 3");
        assert_eq!(index.line_index(TextSize::new(0)), 1);
        assert_eq!(index.column_index(TextSize::new(0)), 1);
        assert_eq!(index.line_index(TextSize::new(6)), 2);
        assert_eq!(index.column_index(TextSize::new(6)), 1);
        assert_eq!(index.column_index(TextSize::new(11)), 6);
        assert_eq!(index.line_index(TextSize::new(14)), 4);
    }

    #[test]
    fn test_normalize_display_path() {
        assert_eq!(
            normalize_display_path(Path::new("./src/app.py")),
            "src/app.py"
        );
        assert_eq!(
            normalize_display_path(Path::new(".\\pkg\\mod.py")),
            "pkg/mod.py"
        );
    }
}
