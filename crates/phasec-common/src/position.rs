//! Source positions.
//!
//! Every parse-tree node, checked-tree node, and diagnostic in this workspace
//! carries a `Position`: a file path plus a 1-indexed line/column pair, which
//! is what a terminal-friendly `src:line:column` error format needs. The
//! external parser is responsible for producing these; this crate only models the
//! shape and the byte-offset -> line/column conversion a driver needs when
//! all it has from the parser is an offset.

use serde::{Deserialize, Serialize};

/// A position in a source file (1-indexed line and column, matching the
/// conventional `file:line:col` diagnostic format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// A position with no useful source location, used for synthetic nodes
    /// introduced by a transform or the lowerer.
    #[must_use]
    pub fn synthetic() -> Self {
        Self {
            file: String::new(),
            line: 0,
            column: 0,
        }
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Maps byte offsets to 1-indexed line/column pairs for a single file.
///
/// External parsers that only track byte offsets can build one of these
/// once per file and use it to produce `Position`s for diagnostics.
#[derive(Debug, Clone)]
pub struct LineIndex {
    file: String,
    line_starts: Vec<u32>,
}

impl LineIndex {
    #[must_use]
    pub fn build(file: impl Into<String>, source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        Self {
            file: file.into(),
            line_starts,
        }
    }

    #[must_use]
    pub fn position_at(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        Position::new(
            self.file.clone(),
            u32::try_from(line + 1).unwrap_or(u32::MAX),
            offset.saturating_sub(line_start) + 1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_first_column() {
        let index = LineIndex::build("a.ph", "const x = 1\nconst y = 2\n");
        assert_eq!(index.position_at(0), Position::new("a.ph", 1, 1));
    }

    #[test]
    fn second_line_offset() {
        let index = LineIndex::build("a.ph", "const x = 1\nconst y = 2\n");
        // offset 12 is the 'c' of the second `const`
        assert_eq!(index.position_at(12), Position::new("a.ph", 2, 1));
    }

    #[test]
    fn display_format_matches_src_line_column() {
        let pos = Position::new("a.ph", 3, 7);
        assert_eq!(pos.to_string(), "a.ph:3:7");
    }
}
