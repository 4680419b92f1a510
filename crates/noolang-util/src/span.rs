//! Source positions and spans.
//!
//! Grounded on `faxc-util::span`'s byte-range `Span`, but reshaped to the
//! `(line, column)` model the Noolang language core is specified against:
//! every token and AST node records a 1-indexed `(line, column)` start and
//! end rather than a byte offset.

use std::fmt;

/// A 1-indexed `(line, column)` source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position a fresh cursor starts at.
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source range, from `start` (inclusive) to `end` (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width span at a single position, for synthetic nodes.
    pub const fn at(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    /// A span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Holds loaded source text indexed by path, used to render excerpts in
/// diagnostics (`.error-context` in the REPL) and by the module loader to
/// resolve relative import paths.
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

#[derive(Debug)]
struct SourceFile {
    path: String,
    lines: Vec<String>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source file, splitting it into lines for excerpting.
    /// Returns the index used by [`SourceMap::line`].
    pub fn add_file(&mut self, path: impl Into<String>, text: &str) -> usize {
        let lines = text.lines().map(|l| l.to_string()).collect();
        self.files.push(SourceFile { path: path.into(), lines });
        self.files.len() - 1
    }

    /// Returns the 1-indexed `line`'s text from file `file_index`.
    pub fn line(&self, file_index: usize, line: u32) -> Option<&str> {
        self.files
            .get(file_index)?
            .lines
            .get(line.saturating_sub(1) as usize)
            .map(String::as_str)
    }

    pub fn path(&self, file_index: usize) -> Option<&str> {
        self.files.get(file_index).map(|f| f.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_to_covers_both_ends() {
        let a = Span::new(Position::new(1, 1), Position::new(1, 4));
        let b = Span::new(Position::new(2, 1), Position::new(2, 6));
        let joined = a.to(b);
        assert_eq!(joined.start, Position::new(1, 1));
        assert_eq!(joined.end, Position::new(2, 6));
    }

    #[test]
    fn source_map_excerpts_by_line() {
        let mut map = SourceMap::new();
        let idx = map.add_file("main.noo", "a + b\nc * d\n");
        assert_eq!(map.line(idx, 1), Some("a + b"));
        assert_eq!(map.line(idx, 2), Some("c * d"));
        assert_eq!(map.line(idx, 3), None);
    }
}
