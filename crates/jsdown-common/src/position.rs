//! Position utilities.
//!
//! Syntax nodes carry byte offsets; diagnostics and tooling want line/column
//! positions. `LineMap` converts between the two.

/// A position in a source file (0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column, in bytes from the line start
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Line map for offset <-> position conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (line_starts[0] is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];

        for i in memchr::memchr2_iter(b'\n', b'\r', bytes) {
            // \r\n counts once, at the \n
            if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                continue;
            }
            line_starts.push((i + 1) as u32);
        }

        LineMap { line_starts }
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to the
    /// last line.
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);

        Position {
            line: line as u32,
            column: offset.saturating_sub(line_start),
        }
    }

    /// Convert a position back to a byte offset.
    pub fn position_to_offset(&self, position: Position) -> Option<u32> {
        let line_start = *self.line_starts.get(position.line as usize)?;
        Some(line_start + position.column)
    }

    /// Get the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a line.
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}
