//! Source location tracking
//!
//! Positions count characters, not bytes: every input source in this crate is
//! a stream of `char`s and the tokenizer never sees the underlying encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and character offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Character offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position by one character
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            },
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Placeholder span for tokens that were not produced from source text
    pub fn dummy() -> Self {
        Self {
            start: Position::start(),
            end: Position::start(),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a source text, used to render diagnostics
#[derive(Debug, Clone)]
pub struct SourceMap {
    lines: Vec<String>,
}

impl SourceMap {
    pub fn new(source: &str) -> Self {
        Self {
            lines: source
                .split('\n')
                .map(|line| line.trim_end_matches('\r').to_string())
                .collect(),
        }
    }

    /// Get a line of text by line number (1-based)
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        if line_num == 0 {
            return None;
        }
        self.lines
            .get((line_num - 1) as usize)
            .map(|line| line.as_str())
    }

    /// Format an error message with the offending line and a caret underline
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("Error: {}\n", message));
        result.push_str(&format!(
            "  --> {}:{}\n",
            span.start.line, span.start.column
        ));

        if let Some(line) = self.get_line(span.start.line) {
            let line_num_str = format!("{}", span.start.line);
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let mut underline = format!("{} | ", padding);
            for _ in 1..span.start.column {
                underline.push(' ');
            }

            let line_len = line.chars().count() as u32;
            let caret_count = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column)
            } else {
                line_len.saturating_sub(span.start.column - 1)
            };

            for _ in 0..caret_count.max(1) {
                underline.push('^');
            }

            result.push_str(&underline);
            result.push('\n');
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance_tracks_lines() {
        let pos = "ab\nc".chars().fold(Position::start(), Position::advance);
        assert_eq!(pos, Position::new(4, 2, 2));
    }

    #[test]
    fn test_position_counts_chars_not_bytes() {
        let pos = Position::start().advance('λ');
        assert_eq!(pos.offset, 1);
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn test_span_len_and_display() {
        let span = Span::new(Position::new(0, 1, 1), Position::new(6, 1, 7));
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert_eq!(span.to_string(), "1:1-7");
        assert!(Span::dummy().is_empty());
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("ab &&\nxy");
        let span = Span::new(Position::new(3, 1, 4), Position::new(5, 1, 6));
        let rendered = map.format_error(&span, "boom");
        assert!(rendered.starts_with("Error: boom\n  --> 1:4\n"));
        assert!(rendered.contains("1 | ab &&\n"));
        assert!(rendered.ends_with("  |    ^^\n"));
    }

    #[test]
    fn test_get_line_bounds() {
        let map = SourceMap::new("one\r\ntwo");
        assert_eq!(map.get_line(1), Some("one"));
        assert_eq!(map.get_line(2), Some("two"));
        assert_eq!(map.get_line(0), None);
        assert_eq!(map.get_line(3), None);
    }
}
