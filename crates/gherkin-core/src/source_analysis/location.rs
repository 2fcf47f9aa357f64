// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token and AST node carries a [`Location`] indicating its position in
//! the feature file. This enables precise error messages and lets consumers
//! correlate nodes back to source lines.

use std::fmt;

/// A position in a feature file: a 1-based line and an optional 1-based
/// column.
///
/// Columns count Unicode code points, not bytes, and refer to the first
/// significant character of the construct (the `@` of a tag, the `|` of a
/// table row, the keyword of a header line). Tokens that span a whole line
/// with no meaningful anchor (empty lines, end of file) carry no column.
///
/// Locations order lexicographically by `(line, column)`, with an absent
/// column sorting before any present one on the same line.
///
/// # Examples
///
/// ```
/// use gherkin_core::source_analysis::Location;
///
/// let loc = Location::new(3, 5);
/// assert_eq!(loc.line(), 3);
/// assert_eq!(loc.column(), Some(5));
/// assert_eq!(loc.to_string(), "line 3, column 5");
/// assert!(Location::line_only(3) < loc);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    line: u32,
    column: Option<u32>,
}

impl Location {
    /// Creates a location with both line and column.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }

    /// Creates a location with a line but no column.
    #[must_use]
    pub const fn line_only(line: u32) -> Self {
        Self { line, column: None }
    }

    /// Returns the 1-based line number.
    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    /// Returns the 1-based code-point column, if the location has one.
    #[must_use]
    pub const fn column(self) -> Option<u32> {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "line {}, column {column}", self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let loc = Location::new(7, 12);
        assert_eq!(loc.line(), 7);
        assert_eq!(loc.column(), Some(12));

        let loc = Location::line_only(7);
        assert_eq!(loc.column(), None);
    }

    #[test]
    fn display_with_and_without_column() {
        assert_eq!(Location::new(5, 3).to_string(), "line 5, column 3");
        assert_eq!(Location::line_only(5).to_string(), "line 5");
    }

    #[test]
    fn lexicographic_order() {
        assert!(Location::new(1, 9) < Location::new(2, 1));
        assert!(Location::new(2, 1) < Location::new(2, 4));
        // No column sorts before any column on the same line.
        assert!(Location::line_only(2) < Location::new(2, 1));
    }
}
