// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Input wrapper for feature-file text.
//!
//! [`Source`] owns the raw text of a feature file together with an optional
//! URI and a precomputed line index. The tokenizer works line by line, so the
//! index is built once up front; every later lookup is O(1).

use ecow::EcoString;

/// An immutable feature-file input.
///
/// Both `\n` and `\r\n` terminate lines. A trailing terminator does not
/// create an extra empty line, and empty input has zero lines.
///
/// # Examples
///
/// ```
/// use gherkin_core::source_analysis::Source;
///
/// let source = Source::from_string("Feature: A\n  Scenario: B\n");
/// assert_eq!(source.line_count(), 2);
/// assert_eq!(source.line(1), Some("Feature: A"));
/// assert_eq!(source.line(3), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    uri: Option<EcoString>,
    text: EcoString,
    lines: Vec<EcoString>,
}

impl Source {
    /// Creates a source from in-memory text, with no URI.
    #[must_use]
    pub fn from_string(text: impl Into<EcoString>) -> Self {
        let text = text.into();
        let lines = split_lines(&text);
        Self {
            uri: None,
            text,
            lines,
        }
    }

    /// Creates a source from in-memory text with an associated URI.
    ///
    /// The URI is opaque to the parser; it is carried through to the
    /// resulting document for consumers that report per-file results.
    #[must_use]
    pub fn with_uri(text: impl Into<EcoString>, uri: impl Into<EcoString>) -> Self {
        let mut source = Self::from_string(text);
        source.uri = Some(uri.into());
        source
    }

    /// Returns the URI this source was created with, if any.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Returns the raw text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the 1-based line `n` without its terminator, or `None` when
    /// `n` is out of range (including `n == 0`).
    #[must_use]
    pub fn line(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(EcoString::as_str)
    }
}

fn split_lines(text: &str) -> Vec<EcoString> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<EcoString> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).into())
        .collect();
    if text.ends_with('\n') {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_lines() {
        let source = Source::from_string("");
        assert_eq!(source.line_count(), 0);
        assert_eq!(source.line(1), None);
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        let source = Source::from_string("a\nb\n");
        assert_eq!(source.line_count(), 2);
        assert_eq!(source.line(2), Some("b"));
    }

    #[test]
    fn missing_trailing_newline() {
        let source = Source::from_string("a\nb");
        assert_eq!(source.line_count(), 2);
        assert_eq!(source.line(2), Some("b"));
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let source = Source::from_string("a\r\nb\r\n");
        assert_eq!(source.line_count(), 2);
        assert_eq!(source.line(1), Some("a"));
        assert_eq!(source.line(2), Some("b"));
    }

    #[test]
    fn interior_empty_lines_are_kept() {
        let source = Source::from_string("a\n\nb\n");
        assert_eq!(source.line_count(), 3);
        assert_eq!(source.line(2), Some(""));
    }

    #[test]
    fn line_zero_is_none() {
        let source = Source::from_string("a\n");
        assert_eq!(source.line(0), None);
    }

    #[test]
    fn uri_is_carried() {
        let source = Source::with_uri("Feature: F\n", "features/login.feature");
        assert_eq!(source.uri(), Some("features/login.feature"));
        assert_eq!(Source::from_string("x").uri(), None);
    }
}
