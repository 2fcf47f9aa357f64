// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Gherkin parser and writer.
//!
//! Errors carry source locations ([`Location`]) for precise diagnostics and
//! integrate with [`miette`] for reporting. The taxonomy is closed: the
//! parser raises exactly the kinds in [`ParseErrorKind`], and the writer
//! raises [`WriteError`] only when handed a tree that violates the AST
//! invariants (which the parser never produces).

use std::fmt;

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::{Location, TokenType};

/// A fatal parse error with its location.
///
/// The parser stops at the first such error; no partial AST is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{location}: {kind}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong.
    pub location: Location,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ParseErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected_token(
        expected: impl Into<Vec<TokenType>>,
        got: TokenType,
        location: Location,
    ) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken {
                expected: ExpectedTokens(expected.into()),
                got,
            },
            location,
        )
    }

    /// Creates a "missing feature" error for structural content that
    /// precedes any `Feature:` line.
    #[must_use]
    pub fn missing_feature(location: Location) -> Self {
        Self::new(ParseErrorKind::MissingFeature, location)
    }

    /// Creates an "unterminated doc string" error at the opening delimiter.
    #[must_use]
    pub fn unterminated_doc_string(opened_at: Location) -> Self {
        Self::new(ParseErrorKind::UnterminatedDocString, opened_at)
    }

    /// Creates an "inconsistent table cells" error at the offending row.
    #[must_use]
    pub fn inconsistent_table_cells(expected: usize, got: usize, location: Location) -> Self {
        Self::new(
            ParseErrorKind::InconsistentTableCells { expected, got },
            location,
        )
    }

    /// Creates an "unknown language" error at the directive.
    #[must_use]
    pub fn unknown_language(code: impl Into<EcoString>, location: Location) -> Self {
        Self::new(ParseErrorKind::UnknownLanguage { code: code.into() }, location)
    }

    /// Creates an "orphan tags" error at the first unattached tag.
    #[must_use]
    pub fn orphan_tags(location: Location) -> Self {
        Self::new(ParseErrorKind::OrphanTags, location)
    }

    /// Creates an error for an `Examples:` section under a plain Scenario.
    #[must_use]
    pub fn examples_under_non_outline(location: Location) -> Self {
        Self::new(ParseErrorKind::ExamplesUnderNonOutline, location)
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The parser state expected a different class of token.
    #[error("expected {expected}, got {got}")]
    UnexpectedToken {
        /// The token kinds that would have been accepted here.
        expected: ExpectedTokens,
        /// What was actually found.
        got: TokenType,
    },

    /// Structural content before any `Feature:` line.
    #[error("a feature file must start with a Feature declaration")]
    MissingFeature,

    /// End of input while inside a doc string.
    #[error("doc string opened here is never closed")]
    UnterminatedDocString,

    /// A table row whose cell count differs from the rest of its table.
    #[error("inconsistent cell count within the table: expected {expected}, got {got}")]
    InconsistentTableCells {
        /// The cell count established by the table's first row.
        expected: usize,
        /// The cell count of the offending row.
        got: usize,
    },

    /// A `# language:` directive naming a code absent from the keyword
    /// table.
    #[error("unknown language: {code}")]
    UnknownLanguage {
        /// The unrecognized code.
        code: EcoString,
    },

    /// A tag line with no taggable element to attach to.
    #[error("tags are not attached to a Feature, Rule, Scenario, or Examples")]
    OrphanTags,

    /// An `Examples:` section under a Scenario that is not an outline.
    #[error("Examples sections are only allowed under a Scenario Outline")]
    ExamplesUnderNonOutline,
}

/// The token kinds an [`ParseErrorKind::UnexpectedToken`] would have
/// accepted, rendered comma-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedTokens(pub Vec<TokenType>);

impl fmt::Display for ExpectedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token_type) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{token_type}")?;
        }
        Ok(())
    }
}

/// One or more parse errors, as returned by the parse facade.
///
/// The current parser stops at the first fatal error, so this wraps a single
/// primary error into a one-element list; the list shape leaves room for
/// resilient parsing to collect several.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{}", render(.0))]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    /// Returns the errors in order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no errors (never the case for a value
    /// returned by the parse facade).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self(vec![error])
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn render(errors: &[ParseError]) -> String {
    match errors {
        [single] => single.to_string(),
        many => {
            let mut out = format!("{} parse errors:", many.len());
            for error in many {
                out.push_str("\n  ");
                out.push_str(&error.to_string());
            }
            out
        }
    }
}

/// An error raised by the writer when handed a tree that violates the AST
/// invariants.
///
/// The parser never produces such trees; these catch consumer code that
/// builds ASTs by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum WriteError {
    /// Table rows with differing cell counts, or a body row that does not
    /// match the examples header.
    #[error("malformed tree: table row has {got} cells where {expected} were expected")]
    InconsistentTableCells {
        /// The cell count established by the table's first row or header.
        expected: usize,
        /// The cell count of the offending row.
        got: usize,
    },

    /// A step keyword that does not end in exactly one trailing space.
    #[error("malformed tree: step keyword {keyword:?} must end with a single trailing space")]
    MalformedStepKeyword {
        /// The offending keyword.
        keyword: EcoString,
    },

    /// A doc string delimiter other than `"""` or ```` ``` ````.
    #[error("malformed tree: {delimiter:?} is not a doc string delimiter")]
    MalformedDelimiter {
        /// The offending delimiter.
        delimiter: EcoString,
    },

    /// A feature language absent from the keyword table.
    #[error("malformed tree: unknown language {code:?}")]
    UnknownLanguage {
        /// The offending code.
        code: EcoString,
    },
}
