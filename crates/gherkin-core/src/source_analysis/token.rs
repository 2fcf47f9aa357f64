// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Gherkin lexical analysis.
//!
//! The tokenizer classifies each source line into exactly one [`Token`]; a
//! final [`TokenKind::Eof`] token follows the last line. Tokens are designed
//! to be cheap to clone (using [`EcoString`] for string data) and carry a
//! [`Location`] pointing at the first significant character of the line.

use std::fmt;

use ecow::EcoString;

use crate::ast::{KeywordType, ScenarioKind};

use super::Location;

/// A classified source line (or the end-of-file marker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    location: Location,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Returns the token kind.
    #[must_use]
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Returns the token location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Returns the discriminator for this token, used in error messages.
    #[must_use]
    pub fn token_type(&self) -> TokenType {
        self.kind.token_type()
    }

    /// Returns `true` if this is the end-of-file marker.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// A single table cell as lexed, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// 1-based code-point column of the cell's first non-blank character.
    pub column: u32,
    /// The cell value: trimmed on both sides, escapes decoded.
    pub value: EcoString,
}

/// A single tag as lexed, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
    /// 1-based code-point column of the `@`.
    pub column: u32,
    /// The tag name, including the leading `@`.
    pub name: EcoString,
}

/// The kind of token, not including source location.
///
/// This is a closed sum: every source line classifies to exactly one of
/// these, and the tokenizer never fails. Lines that fit no other rule become
/// [`TokenKind::Other`], which the parser treats as description text, doc
/// string content, or a syntax error depending on context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `Feature: name` (or a localized synonym).
    FeatureLine {
        /// The matched keyword form, without the colon.
        keyword: EcoString,
        /// The trimmed remainder after the colon.
        name: EcoString,
    },

    /// `Rule: name`.
    RuleLine {
        /// The matched keyword form, without the colon.
        keyword: EcoString,
        /// The trimmed remainder after the colon.
        name: EcoString,
    },

    /// `Background: name`.
    BackgroundLine {
        /// The matched keyword form, without the colon.
        keyword: EcoString,
        /// The trimmed remainder after the colon.
        name: EcoString,
    },

    /// `Scenario: name` or `Scenario Outline: name`.
    ScenarioLine {
        /// The matched keyword form, without the colon.
        keyword: EcoString,
        /// The trimmed remainder after the colon.
        name: EcoString,
        /// Whether the keyword was a plain Scenario or an Outline form.
        kind: ScenarioKind,
    },

    /// `Examples: name`.
    ExamplesLine {
        /// The matched keyword form, without the colon.
        keyword: EcoString,
        /// The trimmed remainder after the colon.
        name: EcoString,
    },

    /// `Given text` / `When` / `Then` / `And` / `But` / `* text`.
    StepLine {
        /// The keyword including its single trailing space (`"Given "`,
        /// `"* "`).
        keyword: EcoString,
        /// The role derived from the keyword form.
        keyword_type: KeywordType,
        /// The trimmed step text.
        text: EcoString,
    },

    /// A `"""` or ```` ``` ```` line opening or closing a doc string.
    DocStringSeparator {
        /// The exact three-character delimiter.
        delimiter: EcoString,
        /// Media type after the opener, if any. Never present on a closer.
        media_type: Option<EcoString>,
    },

    /// A `| ... |` table row.
    TableRow {
        /// The decoded cells, in order.
        cells: Vec<Cell>,
    },

    /// One or more `@tag`s on a line.
    TagLine {
        /// The tags in declaration order, each beginning with `@`.
        tags: Vec<TagSpan>,
    },

    /// A `#` comment line that is not a language directive.
    CommentLine {
        /// The comment text from the `#` on, trimmed on the right.
        text: EcoString,
    },

    /// A `# language: <code>` directive.
    Language {
        /// The language code.
        code: EcoString,
    },

    /// An empty or whitespace-only line.
    Empty,

    /// Any line that fits no other rule, kept verbatim.
    Other {
        /// The raw line, including leading whitespace.
        text: EcoString,
    },

    /// End of input; its line is `line_count + 1`.
    Eof,
}

impl TokenKind {
    /// Returns the discriminator for this kind.
    #[must_use]
    pub fn token_type(&self) -> TokenType {
        match self {
            Self::FeatureLine { .. } => TokenType::FeatureLine,
            Self::RuleLine { .. } => TokenType::RuleLine,
            Self::BackgroundLine { .. } => TokenType::BackgroundLine,
            Self::ScenarioLine { .. } => TokenType::ScenarioLine,
            Self::ExamplesLine { .. } => TokenType::ExamplesLine,
            Self::StepLine { .. } => TokenType::StepLine,
            Self::DocStringSeparator { .. } => TokenType::DocStringSeparator,
            Self::TableRow { .. } => TokenType::TableRow,
            Self::TagLine { .. } => TokenType::TagLine,
            Self::CommentLine { .. } => TokenType::CommentLine,
            Self::Language { .. } => TokenType::Language,
            Self::Empty => TokenType::Empty,
            Self::Other { .. } => TokenType::Other,
            Self::Eof => TokenType::Eof,
        }
    }
}

/// A payload-free discriminator for [`TokenKind`], used in expected-token
/// lists and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A `Feature:` header line.
    FeatureLine,
    /// A `Rule:` header line.
    RuleLine,
    /// A `Background:` header line.
    BackgroundLine,
    /// A `Scenario:` or `Scenario Outline:` header line.
    ScenarioLine,
    /// An `Examples:` header line.
    ExamplesLine,
    /// A step line.
    StepLine,
    /// A doc string opener or closer.
    DocStringSeparator,
    /// A table row.
    TableRow,
    /// A tag line.
    TagLine,
    /// A comment line.
    CommentLine,
    /// A language directive.
    Language,
    /// An empty line.
    Empty,
    /// Free text.
    Other,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FeatureLine => "feature-line",
            Self::RuleLine => "rule-line",
            Self::BackgroundLine => "background-line",
            Self::ScenarioLine => "scenario-line",
            Self::ExamplesLine => "examples-line",
            Self::StepLine => "step-line",
            Self::DocStringSeparator => "doc-string-separator",
            Self::TableRow => "table-row",
            Self::TagLine => "tag-line",
            Self::CommentLine => "comment-line",
            Self::Language => "language",
            Self::Empty => "empty",
            Self::Other => "other",
            Self::Eof => "eof",
        };
        f.write_str(name)
    }
}
