// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Gherkin feature files.
//!
//! The parser consumes the token stream produced by the
//! [tokenizer](super::lexer) and builds a [`GherkinDocument`]. It stops at
//! the first fatal error: no partial AST is ever returned, and every error
//! carries the exact source location it was raised at.
//!
//! # Design contracts
//!
//! - **Tags attach forward.** A tag line belongs to the next Feature, Rule,
//!   Scenario, or Examples section; consecutive tag lines accumulate. Tags
//!   with nothing to attach to are an error.
//! - **Comments are transparent.** Comment lines anywhere outside doc
//!   strings are collected into the document in source order and never
//!   interrupt a production.
//! - **Ids are assigned in one pre-order pass** as source elements are
//!   consumed: a single counter covers tags, backgrounds, scenarios, rules,
//!   steps, examples sections, and table rows.
//!
//! # Usage
//!
//! ```
//! use gherkin_core::source_analysis::{Source, parse};
//!
//! let source = Source::from_string("Feature: Minimal\n  Scenario: One\n    Given a step\n");
//! let document = parse(&source).unwrap();
//! assert_eq!(document.feature.unwrap().name, "Minimal");
//! ```

use ecow::{EcoString, eco_format};

use crate::ast::{
    Background, Comment, DataTable, DocString, Examples, Feature, FeatureChild, GherkinDocument,
    Rule, RuleChild, Scenario, ScenarioKind, Step, StepArgument, TableCell, TableRow, Tag,
};

use super::error::{ParseError, ParseErrors};
use super::keywords::KeywordTable;
use super::lexer::tokenize;
use super::token::{Token, TokenKind, TokenType};
use super::{Location, Source};

/// Parses a source into a [`GherkinDocument`].
///
/// This is the main entry point. The parser stops at the first fatal error;
/// the error is returned wrapped in a one-element [`ParseErrors`] list for
/// API uniformity with future resilient modes.
pub fn parse(source: &Source) -> Result<GherkinDocument, ParseErrors> {
    let mut parser = Parser::new(tokenize(source));
    let feature = parser.parse_document().map_err(ParseErrors::from)?;
    Ok(GherkinDocument {
        source: source.clone(),
        feature,
        comments: parser.comments,
    })
}

/// Allocates the stable, monotone ids carried by addressable AST nodes.
///
/// The counter starts at 0 for each parse and increments once per entity,
/// so identical input always produces identical ids.
#[derive(Debug, Default)]
struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    fn next_id(&mut self) -> EcoString {
        let id = eco_format!("{}", self.next);
        self.next += 1;
        id
    }
}

/// The parser state.
struct Parser {
    tokens: Vec<Token>,
    current: usize,
    ids: IdGenerator,
    comments: Vec<Comment>,
    pending_tags: Vec<Tag>,
    pending_tags_from: Option<Location>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            ids: IdGenerator::default(),
            comments: Vec::new(),
            pending_tags: Vec::new(),
            pending_tags_from: None,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token.
    fn current_token(&self) -> &Token {
        self.tokens
            .get(self.current)
            .or_else(|| self.tokens.last())
            .expect("token stream always ends with an Eof token")
    }

    /// Returns the current token kind.
    fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Advances to the next token unless already at end of input.
    fn advance(&mut self) {
        if !self.current_token().is_eof() {
            self.current += 1;
        }
    }

    /// Builds an unexpected-token error at the current position.
    fn unexpected(&self, expected: impl Into<Vec<TokenType>>) -> ParseError {
        ParseError::unexpected_token(
            expected,
            self.current_token().token_type(),
            self.current_token().location(),
        )
    }

    /// Consumes comment lines (collecting them) without touching anything
    /// else.
    fn skip_comments(&mut self) {
        while let TokenKind::CommentLine { text } = self.current_kind() {
            let comment = Comment {
                location: self.current_token().location(),
                text: text.clone(),
            };
            self.comments.push(comment);
            self.advance();
        }
    }

    /// Consumes empty lines and comment lines.
    fn skip_insignificant(&mut self) {
        loop {
            match self.current_kind() {
                TokenKind::Empty => self.advance(),
                TokenKind::CommentLine { .. } => self.skip_comments(),
                _ => break,
            }
        }
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Accumulates tag lines into the pending buffer. Tags attach to the
    /// next taggable element; the buffer is drained by whichever production
    /// consumes it.
    fn parse_tags(&mut self) {
        while let TokenKind::TagLine { tags } = self.current_kind() {
            let line = self.current_token().location().line();
            let spans = tags.clone();
            if self.pending_tags_from.is_none() {
                self.pending_tags_from = Some(self.current_token().location());
            }
            for span in spans {
                let tag = Tag {
                    location: Location::new(line, span.column),
                    name: span.name,
                    id: self.ids.next_id(),
                };
                self.pending_tags.push(tag);
            }
            self.advance();
            self.skip_insignificant();
        }
    }

    /// Drains the pending tag buffer for the element being built.
    fn take_tags(&mut self) -> Vec<Tag> {
        self.pending_tags_from = None;
        std::mem::take(&mut self.pending_tags)
    }

    /// Errors out if tags are pending with nothing to attach to.
    fn reject_pending_tags(&mut self) -> Result<(), ParseError> {
        if self.pending_tags.is_empty() {
            return Ok(());
        }
        let location = self
            .pending_tags_from
            .unwrap_or_else(|| self.current_token().location());
        Err(ParseError::orphan_tags(location))
    }

    // ========================================================================
    // Document
    // ========================================================================

    fn parse_document(&mut self) -> Result<Option<Feature>, ParseError> {
        self.skip_insignificant();
        let language = self.parse_language()?;
        self.skip_insignificant();
        self.parse_tags();

        match self.current_kind() {
            TokenKind::FeatureLine { .. } => Ok(Some(self.parse_feature(language)?)),
            TokenKind::Eof => {
                self.reject_pending_tags()?;
                Ok(None)
            }
            _ => Err(ParseError::missing_feature(self.current_token().location())),
        }
    }

    /// Consumes a `# language:` directive if one leads the document.
    fn parse_language(&mut self) -> Result<EcoString, ParseError> {
        if let TokenKind::Language { code } = self.current_kind() {
            let code = code.clone();
            let location = self.current_token().location();
            if KeywordTable::for_language(&code).is_none() {
                return Err(ParseError::unknown_language(code, location));
            }
            self.advance();
            Ok(code)
        } else {
            Ok("en".into())
        }
    }

    fn parse_feature(&mut self, language: EcoString) -> Result<Feature, ParseError> {
        let (keyword, name) = match self.current_kind() {
            TokenKind::FeatureLine { keyword, name } => (keyword.clone(), name.clone()),
            _ => return Err(self.unexpected([TokenType::FeatureLine])),
        };
        let location = self.current_token().location();
        let tags = self.take_tags();
        self.advance();

        let description = self.parse_description();

        let mut children = Vec::new();
        loop {
            self.skip_insignificant();
            self.parse_tags();
            match self.current_kind() {
                TokenKind::BackgroundLine { .. } => {
                    self.reject_pending_tags()?;
                    children.push(FeatureChild::Background(self.parse_background()?));
                }
                TokenKind::ScenarioLine { .. } => {
                    children.push(FeatureChild::Scenario(self.parse_scenario()?));
                }
                TokenKind::RuleLine { .. } => {
                    children.push(FeatureChild::Rule(self.parse_rule()?));
                }
                TokenKind::Eof => {
                    self.reject_pending_tags()?;
                    break;
                }
                _ => {
                    return Err(self.unexpected([
                        TokenType::BackgroundLine,
                        TokenType::ScenarioLine,
                        TokenType::RuleLine,
                        TokenType::Eof,
                    ]));
                }
            }
        }

        Ok(Feature {
            location,
            tags,
            language,
            keyword,
            name,
            description,
            children,
        })
    }

    // ========================================================================
    // Sections
    // ========================================================================

    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        let (keyword, name) = match self.current_kind() {
            TokenKind::RuleLine { keyword, name } => (keyword.clone(), name.clone()),
            _ => return Err(self.unexpected([TokenType::RuleLine])),
        };
        let location = self.current_token().location();
        let tags = self.take_tags();
        let id = self.ids.next_id();
        self.advance();

        let description = self.parse_description();

        let mut children = Vec::new();
        loop {
            self.skip_insignificant();
            self.parse_tags();
            match self.current_kind() {
                TokenKind::BackgroundLine { .. } => {
                    self.reject_pending_tags()?;
                    children.push(RuleChild::Background(self.parse_background()?));
                }
                TokenKind::ScenarioLine { .. } => {
                    children.push(RuleChild::Scenario(self.parse_scenario()?));
                }
                // A sibling rule or the end of the feature: hand control back.
                TokenKind::RuleLine { .. } | TokenKind::Eof => break,
                _ => {
                    return Err(self.unexpected([
                        TokenType::BackgroundLine,
                        TokenType::ScenarioLine,
                        TokenType::RuleLine,
                        TokenType::Eof,
                    ]));
                }
            }
        }

        Ok(Rule {
            location,
            tags,
            keyword,
            name,
            description,
            id,
            children,
        })
    }

    fn parse_background(&mut self) -> Result<Background, ParseError> {
        let (keyword, name) = match self.current_kind() {
            TokenKind::BackgroundLine { keyword, name } => (keyword.clone(), name.clone()),
            _ => return Err(self.unexpected([TokenType::BackgroundLine])),
        };
        let location = self.current_token().location();
        let id = self.ids.next_id();
        self.advance();

        let description = self.parse_description();
        let steps = self.parse_steps()?;

        Ok(Background {
            location,
            keyword,
            name,
            description,
            id,
            steps,
        })
    }

    fn parse_scenario(&mut self) -> Result<Scenario, ParseError> {
        let (keyword, name, kind) = match self.current_kind() {
            TokenKind::ScenarioLine {
                keyword,
                name,
                kind,
            } => (keyword.clone(), name.clone(), *kind),
            _ => return Err(self.unexpected([TokenType::ScenarioLine])),
        };
        let location = self.current_token().location();
        let tags = self.take_tags();
        let id = self.ids.next_id();
        self.advance();

        let description = self.parse_description();
        let steps = self.parse_steps()?;

        let mut examples = Vec::new();
        loop {
            self.skip_insignificant();
            self.parse_tags();
            match self.current_kind() {
                TokenKind::ExamplesLine { .. } => {
                    if kind != ScenarioKind::ScenarioOutline {
                        return Err(ParseError::examples_under_non_outline(
                            self.current_token().location(),
                        ));
                    }
                    examples.push(self.parse_examples()?);
                }
                // Anything else ends the scenario; pending tags belong to
                // whatever follows.
                _ => break,
            }
        }

        Ok(Scenario {
            location,
            tags,
            kind,
            keyword,
            name,
            description,
            id,
            steps,
            examples,
        })
    }

    fn parse_examples(&mut self) -> Result<Examples, ParseError> {
        let (keyword, name) = match self.current_kind() {
            TokenKind::ExamplesLine { keyword, name } => (keyword.clone(), name.clone()),
            _ => return Err(self.unexpected([TokenType::ExamplesLine])),
        };
        let location = self.current_token().location();
        let tags = self.take_tags();
        let id = self.ids.next_id();
        self.advance();

        let description = self.parse_description();

        let mut table_header = None;
        let mut table_body = Vec::new();
        self.skip_comments();
        if matches!(self.current_kind(), TokenKind::TableRow { .. }) {
            let header = self.parse_table_row(None)?;
            let width = header.cells.len();
            table_header = Some(header);
            loop {
                self.skip_comments();
                if matches!(self.current_kind(), TokenKind::TableRow { .. }) {
                    table_body.push(self.parse_table_row(Some(width))?);
                } else {
                    break;
                }
            }
        }

        Ok(Examples {
            location,
            tags,
            keyword,
            name,
            description,
            id,
            table_header,
            table_body,
        })
    }

    // ========================================================================
    // Steps and Arguments
    // ========================================================================

    fn parse_steps(&mut self) -> Result<Vec<Step>, ParseError> {
        let mut steps = Vec::new();
        loop {
            self.skip_insignificant();
            if matches!(self.current_kind(), TokenKind::StepLine { .. }) {
                steps.push(self.parse_step()?);
            } else {
                break;
            }
        }
        Ok(steps)
    }

    fn parse_step(&mut self) -> Result<Step, ParseError> {
        let (keyword, keyword_type, text) = match self.current_kind() {
            TokenKind::StepLine {
                keyword,
                keyword_type,
                text,
            } => (keyword.clone(), *keyword_type, text.clone()),
            _ => return Err(self.unexpected([TokenType::StepLine])),
        };
        let location = self.current_token().location();
        let id = self.ids.next_id();
        self.advance();

        let argument = self.parse_step_argument()?;

        Ok(Step {
            location,
            keyword,
            keyword_type,
            text,
            id,
            argument,
        })
    }

    /// Parses the optional step argument. A doc string may be separated from
    /// its step by empty lines; a data table must follow immediately - an
    /// intervening empty line means the step has no argument.
    fn parse_step_argument(&mut self) -> Result<Option<StepArgument>, ParseError> {
        self.skip_comments();
        match self.current_kind() {
            TokenKind::DocStringSeparator { .. } => {
                Ok(Some(StepArgument::DocString(self.parse_doc_string()?)))
            }
            TokenKind::TableRow { .. } => {
                Ok(Some(StepArgument::DataTable(self.parse_data_table()?)))
            }
            TokenKind::Empty if self.doc_string_follows() => {
                self.skip_insignificant();
                Ok(Some(StepArgument::DocString(self.parse_doc_string()?)))
            }
            _ => Ok(None),
        }
    }

    /// Looks past empty and comment lines for a doc string opener, without
    /// consuming anything.
    fn doc_string_follows(&self) -> bool {
        let mut index = self.current;
        while let Some(token) = self.tokens.get(index) {
            match token.kind() {
                TokenKind::Empty | TokenKind::CommentLine { .. } => index += 1,
                TokenKind::DocStringSeparator { .. } => return true,
                _ => return false,
            }
        }
        false
    }

    fn parse_doc_string(&mut self) -> Result<DocString, ParseError> {
        let (delimiter, media_type) = match self.current_kind() {
            TokenKind::DocStringSeparator {
                delimiter,
                media_type,
            } => (delimiter.clone(), media_type.clone()),
            _ => return Err(self.unexpected([TokenType::DocStringSeparator])),
        };
        let location = self.current_token().location();
        let indent = location
            .column()
            .map_or(0, |column| column.saturating_sub(1));
        let indent = usize::try_from(indent).unwrap_or(usize::MAX);
        self.advance();

        let mut lines: Vec<EcoString> = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Other { text } => {
                    lines.push(strip_indent(text, indent).into());
                    self.advance();
                }
                TokenKind::DocStringSeparator { .. } => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => return Err(ParseError::unterminated_doc_string(location)),
                _ => {
                    return Err(
                        self.unexpected([TokenType::Other, TokenType::DocStringSeparator])
                    );
                }
            }
        }

        let content = join_lines(&lines);

        Ok(DocString {
            location,
            media_type,
            content,
            delimiter,
        })
    }

    fn parse_data_table(&mut self) -> Result<DataTable, ParseError> {
        let location = self.current_token().location();
        let mut rows: Vec<TableRow> = Vec::new();
        let mut width = None;
        loop {
            self.skip_comments();
            if matches!(self.current_kind(), TokenKind::TableRow { .. }) {
                let row = self.parse_table_row(width)?;
                width = Some(row.cells.len());
                rows.push(row);
            } else {
                break;
            }
        }
        Ok(DataTable { location, rows })
    }

    /// Consumes one table row, checking it against the expected width when
    /// one is already established.
    fn parse_table_row(&mut self, expected_width: Option<usize>) -> Result<TableRow, ParseError> {
        let cells = match self.current_kind() {
            TokenKind::TableRow { cells } => cells.clone(),
            _ => return Err(self.unexpected([TokenType::TableRow])),
        };
        let location = self.current_token().location();
        if let Some(expected) = expected_width {
            if cells.len() != expected {
                return Err(ParseError::inconsistent_table_cells(
                    expected,
                    cells.len(),
                    location,
                ));
            }
        }
        let id = self.ids.next_id();
        let line = location.line();
        let cells = cells
            .into_iter()
            .map(|cell| TableCell {
                location: Location::new(line, cell.column),
                value: cell.value,
            })
            .collect();
        self.advance();
        Ok(TableRow {
            location,
            id,
            cells,
        })
    }

    // ========================================================================
    // Descriptions
    // ========================================================================

    /// Collects the free-text description between a header and the next
    /// structural token. Leading and trailing blank lines are trimmed,
    /// interior blank lines and left whitespace are preserved.
    fn parse_description(&mut self) -> EcoString {
        let mut lines: Vec<EcoString> = Vec::new();
        loop {
            match self.current_kind() {
                TokenKind::Other { text } => {
                    lines.push(text.trim_end().into());
                    self.advance();
                }
                TokenKind::Empty => {
                    lines.push(EcoString::new());
                    self.advance();
                }
                TokenKind::CommentLine { .. } => self.skip_comments(),
                _ => break,
            }
        }

        while lines.first().is_some_and(|line| line.is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        join_lines(&lines)
    }
}

/// Joins collected lines with `\n`; no lines yields the empty string.
fn join_lines(lines: &[EcoString]) -> EcoString {
    let mut joined = EcoString::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.push_str(line);
    }
    joined
}

/// Strips up to `indent` leading blanks from a doc string content line;
/// shorter indentation is removed as far as it goes.
fn strip_indent(line: &str, indent: usize) -> &str {
    let mut remaining = line;
    let mut stripped = 0;
    while stripped < indent {
        match remaining.as_bytes().first() {
            Some(b' ' | b'\t') => {
                remaining = &remaining[1..];
                stripped += 1;
            }
            _ => break,
        }
    }
    remaining
}
