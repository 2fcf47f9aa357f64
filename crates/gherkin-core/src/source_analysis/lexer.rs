// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Gherkin feature files.
//!
//! The tokenizer is line-oriented: every source line classifies to exactly
//! one [`Token`], and classification is a pure function of the line, its
//! number, and a small amount of state - whether the lexer is inside a doc
//! string, which keyword dialect is active, and whether a language directive
//! would still be honored.
//!
//! # Design Principles
//!
//! - **The tokenizer never fails.** Lines that fit no rule become
//!   [`TokenKind::Other`]; the parser decides whether that is description
//!   text, doc string content, or an error.
//! - **Doc-string state is local.** While inside a doc string every line is
//!   content except the exact closing delimiter; nothing inside is
//!   interpreted as keywords.
//! - **Dialect switching.** A `# language:` directive on the first
//!   non-empty, non-comment line switches the keyword table for the rest of
//!   the input.
//!
//! # Example
//!
//! ```
//! use gherkin_core::source_analysis::{Source, TokenType, tokenize};
//!
//! let source = Source::from_string("Feature: F\n  Scenario: S\n");
//! let types: Vec<_> = tokenize(&source).iter().map(|t| t.token_type()).collect();
//! assert_eq!(
//!     types,
//!     [TokenType::FeatureLine, TokenType::ScenarioLine, TokenType::Eof]
//! );
//! ```

use ecow::{EcoString, eco_format};

use super::keywords::{HeaderKind, KeywordTable};
use super::token::{Cell, TagSpan, Token, TokenKind};
use super::{Location, Source};
use crate::ast::ScenarioKind;

/// The tokenizer's line-to-line state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerState {
    /// Ordinary classification rules apply.
    Normal,
    /// Inside a doc string opened with the given delimiter; every line is
    /// content until a line whose trimmed text equals the delimiter exactly.
    InDocString(EcoString),
}

/// A lazy tokenizer over a [`Source`].
///
/// Yields one token per line and a final [`TokenKind::Eof`] token, then
/// `None`. The iterator is cooperative: it advances only when pulled, and
/// abandoning it leaks nothing - all memory is owned by the caller's
/// `Source`.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src Source,
    next_line: usize,
    state: LexerState,
    dialect: &'static KeywordTable,
    directive_window_open: bool,
    eof_emitted: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new tokenizer for the given source.
    #[must_use]
    pub fn new(source: &'src Source) -> Self {
        Self {
            source,
            next_line: 0,
            state: LexerState::Normal,
            dialect: KeywordTable::default_table(),
            directive_window_open: true,
            eof_emitted: false,
        }
    }

    /// Returns the dialect currently in effect.
    #[must_use]
    pub fn dialect(&self) -> &'static KeywordTable {
        self.dialect
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.eof_emitted {
            return None;
        }

        let line_number = line_no(self.next_line + 1);
        if self.next_line >= self.source.line_count() {
            self.eof_emitted = true;
            return Some(Token::new(TokenKind::Eof, Location::line_only(line_number)));
        }

        let line = self.source.line(self.next_line + 1).unwrap_or("");
        let (token, next_state) = classify_line(
            line,
            line_number,
            &self.state,
            self.dialect,
            self.directive_window_open,
        );
        self.state = next_state;
        self.next_line += 1;

        match token.kind() {
            TokenKind::Language { code } => {
                if let Some(table) = KeywordTable::for_language(code) {
                    self.dialect = table;
                }
                self.directive_window_open = false;
            }
            TokenKind::Empty | TokenKind::CommentLine { .. } => {}
            _ => self.directive_window_open = false,
        }

        Some(token)
    }
}

/// Tokenizes an entire source eagerly.
///
/// The result always ends with an [`TokenKind::Eof`] token whose line is
/// `line_count + 1`. Tokenization cannot fail; malformed doc strings only
/// surface at parse time.
#[must_use]
pub fn tokenize(source: &Source) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Classifies a single line.
///
/// This is a pure function: the same inputs always produce the same token
/// and successor state. `directive_window_open` is true while no structural
/// line has been seen yet, which is the only window in which a
/// `# language:` directive is honored rather than read as a comment.
pub(crate) fn classify_line(
    line: &str,
    line_number: u32,
    state: &LexerState,
    dialect: &KeywordTable,
    directive_window_open: bool,
) -> (Token, LexerState) {
    let trimmed = line.trim_start();
    let column = column_of(line, trimmed);
    let at = |column| Location::new(line_number, column);

    // Doc-string state overrides everything except its own closer.
    if let LexerState::InDocString(delimiter) = state {
        if trimmed.trim_end() == delimiter.as_str() {
            let token = Token::new(
                TokenKind::DocStringSeparator {
                    delimiter: delimiter.clone(),
                    media_type: None,
                },
                at(column),
            );
            return (token, LexerState::Normal);
        }
        let token = Token::new(
            TokenKind::Other { text: line.into() },
            Location::line_only(line_number),
        );
        return (token, state.clone());
    }

    if trimmed.is_empty() {
        let token = Token::new(TokenKind::Empty, Location::line_only(line_number));
        return (token, LexerState::Normal);
    }

    if trimmed.starts_with('#') {
        let kind = match parse_language_directive(trimmed) {
            Some(code) if directive_window_open => TokenKind::Language { code },
            _ => TokenKind::CommentLine {
                text: trimmed.trim_end().into(),
            },
        };
        return (Token::new(kind, at(column)), LexerState::Normal);
    }

    if trimmed.starts_with('@') {
        if let Some(tags) = scan_tags(trimmed, column) {
            let token = Token::new(TokenKind::TagLine { tags }, at(column));
            return (token, LexerState::Normal);
        }
        // Malformed tag line (bare `@` or invalid tag characters).
        let token = Token::new(
            TokenKind::Other { text: line.into() },
            Location::line_only(line_number),
        );
        return (token, LexerState::Normal);
    }

    if trimmed.starts_with('|') {
        let cells = scan_cells(trimmed, column);
        let token = Token::new(TokenKind::TableRow { cells }, at(column));
        return (token, LexerState::Normal);
    }

    if trimmed.starts_with("\"\"\"") || trimmed.starts_with("```") {
        let delimiter: EcoString = trimmed[..3].into();
        let media = trimmed[3..].trim();
        let token = Token::new(
            TokenKind::DocStringSeparator {
                delimiter: delimiter.clone(),
                media_type: (!media.is_empty()).then(|| media.into()),
            },
            at(column),
        );
        return (token, LexerState::InDocString(delimiter));
    }

    if let Some((kind, form)) = dialect.match_header(trimmed) {
        let name: EcoString = trimmed[form.len() + 1..].trim().into();
        let keyword: EcoString = form.into();
        let kind = match kind {
            HeaderKind::Feature => TokenKind::FeatureLine { keyword, name },
            HeaderKind::Rule => TokenKind::RuleLine { keyword, name },
            HeaderKind::Background => TokenKind::BackgroundLine { keyword, name },
            HeaderKind::Scenario => TokenKind::ScenarioLine {
                keyword,
                name,
                kind: ScenarioKind::Scenario,
            },
            HeaderKind::ScenarioOutline => TokenKind::ScenarioLine {
                keyword,
                name,
                kind: ScenarioKind::ScenarioOutline,
            },
            HeaderKind::Examples => TokenKind::ExamplesLine { keyword, name },
        };
        return (Token::new(kind, at(column)), LexerState::Normal);
    }

    if let Some((form, keyword_type)) = dialect.match_step(trimmed) {
        let token = Token::new(
            TokenKind::StepLine {
                keyword: eco_format!("{form} "),
                keyword_type,
                text: trimmed[form.len() + 1..].trim().into(),
            },
            at(column),
        );
        return (token, LexerState::Normal);
    }

    let token = Token::new(
        TokenKind::Other { text: line.into() },
        Location::line_only(line_number),
    );
    (token, LexerState::Normal)
}

/// Returns the 1-based code-point column of `trimmed` within `line`.
fn column_of(line: &str, trimmed: &str) -> u32 {
    let leading = line.chars().count() - trimmed.chars().count();
    line_no(leading + 1)
}

fn line_no(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Parses `# language: <code>` (whitespace-tolerant). The code must match
/// `[A-Za-z][A-Za-z-]*`.
fn parse_language_directive(trimmed: &str) -> Option<EcoString> {
    let rest = trimmed.strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix("language")?.trim_start();
    let code = rest.strip_prefix(':')?.trim();
    let mut chars = code.chars();
    if !chars.next()?.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphabetic() || c == '-') {
        return None;
    }
    Some(code.into())
}

/// Splits a tag line into tags, or returns `None` when any item is not a
/// well-formed tag (which makes the whole line classify as `Other`).
fn scan_tags(trimmed: &str, first_column: u32) -> Option<Vec<TagSpan>> {
    let mut tags = Vec::new();
    let mut column = first_column;
    let mut word: Option<(u32, String)> = None;

    for c in trimmed.chars() {
        if c.is_whitespace() {
            if let Some((start, text)) = word.take() {
                tags.push(tag_span(start, &text)?);
            }
        } else if let Some((_, text)) = &mut word {
            text.push(c);
        } else {
            word = Some((column, String::from(c)));
        }
        column += 1;
    }
    if let Some((start, text)) = word {
        tags.push(tag_span(start, &text)?);
    }
    Some(tags)
}

fn tag_span(column: u32, word: &str) -> Option<TagSpan> {
    let name = word.strip_prefix('@')?;
    let well_formed = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
    well_formed.then(|| TagSpan {
        column,
        name: word.into(),
    })
}

/// Splits a table-row line into cells.
///
/// `\|` is a literal pipe, `\\` a literal backslash, and `\n` a newline; no
/// other escapes are recognized. The segment before the first `|` is always
/// empty (the line starts with `|`); the segment after the last `|` is
/// dropped when blank, per the row grammar.
fn scan_cells(trimmed: &str, first_column: u32) -> Vec<Cell> {
    let mut segments: Vec<(u32, String)> = Vec::new();
    let mut chars = trimmed.chars();
    chars.next(); // the leading '|'

    let mut column = first_column + 1;
    let mut raw = String::new();
    let mut content_column: Option<u32> = None;
    let mut segment_start = column;
    let mut escaped = false;

    for c in chars {
        if escaped {
            raw.push(c);
            escaped = false;
        } else if c == '\\' {
            content_column.get_or_insert(column);
            raw.push(c);
            escaped = true;
        } else if c == '|' {
            segments.push((
                content_column.take().unwrap_or(segment_start),
                std::mem::take(&mut raw),
            ));
            segment_start = column + 1;
        } else {
            if !c.is_whitespace() {
                content_column.get_or_insert(column);
            }
            raw.push(c);
        }
        column += 1;
    }

    // Text after the final '|' is not a closed cell; keep it only if it is
    // not blank.
    if !raw.trim().is_empty() {
        segments.push((content_column.unwrap_or(segment_start), raw));
    }

    segments
        .into_iter()
        .map(|(column, raw)| Cell {
            column,
            value: decode_cell(raw.trim()),
        })
        .collect()
}

fn decode_cell(raw: &str) -> EcoString {
    let mut out = EcoString::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('\\') => out.push('\\'),
                Some('|') => out.push('|'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
