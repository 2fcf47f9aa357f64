// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! AST writer: converts a [`GherkinDocument`] back to feature-file text.
//!
//! The writer is the inverse of the parser up to canonical spacing: it
//! always emits two-space indentation per nesting level, aligns table
//! columns, puts feature and rule tags one per line, scenario and examples
//! tags on a single line, and separates sections with one blank line. Doc
//! strings are re-emitted with their original delimiter and media type;
//! descriptions are written verbatim.
//!
//! Comments are interleaved by source line: each comment is printed on its
//! own line immediately before the first emitted line whose source location
//! is not less than the comment's.
//!
//! Any input that parses successfully round-trips: parsing the written text
//! yields a structurally equal tree (locations and cell padding aside), and
//! writing is idempotent from then on.
//!
//! The writer validates the invariants the parser guarantees and returns a
//! [`WriteError`] when handed a hand-built tree that violates them.

mod document;

use ecow::EcoString;

use crate::ast::{
    Background, Comment, DataTable, DocString, Examples, Feature, FeatureChild, GherkinDocument,
    Rule, RuleChild, Scenario, Step, StepArgument, TableRow, Tag,
};
use crate::source_analysis::{KeywordTable, WriteError};

use document::{Document, concat, docvec, line, nest, nil};

/// Indentation width per nesting level.
const INDENT: isize = 2;

/// Renders a document back to Gherkin text.
///
/// # Examples
///
/// ```
/// use gherkin_core::prelude::*;
///
/// let source = Source::from_string("Feature: Minimal\n  Scenario: One\n    Given a step\n");
/// let document = parse(&source).unwrap();
/// let text = write(&document).unwrap();
/// assert_eq!(text, "Feature: Minimal\n\n  Scenario: One\n    Given a step\n");
/// ```
pub fn write(document: &GherkinDocument) -> Result<String, WriteError> {
    let mut writer = Writer { blocks: Vec::new() };

    if let Some(feature) = &document.feature {
        if KeywordTable::for_language(&feature.language).is_none() {
            return Err(WriteError::UnknownLanguage {
                code: feature.language.clone(),
            });
        }
        if feature.language != "en" {
            writer.push(0, 0, false, docvec!["# language: ", &feature.language]);
        }
        writer.feature(feature)?;
    }

    let blocks = interleave_comments(writer.blocks, &document.comments);
    Ok(render(blocks))
}

/// One output line, tagged with the source line it derives from (for
/// comment interleaving) and its indentation.
struct Block<'a> {
    line: u32,
    indent: isize,
    blank_before: bool,
    doc: Document<'a>,
}

struct Writer<'a> {
    blocks: Vec<Block<'a>>,
}

impl<'a> Writer<'a> {
    fn push(&mut self, line: u32, indent: isize, blank_before: bool, doc: Document<'a>) {
        self.blocks.push(Block {
            line,
            indent,
            blank_before,
            doc,
        });
    }

    fn feature(&mut self, feature: &'a Feature) -> Result<(), WriteError> {
        for tag in &feature.tags {
            self.push(tag.location.line(), 0, false, docvec![&tag.name]);
        }
        self.push(
            feature.location.line(),
            0,
            false,
            header(&feature.keyword, &feature.name),
        );
        self.description(&feature.description, feature.location.line());

        for child in &feature.children {
            match child {
                FeatureChild::Background(background) => self.background(background, INDENT)?,
                FeatureChild::Scenario(scenario) => self.scenario(scenario, INDENT)?,
                FeatureChild::Rule(rule) => self.rule(rule)?,
            }
        }
        Ok(())
    }

    fn rule(&mut self, rule: &'a Rule) -> Result<(), WriteError> {
        let mut blank = true;
        for tag in &rule.tags {
            self.push(tag.location.line(), INDENT, blank, docvec![&tag.name]);
            blank = false;
        }
        self.push(
            rule.location.line(),
            INDENT,
            blank,
            header(&rule.keyword, &rule.name),
        );
        self.description(&rule.description, rule.location.line());

        for child in &rule.children {
            match child {
                RuleChild::Background(background) => self.background(background, 2 * INDENT)?,
                RuleChild::Scenario(scenario) => self.scenario(scenario, 2 * INDENT)?,
            }
        }
        Ok(())
    }

    fn background(&mut self, background: &'a Background, indent: isize) -> Result<(), WriteError> {
        self.push(
            background.location.line(),
            indent,
            true,
            header(&background.keyword, &background.name),
        );
        self.description(&background.description, background.location.line());
        for step in &background.steps {
            self.step(step, indent + INDENT)?;
        }
        Ok(())
    }

    fn scenario(&mut self, scenario: &'a Scenario, indent: isize) -> Result<(), WriteError> {
        let mut blank = true;
        if !scenario.tags.is_empty() {
            let first_line = scenario.tags[0].location.line();
            self.push(first_line, indent, blank, tag_line(&scenario.tags));
            blank = false;
        }
        self.push(
            scenario.location.line(),
            indent,
            blank,
            header(&scenario.keyword, &scenario.name),
        );
        self.description(&scenario.description, scenario.location.line());

        for step in &scenario.steps {
            self.step(step, indent + INDENT)?;
        }
        for examples in &scenario.examples {
            self.examples(examples, indent + INDENT)?;
        }
        Ok(())
    }

    fn examples(&mut self, examples: &'a Examples, indent: isize) -> Result<(), WriteError> {
        let mut blank = true;
        if !examples.tags.is_empty() {
            let first_line = examples.tags[0].location.line();
            self.push(first_line, indent, blank, tag_line(&examples.tags));
            blank = false;
        }
        self.push(
            examples.location.line(),
            indent,
            blank,
            header(&examples.keyword, &examples.name),
        );
        self.description(&examples.description, examples.location.line());

        if let Some(table_header) = &examples.table_header {
            let expected = table_header.cells.len();
            for row in &examples.table_body {
                if row.cells.len() != expected {
                    return Err(WriteError::InconsistentTableCells {
                        expected,
                        got: row.cells.len(),
                    });
                }
            }
            let mut rows: Vec<&TableRow> = Vec::with_capacity(examples.table_body.len() + 1);
            rows.push(table_header);
            rows.extend(&examples.table_body);
            let widths = column_widths(&rows);
            for row in rows {
                self.push(
                    row.location.line(),
                    indent + INDENT,
                    false,
                    row_doc(row, &widths),
                );
            }
        }
        Ok(())
    }

    fn step(&mut self, step: &'a Step, indent: isize) -> Result<(), WriteError> {
        let keyword = step.keyword.as_str();
        if keyword.len() < 2 || !keyword.ends_with(' ') || keyword.ends_with("  ") {
            return Err(WriteError::MalformedStepKeyword {
                keyword: step.keyword.clone(),
            });
        }
        self.push(
            step.location.line(),
            indent,
            false,
            docvec![keyword, &step.text],
        );

        match &step.argument {
            Some(StepArgument::DocString(doc_string)) => {
                self.doc_string(doc_string, indent + INDENT)?;
            }
            Some(StepArgument::DataTable(table)) => self.data_table(table, indent + INDENT)?,
            None => {}
        }
        Ok(())
    }

    fn doc_string(&mut self, doc_string: &'a DocString, indent: isize) -> Result<(), WriteError> {
        if doc_string.delimiter != "\"\"\"" && doc_string.delimiter != "```" {
            return Err(WriteError::MalformedDelimiter {
                delimiter: doc_string.delimiter.clone(),
            });
        }
        let source_line = doc_string.location.line();
        let opener = match &doc_string.media_type {
            Some(media_type) => docvec![&doc_string.delimiter, media_type],
            None => docvec![&doc_string.delimiter],
        };
        self.push(source_line, indent, false, opener);
        if !doc_string.content.is_empty() {
            for content_line in doc_string.content.split('\n') {
                let doc = if content_line.is_empty() {
                    nil()
                } else {
                    docvec![content_line]
                };
                self.push(source_line, indent, false, doc);
            }
        }
        self.push(source_line, indent, false, docvec![&doc_string.delimiter]);
        Ok(())
    }

    fn data_table(&mut self, table: &'a DataTable, indent: isize) -> Result<(), WriteError> {
        let Some(first) = table.rows.first() else {
            return Ok(());
        };
        let expected = first.cells.len();
        for row in &table.rows {
            if row.cells.len() != expected {
                return Err(WriteError::InconsistentTableCells {
                    expected,
                    got: row.cells.len(),
                });
            }
        }
        let rows: Vec<&TableRow> = table.rows.iter().collect();
        let widths = column_widths(&rows);
        for row in rows {
            self.push(row.location.line(), indent, false, row_doc(row, &widths));
        }
        Ok(())
    }

    /// Emits description lines verbatim. Descriptions carry their own left
    /// whitespace, so they render at indent zero.
    fn description(&mut self, text: &'a EcoString, source_line: u32) {
        if text.is_empty() {
            return;
        }
        for description_line in text.split('\n') {
            let doc = if description_line.is_empty() {
                nil()
            } else {
                docvec![description_line]
            };
            self.push(source_line, 0, false, doc);
        }
    }
}

fn header<'a>(keyword: &'a EcoString, name: &'a EcoString) -> Document<'a> {
    if name.is_empty() {
        docvec![keyword, ":"]
    } else {
        docvec![keyword, ": ", name]
    }
}

fn tag_line(tags: &[Tag]) -> Document<'_> {
    let mut parts = Vec::with_capacity(tags.len() * 2);
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            parts.push(Document::Str(" "));
        }
        parts.push(Document::Str(tag.name.as_str()));
    }
    concat(parts)
}

/// Escapes a cell value for output: `\` → `\\`, `|` → `\|`, newline →
/// `\n`.
fn escape_cell(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '|' => escaped.push_str("\\|"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Computes per-column print widths: the maximum code-point count of the
/// escaped cell values.
fn column_widths(rows: &[&TableRow]) -> Vec<usize> {
    let columns = rows.first().map_or(0, |row| row.cells.len());
    let mut widths = vec![0; columns];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(escape_cell(&cell.value).chars().count());
        }
    }
    widths
}

fn row_doc(row: &TableRow, widths: &[usize]) -> Document<'static> {
    let mut parts: Vec<Document<'static>> = Vec::with_capacity(row.cells.len() * 3 + 1);
    for (cell, width) in row.cells.iter().zip(widths) {
        let escaped = escape_cell(&cell.value);
        let padding = width.saturating_sub(escaped.chars().count());
        parts.push(Document::Str("| "));
        parts.push(Document::String(escaped));
        parts.push(Document::String(" ".repeat(padding + 1)));
    }
    parts.push(Document::Str("|"));
    concat(parts)
}

/// Splices comment blocks into the output by source line: each comment goes
/// immediately before the first block whose source line is not less than
/// the comment's. A section's leading blank line stays above the comment.
fn interleave_comments<'a>(blocks: Vec<Block<'a>>, comments: &'a [Comment]) -> Vec<Block<'a>> {
    if comments.is_empty() {
        return blocks;
    }
    let mut merged = Vec::with_capacity(blocks.len() + comments.len());
    let mut pending = comments.iter().peekable();

    for mut block in blocks {
        let mut first_inserted = true;
        while pending
            .peek()
            .is_some_and(|comment| comment.location.line() <= block.line)
        {
            let comment = pending.next().expect("peeked comment exists");
            merged.push(Block {
                line: comment.location.line(),
                indent: 0,
                blank_before: first_inserted && block.blank_before,
                doc: docvec![&comment.text],
            });
            if first_inserted {
                block.blank_before = false;
                first_inserted = false;
            }
        }
        merged.push(block);
    }
    for comment in pending {
        merged.push(Block {
            line: comment.location.line(),
            indent: 0,
            blank_before: false,
            doc: docvec![&comment.text],
        });
    }
    merged
}

/// Renders the block list: one line per block, a blank line before marked
/// blocks, and a single trailing newline.
fn render(blocks: Vec<Block<'_>>) -> String {
    if blocks.is_empty() {
        return String::new();
    }
    let mut docs: Vec<Document<'_>> = Vec::with_capacity(blocks.len() * 2 + 1);
    for (i, block) in blocks.into_iter().enumerate() {
        if i == 0 {
            docs.push(nest(block.indent, block.doc));
        } else {
            if block.blank_before {
                docs.push(line());
            }
            docs.push(nest(block.indent, docvec![line(), block.doc]));
        }
    }
    docs.push(line());
    concat(docs).to_text()
}
