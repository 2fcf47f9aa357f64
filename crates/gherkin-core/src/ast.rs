// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Gherkin documents.
//!
//! The AST mirrors the structure of a feature file after parsing. Every node
//! carries a [`Location`] for error reporting and for consumers that need to
//! correlate nodes with source lines.
//!
//! # Design Philosophy
//!
//! - **Immutable after construction** - all nodes are built by the parser and
//!   never mutated; consumers hold references for the duration of a parse.
//! - **No cycles** - the tree has no back-references. Parent context is
//!   recovered by threading state through a traversal, not by pointers.
//! - **Invariants enforced upstream** - table-shape uniformity and doc-string
//!   discipline are guaranteed by the parser; the writer re-checks them when
//!   handed a hand-built tree.
//!
//! # Example
//!
//! ```
//! use gherkin_core::prelude::*;
//!
//! let source = Source::from_string("Feature: Minimal\n  Scenario: One\n    Given a step\n");
//! let document = parse(&source).unwrap();
//! let feature = document.feature.as_ref().unwrap();
//! assert_eq!(feature.name, "Minimal");
//! assert_eq!(feature.language, "en");
//! ```

use ecow::EcoString;

use crate::source_analysis::{Location, Source};

/// Top-level result of parsing a feature file.
///
/// `comments` holds every comment line of the file in source order,
/// regardless of where it appeared; comments never occur as children of
/// other nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GherkinDocument {
    /// The input this document was parsed from.
    pub source: Source,
    /// The feature, if the file contains one.
    pub feature: Option<Feature>,
    /// All comments, in source order.
    pub comments: Vec<Comment>,
}

/// A `Feature:` section with its metadata and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    /// Location of the `Feature:` line.
    pub location: Location,
    /// Tags preceding the feature, in declaration order.
    pub tags: Vec<Tag>,
    /// The language code in effect (`"en"` unless a directive says
    /// otherwise).
    pub language: EcoString,
    /// The keyword form as written (e.g. `Feature`, `Fonctionnalité`).
    pub keyword: EcoString,
    /// The feature name.
    pub name: EcoString,
    /// Free text between the header and the first child; empty when absent.
    pub description: EcoString,
    /// Backgrounds, scenarios, and rules in source order.
    pub children: Vec<FeatureChild>,
}

/// A child of a [`Feature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureChild {
    /// A `Background:` section.
    Background(Background),
    /// A `Scenario:` or `Scenario Outline:` section.
    Scenario(Scenario),
    /// A `Rule:` section.
    Rule(Rule),
}

impl FeatureChild {
    /// Returns the location of the child's header line.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Background(background) => background.location,
            Self::Scenario(scenario) => scenario.location,
            Self::Rule(rule) => rule.location,
        }
    }
}

/// A `Rule:` section grouping related scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Location of the `Rule:` line.
    pub location: Location,
    /// Tags preceding the rule.
    pub tags: Vec<Tag>,
    /// The keyword form as written.
    pub keyword: EcoString,
    /// The rule name.
    pub name: EcoString,
    /// Free text between the header and the first child.
    pub description: EcoString,
    /// Unique id, assigned by the parser.
    pub id: EcoString,
    /// Backgrounds and scenarios in source order.
    pub children: Vec<RuleChild>,
}

/// A child of a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChild {
    /// A `Background:` section.
    Background(Background),
    /// A `Scenario:` or `Scenario Outline:` section.
    Scenario(Scenario),
}

impl RuleChild {
    /// Returns the location of the child's header line.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Background(background) => background.location,
            Self::Scenario(scenario) => scenario.location,
        }
    }
}

/// A `Background:` section of shared setup steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    /// Location of the `Background:` line.
    pub location: Location,
    /// The keyword form as written.
    pub keyword: EcoString,
    /// The background name.
    pub name: EcoString,
    /// Free text between the header and the first step.
    pub description: EcoString,
    /// Unique id, assigned by the parser.
    pub id: EcoString,
    /// The steps, in source order.
    pub steps: Vec<Step>,
}

/// A `Scenario:` or `Scenario Outline:` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// Location of the header line.
    pub location: Location,
    /// Tags preceding the scenario.
    pub tags: Vec<Tag>,
    /// Plain scenario or outline, decided by the keyword form.
    pub kind: ScenarioKind,
    /// The keyword form as written.
    pub keyword: EcoString,
    /// The scenario name.
    pub name: EcoString,
    /// Free text between the header and the first step.
    pub description: EcoString,
    /// Unique id, assigned by the parser.
    pub id: EcoString,
    /// The steps, in source order.
    pub steps: Vec<Step>,
    /// Examples sections; only ever non-empty for outlines.
    pub examples: Vec<Examples>,
}

/// Distinguishes a plain Scenario from a Scenario Outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioKind {
    /// A plain `Scenario:`.
    Scenario,
    /// A `Scenario Outline:` parameterized by Examples tables.
    ScenarioOutline,
}

impl ScenarioKind {
    /// Returns the kebab-case name used by external representations.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scenario => "scenario",
            Self::ScenarioOutline => "scenario-outline",
        }
    }
}

/// A single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Location of the step keyword.
    pub location: Location,
    /// The keyword including its single trailing space (`"Given "`, `"* "`).
    pub keyword: EcoString,
    /// The role derived from the keyword form. Conjunctions (`And`/`But`)
    /// record [`KeywordType::Conjunction`] and `*` records
    /// [`KeywordType::Unknown`]; resolving them to the preceding step's role
    /// is left to consumers.
    pub keyword_type: KeywordType,
    /// The step text.
    pub text: EcoString,
    /// Unique id, assigned by the parser.
    pub id: EcoString,
    /// An attached doc string or data table, if any.
    pub argument: Option<StepArgument>,
}

/// The argument attached to a step: at most one of a doc string or a data
/// table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArgument {
    /// A triple-delimited multi-line string.
    DocString(DocString),
    /// A `|`-delimited table.
    DataTable(DataTable),
}

/// Semantic classification of step keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordType {
    /// `Given` - establishes context.
    Context,
    /// `When` - performs an action.
    Action,
    /// `Then` - asserts an outcome.
    Outcome,
    /// `And` / `But` - continues the preceding step's role.
    Conjunction,
    /// `*` - no inherent role.
    Unknown,
}

impl KeywordType {
    /// Returns the kebab-case name used by external representations.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Action => "action",
            Self::Outcome => "outcome",
            Self::Conjunction => "conjunction",
            Self::Unknown => "unknown",
        }
    }
}

/// A triple-delimited multi-line string argument.
///
/// `content` excludes the delimiter lines; indentation up to the opening
/// delimiter's own indentation has been stripped from each content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocString {
    /// Location of the opening delimiter.
    pub location: Location,
    /// Media type after the opener, if any (e.g. `json`).
    pub media_type: Option<EcoString>,
    /// The content between the delimiters.
    pub content: EcoString,
    /// The exact delimiter: `"""` or ```` ``` ````.
    pub delimiter: EcoString,
}

/// A table argument attached to a step. All rows have the same cell count;
/// the parser rejects ragged tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    /// Location of the first row.
    pub location: Location,
    /// The rows, in source order.
    pub rows: Vec<TableRow>,
}

/// One row of a data table or an Examples table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Location of the leading `|`.
    pub location: Location,
    /// Unique id, assigned by the parser.
    pub id: EcoString,
    /// The cells, in order.
    pub cells: Vec<TableCell>,
}

/// One cell of a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Location of the cell's first non-blank character.
    pub location: Location,
    /// The cell value: trimmed on both sides, escapes decoded.
    pub value: EcoString,
}

/// An `Examples:` section of a Scenario Outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Examples {
    /// Location of the `Examples:` line.
    pub location: Location,
    /// Tags preceding the section.
    pub tags: Vec<Tag>,
    /// The keyword form as written.
    pub keyword: EcoString,
    /// The section name.
    pub name: EcoString,
    /// Free text between the header and the table.
    pub description: EcoString,
    /// Unique id, assigned by the parser.
    pub id: EcoString,
    /// The header row, when the section has a table.
    pub table_header: Option<TableRow>,
    /// The body rows; each has the same cell count as the header.
    pub table_body: Vec<TableRow>,
}

/// A tag attached to a feature, rule, scenario, or examples section.
///
/// Declaration order is preserved and duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Location of the `@`.
    pub location: Location,
    /// The tag name, including the leading `@`.
    pub name: EcoString,
    /// Unique id, assigned by the parser.
    pub id: EcoString,
}

/// A comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Location of the `#`.
    pub location: Location,
    /// The comment text, including the `#`.
    pub text: EcoString,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_kind_names() {
        assert_eq!(ScenarioKind::Scenario.as_str(), "scenario");
        assert_eq!(ScenarioKind::ScenarioOutline.as_str(), "scenario-outline");
    }

    #[test]
    fn keyword_type_names() {
        assert_eq!(KeywordType::Context.as_str(), "context");
        assert_eq!(KeywordType::Conjunction.as_str(), "conjunction");
        assert_eq!(KeywordType::Unknown.as_str(), "unknown");
    }

    #[test]
    fn child_locations() {
        let background = Background {
            location: Location::new(2, 3),
            keyword: "Background".into(),
            name: EcoString::new(),
            description: EcoString::new(),
            id: "0".into(),
            steps: Vec::new(),
        };
        let child = FeatureChild::Background(background.clone());
        assert_eq!(child.location(), Location::new(2, 3));
        let child = RuleChild::Background(background);
        assert_eq!(child.location(), Location::new(2, 3));
    }
}
