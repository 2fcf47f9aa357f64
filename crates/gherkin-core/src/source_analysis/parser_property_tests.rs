// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Gherkin parser stack.
//!
//! These tests use `proptest` to verify the crate's invariants over
//! generated inputs:
//!
//! 1. **Tokenizer totality** - arbitrary input always tokenizes, ends with
//!    `Eof`, and is deterministic
//! 2. **Parser totality** - arbitrary input never panics; it parses or
//!    returns a typed error
//! 3. **Location monotonicity** - traversal emits nodes in non-decreasing
//!    location order
//! 4. **Round-trip** - `parse ∘ write ∘ parse` is structurally stable
//! 5. **Idempotent writer** - `write(parse(write(d))) == write(d)`
//! 6. **Traversal equivalence** - visitor, fold, and push handler emit the
//!    same `(kind, line)` sequence

use proptest::prelude::*;

use super::lexer::tokenize;
use super::parser::parse;
use super::source::Source;
use crate::ast::{
    Background, Comment, DataTable, DocString, Examples, Feature, FeatureChild, GherkinDocument,
    Rule, RuleChild, Scenario, Step, StepArgument, TableCell, TableRow, Tag,
};
use crate::ast_walker::{Node, Visitor, continuing, fold_nodes};
use crate::handler::{Handler, parse_with_handler};
use crate::source_analysis::Location;
use crate::unparse::write;

// ============================================================================
// Corpus and generators
// ============================================================================

/// Representative valid feature files covering every construct.
const VALID_FEATURES: &[&str] = &[
    "Feature: Minimal\n  Scenario: One\n    Given a step\n",
    "@smoke @regression\nFeature: Tagged\n  a description line\n\n  Background: setup\n    Given base\n  @wip\n  Scenario: S\n    When acting\n    Then checked\n",
    "# language: fr\nFonctionnalité: Connexion\n  Scénario: Succès\n    Soit un utilisateur\n    Et que le compte existe\n",
    "Feature: Outline\n  Scenario Outline: O\n    Given <a> and <b>\n\n    @small\n    Examples: first\n      | a | b |\n      | 1 | 2 |\n\n    Examples: second\n      | a | b |\n      | 3 | 4 |\n",
    "Feature: Doc\n  Scenario: S\n    Given body:\n      \"\"\"json\n      {\"k\": \"v\"}\n\n      trailing\n      \"\"\"\n    Then done\n",
    "Feature: Rules\n  Rule: first\n    Background:\n      Given shared\n    Scenario: A\n      Given a\n  Rule: second\n    Scenario: B\n      Given b\n",
    "# head\nFeature: Commented\n  # inside\n  Scenario: S\n    Given x\n# tail\n",
    "Feature: Tables\n  Scenario: S\n    Given rows:\n      | a\\|b | c\\\\d |\n      | e\\nf |      |\n    And more:\n      | only |\n",
    "Feature: Desc\n  first line\n\n  second line\n  Scenario: S\n    about the scenario\n    Given x\n",
    "# only comments\n\n# in this file\n",
];

fn valid_feature() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_FEATURES).prop_map(std::string::ToString::to_string)
}

/// Generates small well-formed feature files from scratch.
fn generated_feature() -> impl Strategy<Value = String> {
    let name = "[A-Za-z][A-Za-z0-9]{0,8}";
    let step_text = "[a-z][a-z0-9 ]{0,12}";
    let keyword = prop::sample::select(vec!["Given", "When", "Then", "And", "But", "*"]);
    let step = (keyword, step_text).prop_map(|(kw, text)| format!("    {kw} {text}"));
    let steps = prop::collection::vec(step, 1..4);
    let tag = prop::option::of("@[a-z]{1,6}");
    let scenario = (tag, name, steps).prop_map(|(tag, name, steps)| {
        let mut block = String::new();
        if let Some(tag) = tag {
            block.push_str("  ");
            block.push_str(&tag);
            block.push('\n');
        }
        block.push_str("  Scenario: ");
        block.push_str(&name);
        block.push('\n');
        for step in steps {
            block.push_str(&step);
            block.push('\n');
        }
        block
    });
    (name.prop_map(String::from), prop::collection::vec(scenario, 1..4)).prop_map(
        |(name, scenarios)| {
            let mut text = format!("Feature: {name}\n");
            for scenario in scenarios {
                text.push_str(&scenario);
            }
            text
        },
    )
}

/// Default is 256 cases; override via `PROPTEST_CASES` for nightly runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(256),
        ..default
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_text(input: &str) -> GherkinDocument {
    parse(&Source::from_string(input)).expect("corpus input parses")
}

fn emitted(document: &GherkinDocument) -> Vec<(String, Location)> {
    fold_nodes(
        document,
        Vec::new(),
        continuing(|mut acc: Vec<(String, Location)>, node: Node<'_>| {
            acc.push((node.kind_name().to_string(), node.location()));
            acc
        }),
    )
}

#[derive(Default)]
struct VisitorRecorder(Vec<(String, u32)>);

impl Visitor for VisitorRecorder {
    fn visit_feature(&mut self, feature: &Feature) {
        self.0.push(("feature".into(), feature.location.line()));
    }
    fn visit_background(&mut self, background: &Background) {
        self.0.push(("background".into(), background.location.line()));
    }
    fn visit_scenario(&mut self, scenario: &Scenario) {
        self.0.push(("scenario".into(), scenario.location.line()));
    }
    fn visit_rule(&mut self, rule: &Rule) {
        self.0.push(("rule".into(), rule.location.line()));
    }
    fn visit_step(&mut self, step: &Step) {
        self.0.push(("step".into(), step.location.line()));
    }
    fn visit_doc_string(&mut self, doc_string: &DocString) {
        self.0.push(("doc-string".into(), doc_string.location.line()));
    }
    fn visit_data_table(&mut self, table: &DataTable) {
        self.0.push(("data-table".into(), table.location.line()));
    }
    fn visit_examples(&mut self, examples: &Examples) {
        self.0.push(("examples".into(), examples.location.line()));
    }
    fn visit_tag(&mut self, tag: &Tag) {
        self.0.push(("tag".into(), tag.location.line()));
    }
    fn visit_comment(&mut self, comment: &Comment) {
        self.0.push(("comment".into(), comment.location.line()));
    }
}

#[derive(Default)]
struct HandlerRecorder(Vec<(String, u32)>);

impl Handler for HandlerRecorder {
    fn on_feature(&mut self, feature: &Feature) {
        self.0.push(("feature".into(), feature.location.line()));
    }
    fn on_background(&mut self, background: &Background) {
        self.0.push(("background".into(), background.location.line()));
    }
    fn on_scenario(&mut self, scenario: &Scenario) {
        self.0.push(("scenario".into(), scenario.location.line()));
    }
    fn on_rule(&mut self, rule: &Rule) {
        self.0.push(("rule".into(), rule.location.line()));
    }
    fn on_step(&mut self, step: &Step) {
        self.0.push(("step".into(), step.location.line()));
    }
    fn on_doc_string(&mut self, doc_string: &DocString) {
        self.0.push(("doc-string".into(), doc_string.location.line()));
    }
    fn on_data_table(&mut self, table: &DataTable) {
        self.0.push(("data-table".into(), table.location.line()));
    }
    fn on_examples(&mut self, examples: &Examples) {
        self.0.push(("examples".into(), examples.location.line()));
    }
    fn on_tag(&mut self, tag: &Tag) {
        self.0.push(("tag".into(), tag.location.line()));
    }
    fn on_comment(&mut self, comment: &Comment) {
        self.0.push(("comment".into(), comment.location.line()));
    }
}

// --- Structural comparison with locations scrubbed --------------------------

fn zero() -> Location {
    Location::line_only(0)
}

fn scrub_document(document: &GherkinDocument) -> (Option<Feature>, Vec<Comment>) {
    (
        document.feature.as_ref().map(scrub_feature),
        document.comments.iter().map(scrub_comment).collect(),
    )
}

fn scrub_feature(feature: &Feature) -> Feature {
    Feature {
        location: zero(),
        tags: feature.tags.iter().map(scrub_tag).collect(),
        children: feature
            .children
            .iter()
            .map(|child| match child {
                FeatureChild::Background(background) => {
                    FeatureChild::Background(scrub_background(background))
                }
                FeatureChild::Scenario(scenario) => {
                    FeatureChild::Scenario(scrub_scenario(scenario))
                }
                FeatureChild::Rule(rule) => FeatureChild::Rule(scrub_rule(rule)),
            })
            .collect(),
        ..feature.clone()
    }
}

fn scrub_rule(rule: &Rule) -> Rule {
    Rule {
        location: zero(),
        tags: rule.tags.iter().map(scrub_tag).collect(),
        children: rule
            .children
            .iter()
            .map(|child| match child {
                RuleChild::Background(background) => {
                    RuleChild::Background(scrub_background(background))
                }
                RuleChild::Scenario(scenario) => RuleChild::Scenario(scrub_scenario(scenario)),
            })
            .collect(),
        ..rule.clone()
    }
}

fn scrub_background(background: &Background) -> Background {
    Background {
        location: zero(),
        steps: background.steps.iter().map(scrub_step).collect(),
        ..background.clone()
    }
}

fn scrub_scenario(scenario: &Scenario) -> Scenario {
    Scenario {
        location: zero(),
        tags: scenario.tags.iter().map(scrub_tag).collect(),
        steps: scenario.steps.iter().map(scrub_step).collect(),
        examples: scenario.examples.iter().map(scrub_examples).collect(),
        ..scenario.clone()
    }
}

fn scrub_step(step: &Step) -> Step {
    Step {
        location: zero(),
        argument: step.argument.as_ref().map(|argument| match argument {
            StepArgument::DocString(doc_string) => StepArgument::DocString(DocString {
                location: zero(),
                ..doc_string.clone()
            }),
            StepArgument::DataTable(table) => StepArgument::DataTable(DataTable {
                location: zero(),
                rows: table.rows.iter().map(scrub_row).collect(),
            }),
        }),
        ..step.clone()
    }
}

fn scrub_examples(examples: &Examples) -> Examples {
    Examples {
        location: zero(),
        tags: examples.tags.iter().map(scrub_tag).collect(),
        table_header: examples.table_header.as_ref().map(scrub_row),
        table_body: examples.table_body.iter().map(scrub_row).collect(),
        ..examples.clone()
    }
}

fn scrub_row(row: &TableRow) -> TableRow {
    TableRow {
        location: zero(),
        cells: row
            .cells
            .iter()
            .map(|cell| TableCell {
                location: zero(),
                value: cell.value.clone(),
            })
            .collect(),
        ..row.clone()
    }
}

fn scrub_tag(tag: &Tag) -> Tag {
    Tag {
        location: zero(),
        ..tag.clone()
    }
}

fn scrub_comment(comment: &Comment) -> Comment {
    Comment {
        location: zero(),
        ..comment.clone()
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(proptest_config())]

    /// Tokenizer never panics and always ends with exactly one `Eof`.
    #[test]
    fn tokenizer_is_total(input in "[ -~\n]{0,400}") {
        let source = Source::from_string(input.as_str());
        let tokens = tokenize(&source);
        prop_assert!(!tokens.is_empty());
        prop_assert!(tokens.last().unwrap().is_eof());
        prop_assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
        prop_assert_eq!(tokens.len(), source.line_count() + 1);
    }

    /// Tokenizing the same input twice yields identical streams.
    #[test]
    fn tokenizer_is_deterministic(input in "[ -~\n]{0,300}") {
        let source = Source::from_string(input.as_str());
        prop_assert_eq!(tokenize(&source), tokenize(&source));
    }

    /// The parser is total: arbitrary input parses or errors, never panics.
    #[test]
    fn parser_is_total(input in "[ -~\n]{0,400}") {
        let source = Source::from_string(input.as_str());
        let _ = parse(&source);
    }

    /// Every corpus entry parses cleanly.
    #[test]
    fn corpus_parses(input in valid_feature()) {
        parse_text(&input);
    }

    /// Generated feature files parse cleanly.
    #[test]
    fn generated_features_parse(input in generated_feature()) {
        parse_text(&input);
    }

    /// Traversal emits nodes in non-decreasing location order.
    #[test]
    fn locations_are_monotone(input in valid_feature()) {
        let document = parse_text(&input);
        let nodes = emitted(&document);
        for window in nodes.windows(2) {
            prop_assert!(
                window[0].1 <= window[1].1,
                "locations went backwards: {:?} then {:?}",
                window[0],
                window[1],
            );
        }
    }

    /// `parse ∘ write ∘ parse` is structurally equal to `parse`.
    #[test]
    fn roundtrip_is_structurally_stable(input in valid_feature()) {
        let first = parse_text(&input);
        let written = write(&first).expect("parsed trees always write");
        let second = parse_text(&written);
        prop_assert_eq!(scrub_document(&first), scrub_document(&second));
    }

    /// Round-trip also holds for generated feature files.
    #[test]
    fn generated_roundtrip(input in generated_feature()) {
        let first = parse_text(&input);
        let written = write(&first).expect("parsed trees always write");
        let second = parse_text(&written);
        prop_assert_eq!(scrub_document(&first), scrub_document(&second));
    }

    /// Writing is idempotent after one canonicalizing pass.
    #[test]
    fn writer_is_idempotent(input in valid_feature()) {
        let once = write(&parse_text(&input)).expect("parsed trees always write");
        let twice = write(&parse_text(&once)).expect("written trees reparse");
        prop_assert_eq!(once, twice);
    }

    /// Visitor, fold, and push handler emit identical `(kind, line)`
    /// sequences.
    #[test]
    fn traversal_facades_agree(input in valid_feature()) {
        let source = Source::from_string(input.as_str());
        let document = parse(&source).expect("corpus input parses");

        let fold_events: Vec<(String, u32)> = emitted(&document)
            .into_iter()
            .map(|(kind, location)| (kind, location.line()))
            .collect();

        let mut visitor = VisitorRecorder::default();
        document.accept(&mut visitor);

        let mut handler = HandlerRecorder::default();
        parse_with_handler(&source, &mut handler);

        prop_assert_eq!(&fold_events, &visitor.0);
        prop_assert_eq!(&fold_events, &handler.0);
    }
}
