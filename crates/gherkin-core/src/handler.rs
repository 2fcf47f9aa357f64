// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Push-style parsing API.
//!
//! [`parse_with_handler`] drives a full parse and delivers events to a
//! [`Handler`] instead of returning a tree. Begin/end pairs are strictly
//! nested and all events arrive in strict source order - the same order the
//! [visitor and fold](crate::ast_walker) produce.
//!
//! Events carry the same value records as AST nodes, except that child-node
//! lists arrive empty: children are delivered as their own events. The one
//! exception is [`Examples`], which keeps its table rows - rows are payload,
//! not events. A step's argument arrives as a separate
//! [`Handler::on_doc_string`] or [`Handler::on_data_table`] event, so the
//! step event itself carries no argument.
//!
//! On a parse error, [`Handler::on_error`] fires once and the stream ends;
//! no other events are delivered.
//!
//! # Examples
//!
//! ```
//! use gherkin_core::ast::Scenario;
//! use gherkin_core::handler::{Handler, parse_with_handler};
//! use gherkin_core::source_analysis::Source;
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl Handler for Names {
//!     fn on_scenario(&mut self, scenario: &Scenario) {
//!         self.0.push(scenario.name.to_string());
//!     }
//! }
//!
//! let source = Source::from_string("Feature: F\n  Scenario: A\n    Given x\n");
//! let mut names = Names::default();
//! parse_with_handler(&source, &mut names);
//! assert_eq!(names.0, ["A"]);
//! ```

use crate::ast::{
    Background, Comment, DataTable, DocString, Examples, Feature, Rule, Scenario, Step, Tag,
};
use crate::ast_walker::{Flow, Node, WalkSink, walk_document};
use crate::source_analysis::{ParseError, Source, parse};

/// The push-style event receiver. Every method has a do-nothing default;
/// override the events you care about.
pub trait Handler {
    /// The feature begins. `tags` and `children` are empty; they arrive as
    /// events.
    fn on_feature(&mut self, _feature: &Feature) {}
    /// The feature ends.
    fn on_end_feature(&mut self) {}

    /// A background begins. `steps` is empty.
    fn on_background(&mut self, _background: &Background) {}
    /// The background ends.
    fn on_end_background(&mut self) {}

    /// A scenario begins. `tags`, `steps`, and `examples` are empty.
    fn on_scenario(&mut self, _scenario: &Scenario) {}
    /// The scenario ends.
    fn on_end_scenario(&mut self) {}

    /// A rule begins. `tags` and `children` are empty.
    fn on_rule(&mut self, _rule: &Rule) {}
    /// The rule ends.
    fn on_end_rule(&mut self) {}

    /// An examples section begins. `tags` is empty; the table rows are
    /// carried in the event.
    fn on_examples(&mut self, _examples: &Examples) {}
    /// The examples section ends.
    fn on_end_examples(&mut self) {}

    /// A step. `argument` is `None`; it follows as its own event.
    fn on_step(&mut self, _step: &Step) {}
    /// A doc string argument of the preceding step.
    fn on_doc_string(&mut self, _doc_string: &DocString) {}
    /// A data table argument of the preceding step.
    fn on_data_table(&mut self, _table: &DataTable) {}

    /// A tag, delivered before the element it decorates.
    fn on_tag(&mut self, _tag: &Tag) {}
    /// A comment, interleaved by source location.
    fn on_comment(&mut self, _comment: &Comment) {}

    /// The parse failed; the stream ends after this event.
    fn on_error(&mut self, _error: &ParseError) {}
}

/// Parses a source, delivering events to `handler` instead of building a
/// result for the caller.
///
/// The parse runs to completion unless a handler callback panics; a panic
/// aborts the parse and propagates to the caller.
pub fn parse_with_handler<H: Handler>(source: &Source, handler: &mut H) {
    match parse(source) {
        Ok(document) => walk_document(&document, &mut HandlerSink(handler)),
        Err(errors) => {
            if let Some(error) = errors.iter().next() {
                handler.on_error(error);
            }
        }
    }
}

struct HandlerSink<'h, H: Handler>(&'h mut H);

impl<H: Handler> WalkSink for HandlerSink<'_, H> {
    fn visit(&mut self, node: Node<'_>) -> Flow {
        match node {
            Node::Feature(feature) => {
                let event = Feature {
                    tags: Vec::new(),
                    children: Vec::new(),
                    ..feature.clone()
                };
                self.0.on_feature(&event);
            }
            Node::Background(background) => {
                let event = Background {
                    steps: Vec::new(),
                    ..background.clone()
                };
                self.0.on_background(&event);
            }
            Node::Scenario(scenario) => {
                let event = Scenario {
                    tags: Vec::new(),
                    steps: Vec::new(),
                    examples: Vec::new(),
                    ..scenario.clone()
                };
                self.0.on_scenario(&event);
            }
            Node::Rule(rule) => {
                let event = Rule {
                    tags: Vec::new(),
                    children: Vec::new(),
                    ..rule.clone()
                };
                self.0.on_rule(&event);
            }
            Node::Step(step) => {
                let event = Step {
                    argument: None,
                    ..step.clone()
                };
                self.0.on_step(&event);
            }
            Node::DocString(doc_string) => self.0.on_doc_string(doc_string),
            Node::DataTable(table) => self.0.on_data_table(table),
            Node::Examples(examples) => {
                let event = Examples {
                    tags: Vec::new(),
                    ..examples.clone()
                };
                self.0.on_examples(&event);
            }
            Node::Tag(tag) => self.0.on_tag(tag),
            Node::Comment(comment) => self.0.on_comment(comment),
        }
        Flow::Continue
    }

    fn leave(&mut self, node: Node<'_>) {
        match node {
            Node::Feature(_) => self.0.on_end_feature(),
            Node::Background(_) => self.0.on_end_background(),
            Node::Scenario(_) => self.0.on_end_scenario(),
            Node::Rule(_) => self.0.on_end_rule(),
            Node::Examples(_) => self.0.on_end_examples(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StepArgument;
    use crate::source_analysis::ParseErrorKind;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Handler for Recorder {
        fn on_feature(&mut self, feature: &Feature) {
            assert!(feature.tags.is_empty() && feature.children.is_empty());
            self.events.push(format!("feature {}", feature.name));
        }
        fn on_end_feature(&mut self) {
            self.events.push("end-feature".into());
        }
        fn on_background(&mut self, background: &Background) {
            assert!(background.steps.is_empty());
            self.events.push("background".into());
        }
        fn on_end_background(&mut self) {
            self.events.push("end-background".into());
        }
        fn on_scenario(&mut self, scenario: &Scenario) {
            assert!(scenario.steps.is_empty() && scenario.examples.is_empty());
            self.events.push(format!("scenario {}", scenario.name));
        }
        fn on_end_scenario(&mut self) {
            self.events.push("end-scenario".into());
        }
        fn on_rule(&mut self, rule: &Rule) {
            self.events.push(format!("rule {}", rule.name));
        }
        fn on_end_rule(&mut self) {
            self.events.push("end-rule".into());
        }
        fn on_examples(&mut self, examples: &Examples) {
            let rows = examples.table_body.len();
            self.events.push(format!("examples rows={rows}"));
        }
        fn on_end_examples(&mut self) {
            self.events.push("end-examples".into());
        }
        fn on_step(&mut self, step: &Step) {
            assert!(step.argument.is_none());
            self.events.push(format!("step {}", step.text));
        }
        fn on_doc_string(&mut self, doc_string: &DocString) {
            self.events.push(format!("doc-string {}", doc_string.content));
        }
        fn on_data_table(&mut self, table: &DataTable) {
            self.events.push(format!("data-table rows={}", table.rows.len()));
        }
        fn on_tag(&mut self, tag: &Tag) {
            self.events.push(format!("tag {}", tag.name));
        }
        fn on_comment(&mut self, comment: &Comment) {
            self.events.push(format!("comment {}", comment.text));
        }
        fn on_error(&mut self, error: &ParseError) {
            self.events.push(format!("error {}", error.kind));
        }
    }

    #[test]
    fn events_nest_in_source_order() {
        let input = "\
# head
@smoke
Feature: F
  Background:
    Given base
  @wip
  Scenario: S
    Given rows:
      | a |
  Scenario Outline: O
    Given <a>
    Examples:
      | a |
      | 1 |
";
        let mut recorder = Recorder::default();
        parse_with_handler(&Source::from_string(input), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                "comment # head",
                "tag @smoke",
                "feature F",
                "background",
                "step base",
                "end-background",
                "tag @wip",
                "scenario S",
                "step rows:",
                "data-table rows=1",
                "end-scenario",
                "scenario O",
                "step <a>",
                "examples rows=1",
                "end-examples",
                "end-scenario",
                "end-feature",
            ]
        );
    }

    #[test]
    fn doc_string_event_follows_its_step() {
        let input = "Feature: F\n  Scenario: S\n    Given body:\n      \"\"\"\n      text\n      \"\"\"\n";
        let mut recorder = Recorder::default();
        parse_with_handler(&Source::from_string(input), &mut recorder);
        let step = recorder.events.iter().position(|e| e == "step body:").unwrap();
        assert_eq!(recorder.events[step + 1], "doc-string text");
    }

    #[test]
    fn error_ends_the_stream() {
        let mut recorder = Recorder::default();
        parse_with_handler(&Source::from_string("Scenario: Orphan\n"), &mut recorder);
        assert_eq!(recorder.events.len(), 1);
        assert!(recorder.events[0].starts_with("error"));
    }

    #[test]
    fn error_event_carries_the_parse_error() {
        struct Check(Option<ParseErrorKind>);
        impl Handler for Check {
            fn on_error(&mut self, error: &ParseError) {
                self.0 = Some(error.kind.clone());
            }
        }
        let mut check = Check(None);
        parse_with_handler(&Source::from_string("| a |\n"), &mut check);
        assert_eq!(check.0, Some(ParseErrorKind::MissingFeature));
    }

    #[test]
    fn handler_events_match_tree_traversal() {
        let input = "Feature: F\n  Scenario: S\n    Given rows:\n      | a |\n";
        let source = Source::from_string(input);
        let mut recorder = Recorder::default();
        parse_with_handler(&source, &mut recorder);

        let document = parse(&source).unwrap();
        let scenario = match &document.feature.as_ref().unwrap().children[0] {
            crate::ast::FeatureChild::Scenario(scenario) => scenario,
            other => panic!("expected a scenario, got {other:?}"),
        };
        assert!(matches!(
            scenario.steps[0].argument,
            Some(StepArgument::DataTable(_))
        ));
        assert!(recorder.events.contains(&"data-table rows=1".to_string()));
    }
}
