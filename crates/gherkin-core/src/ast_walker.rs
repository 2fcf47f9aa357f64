// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared AST traversal for all consumer-facing facades.
//!
//! One walk engine drives the three traversal styles the crate exposes: the
//! external [`Visitor`], the flow-controlled [`Fold`], and the push
//! [`Handler`](crate::handler::Handler). Keeping a single engine is what
//! guarantees that all three emit the same `(kind, location)` sequence.
//!
//! # Emission order
//!
//! Nodes are emitted in strict source order:
//!
//! - document comments are interleaved by location - each comment fires
//!   immediately before the first node whose location is not less than the
//!   comment's;
//! - tags fire before the node they decorate (they precede it in source);
//! - children follow their parent pre-order; steps before examples.
//!
//! Table rows and cells are payload of their `DataTable`/`Examples` node,
//! not separate events, matching the push-handler surface.
//!
//! # Why this exists
//!
//! Before folding traversal into one engine, each facade would need its own
//! recursion over the nine node shapes, and keeping their orders aligned
//! (a testable property of the crate) would be a maintenance hazard.

use std::ops::ControlFlow;

use crate::ast::{
    Background, Comment, DataTable, DocString, Examples, Feature, FeatureChild, GherkinDocument,
    Rule, RuleChild, Scenario, Step, StepArgument, Tag,
};
use crate::source_analysis::Location;

// ── Node handle ───────────────────────────────────────────────────────────────

/// A borrowed reference to any node the traversal emits.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// A feature.
    Feature(&'a Feature),
    /// A background.
    Background(&'a Background),
    /// A scenario or scenario outline.
    Scenario(&'a Scenario),
    /// A rule.
    Rule(&'a Rule),
    /// A step.
    Step(&'a Step),
    /// A doc string argument.
    DocString(&'a DocString),
    /// A data table argument.
    DataTable(&'a DataTable),
    /// An examples section.
    Examples(&'a Examples),
    /// A tag.
    Tag(&'a Tag),
    /// A comment.
    Comment(&'a Comment),
}

impl Node<'_> {
    /// Returns the node's location.
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            Self::Feature(node) => node.location,
            Self::Background(node) => node.location,
            Self::Scenario(node) => node.location,
            Self::Rule(node) => node.location,
            Self::Step(node) => node.location,
            Self::DocString(node) => node.location,
            Self::DataTable(node) => node.location,
            Self::Examples(node) => node.location,
            Self::Tag(node) => node.location,
            Self::Comment(node) => node.location,
        }
    }

    /// Returns a stable kebab-case name for the node kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Feature(_) => "feature",
            Self::Background(_) => "background",
            Self::Scenario(_) => "scenario",
            Self::Rule(_) => "rule",
            Self::Step(_) => "step",
            Self::DocString(_) => "doc-string",
            Self::DataTable(_) => "data-table",
            Self::Examples(_) => "examples",
            Self::Tag(_) => "tag",
            Self::Comment(_) => "comment",
        }
    }
}

// ── Walk engine ───────────────────────────────────────────────────────────────

/// What a sink wants done after seeing a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Descend into the node's subtree.
    Continue,
    /// Emit the node's end event (if any) but skip its subtree.
    SkipChildren,
    /// Abort the whole traversal.
    Stop,
}

/// The internal receiver the engine drives. Container nodes (feature,
/// background, scenario, rule, examples) get a matching [`WalkSink::leave`]
/// call; point nodes do not.
pub(crate) trait WalkSink {
    fn visit(&mut self, node: Node<'_>) -> Flow;
    fn leave(&mut self, _node: Node<'_>) {}
}

/// Document comments, drained in location order as the walk passes them.
struct CommentQueue<'a> {
    comments: &'a [Comment],
    next: usize,
}

impl<'a> CommentQueue<'a> {
    fn new(comments: &'a [Comment]) -> Self {
        Self { comments, next: 0 }
    }

    fn empty() -> Self {
        Self {
            comments: &[],
            next: 0,
        }
    }

    /// Emits every comment whose location is not greater than `location`.
    fn flush_up_to(&mut self, location: Location, sink: &mut impl WalkSink) -> ControlFlow<()> {
        while let Some(comment) = self.comments.get(self.next) {
            if comment.location > location {
                break;
            }
            self.next += 1;
            if sink.visit(Node::Comment(comment)) == Flow::Stop {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Emits all remaining comments.
    fn flush_all(&mut self, sink: &mut impl WalkSink) -> ControlFlow<()> {
        while let Some(comment) = self.comments.get(self.next) {
            self.next += 1;
            if sink.visit(Node::Comment(comment)) == Flow::Stop {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}

pub(crate) fn walk_document(document: &GherkinDocument, sink: &mut impl WalkSink) {
    let mut comments = CommentQueue::new(&document.comments);
    let _ = walk_document_inner(document, sink, &mut comments);
}

fn walk_document_inner(
    document: &GherkinDocument,
    sink: &mut impl WalkSink,
    comments: &mut CommentQueue<'_>,
) -> ControlFlow<()> {
    if let Some(feature) = &document.feature {
        walk_feature(feature, sink, comments)?;
    }
    comments.flush_all(sink)
}

/// Emits a childless node, flushing comments due before it.
fn visit_point(
    node: Node<'_>,
    sink: &mut impl WalkSink,
    comments: &mut CommentQueue<'_>,
) -> ControlFlow<()> {
    comments.flush_up_to(node.location(), sink)?;
    if sink.visit(node) == Flow::Stop {
        return ControlFlow::Break(());
    }
    ControlFlow::Continue(())
}

pub(crate) fn walk_feature(
    feature: &Feature,
    sink: &mut impl WalkSink,
    comments: &mut CommentQueue<'_>,
) -> ControlFlow<()> {
    for tag in &feature.tags {
        visit_point(Node::Tag(tag), sink, comments)?;
    }
    comments.flush_up_to(feature.location, sink)?;
    match sink.visit(Node::Feature(feature)) {
        Flow::Stop => return ControlFlow::Break(()),
        Flow::SkipChildren => {
            sink.leave(Node::Feature(feature));
            return ControlFlow::Continue(());
        }
        Flow::Continue => {}
    }
    for child in &feature.children {
        match child {
            FeatureChild::Background(background) => walk_background(background, sink, comments)?,
            FeatureChild::Scenario(scenario) => walk_scenario(scenario, sink, comments)?,
            FeatureChild::Rule(rule) => walk_rule(rule, sink, comments)?,
        }
    }
    sink.leave(Node::Feature(feature));
    ControlFlow::Continue(())
}

pub(crate) fn walk_rule(
    rule: &Rule,
    sink: &mut impl WalkSink,
    comments: &mut CommentQueue<'_>,
) -> ControlFlow<()> {
    for tag in &rule.tags {
        visit_point(Node::Tag(tag), sink, comments)?;
    }
    comments.flush_up_to(rule.location, sink)?;
    match sink.visit(Node::Rule(rule)) {
        Flow::Stop => return ControlFlow::Break(()),
        Flow::SkipChildren => {
            sink.leave(Node::Rule(rule));
            return ControlFlow::Continue(());
        }
        Flow::Continue => {}
    }
    for child in &rule.children {
        match child {
            RuleChild::Background(background) => walk_background(background, sink, comments)?,
            RuleChild::Scenario(scenario) => walk_scenario(scenario, sink, comments)?,
        }
    }
    sink.leave(Node::Rule(rule));
    ControlFlow::Continue(())
}

pub(crate) fn walk_background(
    background: &Background,
    sink: &mut impl WalkSink,
    comments: &mut CommentQueue<'_>,
) -> ControlFlow<()> {
    comments.flush_up_to(background.location, sink)?;
    match sink.visit(Node::Background(background)) {
        Flow::Stop => return ControlFlow::Break(()),
        Flow::SkipChildren => {
            sink.leave(Node::Background(background));
            return ControlFlow::Continue(());
        }
        Flow::Continue => {}
    }
    for step in &background.steps {
        walk_step(step, sink, comments)?;
    }
    sink.leave(Node::Background(background));
    ControlFlow::Continue(())
}

pub(crate) fn walk_scenario(
    scenario: &Scenario,
    sink: &mut impl WalkSink,
    comments: &mut CommentQueue<'_>,
) -> ControlFlow<()> {
    for tag in &scenario.tags {
        visit_point(Node::Tag(tag), sink, comments)?;
    }
    comments.flush_up_to(scenario.location, sink)?;
    match sink.visit(Node::Scenario(scenario)) {
        Flow::Stop => return ControlFlow::Break(()),
        Flow::SkipChildren => {
            sink.leave(Node::Scenario(scenario));
            return ControlFlow::Continue(());
        }
        Flow::Continue => {}
    }
    for step in &scenario.steps {
        walk_step(step, sink, comments)?;
    }
    for examples in &scenario.examples {
        walk_examples(examples, sink, comments)?;
    }
    sink.leave(Node::Scenario(scenario));
    ControlFlow::Continue(())
}

pub(crate) fn walk_step(
    step: &Step,
    sink: &mut impl WalkSink,
    comments: &mut CommentQueue<'_>,
) -> ControlFlow<()> {
    comments.flush_up_to(step.location, sink)?;
    match sink.visit(Node::Step(step)) {
        Flow::Stop => return ControlFlow::Break(()),
        Flow::SkipChildren => return ControlFlow::Continue(()),
        Flow::Continue => {}
    }
    match &step.argument {
        Some(StepArgument::DocString(doc_string)) => {
            visit_point(Node::DocString(doc_string), sink, comments)?;
        }
        Some(StepArgument::DataTable(table)) => {
            visit_point(Node::DataTable(table), sink, comments)?;
        }
        None => {}
    }
    ControlFlow::Continue(())
}

pub(crate) fn walk_examples(
    examples: &Examples,
    sink: &mut impl WalkSink,
    comments: &mut CommentQueue<'_>,
) -> ControlFlow<()> {
    for tag in &examples.tags {
        visit_point(Node::Tag(tag), sink, comments)?;
    }
    comments.flush_up_to(examples.location, sink)?;
    match sink.visit(Node::Examples(examples)) {
        Flow::Stop => return ControlFlow::Break(()),
        Flow::SkipChildren | Flow::Continue => {}
    }
    sink.leave(Node::Examples(examples));
    ControlFlow::Continue(())
}

// ── External visitor ──────────────────────────────────────────────────────────

/// The external visitor: one no-op method per node kind; override what you
/// need and call `accept` on a document or any container node.
///
/// # Examples
///
/// ```
/// use gherkin_core::ast::Step;
/// use gherkin_core::ast_walker::Visitor;
/// use gherkin_core::source_analysis::{Source, parse};
///
/// #[derive(Default)]
/// struct StepCounter(usize);
///
/// impl Visitor for StepCounter {
///     fn visit_step(&mut self, _step: &Step) {
///         self.0 += 1;
///     }
/// }
///
/// let source = Source::from_string("Feature: F\n  Scenario: S\n    Given a\n    Then b\n");
/// let document = parse(&source).unwrap();
/// let mut counter = StepCounter::default();
/// document.accept(&mut counter);
/// assert_eq!(counter.0, 2);
/// ```
pub trait Visitor {
    /// Called for the feature.
    fn visit_feature(&mut self, _feature: &Feature) {}
    /// Called for each background.
    fn visit_background(&mut self, _background: &Background) {}
    /// Called for each scenario.
    fn visit_scenario(&mut self, _scenario: &Scenario) {}
    /// Called for each rule.
    fn visit_rule(&mut self, _rule: &Rule) {}
    /// Called for each step.
    fn visit_step(&mut self, _step: &Step) {}
    /// Called for each doc string argument.
    fn visit_doc_string(&mut self, _doc_string: &DocString) {}
    /// Called for each data table argument.
    fn visit_data_table(&mut self, _table: &DataTable) {}
    /// Called for each examples section.
    fn visit_examples(&mut self, _examples: &Examples) {}
    /// Called for each tag, before the node it decorates.
    fn visit_tag(&mut self, _tag: &Tag) {}
    /// Called for each comment, interleaved by source location.
    fn visit_comment(&mut self, _comment: &Comment) {}
}

struct VisitorSink<'v, V: Visitor>(&'v mut V);

impl<V: Visitor> WalkSink for VisitorSink<'_, V> {
    fn visit(&mut self, node: Node<'_>) -> Flow {
        match node {
            Node::Feature(feature) => self.0.visit_feature(feature),
            Node::Background(background) => self.0.visit_background(background),
            Node::Scenario(scenario) => self.0.visit_scenario(scenario),
            Node::Rule(rule) => self.0.visit_rule(rule),
            Node::Step(step) => self.0.visit_step(step),
            Node::DocString(doc_string) => self.0.visit_doc_string(doc_string),
            Node::DataTable(table) => self.0.visit_data_table(table),
            Node::Examples(examples) => self.0.visit_examples(examples),
            Node::Tag(tag) => self.0.visit_tag(tag),
            Node::Comment(comment) => self.0.visit_comment(comment),
        }
        Flow::Continue
    }
}

impl GherkinDocument {
    /// Walks the document with an external visitor, in strict source order.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        walk_document(self, &mut VisitorSink(visitor));
    }
}

impl Feature {
    /// Walks this feature's subtree with an external visitor.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        let _ = walk_feature(self, &mut VisitorSink(visitor), &mut CommentQueue::empty());
    }
}

impl Rule {
    /// Walks this rule's subtree with an external visitor.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        let _ = walk_rule(self, &mut VisitorSink(visitor), &mut CommentQueue::empty());
    }
}

impl Background {
    /// Walks this background's subtree with an external visitor.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        let _ = walk_background(self, &mut VisitorSink(visitor), &mut CommentQueue::empty());
    }
}

impl Scenario {
    /// Walks this scenario's subtree with an external visitor.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        let _ = walk_scenario(self, &mut VisitorSink(visitor), &mut CommentQueue::empty());
    }
}

impl Step {
    /// Walks this step (and its argument, if any) with an external visitor.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        let _ = walk_step(self, &mut VisitorSink(visitor), &mut CommentQueue::empty());
    }
}

impl Examples {
    /// Walks this examples section with an external visitor.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        let _ = walk_examples(self, &mut VisitorSink(visitor), &mut CommentQueue::empty());
    }
}

// ── Flow-controlled fold ──────────────────────────────────────────────────────

/// The outcome of one fold callback: the threaded accumulator plus what to
/// do with the current node's subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldFlow<A> {
    /// Keep going, descending into children.
    Continue(A),
    /// Keep going, but skip the current node's subtree.
    SkipChildren(A),
    /// Abort the whole traversal and return this accumulator.
    Stop(A),
}

/// A record of per-node callbacks threading an accumulator through the
/// traversal. Every method defaults to [`FoldFlow::Continue`] with the
/// accumulator unchanged.
///
/// This is the recommended primary traversal: it subsumes the plain visitor
/// (ignore the flow) and supports early exit and subtree pruning.
pub trait Fold {
    /// The accumulator threaded through the traversal.
    type Acc;

    /// Folds the feature.
    fn feature(&mut self, acc: Self::Acc, _feature: &Feature) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds a background.
    fn background(&mut self, acc: Self::Acc, _background: &Background) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds a scenario.
    fn scenario(&mut self, acc: Self::Acc, _scenario: &Scenario) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds a rule.
    fn rule(&mut self, acc: Self::Acc, _rule: &Rule) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds a step.
    fn step(&mut self, acc: Self::Acc, _step: &Step) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds a doc string argument.
    fn doc_string(&mut self, acc: Self::Acc, _doc_string: &DocString) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds a data table argument.
    fn data_table(&mut self, acc: Self::Acc, _table: &DataTable) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds an examples section.
    fn examples(&mut self, acc: Self::Acc, _examples: &Examples) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds a tag.
    fn tag(&mut self, acc: Self::Acc, _tag: &Tag) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
    /// Folds a comment.
    fn comment(&mut self, acc: Self::Acc, _comment: &Comment) -> FoldFlow<Self::Acc> {
        FoldFlow::Continue(acc)
    }
}

/// Folds a document with a [`Fold`] record, returning the final accumulator.
pub fn fold<F: Fold>(document: &GherkinDocument, acc: F::Acc, folder: &mut F) -> F::Acc {
    fold_nodes(document, acc, |acc, node| match node {
        Node::Feature(feature) => folder.feature(acc, feature),
        Node::Background(background) => folder.background(acc, background),
        Node::Scenario(scenario) => folder.scenario(acc, scenario),
        Node::Rule(rule) => folder.rule(acc, rule),
        Node::Step(step) => folder.step(acc, step),
        Node::DocString(doc_string) => folder.doc_string(acc, doc_string),
        Node::DataTable(table) => folder.data_table(acc, table),
        Node::Examples(examples) => folder.examples(acc, examples),
        Node::Tag(tag) => folder.tag(acc, tag),
        Node::Comment(comment) => folder.comment(acc, comment),
    })
}

/// Folds a document with a single closure over [`Node`]s.
///
/// # Examples
///
/// ```
/// use gherkin_core::ast_walker::{Node, continuing, fold_nodes};
/// use gherkin_core::source_analysis::{Source, parse};
///
/// let source = Source::from_string("Feature: F\n  Scenario: S\n    Given a\n");
/// let document = parse(&source).unwrap();
/// let count = fold_nodes(
///     &document,
///     0_usize,
///     continuing(|count, node: Node<'_>| {
///         if matches!(node, Node::Step(_)) { count + 1 } else { count }
///     }),
/// );
/// assert_eq!(count, 1);
/// ```
pub fn fold_nodes<A, F>(document: &GherkinDocument, acc: A, f: F) -> A
where
    F: FnMut(A, Node<'_>) -> FoldFlow<A>,
{
    let mut sink = FoldSink { acc: Some(acc), f };
    walk_document(document, &mut sink);
    sink.acc.expect("fold accumulator survives the walk")
}

/// Lifts a plain `(acc, node) -> acc` function into a fold callback that
/// always continues.
pub fn continuing<A>(mut f: impl FnMut(A, Node<'_>) -> A) -> impl FnMut(A, Node<'_>) -> FoldFlow<A> {
    move |acc, node| FoldFlow::Continue(f(acc, node))
}

struct FoldSink<A, F> {
    acc: Option<A>,
    f: F,
}

impl<A, F> WalkSink for FoldSink<A, F>
where
    F: FnMut(A, Node<'_>) -> FoldFlow<A>,
{
    fn visit(&mut self, node: Node<'_>) -> Flow {
        let acc = self.acc.take().expect("fold accumulator survives the walk");
        match (self.f)(acc, node) {
            FoldFlow::Continue(acc) => {
                self.acc = Some(acc);
                Flow::Continue
            }
            FoldFlow::SkipChildren(acc) => {
                self.acc = Some(acc);
                Flow::SkipChildren
            }
            FoldFlow::Stop(acc) => {
                self.acc = Some(acc);
                Flow::Stop
            }
        }
    }
}
