// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Gherkin parser core.
//!
//! This crate contains the core parser stack for the Gherkin BDD language:
//!
//! - Lexical analysis: a line-oriented tokenizer with doc-string state
//! - Parsing: a recursive descent parser producing a typed document tree
//! - The AST value model with enforced invariants
//! - Three traversal facades: external visitor, flow-controlled fold, and
//!   push handler - all emitting the same node sequence
//! - A writer that re-serializes any conforming tree back to Gherkin text
//!
//! The parser is single-threaded and synchronous: each call constructs
//! fresh state and returns an immutable value, so independent parses may
//! run in parallel without coordination.
//!
//! # Example
//!
//! ```
//! use gherkin_core::prelude::*;
//!
//! let source = Source::from_string("Feature: Login\n  Scenario: Ok\n    Given a user\n");
//! let document = parse(&source).unwrap();
//! assert_eq!(document.feature.as_ref().unwrap().name, "Login");
//!
//! let text = write(&document).unwrap();
//! let again = parse(&Source::from_string(text)).unwrap();
//! assert_eq!(again.feature.unwrap().name, "Login");
//! ```

pub mod ast;
pub mod ast_walker;
pub mod handler;
pub mod source_analysis;
pub mod unparse;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{
        Background, Comment, DataTable, DocString, Examples, Feature, FeatureChild,
        GherkinDocument, KeywordType, Rule, RuleChild, Scenario, ScenarioKind, Step, StepArgument,
        TableCell, TableRow, Tag,
    };
    pub use crate::ast_walker::{Fold, FoldFlow, Node, Visitor, continuing, fold, fold_nodes};
    pub use crate::handler::{Handler, parse_with_handler};
    pub use crate::source_analysis::{
        Lexer, Location, ParseError, ParseErrorKind, ParseErrors, Source, Token, TokenKind,
        TokenType, WriteError, parse, tokenize,
    };
    pub use crate::unparse::write;
}
