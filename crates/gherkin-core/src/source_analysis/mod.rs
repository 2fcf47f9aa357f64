// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Parsing infrastructure for Gherkin feature files.
//!
//! This module contains the source wrapper, the keyword tables, the
//! tokenizer, the recursive descent parser, and the error model.
//!
//! # Tokenization
//!
//! The [`Lexer`] classifies one line per token; [`tokenize`] collects the
//! whole stream eagerly. Each token carries its [`Location`]. Tokenization
//! never fails - malformed input surfaces as typed errors at parse time.
//!
//! ```
//! use gherkin_core::source_analysis::{Source, tokenize};
//!
//! let source = Source::from_string("Feature: F\n");
//! let tokens = tokenize(&source);
//! assert_eq!(tokens.len(), 2); // feature line + EOF
//! ```
//!
//! # Parsing
//!
//! The [`parse`] function builds a [`GherkinDocument`] from a [`Source`],
//! stopping at the first fatal error. See [`ParseErrorKind`] for the closed
//! error taxonomy.
//!
//! [`GherkinDocument`]: crate::ast::GherkinDocument

mod error;
mod keywords;
mod lexer;
mod location;
mod parser;
mod source;
mod token;

#[cfg(test)]
mod parser_property_tests;

pub use error::{ExpectedTokens, ParseError, ParseErrorKind, ParseErrors, WriteError};
pub use keywords::{HeaderKind, KeywordTable};
pub use lexer::{Lexer, LexerState, tokenize};
pub use location::Location;
pub use parser::parse;
pub use source::Source;
pub use token::{Cell, TagSpan, Token, TokenKind, TokenType};
