//! Error types for parsing and rewriting operations.
//!
//! This module provides structured error types for all operations in the
//! `remock-syntax` crate. Constructs the rewriter does not recognise are never
//! errors; they pass through untouched.

use thiserror::Error;

use crate::language::SourceLanguage;
use crate::parser::SyntaxErrorInfo;
use crate::span::Span;

/// Errors from parsing and rewriting operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyntaxError {
    /// Failed to initialise the Tree-sitter parser for a language.
    #[error("failed to initialise parser for {language}: {message}")]
    ParserInitError {
        /// The language that failed to initialise.
        language: SourceLanguage,
        /// Description of the failure.
        message: String,
    },

    /// Tree-sitter did not produce a syntax tree.
    #[error("failed to parse {language}: {message}")]
    ParseError {
        /// The language that failed to parse.
        language: SourceLanguage,
        /// Description of the failure.
        message: String,
    },

    /// The syntax tree contains error or missing nodes.
    #[error(
        "source is not valid {language}: {} at line {}, column {}",
        first.message,
        first.line,
        first.column
    )]
    ParseFailure {
        /// The language the source was parsed as.
        language: SourceLanguage,
        /// The first located syntax error.
        first: Box<SyntaxErrorInfo>,
        /// Total number of error nodes in the tree.
        count: usize,
    },

    /// Two queued edits touch the same bytes.
    #[error("conflicting edits at {first} and {second}")]
    EditConflict {
        /// Span of the edit queued earlier in offset order.
        first: Span,
        /// Span of the edit that collides with it.
        second: Span,
    },

    /// A synthetic node borrowed a span that does not enclose its targets.
    #[error("synthetic {node} span {span} does not enclose {target}")]
    InvalidSyntheticSpan {
        /// The kind of synthetic node being built.
        node: &'static str,
        /// The borrowed span.
        span: Span,
        /// The region the node needs to edit.
        target: Span,
    },

    /// Internal error indicating a bug or system failure.
    #[error("internal error: {message}")]
    InternalError {
        /// Description of the internal error.
        message: String,
    },
}

impl SyntaxError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(language: SourceLanguage, message: impl Into<String>) -> Self {
        Self::ParserInitError {
            language,
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(language: SourceLanguage, message: impl Into<String>) -> Self {
        Self::ParseError {
            language,
            message: message.into(),
        }
    }

    /// Creates a parse failure from the collected syntax errors.
    ///
    /// Returns `None` when `errors` is empty.
    #[must_use]
    pub fn parse_failure(language: SourceLanguage, errors: Vec<SyntaxErrorInfo>) -> Option<Self> {
        let count = errors.len();
        let first = errors.into_iter().next()?;
        Some(Self::ParseFailure {
            language,
            first: Box::new(first),
            count,
        })
    }

    /// Creates an edit conflict error.
    #[must_use]
    pub const fn edit_conflict(first: Span, second: Span) -> Self {
        Self::EditConflict { first, second }
    }

    /// Creates an invalid synthetic span error.
    #[must_use]
    pub const fn invalid_synthetic_span(node: &'static str, span: Span, target: Span) -> Self {
        Self::InvalidSyntheticSpan { node, span, target }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
