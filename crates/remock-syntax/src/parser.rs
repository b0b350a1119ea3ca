//! Parsing front end.
//!
//! Tree-sitter always produces a tree, even for broken input, so a parse is
//! only half the story: [`ParseResult::ensure_clean`] turns ERROR and MISSING
//! nodes into a [`SyntaxError::ParseFailure`] before any rule runs.

use std::fmt;
use std::ops::Range;

use tree_sitter::{Node as TsNode, Tree, TreeCursor};

use crate::error::SyntaxError;
use crate::language::SourceLanguage;
use crate::position::point_to_one_based;

/// Longest snippet kept in [`SyntaxErrorInfo::context`], ellipsis included.
const CONTEXT_LIMIT: usize = 50;

/// A parsed source text together with its concrete syntax tree.
#[derive(Debug)]
pub struct ParseResult {
    tree: Tree,
    source: String,
    language: SourceLanguage,
}

impl ParseResult {
    /// Returns the concrete syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Returns the text the tree was built from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the grammar used for the parse.
    #[must_use]
    pub const fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Returns `true` if the tree holds an ERROR or MISSING node anywhere.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Lists every ERROR and MISSING node in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut found = Vec::new();
        if self.has_errors() {
            let mut cursor = self.tree.walk();
            visit_errors(&mut cursor, &mut |node| {
                found.push(SyntaxErrorInfo::from_node(node, &self.source));
            });
        }
        found
    }

    /// Returns the root of the concrete syntax tree.
    #[must_use]
    pub fn root_node(&self) -> TsNode<'_> {
        self.tree.root_node()
    }

    /// Passes the result through when the tree is free of errors.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseFailure`] with the first error located
    /// and the total error count.
    pub fn ensure_clean(self) -> Result<Self, SyntaxError> {
        SyntaxError::parse_failure(self.language, self.errors()).map_or(Ok(self), Err)
    }
}

/// Walks the subtree under `cursor` in pre-order, skipping subtrees that
/// tree-sitter reports as error free.
fn visit_errors<'t>(cursor: &mut TreeCursor<'t>, visit: &mut impl FnMut(TsNode<'t>)) {
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            visit(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// A located syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Bytes covered by the offending node.
    pub byte_range: Range<usize>,
    /// One-based line of the first byte.
    pub line: u32,
    /// One-based column of the first byte.
    pub column: u32,
    /// The offending text, shortened to a readable snippet.
    pub context: String,
    /// `syntax error`, or `missing <kind>` for nodes tree-sitter inserted.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: TsNode<'_>, source: &str) -> Self {
        let (line, column) = point_to_one_based(node.start_position());
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            String::from("syntax error")
        };
        Self {
            context: source
                .get(node.byte_range())
                .map(truncate_context)
                .unwrap_or_default(),
            byte_range: node.byte_range(),
            line,
            column,
            message,
        }
    }
}

fn truncate_context(text: &str) -> String {
    if text.chars().count() <= CONTEXT_LIMIT {
        return text.to_owned();
    }
    let mut snippet: String = text.chars().take(CONTEXT_LIMIT.saturating_sub(3)).collect();
    snippet.push_str("...");
    snippet
}

/// A tree-sitter parser bound to one grammar.
///
/// The parser is reusable: each [`Parser::parse`] call starts a fresh tree.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SourceLanguage,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl Parser {
    /// Loads the grammar for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParserInitError`] if tree-sitter rejects the
    /// grammar, e.g. on an ABI version mismatch.
    pub fn new(language: SourceLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.tree_sitter_language())
            .map_err(|error| SyntaxError::parser_init(language, error.to_string()))?;
        Ok(Self { inner, language })
    }

    /// Returns the grammar this parser was built for.
    #[must_use]
    pub const fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Parses `source` from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] when tree-sitter gives up without
    /// producing a tree.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "tree-sitter returned no tree"))?;
        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn parser() -> Parser {
        Parser::new(SourceLanguage::Ruby).expect("parser init")
    }

    #[rstest]
    #[case("subject.stubs(:yes)")]
    #[case("let(:foo) { stub }")]
    #[case("describe Foo do\n  it { expect(1).to eq(1) }\nend\n")]
    #[case("")]
    fn clean_sources_have_no_errors(mut parser: Parser, #[case] source: &str) {
        let result = parser.parse(source).expect("parse");

        assert!(!result.has_errors());
        assert!(result.errors().is_empty());
        assert_eq!(result.language(), SourceLanguage::Ruby);
        assert_eq!(result.source(), source);
    }

    #[rstest]
    #[case("def broken(")]
    #[case("foo.stubs(:bar")]
    #[case("describe Foo do\n")]
    fn broken_sources_report_errors(mut parser: Parser, #[case] source: &str) {
        let result = parser.parse(source).expect("parse");

        assert!(result.has_errors());
        assert!(!result.errors().is_empty());
    }

    #[rstest]
    fn ensure_clean_reports_first_error(mut parser: Parser) {
        let result = parser.parse("x = 1\ndef broken(\n").expect("parse");

        let err = result.ensure_clean().expect_err("should fail");
        let SyntaxError::ParseFailure { first, count, .. } = err else {
            panic!("unexpected error: {err}");
        };
        assert!(count >= 1);
        assert!(first.line >= 1);
        assert!(first.column >= 1);
    }

    #[rstest]
    fn ensure_clean_passes_clean_trees(mut parser: Parser) {
        let result = parser.parse("foo.stubs(:bar)").expect("parse");
        let clean = result.ensure_clean().expect("clean");
        assert_eq!(clean.root_node().kind(), "program");
    }

    #[rstest]
    fn parser_is_reusable(mut parser: Parser) {
        let broken = parser.parse("def broken(").expect("parse");
        assert!(broken.has_errors());

        let clean = parser.parse("foo.stubs(:bar)").expect("parse");
        assert!(!clean.has_errors());
        assert_eq!(clean.source(), "foo.stubs(:bar)");
    }

    #[test]
    fn long_context_is_shortened() {
        let context = truncate_context(&"x".repeat(80));
        assert_eq!(context.len(), CONTEXT_LIMIT);
        assert!(context.ends_with("..."));
    }

    #[test]
    fn short_context_is_kept() {
        assert_eq!(truncate_context("foo("), "foo(");
    }
}
