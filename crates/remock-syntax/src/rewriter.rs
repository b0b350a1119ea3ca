//! Entry point that turns Mocha expectations into RSpec mocks.
//!
//! A rewrite parses the source, lowers the tree, lets the dispatcher queue
//! edits from the top node down, and composes the edits in one pass. Text
//! outside recognised constructs is copied through byte for byte.

use tracing::{debug, instrument};

use crate::dispatch::Dispatcher;
use crate::error::SyntaxError;
use crate::language::SourceLanguage;
use crate::parser::Parser;
use crate::tree::SyntaxTree;

/// Engine for rewriting one source text at a time.
///
/// A rewriter owns its parser, so one instance serves a whole batch of files.
#[derive(Debug)]
pub struct Rewriter {
    parser: Parser,
}

impl Rewriter {
    /// Creates a rewriter for Ruby sources.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParserInitError`] if the Ruby grammar cannot
    /// be loaded.
    pub fn new() -> Result<Self, SyntaxError> {
        Ok(Self {
            parser: Parser::new(SourceLanguage::Ruby)?,
        })
    }

    /// Returns the language this rewriter is configured for.
    #[must_use]
    pub const fn language(&self) -> SourceLanguage {
        self.parser.language()
    }

    /// Rewrites every recognised construct in `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseFailure`] if the source does not parse
    /// cleanly, and [`SyntaxError::EditConflict`] if two rules claimed the
    /// same bytes.
    #[instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn rewrite(&mut self, source: &str) -> Result<RewriteResult, SyntaxError> {
        let parsed = self.parser.parse(source)?.ensure_clean()?;
        let tree = SyntaxTree::lower(&parsed);

        let mut dispatcher = Dispatcher::new(source);
        dispatcher.dispatch(tree.root())?;
        let (edits, conversions) = dispatcher.finish();

        let output = edits.apply(source)?;
        debug!(conversions, edits = edits.len(), "rewrite complete");

        Ok(RewriteResult {
            output,
            conversions,
            edits: edits.len(),
        })
    }
}

/// Result of a rewrite operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    output: String,
    conversions: usize,
    edits: usize,
}

impl RewriteResult {
    /// Returns the transformed source code.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consumes the result and returns the transformed source code.
    #[must_use]
    pub fn into_output(self) -> String {
        self.output
    }

    /// Returns the number of constructs converted.
    #[must_use]
    pub const fn conversions(&self) -> usize {
        self.conversions
    }

    /// Returns the number of edit operations applied.
    #[must_use]
    pub const fn edits(&self) -> usize {
        self.edits
    }

    /// Returns whether any construct was converted.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.conversions > 0
    }
}

/// Rewrites `source` and returns the output text.
///
/// # Errors
///
/// Returns an error under the same conditions as [`Rewriter::rewrite`].
pub fn rewrite(source: &str) -> Result<String, SyntaxError> {
    Rewriter::new()?
        .rewrite(source)
        .map(RewriteResult::into_output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> Rewriter {
        Rewriter::new().expect("rewriter")
    }

    #[test]
    fn rewrite_reports_counts() {
        let result = rewriter()
            .rewrite("Foo.expects(:new).with().returns(bar)")
            .expect("rewrite");

        assert!(result.has_changes());
        assert_eq!(result.conversions(), 3);
        assert!(result.edits() > 0);
        assert_eq!(result.output(), "expect(Foo).to receive(:new) { bar }");
    }

    #[test]
    fn rewrite_without_constructs_is_unchanged() {
        let source = "describe Foo do\n  it { expect(1).to eq(1) }\nend\n";
        let result = rewriter().rewrite(source).expect("rewrite");

        assert!(!result.has_changes());
        assert_eq!(result.edits(), 0);
        assert_eq!(result.output(), source);
    }

    #[test]
    fn rewrite_rejects_invalid_source() {
        let err = rewrite("foo.stubs(:bar").expect_err("should fail");
        assert!(matches!(err, SyntaxError::ParseFailure { .. }));
    }

    #[test]
    fn language_is_ruby() {
        assert_eq!(rewriter().language(), SourceLanguage::Ruby);
    }

    #[test]
    fn one_rewriter_serves_many_sources() {
        let mut shared = rewriter();

        let failed = shared.rewrite("foo.stubs(:bar");
        assert!(matches!(failed, Err(SyntaxError::ParseFailure { .. })));

        let first = shared.rewrite("a.stubs(:x)").expect("rewrite");
        let second = shared.rewrite("b.expects(:y)").expect("rewrite");
        assert_eq!(first.output(), "allow(a).to receive(:x)");
        assert_eq!(second.output(), "expect(b).to receive(:y)");
    }
}
