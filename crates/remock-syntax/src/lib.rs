//! Tree-sitter powered rewriting of Mocha mocks into RSpec mocks.
//!
//! The crate recognises a fixed family of Mocha constructs in Ruby test
//! files and rewrites only the bytes they occupy:
//!
//! | Mocha                              | RSpec                                      |
//! |------------------------------------|--------------------------------------------|
//! | `x.stubs(:m)`                      | `allow(x).to receive(:m)`                  |
//! | `x.stubs(m: v)`                    | `allow(x).to receive(:m) { v }`            |
//! | `x.stubs(a: 1, b: 2)`              | `allow(x).to receive_messages(a: 1, b: 2)` |
//! | `X.any_instance.stubs(:m)`         | `allow_any_instance_of(X).to receive(:m)`  |
//! | `x.expects(:m)`                    | `expect(x).to receive(:m)`                 |
//! | `x.expects(:m).never`              | `expect(x).to_not receive(:m)`             |
//! | `....with()`                       | removed                                    |
//! | `....returns(v)` / `returns(a, b)` | `{ v }` / `{ [a, b] }`                     |
//! | `....raises(e)`                    | `{ raise e }`                              |
//! | `stub` / `mock(...)`               | `double` / `double(...)`                   |
//!
//! Everything else, including comments, layout and unrelated code, passes
//! through unchanged. Chains that sequence return values with `.then` are
//! left alone.
//!
//! # Example
//!
//! ```
//! use remock_syntax::Rewriter;
//!
//! let result = Rewriter::new()?.rewrite("subject.stubs(:persisted? => true)")?;
//! assert_eq!(result.output(), "allow(subject).to receive(:persisted?) { true }");
//! # Ok::<(), remock_syntax::SyntaxError>(())
//! ```

mod dispatch;
mod edit;
mod error;
mod language;
mod parser;
mod position;
mod rewriter;
mod rules;
mod span;
mod synthetic;
mod tree;

pub use dispatch::{Construct, classify};
pub use edit::{EditBuffer, EditOperation};
pub use error::SyntaxError;
pub use language::SourceLanguage;
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use rewriter::{RewriteResult, Rewriter, rewrite};
pub use span::Span;
pub use synthetic::Polarity;
pub use tree::{Arguments, Call, KeyNotation, Node, NodeKind, Pair, SyntaxTree};

#[cfg(test)]
mod tests;
