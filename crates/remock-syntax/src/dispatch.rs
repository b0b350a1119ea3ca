//! Construct classification and routing.
//!
//! [`classify`] runs an ordered predicate list over a node and returns the
//! first construct that matches. The dispatcher walks the tree from the top,
//! handing recognised constructs to their rule and descending into
//! everything else. Rules call back into the dispatcher for the nodes they do
//! not consume and for the synthetic nodes they build.

use tracing::debug;

use crate::edit::EditBuffer;
use crate::error::SyntaxError;
use crate::rules;
use crate::synthetic::{Polarity, Synthetic};
use crate::tree::{Call, Node, NodeKind};

/// The Mocha constructs the rewriter recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    /// A `returns(...).then.returns(...)` chain, left untouched.
    SequentialReturns,
    /// A chain returning `*values`, `**options` or `&block`, left untouched.
    SpreadReturns,
    /// `subject.stubs(...)`.
    StubDeclaration,
    /// A bare `stub`/`mock`, with or without arguments.
    StubOrMockLiteral,
    /// `subject.expects(...)`.
    ExpectationDeclaration,
    /// `<chain>.returns(values)`.
    ReturnAttachment,
    /// `<chain>.with` without arguments.
    ArgumentMatcherAttachment,
    /// `<declaration>.never`.
    NegationAttachment,
    /// `<chain>.raises(...)`.
    ExceptionAttachment,
    /// Anything else.
    Unrecognized,
}

type Predicate = fn(&Node) -> bool;

const PREDICATES: &[(Construct, Predicate)] = &[
    (Construct::SequentialReturns, is_sequential_returns),
    (Construct::SpreadReturns, is_spread_returns),
    (Construct::StubDeclaration, |node| is_declaration(node, "stubs")),
    (Construct::StubOrMockLiteral, is_literal),
    (Construct::ExpectationDeclaration, |node| {
        is_declaration(node, "expects")
    }),
    (Construct::ReturnAttachment, is_return_attachment),
    (Construct::ArgumentMatcherAttachment, is_matcher_attachment),
    (Construct::NegationAttachment, is_negation_attachment),
    (Construct::ExceptionAttachment, is_exception_attachment),
];

/// Classifies a node. The first matching predicate wins.
#[must_use]
pub fn classify(node: &Node) -> Construct {
    PREDICATES
        .iter()
        .find(|(_, predicate)| predicate(node))
        .map_or(Construct::Unrecognized, |(construct, _)| *construct)
}

fn attachment<'n>(node: &'n Node, method: &str) -> Option<&'n Call> {
    node.as_call()
        .filter(|call| call.is(method) && call.receiver.is_some() && call.block.is_none())
}

fn is_sequential_returns(node: &Node) -> bool {
    let mut current = node.as_call();
    while let Some(call) = current {
        if call.is("then") && call.receiver_call().is_some_and(|inner| inner.is("returns")) {
            return true;
        }
        current = call.receiver_call();
    }
    false
}

/// Spread arguments have no spelling inside a block body.
fn is_spread_returns(node: &Node) -> bool {
    let mut current = node.as_call();
    while let Some(call) = current {
        if call.is("returns") && call.items().iter().any(Node::is_spread) {
            return true;
        }
        current = call.receiver_call();
    }
    false
}

fn is_declaration(node: &Node, method: &str) -> bool {
    attachment(node, method).is_some_and(|call| match call.items() {
        [] => false,
        [_] => true,
        items => items.iter().all(Node::is_pair),
    })
}

fn is_any_declaration(node: &Node) -> bool {
    is_declaration(node, "stubs") || is_declaration(node, "expects")
}

fn is_literal(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Call(call) => {
            call.receiver.is_none() && call.block.is_none() && (call.is("stub") || call.is("mock"))
        }
        NodeKind::Identifier(name) => name == "stub" || name == "mock",
        _ => false,
    }
}

fn is_return_attachment(node: &Node) -> bool {
    attachment(node, "returns").is_some_and(|call| !call.items().is_empty())
}

fn is_matcher_attachment(node: &Node) -> bool {
    attachment(node, "with").is_some_and(|call| call.items().is_empty())
}

fn is_negation_attachment(node: &Node) -> bool {
    attachment(node, "never").is_some_and(|call| {
        call.items().is_empty() && call.receiver.as_deref().and_then(declaration_beneath).is_some()
    })
}

fn is_exception_attachment(node: &Node) -> bool {
    attachment(node, "raises").is_some()
}

/// Steps down through `with` and `returns` attachments to the declaration
/// they qualify.
pub(crate) fn declaration_beneath(node: &Node) -> Option<&Node> {
    let mut current = node;
    loop {
        if is_any_declaration(current) {
            return Some(current);
        }
        let step = attachment(current, "with").or_else(|| attachment(current, "returns"))?;
        current = step.receiver.as_deref()?;
    }
}

/// Walks a lowered tree and queues the edits of every recognised construct.
#[derive(Debug)]
pub(crate) struct Dispatcher<'t> {
    source: &'t str,
    edits: EditBuffer,
    conversions: usize,
}

impl<'t> Dispatcher<'t> {
    pub const fn new(source: &'t str) -> Self {
        Self {
            source,
            edits: EditBuffer::new(),
            conversions: 0,
        }
    }

    pub const fn source(&self) -> &'t str {
        self.source
    }

    pub const fn edits(&mut self) -> &mut EditBuffer {
        &mut self.edits
    }

    pub const fn count_conversion(&mut self) {
        self.conversions = self.conversions.saturating_add(1);
    }

    pub fn dispatch(&mut self, node: &'t Node) -> Result<(), SyntaxError> {
        let construct = classify(node);
        if construct != Construct::Unrecognized {
            debug!(?construct, span = %node.span, "recognised construct");
        }
        match construct {
            Construct::SequentialReturns | Construct::SpreadReturns => Ok(()),
            Construct::StubDeclaration | Construct::ExpectationDeclaration => {
                rules::declaration::handle(self, node, Polarity::Positive)
            }
            Construct::StubOrMockLiteral => rules::literal::handle(self, node),
            Construct::ReturnAttachment => rules::returns::handle(self, node),
            Construct::ArgumentMatcherAttachment => rules::matcher::handle(self, node),
            Construct::NegationAttachment => rules::negation::handle(self, node),
            Construct::ExceptionAttachment => rules::raises::handle(self, node),
            Construct::Unrecognized => self.dispatch_all(node.children()),
        }
    }

    pub fn dispatch_all(
        &mut self,
        nodes: impl IntoIterator<Item = &'t Node>,
    ) -> Result<(), SyntaxError> {
        nodes.into_iter().try_for_each(|node| self.dispatch(node))
    }

    pub fn dispatch_synthetic(&mut self, synthetic: Synthetic<'t>) -> Result<(), SyntaxError> {
        debug!(span = %synthetic.span(), "render synthetic node");
        match synthetic {
            Synthetic::Declaration(declaration) => rules::declaration::render(self, &declaration),
            Synthetic::Receive(receive) => rules::connective::render(self, &receive),
        }
    }

    pub fn finish(self) -> (EditBuffer, usize) {
        (self.edits, self.conversions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::SourceLanguage;
    use crate::parser::Parser;
    use crate::tree::SyntaxTree;
    use rstest::rstest;

    fn statement(source: &str) -> Node {
        let mut parser = Parser::new(SourceLanguage::Ruby).expect("parser init");
        let parsed = parser.parse(source).expect("parse");
        assert!(!parsed.has_errors(), "fixture should parse: {source}");
        let tree = SyntaxTree::lower(&parsed);
        tree.root()
            .children()
            .first()
            .map(|node| (*node).clone())
            .expect("statement")
    }

    #[rstest]
    #[case("subject.stubs(:yes)", Construct::StubDeclaration)]
    #[case("subject.stubs a: 1, b: 2", Construct::StubDeclaration)]
    #[case("subject.expects(:foo)", Construct::ExpectationDeclaration)]
    #[case("stub(bar: 'baz')", Construct::StubOrMockLiteral)]
    #[case("mock", Construct::StubOrMockLiteral)]
    #[case("foo.stubs(:bar).returns(1)", Construct::ReturnAttachment)]
    #[case("foo.expects(:bar).with()", Construct::ArgumentMatcherAttachment)]
    #[case("foo.expects(:bar).never", Construct::NegationAttachment)]
    #[case("foo.expects(:bar).with(1).never", Construct::NegationAttachment)]
    #[case("foo.expects(:bar).returns(1).never", Construct::NegationAttachment)]
    #[case("foo.expects(:bar).raises(Error)", Construct::ExceptionAttachment)]
    #[case("foo.stubs(:a).returns(1).then.returns(2)", Construct::SequentialReturns)]
    #[case("expect_some_method.never", Construct::Unrecognized)]
    #[case("foo.expects(:bar).with(1)", Construct::Unrecognized)]
    #[case("foo.stubs(:a, :b)", Construct::Unrecognized)]
    #[case("foo.stubs", Construct::Unrecognized)]
    #[case("foo.stubs(:a) { 1 }", Construct::Unrecognized)]
    #[case("foo.stubs(:a).returns(*list)", Construct::SpreadReturns)]
    #[case("foo.stubs(:a).returns(1, &blk)", Construct::SpreadReturns)]
    #[case("foo.expects(:a).returns(**opts).never", Construct::SpreadReturns)]
    #[case("stubs(:a)", Construct::Unrecognized)]
    #[case("foo.stub(:a)", Construct::Unrecognized)]
    fn classifies_constructs(#[case] source: &str, #[case] expected: Construct) {
        assert_eq!(classify(&statement(source)), expected);
    }

    #[test]
    fn declaration_beneath_steps_over_with() {
        let source = "foo.expects(:bar).with(1, 2)";
        let node = statement(source);

        let found = declaration_beneath(&node).expect("declaration");
        assert_eq!(found.span.text(source), "foo.expects(:bar)");
    }

    #[test]
    fn declaration_beneath_steps_over_returns() {
        let source = "foo.expects(:bar).with(1).returns(2)";
        let node = statement(source);

        let found = declaration_beneath(&node).expect("declaration");
        assert_eq!(found.span.text(source), "foo.expects(:bar)");
    }

    #[test]
    fn unrecognized_nodes_queue_nothing() {
        let source = "describe Foo do\n  it { expect(1).to eq(1) }\nend";
        let node = statement(source);
        let mut dispatcher = Dispatcher::new(source);

        dispatcher.dispatch(&node).expect("dispatch");

        let (edits, conversions) = dispatcher.finish();
        assert!(edits.is_empty());
        assert_eq!(conversions, 0);
    }
}
