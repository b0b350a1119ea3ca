//! Owned syntax model lowered from the Tree-sitter Ruby tree.
//!
//! The rewrite rules only care about a handful of shapes: method calls with
//! their receiver chain, hash pairs, and bare identifiers. Everything else is
//! kept as an opaque [`NodeKind::Other`] so the dispatcher can still descend
//! into it. Each node records the byte spans of the sub-tokens the rules edit
//! (the call operator, the method name, the argument delimiters and the pair
//! separator), so no rule needs to re-scan source text to find them.

use crate::parser::ParseResult;
use crate::span::Span;

/// Field names whose identifier children introduce a binding rather than
/// read a value.
const BINDING_FIELDS: &[&str] = &["name", "left", "alias", "pattern"];

/// Parent kinds whose unnamed identifier children are bindings.
const BINDING_PARENTS: &[&str] = &[
    "alias",
    "undef",
    "exception_variable",
    "destructured_left_hand_side",
    "destructured_parameter",
    "left_assignment_list",
    "rest_assignment",
];

/// Node kinds never counted as call arguments.
const NON_ARGUMENT_KINDS: &[&str] = &["comment", "heredoc_body"];

/// Argument forms that expand into, or bind, several values.
const SPREAD_KINDS: &[&str] = &["splat_argument", "hash_splat_argument", "block_argument"];

/// Lowered syntax tree for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: Node,
}

impl SyntaxTree {
    /// Lowers a clean parse result into the owned node model.
    #[must_use]
    pub fn lower(parsed: &ParseResult) -> Self {
        let root = lower_node(parsed.root_node(), parsed.source(), false);
        Self { root }
    }

    /// Returns the top-level node (the Ruby `program`).
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }
}

/// A node of the lowered syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// The shape of the node.
    pub kind: NodeKind,
    /// The full byte span of the node.
    pub span: Span,
}

/// The shapes the rewrite rules distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A method call, with or without receiver, arguments and block.
    Call(Call),
    /// A hash pair, either `key: value` or `key => value`.
    Pair(Pair),
    /// An identifier read in value position.
    Identifier(String),
    /// Any other construct, opaque apart from its named children.
    Other {
        /// The Tree-sitter node kind.
        kind: &'static str,
        /// Lowered named children, in source order.
        children: Vec<Node>,
    },
}

/// A method call such as `receiver.method(args) { block }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// The receiver expression, absent for bare calls.
    pub receiver: Option<Box<Node>>,
    /// The `.`, `&.` or `::` operator token.
    pub dot: Option<Span>,
    /// The method name token.
    pub selector: Span,
    /// The method name text.
    pub method: String,
    /// The argument list, absent when the call has none.
    pub arguments: Option<Arguments>,
    /// An attached `{ }` or `do end` block.
    pub block: Option<Box<Node>>,
}

impl Call {
    /// Returns `true` if the call invokes `name`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.method == name
    }

    /// Returns the argument items, empty when there is no argument list.
    #[must_use]
    pub fn items(&self) -> &[Node] {
        self.arguments
            .as_ref()
            .map_or(&[], |arguments| arguments.items.as_slice())
    }

    /// Returns the receiver as a call, if it is one.
    #[must_use]
    pub fn receiver_call(&self) -> Option<&Call> {
        self.receiver.as_deref().and_then(Node::as_call)
    }
}

/// An argument list with its optional parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    /// Span of the whole list, including parentheses when present.
    pub span: Span,
    /// The opening parenthesis.
    pub open: Option<Span>,
    /// The closing parenthesis.
    pub close: Option<Span>,
    /// The arguments, excluding comments.
    pub items: Vec<Node>,
}

impl Arguments {
    /// Returns the span from the first item start to the last item end.
    #[must_use]
    pub fn items_span(&self) -> Option<Span> {
        let first = self.items.first()?;
        let last = self.items.last()?;
        Some(first.span.cover(last.span))
    }
}

/// How a hash pair spells its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyNotation {
    /// `key: value` or `"key": value`.
    Label,
    /// `key => value`.
    Rocket,
}

/// A hash pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// The key expression.
    pub key: Box<Node>,
    /// The `:` or `=>` token.
    pub separator: Span,
    /// The key notation, as read from the separator.
    pub notation: KeyNotation,
    /// The value expression.
    pub value: Box<Node>,
}

impl Node {
    /// Returns the node as a call, if it is one.
    #[must_use]
    pub const fn as_call(&self) -> Option<&Call> {
        match &self.kind {
            NodeKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Returns the node as a pair, if it is one.
    #[must_use]
    pub const fn as_pair(&self) -> Option<&Pair> {
        match &self.kind {
            NodeKind::Pair(pair) => Some(pair),
            _ => None,
        }
    }

    /// Returns `true` for hash pairs.
    #[must_use]
    pub const fn is_pair(&self) -> bool {
        matches!(self.kind, NodeKind::Pair(_))
    }

    /// Returns `true` for `*values`, `**options` and `&block` arguments.
    #[must_use]
    pub fn is_spread(&self) -> bool {
        matches!(&self.kind, NodeKind::Other { kind, .. } if SPREAD_KINDS.contains(kind))
    }

    /// Returns the child nodes the dispatcher descends into.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match &self.kind {
            NodeKind::Call(call) => call
                .receiver
                .as_deref()
                .into_iter()
                .chain(call.items())
                .chain(call.block.as_deref())
                .collect(),
            NodeKind::Pair(pair) => vec![pair.key.as_ref(), pair.value.as_ref()],
            NodeKind::Identifier(_) => Vec::new(),
            NodeKind::Other { children, .. } => children.iter().collect(),
        }
    }
}

fn span_of(node: tree_sitter::Node<'_>) -> Span {
    Span::from(node.byte_range())
}

fn text_of(node: tree_sitter::Node<'_>, source: &str) -> String {
    span_of(node).text(source).to_owned()
}

fn lower_node(node: tree_sitter::Node<'_>, source: &str, binding: bool) -> Node {
    let shaped = match node.kind() {
        "call" => lower_call(node, source),
        "pair" => lower_pair(node, source),
        "identifier" if !binding => Some(NodeKind::Identifier(text_of(node, source))),
        _ => None,
    };
    let kind = shaped.unwrap_or_else(|| NodeKind::Other {
        kind: node.kind(),
        children: lower_children(node, source),
    });
    Node {
        kind,
        span: span_of(node),
    }
}

fn lower_children(node: tree_sitter::Node<'_>, source: &str) -> Vec<Node> {
    let parent = node.kind();
    let mut children = Vec::new();
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if child.is_named() {
                let binding = is_binding(parent, cursor.field_name());
                children.push(lower_node(child, source, binding));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    children
}

fn is_binding(parent: &str, field: Option<&str>) -> bool {
    match field {
        Some(name) => BINDING_FIELDS.contains(&name),
        None => parent.ends_with("parameters") || BINDING_PARENTS.contains(&parent),
    }
}

fn lower_call(node: tree_sitter::Node<'_>, source: &str) -> Option<NodeKind> {
    let method = node.child_by_field_name("method")?;
    let receiver = node
        .child_by_field_name("receiver")
        .map(|receiver| Box::new(lower_node(receiver, source, false)));
    let dot = node
        .child_by_field_name("operator")
        .or_else(|| find_anonymous(node, &[".", "&.", "::"]))
        .map(span_of);
    let arguments = node
        .child_by_field_name("arguments")
        .map(|list| lower_arguments(list, source));
    let block = node
        .child_by_field_name("block")
        .map(|block| Box::new(lower_node(block, source, false)));

    Some(NodeKind::Call(Call {
        receiver,
        dot,
        selector: span_of(method),
        method: text_of(method, source),
        arguments,
        block,
    }))
}

fn lower_arguments(list: tree_sitter::Node<'_>, source: &str) -> Arguments {
    let mut open = None;
    let mut close = None;
    let mut items = Vec::new();
    let mut cursor = list.walk();
    for child in list.children(&mut cursor) {
        match child.kind() {
            "(" if !child.is_named() => open = Some(span_of(child)),
            ")" if !child.is_named() => close = Some(span_of(child)),
            kind if child.is_named() && !NON_ARGUMENT_KINDS.contains(&kind) => {
                items.push(lower_node(child, source, false));
            }
            _ => {}
        }
    }
    Arguments {
        span: span_of(list),
        open,
        close,
        items,
    }
}

fn lower_pair(node: tree_sitter::Node<'_>, source: &str) -> Option<NodeKind> {
    let key = node.child_by_field_name("key")?;
    let value = node.child_by_field_name("value")?;
    let separator = find_anonymous(node, &["=>", ":"])?;
    let notation = if separator.kind() == "=>" {
        KeyNotation::Rocket
    } else {
        KeyNotation::Label
    };
    Some(NodeKind::Pair(Pair {
        key: Box::new(lower_node(key, source, true)),
        separator: span_of(separator),
        notation,
        value: Box::new(lower_node(value, source, false)),
    }))
}

fn find_anonymous<'tree>(
    node: tree_sitter::Node<'tree>,
    kinds: &[&str],
) -> Option<tree_sitter::Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|child| !child.is_named() && kinds.contains(&child.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::SourceLanguage;
    use crate::parser::Parser;

    fn lower(source: &str) -> SyntaxTree {
        let mut parser = Parser::new(SourceLanguage::Ruby).expect("parser init");
        let parsed = parser.parse(source).expect("parse");
        assert!(!parsed.has_errors(), "fixture should parse: {source}");
        SyntaxTree::lower(&parsed)
    }

    fn find<'a>(node: &'a Node, pred: &dyn Fn(&Node) -> bool) -> Option<&'a Node> {
        if pred(node) {
            return Some(node);
        }
        node.children().into_iter().find_map(|child| find(child, pred))
    }

    fn find_call<'a>(tree: &'a SyntaxTree, method: &str) -> &'a Call {
        find(tree.root(), &|node| {
            node.as_call().is_some_and(|call| call.is(method))
        })
        .and_then(Node::as_call)
        .expect("call present")
    }

    #[test]
    fn lowers_parenthesised_call() {
        let source = "subject.stubs(:yes)";
        let tree = lower(source);
        let call = find_call(&tree, "stubs");

        assert_eq!(call.selector.text(source), "stubs");
        assert_eq!(call.dot.map(|dot| dot.text(source)), Some("."));
        let arguments = call.arguments.as_ref().expect("arguments");
        assert_eq!(arguments.open.map(|open| open.text(source)), Some("("));
        assert_eq!(arguments.close.map(|close| close.text(source)), Some(")"));
        assert_eq!(arguments.items.len(), 1);
        assert!(matches!(
            call.receiver.as_deref().map(|node| &node.kind),
            Some(NodeKind::Identifier(name)) if name == "subject"
        ));
    }

    #[test]
    fn lowers_command_call_pairs() {
        let source = "subject.stubs fares: []";
        let tree = lower(source);
        let call = find_call(&tree, "stubs");

        let arguments = call.arguments.as_ref().expect("arguments");
        assert!(arguments.open.is_none());
        let pair = call.items().first().and_then(Node::as_pair).expect("pair");
        assert_eq!(pair.notation, KeyNotation::Label);
        assert_eq!(pair.key.span.text(source), "fares");
        assert_eq!(pair.value.span.text(source), "[]");
    }

    #[test]
    fn reads_rocket_notation_from_separator() {
        let source = "subject.stubs(:persisted? => true)";
        let tree = lower(source);
        let call = find_call(&tree, "stubs");

        let pair = call.items().first().and_then(Node::as_pair).expect("pair");
        assert_eq!(pair.notation, KeyNotation::Rocket);
        assert_eq!(pair.separator.text(source), "=>");
        assert_eq!(pair.key.span.text(source), ":persisted?");
    }

    #[test]
    fn bare_identifier_in_block_is_a_value() {
        let tree = lower("let(:foo) { stub }");
        let found = find(tree.root(), &|node| {
            matches!(&node.kind, NodeKind::Identifier(name) if name == "stub")
        });
        assert!(found.is_some());
    }

    #[test]
    fn assignment_target_is_not_a_value() {
        let tree = lower("stub = 1");
        let found = find(tree.root(), &|node| {
            matches!(&node.kind, NodeKind::Identifier(name) if name == "stub")
        });
        assert!(found.is_none());
    }

    #[test]
    fn comments_are_not_arguments() {
        let source = "foo.stubs(\n  # note\n  bar: 1\n)";
        let tree = lower(source);
        let call = find_call(&tree, "stubs");

        assert_eq!(call.items().len(), 1);
        assert!(call.items().iter().all(Node::is_pair));
    }

    #[test]
    fn receiver_chain_is_navigable() {
        let tree = lower("Foo.expects(:new).with().returns(bar)");
        let returns = find_call(&tree, "returns");

        let with = returns.receiver_call().expect("with");
        assert!(with.is("with"));
        assert!(with.items().is_empty());
        assert!(with.receiver_call().is_some_and(|call| call.is("expects")));
    }
}
