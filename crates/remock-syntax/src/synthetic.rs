//! Synthetic nodes built by rules and fed back to the dispatcher.
//!
//! A synthetic node never owns text. It borrows the span of the real node it
//! was derived from and records which sub-regions its renderer will edit.
//! Construction checks that every such region lies inside the borrowed span.

use crate::error::SyntaxError;
use crate::span::Span;
use crate::tree::{Arguments, Call, KeyNotation, Node};

/// Whether a rendered declaration asserts or denies the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// `to receive`.
    #[default]
    Positive,
    /// `to_not receive`.
    Negated,
}

impl Polarity {
    /// Returns the RSpec connective verb.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Positive => "to",
            Self::Negated => "to_not",
        }
    }
}

/// The RSpec entry point a declaration renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavour {
    Allow,
    Expect,
}

impl Flavour {
    fn of(method: &str) -> Option<Self> {
        match method {
            "stubs" => Some(Self::Allow),
            "expects" => Some(Self::Expect),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Declaration<'t> {
    pub span: Span,
    pub call: &'t Call,
    pub subject: &'t Node,
    /// `.any_instance` between the subject and the declaration selector.
    pub qualifier: Option<Span>,
    pub flavour: Flavour,
    pub polarity: Polarity,
}

impl Declaration<'_> {
    pub const fn connective(&self) -> &'static str {
        match (self.flavour, self.qualifier.is_some()) {
            (Flavour::Allow, false) => "allow",
            (Flavour::Allow, true) => "allow_any_instance_of",
            (Flavour::Expect, false) => "expect",
            (Flavour::Expect, true) => "expect_any_instance_of",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Payload<'t> {
    /// `stubs(:name)`.
    Method(&'t Node),
    /// `stubs(name: value)`.
    Returning {
        key: &'t Node,
        notation: KeyNotation,
        value: &'t Node,
    },
    /// `stubs(a: 1, b: 2)`.
    Messages(&'t [Node]),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Receive<'t> {
    pub span: Span,
    /// The declaration selector the connective is inserted after.
    pub anchor: Span,
    pub arguments: &'t Arguments,
    pub polarity: Polarity,
    pub payload: Payload<'t>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Synthetic<'t> {
    Declaration(Declaration<'t>),
    Receive(Receive<'t>),
}

impl<'t> Synthetic<'t> {
    /// Builds a declaration from a `stubs`/`expects` call node.
    pub fn declaration(node: &'t Node, polarity: Polarity) -> Result<Self, SyntaxError> {
        let call = node
            .as_call()
            .ok_or_else(|| SyntaxError::internal_error("declaration built from a non-call node"))?;
        let flavour = Flavour::of(&call.method).ok_or_else(|| {
            SyntaxError::internal_error(format!("`{}` is not a declaration", call.method))
        })?;
        let receiver = call
            .receiver
            .as_deref()
            .ok_or_else(|| SyntaxError::internal_error("declaration without receiver"))?;

        let (subject, qualifier) = match any_instance_subject(receiver) {
            Some(inner) => (inner, Some(Span::new(inner.span.end, receiver.span.end))),
            None => (receiver, None),
        };

        let span = node.span;
        enclose("declaration", span, subject.span)?;
        enclose("declaration", span, call.selector)?;
        if let Some(region) = qualifier {
            enclose("declaration", span, region)?;
        }

        Ok(Self::Declaration(Declaration {
            span,
            call,
            subject,
            qualifier,
            flavour,
            polarity,
        }))
    }

    /// Builds the receive connective for a declaration.
    pub fn receive(declaration: &Declaration<'t>) -> Result<Self, SyntaxError> {
        let call = declaration.call;
        let arguments = call
            .arguments
            .as_ref()
            .ok_or_else(|| SyntaxError::internal_error("declaration without arguments"))?;
        let payload = match arguments.items.as_slice() {
            [single] => match single.as_pair() {
                Some(pair) => Payload::Returning {
                    key: &pair.key,
                    notation: pair.notation,
                    value: &pair.value,
                },
                None => Payload::Method(single),
            },
            [] => return Err(SyntaxError::internal_error("declaration without payload")),
            items => Payload::Messages(items),
        };

        let span = declaration.span;
        enclose("receive", span, call.selector)?;
        enclose("receive", span, arguments.span)?;

        Ok(Self::Receive(Receive {
            span,
            anchor: call.selector,
            arguments,
            polarity: declaration.polarity,
            payload,
        }))
    }

    /// Returns the borrowed span.
    pub const fn span(&self) -> Span {
        match self {
            Self::Declaration(declaration) => declaration.span,
            Self::Receive(receive) => receive.span,
        }
    }
}

/// Returns `x` for a receiver of the form `x.any_instance`.
fn any_instance_subject(receiver: &Node) -> Option<&Node> {
    let call = receiver.as_call()?;
    let plain = call.is("any_instance") && call.arguments.is_none() && call.block.is_none();
    if plain { call.receiver.as_deref() } else { None }
}

fn enclose(node: &'static str, span: Span, target: Span) -> Result<(), SyntaxError> {
    if span.contains(target) {
        Ok(())
    } else {
        Err(SyntaxError::invalid_synthetic_span(node, span, target))
    }
}
