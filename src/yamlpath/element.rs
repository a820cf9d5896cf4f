//! Uniform view over the things a caret can land on.

use crate::document::node::{Node, Pair, Span};

/// Either a node or a mapping entry.
///
/// Only pairs carry a key. The children of a pair are the pairs or items of
/// its value; a pair whose value is a scalar has none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element<'a> {
    Node(&'a Node),
    Pair(&'a Pair),
}

impl<'a> Element<'a> {
    pub fn span(&self) -> Span {
        match self {
            Element::Node(node) => node.span(),
            Element::Pair(pair) => pair.span,
        }
    }

    /// The key of a pair, `None` for plain nodes.
    pub fn key(&self) -> Option<&'a str> {
        match self {
            Element::Pair(pair) => Some(pair.key.value.as_str()),
            Element::Node(_) => None,
        }
    }

    /// The node holding the value: the pair's value or the node itself.
    pub fn value_node(&self) -> &'a Node {
        match self {
            Element::Node(node) => node,
            Element::Pair(pair) => &pair.value,
        }
    }

    pub fn as_pair(&self) -> Option<&'a Pair> {
        match self {
            Element::Pair(pair) => Some(pair),
            Element::Node(_) => None,
        }
    }

    /// Child elements in document order.
    pub fn children(&self) -> Children<'a> {
        match self.value_node() {
            Node::Mapping(mapping) => Children::Pairs(mapping.pairs.iter()),
            Node::Sequence(sequence) => Children::Items(sequence.items.iter()),
            Node::Scalar(_) => Children::Leaf,
        }
    }
}

/// Iterator over the children of an [`Element`].
pub enum Children<'a> {
    Pairs(std::slice::Iter<'a, Pair>),
    Items(std::slice::Iter<'a, Node>),
    Leaf,
}

impl<'a> Iterator for Children<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Children::Pairs(iter) => iter.next().map(Element::Pair),
            Children::Items(iter) => iter.next().map(Element::Node),
            Children::Leaf => None,
        }
    }
}
