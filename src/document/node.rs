//! YAML syntax tree with source positions.
//!
//! Every node produced by the snapshot loader remembers where it came from in
//! the document text. Offsets are counted in characters (not bytes), matching
//! the markers reported by the YAML scanner.
//!
//! A node is one of three shapes: a mapping (ordered key/value [`Pair`]s), a
//! sequence (ordered items) or a scalar. Mapping entries are not nodes in their
//! own right but [`Pair`]s, which are the only elements that carry a key.
//!
//! # Example
//!
//! ```
//! use workflowlens::document::parser::parse_workflow;
//!
//! let snapshot = parse_workflow("name: CI\n").unwrap();
//! let pair = &snapshot.root().as_mapping().unwrap().pairs[0];
//! assert_eq!(pair.key.value, "name");
//! assert_eq!(pair.value.as_scalar().unwrap().value, "CI");
//! ```

use serde::Serialize;

/// A character range in the source text.
///
/// Spans are half-open (`end` is exclusive) when used to slice text. Caret
/// containment checks use [`Span::contains`], which treats `end` as inclusive
/// so a caret right after the last character still belongs to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns true if a caret at `offset` touches this span (both ends inclusive).
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The presentation style of a scalar in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` block scalar
    Literal,
    /// `>` block scalar
    Folded,
}

impl ScalarStyle {
    pub fn is_block(&self) -> bool {
        matches!(self, ScalarStyle::Literal | ScalarStyle::Folded)
    }
}

/// A scalar value together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarNode {
    pub span: Span,
    /// The decoded value (quotes removed, block content folded or kept).
    pub value: String,
    /// The text exactly as it appears in the source, including quotes and
    /// block indicators such as `|`.
    pub raw: String,
    pub style: ScalarStyle,
}

/// The key of a mapping entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub span: Span,
    pub value: String,
}

/// One `key: value` entry of a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    /// From the start of the key to the end of the value.
    pub span: Span,
    pub key: Key,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingNode {
    pub span: Span,
    pub pairs: Vec<Pair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceNode {
    pub span: Span,
    pub items: Vec<Node>,
}

/// A YAML node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(MappingNode),
    Sequence(SequenceNode),
    Scalar(ScalarNode),
}

impl Node {
    /// Returns the source span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Mapping(m) => m.span,
            Node::Sequence(s) => s.span,
            Node::Scalar(s) => s.span,
        }
    }

    pub(crate) fn span_mut(&mut self) -> &mut Span {
        match self {
            Node::Mapping(m) => &mut m.span,
            Node::Sequence(s) => &mut s.span,
            Node::Scalar(s) => &mut s.span,
        }
    }

    pub fn as_mapping(&self) -> Option<&MappingNode> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceNode> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for mappings and sequences.
    pub fn is_container(&self) -> bool {
        !matches!(self, Node::Scalar(_))
    }
}
