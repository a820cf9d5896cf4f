//! Document model: syntax tree, snapshot loader and position translation.
//!
//! - `node`: tagged YAML syntax tree with character spans
//! - `parser`: builds a [`Snapshot`] from text using `yaml-rust2`
//! - `tree`: the immutable [`Snapshot`] handed to queries
//! - `line_index`: character offset to editor position translation
//! - `text`: the editor's live [`TextDocument`]

pub mod error;
pub mod line_index;
pub mod node;
pub mod parser;
pub mod text;
pub mod tree;

pub use error::DocumentError;
pub use line_index::LineIndex;
pub use node::{Key, MappingNode, Node, Pair, ScalarNode, ScalarStyle, SequenceNode, Span};
pub use parser::parse_workflow;
pub use text::TextDocument;
pub use tree::Snapshot;
