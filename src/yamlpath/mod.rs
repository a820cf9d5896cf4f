//! Key-path matching over the workflow syntax tree.
//!
//! A key-path is the chain of mapping keys from the document root down to a
//! node. Sequence positions are not part of it: the `run` key of any step of
//! any job has the path `jobs.<job>.steps.run`.
//!
//! # Pattern Syntax
//!
//! - `key` - Literal mapping key (case-sensitive)
//! - `*` or `[*]` - Any key at this depth
//! - `['a.b']` - Bracket notation for keys containing separators
//! - `$` - Optional root marker
//!
//! # Examples
//!
//! ```
//! // jobs.*.steps.run - every step command
//! // jobs.*.runs-on - the runner of every job
//! // on.push.branches - push trigger branches
//! ```

pub mod ast;
pub mod element;
pub mod error;
pub mod evaluator;
pub mod locator;
pub mod parser;

pub use ast::{KeyPath, PathSegment};
pub use element::Element;
pub use error::YamlPathError;
pub use evaluator::Evaluator;
pub use locator::{locate, Located};
pub use parser::Parser;
