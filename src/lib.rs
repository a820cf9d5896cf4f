//! Language intelligence for GitHub Actions workflow files.
//!
//! The core answers two questions about a workflow document: which node sits
//! under the caret (and under which keys), and which nodes match a key-path
//! pattern such as `jobs.*.steps.run`. On top of that, `run:` blocks are cut
//! into per-line command ranges for a command-runner extension, and an
//! external linter is adapted into diagnostics, hover and completion.
//!
//! - [`document`]: syntax tree with source spans
//! - [`yamlpath`]: key-paths, the locator and the collector
//! - [`runner`]: command ranges and the command-runner bridge
//! - [`language`]: linter-backed editor features
//! - [`session`]: editor event routing
//! - [`config`]: user settings
//! - [`file`]: loading documents for the CLI

pub mod config;
pub mod document;
pub mod file;
pub mod language;
pub mod runner;
pub mod session;
pub mod yamlpath;
