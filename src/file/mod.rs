//! File I/O for workflow documents.

pub mod loader;
