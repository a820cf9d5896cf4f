//! Integration with the third-party command-runner extension.
//!
//! - `ranges`: turns a `run:` value into per-line command ranges
//! - `extension`: traits describing the runner and the queries it calls
//! - `bridge`: registers our queries with the runner on first use

pub mod bridge;
pub mod extension;
pub mod ranges;

pub use bridge::{BridgeState, CapabilityBridge, WorkflowCommandProvider};
pub use extension::{CommandLocationProvider, CommandRunnerHost, ExtensionError};
pub use ranges::{command_ranges, CommandRange};
