//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`envkit report`, `envkit install`)
//! - Shared config loading and process runner
//! - Consistent global flag handling

pub mod completions;
pub mod dispatcher;
pub mod gpu;
pub mod install;
pub mod report;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
