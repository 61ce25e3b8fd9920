//! Structured process execution and platform detection.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{execute, CommandResult, CommandSpec, ProcessRunner, SystemRunner};
pub use mock::MockRunner;
pub use platform::{is_ci, is_windows};
