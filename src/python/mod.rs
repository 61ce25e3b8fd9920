//! The project's Python side: virtualenv layout, interpreter invocation and
//! the snippets envkit runs inside it.

pub mod interpreter;
pub mod scripts;
pub mod venv;

pub use interpreter::{parse_fields, required_field, run_probe, Interpreter};
pub use venv::VirtualEnv;
