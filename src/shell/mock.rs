//! Scripted process runner for testing.
//!
//! `MockRunner` implements [`ProcessRunner`] without spawning anything.
//! Responses are matched against [`CommandSpec::display`] by substring,
//! first match wins, and every invocation is recorded for assertions.
//!
//! # Example
//!
//! ```
//! use envkit::shell::{CommandSpec, MockRunner, ProcessRunner};
//!
//! let runner = MockRunner::new();
//! runner.succeed("pip show torch", "Name: torch");
//!
//! let result = runner.run(&CommandSpec::new("python").args(["-m", "pip", "show", "torch"])).unwrap();
//! assert!(result.success);
//! assert!(runner.was_run("pip show torch"));
//! ```

use std::cell::RefCell;
use std::time::Duration;

use crate::error::{EnvkitError, Result};

use super::command::{CommandResult, CommandSpec, ProcessRunner};

#[derive(Debug, Clone)]
enum Response {
    Result(CommandResult),
    SpawnError,
}

/// Process runner that replays scripted results.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: RefCell<Vec<(String, Response)>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl MockRunner {
    /// Create a runner where every unscripted command exits with code 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands matching `pattern` exit 0 with the given stdout.
    pub fn succeed(&self, pattern: &str, stdout: &str) {
        self.respond(
            pattern,
            CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO),
        );
    }

    /// Commands matching `pattern` exit with `code` and the given stderr.
    pub fn fail(&self, pattern: &str, code: i32, stderr: &str) {
        self.respond(
            pattern,
            CommandResult::failure(Some(code), String::new(), stderr.to_string(), Duration::ZERO),
        );
    }

    /// Commands matching `pattern` return exactly `result`.
    pub fn respond(&self, pattern: &str, result: CommandResult) {
        self.responses
            .borrow_mut()
            .push((pattern.to_string(), Response::Result(result)));
    }

    /// Commands matching `pattern` cannot be spawned.
    pub fn spawn_error(&self, pattern: &str) {
        self.responses
            .borrow_mut()
            .push((pattern.to_string(), Response::SpawnError));
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Display strings of every command run so far.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandSpec::display).collect()
    }

    /// Whether any recorded command contains `pattern`.
    pub fn was_run(&self, pattern: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| c.display().contains(pattern))
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.calls.borrow_mut().push(spec.clone());
        let line = spec.display();

        let responses = self.responses.borrow();
        let found = responses
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, r)| r.clone());

        match found {
            Some(Response::Result(result)) => Ok(result),
            Some(Response::SpawnError) => Err(EnvkitError::CommandFailed {
                command: line,
                code: None,
            }),
            None => Ok(CommandResult::failure(
                Some(1),
                String::new(),
                format!("unscripted command: {}", line),
                Duration::ZERO,
            )),
        }
    }
}
