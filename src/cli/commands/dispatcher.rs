//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands, ReportArgs};
use crate::error::Result;
use crate::shell::{ProcessRunner, SystemRunner};
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
    runner: Box<dyn ProcessRunner>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self {
            project_root,
            runner: Box::new(SystemRunner),
        }
    }

    /// Replace the process runner used by every command.
    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = cli.config.as_deref();
        let runner = self.runner.as_ref();

        match &cli.command {
            Some(Commands::Report(args)) => {
                let cmd = super::report::ReportCommand::new(
                    &self.project_root,
                    config,
                    args.clone(),
                    runner,
                );
                cmd.execute(ui)
            }
            Some(Commands::Install(args)) => {
                let cmd = super::install::InstallCommand::new(
                    &self.project_root,
                    config,
                    args.clone(),
                    runner,
                );
                cmd.execute(ui)
            }
            Some(Commands::Gpu(args)) => {
                let cmd =
                    super::gpu::GpuCommand::new(&self.project_root, config, args.clone(), runner);
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                // Default to the report
                let cmd = super::report::ReportCommand::new(
                    &self.project_root,
                    config,
                    ReportArgs::default(),
                    runner,
                );
                cmd.execute(ui)
            }
        }
    }
}
