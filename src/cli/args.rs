//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// envkit - Python ML environment diagnostics and setup.
#[derive(Debug, Parser)]
#[command(name = "envkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .envkit/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Also echo each external command line
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Hide external command output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the environment diagnostic (default if no command specified)
    Report(ReportArgs),

    /// Prepare the virtualenv and install missing packages
    Install(InstallArgs),

    /// Print GPU, driver and runtime versions
    Gpu(GpuArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `report` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ReportArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Requirements file (overrides install.requirements)
    #[arg(short, long, value_name = "PATH")]
    pub requirements: Option<PathBuf>,
}

/// Arguments for the `gpu` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GpuArgs {
    /// Skip the nvidia-smi driver query
    #[arg(long)]
    pub no_driver: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["envkit"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn report_json_flag() {
        let cli = Cli::try_parse_from(["envkit", "report", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Report(args)) => assert!(args.json),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["envkit", "install", "-q", "-p", "/tmp/proj"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.project, Some(PathBuf::from("/tmp/proj")));
        assert!(matches!(cli.command, Some(Commands::Install(_))));
    }

    #[test]
    fn install_requirements_override() {
        let cli = Cli::try_parse_from(["envkit", "install", "-r", "dev.txt"]).unwrap();
        match cli.command {
            Some(Commands::Install(args)) => {
                assert_eq!(args.requirements, Some(PathBuf::from("dev.txt")))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["envkit", "-v", "-q"]).is_err());
    }

    #[test]
    fn completions_requires_shell() {
        assert!(Cli::try_parse_from(["envkit", "completions"]).is_err());
        let cli = Cli::try_parse_from(["envkit", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions(CompletionsArgs { shell: Shell::Bash }))
        ));
    }
}
