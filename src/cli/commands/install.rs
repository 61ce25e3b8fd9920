//! Install command implementation.
//!
//! The `envkit install` command prepares the project's virtualenv and
//! installs whatever the requirements file lists that is not yet present.

use std::path::{Path, PathBuf};

use crate::cli::args::InstallArgs;
use crate::config::load_config;
use crate::error::{EnvkitError, Result};
use crate::installer::EnvironmentInstaller;
use crate::shell::ProcessRunner;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The install command implementation.
pub struct InstallCommand<'a> {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: InstallArgs,
    runner: &'a dyn ProcessRunner,
}

impl<'a> InstallCommand<'a> {
    /// Create a new install command.
    pub fn new(
        project_root: &Path,
        config_path: Option<&Path>,
        args: InstallArgs,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
            runner,
        }
    }
}

impl Command for InstallCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut config = load_config(&self.project_root, self.config_path.as_deref())?;
        if let Some(requirements) = &self.args.requirements {
            config.install.requirements = requirements.clone();
        }

        let installer = EnvironmentInstaller::new(&self.project_root, &config, self.runner);
        match installer.run(ui) {
            Ok(summary) => {
                tracing::debug!(
                    "Install finished: venv created {}, pinned installed {}, {} queued",
                    summary.venv_created,
                    summary.pinned_installed,
                    summary.queued.len()
                );
                Ok(CommandResult::success())
            }
            // Already reported and logged by the installer.
            Err(EnvkitError::RequirementsNotFound { .. }) => Ok(CommandResult::failure(1)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use crate::shell::MockRunner;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_requirements_fails_once() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let cmd = InstallCommand::new(temp.path(), None, InstallArgs::default(), &runner);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert_eq!(
            ui.errors()
                .iter()
                .filter(|e| e.contains("requirements.txt"))
                .count(),
            1
        );
    }

    #[test]
    fn requirements_override_is_used() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dev.txt"), "pytest\n").unwrap();
        let runner = MockRunner::new();
        runner.succeed("pip freeze", "pytest==8.0.0\n");
        runner.succeed("", "");
        let args = InstallArgs {
            requirements: Some(PathBuf::from("dev.txt")),
        };
        let cmd = InstallCommand::new(temp.path(), None, args, &runner);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_success("All required packages are already installed"));
        assert!(!runner.was_run("--no-cache-dir"));
    }

    #[test]
    fn completed_install_succeeds() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("requirements.txt"), "flask\n").unwrap();
        let runner = MockRunner::new();
        runner.succeed("", "");
        let cmd = InstallCommand::new(temp.path(), None, InstallArgs::default(), &runner);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(runner.was_run("--no-cache-dir flask"));
        assert!(ui.has_success("Installation complete!"));
    }
}
