//! Virtualenv preparation and selective package installation.
//!
//! A run is four steps, each logged to the [`InstallLog`]:
//!
//! 1. create the virtualenv unless its directory exists
//! 2. upgrade pip inside it
//! 3. install the pinned accelerator stack unless every package is present
//! 4. reconcile the requirements file against `pip freeze`
//!
//! External command failures are logged and the run continues. Only a
//! missing requirements file or an unwritable log stops it.

pub mod log;

pub use log::{header_line, InstallLog, LogLevel, COMPLETION_LINE};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::{resolve_path, EnvkitConfig};
use crate::error::Result;
use crate::python::{Interpreter, VirtualEnv};
use crate::requirements::{bare_name, read_requirements, reconcile, InstalledSnapshot};
use crate::shell::{CommandResult, CommandSpec, ProcessRunner};
use crate::ui::{format_duration, UserInterface};

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSummary {
    /// The virtualenv creation command was issued.
    pub venv_created: bool,
    /// The pinned stack install command was issued.
    pub pinned_installed: bool,
    /// Requirements handed to the final `pip install`, in file order.
    pub queued: Vec<String>,
}

/// Prepares the project's virtualenv.
pub struct EnvironmentInstaller<'a> {
    project_root: PathBuf,
    config: &'a EnvkitConfig,
    runner: &'a dyn ProcessRunner,
    venv: VirtualEnv,
    log: InstallLog,
}

impl<'a> EnvironmentInstaller<'a> {
    /// Create an installer for the project at `project_root`.
    ///
    /// A relative root is resolved against the current directory.
    pub fn new(
        project_root: &Path,
        config: &'a EnvkitConfig,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        let project_root =
            std::path::absolute(project_root).unwrap_or_else(|_| project_root.to_path_buf());
        Self {
            config,
            runner,
            venv: VirtualEnv::new(resolve_path(&project_root, &config.venv)),
            log: InstallLog::new(resolve_path(&project_root, &config.install.log_file)),
            project_root,
        }
    }

    /// Run every step in order.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<InstallSummary> {
        self.log.append("")?;
        self.log
            .record(ui, LogLevel::Info, &header_line(Local::now()))?;

        let venv_created = self.ensure_environment(ui)?;
        self.upgrade_pip(ui)?;
        let pinned_installed = self.install_pinned_stack(ui)?;
        let queued = self.reconcile_requirements(ui)?;

        self.log.record(ui, LogLevel::Success, COMPLETION_LINE)?;
        self.log.append("")?;

        Ok(InstallSummary {
            venv_created,
            pinned_installed,
            queued,
        })
    }

    /// Create the virtualenv if its directory is missing.
    ///
    /// Returns whether the creation command was issued. An existing
    /// directory is trusted as-is.
    pub fn ensure_environment(&self, ui: &mut dyn UserInterface) -> Result<bool> {
        if self.venv.exists() {
            self.log.record(
                ui,
                LogLevel::Success,
                &format!(
                    "Virtual environment {} exists, skipping creation",
                    self.venv.root().display()
                ),
            )?;
            return Ok(false);
        }

        self.log
            .record(ui, LogLevel::Info, "Creating virtual environment...")?;
        let spec = Interpreter::new(&self.config.python)
            .command()
            .args(["-m", "venv"])
            .arg(self.venv.root().to_string_lossy())
            .current_dir(&self.project_root);
        self.run_logged(ui, &spec)?;
        Ok(true)
    }

    /// Upgrade pip inside the virtualenv. A failed upgrade is only logged.
    pub fn upgrade_pip(&self, ui: &mut dyn UserInterface) -> Result<()> {
        self.log.record(ui, LogLevel::Info, "Upgrading pip...")?;
        let spec = self.pip(["install", "--upgrade", "pip"]);
        self.run_logged(ui, &spec)?;
        Ok(())
    }

    /// Install the pinned stack unless `pip show` finds every package.
    ///
    /// Returns whether the install command was issued.
    pub fn install_pinned_stack(&self, ui: &mut dyn UserInterface) -> Result<bool> {
        let pinned = &self.config.install.pinned;
        if pinned.packages.is_empty() {
            return Ok(false);
        }

        let mut all_present = true;
        for package in &pinned.packages {
            let name = bare_name(package);
            let present = self.package_installed(name);
            tracing::debug!("pip show {}: present={}", name, present);
            all_present &= present;
        }

        if all_present {
            self.log.record(
                ui,
                LogLevel::Success,
                "Pinned package stack already installed, skipping",
            )?;
            return Ok(false);
        }

        self.log.record(
            ui,
            LogLevel::Info,
            &format!("Installing pinned package stack: {}", pinned.packages.join(" ")),
        )?;

        let mut spec = self
            .pip(["install", "--upgrade", "--no-cache-dir"])
            .args(pinned.packages.iter().cloned());
        if let Some(url) = &pinned.extra_index_url {
            spec = spec.arg("--extra-index-url").arg(url.as_str());
        }

        let mut spinner = ui.start_spinner("Installing pinned package stack...");
        let result = self.runner.run(&spec);
        spinner.clear();
        self.log_result(ui, &spec, result, "Pinned package stack installed")?;
        Ok(true)
    }

    /// Snapshot installed packages and install whatever the requirements
    /// file lists that the snapshot lacks.
    ///
    /// Returns the queued requirements.
    ///
    /// # Errors
    ///
    /// `RequirementsNotFound` when the requirements file is missing. The
    /// failure is logged before it is returned.
    pub fn reconcile_requirements(&self, ui: &mut dyn UserInterface) -> Result<Vec<String>> {
        let install = &self.config.install;
        self.log.record(
            ui,
            LogLevel::Info,
            "Checking for missing or outdated packages...",
        )?;

        let listing = self.freeze(ui)?;
        let snapshot_path = resolve_path(&self.project_root, &install.snapshot_file);
        fs::write(&snapshot_path, &listing)?;
        let snapshot = InstalledSnapshot::from_listing(&listing);

        let requirements_path = resolve_path(&self.project_root, &install.requirements);
        let requirements = match read_requirements(&requirements_path) {
            Ok(requirements) => requirements,
            Err(e) => {
                self.log.record(ui, LogLevel::Error, &e.to_string())?;
                return Err(e);
            }
        };

        let queued = reconcile(&requirements, &snapshot, install.match_mode);
        if queued.is_empty() {
            self.log.record(
                ui,
                LogLevel::Success,
                "All required packages are already installed",
            )?;
            return Ok(queued);
        }

        self.log.record(
            ui,
            LogLevel::Info,
            &format!("Packages to install or upgrade: {}", queued.join(", ")),
        )?;
        let spec = self
            .pip(["install", "--upgrade", "--no-cache-dir"])
            .args(queued.iter().cloned());

        let mut spinner = ui.start_spinner("Installing missing packages...");
        let result = self.runner.run(&spec);
        spinner.clear();
        self.log_result(ui, &spec, result, "Missing packages installed")?;
        Ok(queued)
    }

    fn pip<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Interpreter::new(self.venv.python())
            .pip(args)
            .current_dir(&self.project_root)
    }

    fn package_installed(&self, name: &str) -> bool {
        let spec = self.pip(["show", name]);
        matches!(self.runner.run(&spec), Ok(result) if result.success)
    }

    fn freeze(&self, ui: &mut dyn UserInterface) -> Result<String> {
        let spec = self.pip(["freeze"]);
        match self.runner.run(&spec) {
            Ok(result) if result.success => Ok(result.stdout),
            Ok(result) => {
                self.log.record(
                    ui,
                    LogLevel::Warning,
                    &format!("pip freeze failed: {}", result.failure_message()),
                )?;
                Ok(String::new())
            }
            Err(e) => {
                self.log
                    .record(ui, LogLevel::Warning, &format!("pip freeze failed: {}", e))?;
                Ok(String::new())
            }
        }
    }

    fn run_logged(&self, ui: &mut dyn UserInterface, spec: &CommandSpec) -> Result<bool> {
        let result = self.runner.run(spec);
        self.log_result(ui, spec, result, "")
    }

    /// Log a command's output and outcome. Returns whether it succeeded.
    fn log_result(
        &self,
        ui: &mut dyn UserInterface,
        spec: &CommandSpec,
        result: Result<CommandResult>,
        done: &str,
    ) -> Result<bool> {
        self.log.append(&format!("$ {}", spec.display()))?;
        if ui.output_mode().shows_commands() {
            ui.message(&format!("$ {}", spec.display()));
        }

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                self.log.record(
                    ui,
                    LogLevel::Error,
                    &format!("Could not run {}: {}", command_name(spec), e),
                )?;
                return Ok(false);
            }
        };

        for stream in [&result.stdout, &result.stderr] {
            let trimmed = stream.trim();
            if !trimmed.is_empty() {
                self.log.record(ui, LogLevel::Output, trimmed)?;
            }
        }

        if result.success {
            tracing::debug!("{} took {}", spec.display(), format_duration(result.duration));
            if !done.is_empty() {
                self.log.record(ui, LogLevel::Success, done)?;
            }
        } else {
            self.log.record(
                ui,
                LogLevel::Error,
                &format!(
                    "{} failed: {}",
                    command_name(spec),
                    result.failure_message()
                ),
            )?;
        }
        Ok(result.success)
    }
}

fn command_name(spec: &CommandSpec) -> String {
    let program = PathBuf::from(spec.program());
    let mut name = program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string());
    for arg in spec.arguments().iter().take(3) {
        name.push(' ');
        name.push_str(arg);
    }
    name
}
