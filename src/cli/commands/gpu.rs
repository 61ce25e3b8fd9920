//! GPU command implementation.
//!
//! The `envkit gpu` command prints the torch build, CUDA runtime and device
//! information, followed by NVIDIA driver versions when nvidia-smi is there.

use std::path::{Path, PathBuf};

use crate::cli::args::GpuArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::gpu::{probe_gpu, query_drivers};
use crate::python::Interpreter;
use crate::shell::ProcessRunner;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The gpu command implementation.
pub struct GpuCommand<'a> {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: GpuArgs,
    runner: &'a dyn ProcessRunner,
}

impl<'a> GpuCommand<'a> {
    /// Create a new gpu command.
    pub fn new(
        project_root: &Path,
        config_path: Option<&Path>,
        args: GpuArgs,
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

impl Command for GpuCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let interpreter = Interpreter::resolve(&self.project_root, &config);

        let report = probe_gpu(self.runner, &interpreter)?;
        for line in report.lines() {
            ui.message(&line);
        }

        if !self.args.no_driver {
            for driver in query_drivers(self.runner) {
                ui.message(&format!(
                    "Driver version: {} ({})",
                    driver.driver_version, driver.name
                ));
            }
        }

        Ok(CommandResult::success())
    }
}
