//! Report command implementation.
//!
//! The `envkit report` command runs the environment diagnostic. It is also
//! what runs when no subcommand is given.

use std::path::{Path, PathBuf};

use crate::cli::args::ReportArgs;
use crate::config::load_config;
use crate::error::{EnvkitError, Result};
use crate::report::{ReportContext, Reporter};
use crate::shell::ProcessRunner;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The report command implementation.
pub struct ReportCommand<'a> {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ReportArgs,
    runner: &'a dyn ProcessRunner,
}

impl<'a> ReportCommand<'a> {
    /// Create a new report command.
    pub fn new(
        project_root: &Path,
        config_path: Option<&Path>,
        args: ReportArgs,
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

impl Command for ReportCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        let mut ctx = ReportContext::from_env(&self.project_root, &config, self.runner);
        let reporter = Reporter::new(&config.report);

        if self.args.json {
            let report = reporter.collect(&mut ctx);
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| EnvkitError::Other(e.into()))?;
            ui.message(&json);
        } else {
            let report = reporter.run(&mut ctx, ui);
            tracing::debug!(
                "Report finished with {} sections, ready: {}",
                report.sections.len(),
                report.ready
            );
        }

        // Problems found by the checks never change the exit code.
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".envkit")).unwrap();
        fs::write(temp.path().join(".envkit/config.yml"), config).unwrap();
        temp
    }

    #[test]
    fn report_succeeds_when_nothing_works() {
        let temp = setup_project("token_env: ENVKIT_TEST_UNSET_TOKEN\n");
        let runner = MockRunner::new();
        runner.spawn_error("");
        let cmd = ReportCommand::new(temp.path(), None, ReportArgs::default(), &runner);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_warning("ENVKIT_TEST_UNSET_TOKEN is not set"));
        assert!(ui.has_warning("Some modules are missing"));
    }

    #[test]
    fn report_uses_configured_modules() {
        let temp = setup_project("report:\n  modules:\n    - { name: numpy, import: numpy }\n");
        let runner = MockRunner::new();
        runner.succeed("import_module", "version=1.26.4\n");
        let cmd = ReportCommand::new(temp.path(), None, ReportArgs::default(), &runner);
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_success("numpy (version: 1.26.4)"));
        assert!(ui.has_success("Environment ready"));
    }

    #[test]
    fn report_json_is_one_document() {
        let temp = setup_project("");
        let runner = MockRunner::new();
        let cmd = ReportCommand::new(temp.path(), None, ReportArgs { json: true }, &runner);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.headers().is_empty());
        assert_eq!(ui.messages().len(), 1);
        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value["ready"], false);
        assert_eq!(value["sections"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn missing_config_override_is_an_error() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let missing = temp.path().join("nope.yml");
        let cmd = ReportCommand::new(temp.path(), Some(&missing), ReportArgs::default(), &runner);
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, EnvkitError::ConfigNotFound { .. }));
        assert!(!runner.was_run("python"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let temp = setup_project("report: [not, a, map]\n");
        let runner = MockRunner::new();
        let cmd = ReportCommand::new(temp.path(), None, ReportArgs::default(), &runner);
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, EnvkitError::ConfigParseError { .. }));
    }
}
