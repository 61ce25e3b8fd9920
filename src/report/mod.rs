//! Environment diagnostic report.
//!
//! The report is a fixed list of [`Check`]s run in order against a shared
//! [`ReportContext`]. Checks never fail: every problem becomes a
//! [`CheckOutcome`], so one broken probe cannot hide the ones after it.
//!
//! # Example
//!
//! ```
//! use envkit::python::Interpreter;
//! use envkit::report::{checks::LayoutCheck, Check, ReportContext, Reporter};
//! use envkit::shell::MockRunner;
//! use envkit::ui::MockUI;
//!
//! let runner = MockRunner::new();
//! let mut ctx = ReportContext::new("/nonexistent", Interpreter::new("python"), &runner);
//! let reporter = Reporter::with_checks(vec![Box::new(LayoutCheck {
//!     folders: vec!["logs".to_string()],
//!     files: vec![],
//! })]);
//!
//! let mut ui = MockUI::new();
//! let report = reporter.run(&mut ctx, &mut ui);
//! assert!(ui.has_warning("Folder logs missing"));
//! assert_eq!(report.sections.len(), 1);
//! ```

pub mod checks;
pub mod context;
pub mod outcome;

pub use context::{Device, ModuleStatus, ReportContext};
pub use outcome::{CheckOutcome, Report, Section};

use crate::config::ReportSettings;
use crate::ui::UserInterface;

/// One independent diagnostic step.
pub trait Check {
    /// Section title shown above the outcomes.
    fn title(&self) -> &str;

    /// Spinner text for checks that take noticeable time.
    fn progress_message(&self) -> Option<String> {
        None
    }

    /// Run the check. Failures are returned as outcomes, never as errors.
    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome>;
}

/// Runs checks in order and renders their outcomes.
pub struct Reporter {
    checks: Vec<Box<dyn Check>>,
}

impl Reporter {
    /// The standard report for `settings`.
    pub fn new(settings: &ReportSettings) -> Self {
        Self::with_checks(checks::default_checks(settings))
    }

    /// A report made of the given checks.
    pub fn with_checks(checks: Vec<Box<dyn Check>>) -> Self {
        Self { checks }
    }

    /// Run every check, rendering each section as soon as it completes.
    pub fn run(&self, ctx: &mut ReportContext<'_>, ui: &mut dyn UserInterface) -> Report {
        self.execute(ctx, Some(ui))
    }

    /// Run every check without rendering.
    pub fn collect(&self, ctx: &mut ReportContext<'_>) -> Report {
        self.execute(ctx, None)
    }

    fn execute(
        &self,
        ctx: &mut ReportContext<'_>,
        mut ui: Option<&mut dyn UserInterface>,
    ) -> Report {
        let mut sections = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            tracing::debug!("Running check: {}", check.title());

            let outcomes = match (ui.as_deref_mut(), check.progress_message()) {
                (Some(ui), Some(message)) => {
                    let mut spinner = ui.start_spinner(&message);
                    let outcomes = check.run(ctx);
                    spinner.clear();
                    outcomes
                }
                _ => check.run(ctx),
            };

            let section = Section {
                title: check.title().to_string(),
                outcomes,
            };
            if let Some(ui) = ui.as_deref_mut() {
                render_section(&section, ui);
            }
            sections.push(section);
        }

        Report {
            sections,
            ready: ctx.all_modules_available(),
        }
    }
}

/// Render one section through the UI.
pub fn render_section(section: &Section, ui: &mut dyn UserInterface) {
    ui.show_header(&section.title);
    for outcome in &section.outcomes {
        match outcome {
            CheckOutcome::Info { .. } => ui.message(&outcome.text()),
            CheckOutcome::Success { message } => ui.success(message),
            CheckOutcome::Warning { message } => ui.warning(message),
            CheckOutcome::Error { message } => ui.error(message),
            CheckOutcome::Hint { message } => ui.show_hint(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleEntry;
    use crate::python::Interpreter;
    use crate::shell::MockRunner;
    use crate::ui::{MockUI, UiEvent};
    use std::fs;
    use tempfile::TempDir;

    struct Fixed(&'static str, Vec<CheckOutcome>);

    impl Check for Fixed {
        fn title(&self) -> &str {
            self.0
        }

        fn run(&self, _ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
            self.1.clone()
        }
    }

    struct Slow;

    impl Check for Slow {
        fn title(&self) -> &str {
            "SLOW"
        }

        fn progress_message(&self) -> Option<String> {
            Some("Working...".to_string())
        }

        fn run(&self, _ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
            vec![CheckOutcome::success("done")]
        }
    }

    fn nine_modules() -> Vec<ModuleEntry> {
        ReportSettings::default().modules
    }

    #[test]
    fn render_maps_outcomes_to_ui_calls() {
        let section = Section {
            title: "T".to_string(),
            outcomes: vec![
                CheckOutcome::info("Python version", "3.11.4"),
                CheckOutcome::success("ok"),
                CheckOutcome::warning("meh"),
                CheckOutcome::error("bad"),
                CheckOutcome::hint("fix it"),
            ],
        };
        let mut ui = MockUI::new();

        render_section(&section, &mut ui);

        assert_eq!(
            ui.events(),
            &[
                UiEvent::Header("T".to_string()),
                UiEvent::Message("Python version: 3.11.4".to_string()),
                UiEvent::Success("ok".to_string()),
                UiEvent::Warning("meh".to_string()),
                UiEvent::Error("bad".to_string()),
                UiEvent::Hint("fix it".to_string()),
            ]
        );
    }

    #[test]
    fn failing_check_does_not_stop_later_checks() {
        let runner = MockRunner::new();
        let mut ctx = ReportContext::new("/p", Interpreter::new("python"), &runner);
        let reporter = Reporter::with_checks(vec![
            Box::new(Fixed("A", vec![CheckOutcome::error("boom")])),
            Box::new(Fixed("B", vec![CheckOutcome::success("fine")])),
        ]);
        let mut ui = MockUI::new();

        let report = reporter.run(&mut ctx, &mut ui);

        assert_eq!(report.sections.len(), 2);
        assert_eq!(ui.headers(), &["A".to_string(), "B".to_string()]);
        assert!(ui.has_success("fine"));
    }

    #[test]
    fn slow_checks_get_a_spinner() {
        let runner = MockRunner::new();
        let mut ctx = ReportContext::new("/p", Interpreter::new("python"), &runner);
        let reporter = Reporter::with_checks(vec![
            Box::new(Fixed("FAST", vec![])),
            Box::new(Slow),
        ]);
        let mut ui = MockUI::new();

        reporter.run(&mut ctx, &mut ui);

        assert_eq!(ui.spinners(), &["Working...".to_string()]);
    }

    #[test]
    fn collect_renders_nothing() {
        let runner = MockRunner::new();
        let mut ctx = ReportContext::new("/p", Interpreter::new("python"), &runner);
        let report = Reporter::with_checks(vec![Box::new(Slow)]).collect(&mut ctx);
        assert_eq!(report.sections[0].outcomes, vec![CheckOutcome::success("done")]);
    }

    #[test]
    fn full_report_survives_missing_interpreter() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.spawn_error("");
        let mut ctx = ReportContext::new(temp.path(), Interpreter::new("python"), &runner);
        let mut ui = MockUI::new();

        let report = Reporter::new(&ReportSettings::default()).run(&mut ctx, &mut ui);

        assert_eq!(report.sections.len(), 9);
        assert!(!report.ready);
        assert_eq!(ui.headers().last().map(String::as_str), Some("SUMMARY"));
        assert!(ui.has_hint("pip install -r requirements.txt"));
    }

    #[test]
    fn one_failed_import_of_nine_is_not_ready() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.fail("\" librosa", 1, "ModuleNotFoundError: No module named 'librosa'");
        runner.succeed("import_module", "version=1.0\n");
        let mut ctx = ReportContext::new(temp.path(), Interpreter::new("python"), &runner);
        let mut ui = MockUI::new();

        let report = Reporter::new(&ReportSettings::default()).run(&mut ctx, &mut ui);

        assert_eq!(ctx.modules.len(), nine_modules().len());
        assert_eq!(ctx.modules.iter().filter(|m| !m.available).count(), 1);
        assert!(!report.ready);
        assert!(ui.has_warning("Some modules are missing: librosa"));
        assert!(!ui.has_success("Environment ready"));
    }

    #[test]
    fn all_imports_succeeding_is_ready() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.succeed("import_module", "version=1.0\n");
        let mut ctx = ReportContext::new(temp.path(), Interpreter::new("python"), &runner);
        let mut ui = MockUI::new();

        let report = Reporter::new(&ReportSettings::default()).run(&mut ctx, &mut ui);

        assert!(report.ready);
        assert!(ui.has_success("Environment ready"));
    }

    #[test]
    fn layout_lines_follow_list_order() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("templates")).unwrap();
        fs::write(temp.path().join("requirements.txt"), "flask\n").unwrap();
        let runner = MockRunner::new();
        let mut ctx = ReportContext::new(temp.path(), Interpreter::new("python"), &runner);
        let settings = ReportSettings::default();
        let mut ui = MockUI::new();

        Reporter::new(&settings).run(&mut ctx, &mut ui);

        let layout: Vec<String> = ui
            .events()
            .iter()
            .map(UiEvent::text)
            .filter(|t| t.starts_with("Folder ") || t.starts_with("File "))
            .map(str::to_string)
            .collect();
        assert_eq!(
            layout,
            vec![
                "Folder classes missing",
                "Folder templates",
                "Folder static missing",
                "Folder logs missing",
                "Folder uploads missing",
                "File server.py missing",
                "File config.py missing",
                "File requirements.txt",
                "File run.bat missing",
            ]
        );
    }

    #[test]
    fn cuda_device_flows_into_later_checks() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();
        runner.succeed("cuda.is_available", "available=True\ndevice=RTX\n");
        runner.succeed("whisperx", "elapsed=1.0\n");
        runner.succeed("torch.mm", "elapsed=0.01\n");
        let mut ctx = ReportContext::new(temp.path(), Interpreter::new("python"), &runner);

        Reporter::new(&ReportSettings::default()).collect(&mut ctx);

        let lines = runner.call_lines();
        let whisper = lines.iter().find(|l| l.contains("whisperx")).unwrap();
        let matmul = lines.iter().find(|l| l.contains("torch.mm")).unwrap();
        assert!(whisper.ends_with("tiny cuda"));
        assert!(matmul.ends_with("5000 cuda"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = Report {
            sections: vec![Section {
                title: "HUGGING FACE TOKEN".to_string(),
                outcomes: vec![CheckOutcome::warning("HUGGINGFACE_TOKEN is not set")],
            }],
            ready: false,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ready"], false);
        assert_eq!(json["sections"][0]["outcomes"][0]["kind"], "warning");
    }
}
