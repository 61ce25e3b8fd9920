//! Append-only install log.
//!
//! The file is opened, appended to and closed on every write, so no handle
//! is held between lines and the directory is recreated if it disappears
//! mid-run.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::ui::UserInterface;

/// Last line written by a completed run.
pub const COMPLETION_LINE: &str = "Installation complete!";

/// How a log line is echoed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Progress narration.
    Info,
    /// A step finished or was not needed.
    Success,
    /// Something the user should look at; the run continues.
    Warning,
    /// A command failed or a fatal condition was hit.
    Error,
    /// Captured stdout/stderr of an external command.
    Output,
}

/// Persistent log at `logs/install_log.txt` (by default).
#[derive(Debug, Clone)]
pub struct InstallLog {
    path: PathBuf,
}

impl InstallLog {
    /// Log to `path`. Nothing is created until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line to the file.
    pub fn append(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    /// Append a line and echo it to the console at `level`.
    pub fn record(&self, ui: &mut dyn UserInterface, level: LogLevel, msg: &str) -> Result<()> {
        self.append(msg)?;
        match level {
            LogLevel::Info => ui.message(msg),
            LogLevel::Success => ui.success(msg),
            LogLevel::Warning => ui.warning(msg),
            LogLevel::Error => ui.error(msg),
            LogLevel::Output => {
                if ui.output_mode().shows_command_output() {
                    ui.message(msg);
                }
            }
        }
        Ok(())
    }
}

/// Banner written at the start of every run.
pub fn header_line(now: DateTime<Local>) -> String {
    format!(
        "====== INSTALL LOG ({}) ======",
        now.format("%d/%m/%Y %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MockUI, OutputMode};
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn append_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let log = InstallLog::new(temp.path().join("logs/install_log.txt"));

        log.append("first").unwrap();
        log.append("second").unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn append_keeps_earlier_runs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("install_log.txt");
        fs::write(&path, "old run\n").unwrap();

        InstallLog::new(&path).append("new run").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("old run\n"));
        assert!(content.ends_with("new run\n"));
    }

    #[test]
    fn record_echoes_by_level() {
        let temp = TempDir::new().unwrap();
        let log = InstallLog::new(temp.path().join("log.txt"));
        let mut ui = MockUI::new();

        log.record(&mut ui, LogLevel::Info, "Upgrading pip").unwrap();
        log.record(&mut ui, LogLevel::Success, "done").unwrap();
        log.record(&mut ui, LogLevel::Warning, "odd").unwrap();
        log.record(&mut ui, LogLevel::Error, "broken").unwrap();

        assert!(ui.has_message("Upgrading pip"));
        assert!(ui.has_success("done"));
        assert!(ui.has_warning("odd"));
        assert!(ui.has_error("broken"));
    }

    #[test]
    fn command_output_is_logged_but_not_echoed_when_quiet() {
        let temp = TempDir::new().unwrap();
        let log = InstallLog::new(temp.path().join("log.txt"));
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        log.record(&mut ui, LogLevel::Output, "Successfully installed pip-24.0")
            .unwrap();

        assert!(ui.messages().is_empty());
        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("Successfully installed pip-24.0"));
    }

    #[test]
    fn header_uses_day_first_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(
            header_line(now),
            "====== INSTALL LOG (07/03/2024 09:05:01) ======"
        );
    }
}
