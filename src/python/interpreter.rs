//! Locating and invoking the project's Python interpreter.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{resolve_path, EnvkitConfig};
use crate::error::{EnvkitError, Result};
use crate::shell::{CommandSpec, ProcessRunner};

use super::venv::VirtualEnv;

/// The Python interpreter envkit talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    program: OsString,
}

impl Interpreter {
    /// Use an explicit interpreter program.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The virtualenv interpreter when the virtualenv exists, otherwise the
    /// configured base interpreter.
    pub fn resolve(project_root: &Path, config: &EnvkitConfig) -> Self {
        let venv = VirtualEnv::new(resolve_path(project_root, &config.venv));
        let python = venv.python();
        if python.is_file() {
            tracing::debug!("Using virtualenv interpreter {}", python.display());
            Self::new(python)
        } else {
            tracing::debug!(
                "No interpreter at {}, falling back to {}",
                python.display(),
                config.python
            );
            Self::new(&config.python)
        }
    }

    /// The interpreter program.
    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// A bare command for this interpreter.
    pub fn command(&self) -> CommandSpec {
        CommandSpec::new(self.program.clone())
    }

    /// `python -c <script> <args...>`.
    pub fn snippet<I, S>(&self, script: &str, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command().arg("-c").arg(script).args(args)
    }

    /// `python -m pip <args...>`.
    pub fn pip<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command().args(["-m", "pip"]).args(args)
    }

    /// The interpreter's version, e.g. `3.11.4`.
    pub fn version(&self, runner: &dyn ProcessRunner) -> Result<String> {
        let spec = self.command().arg("--version");
        let result = runner.run(&spec)?;
        if !result.success {
            return Err(EnvkitError::ProbeFailed {
                probe: "python --version".to_string(),
                message: result.failure_message(),
            });
        }
        // Python 2 and early 3.x print the version on stderr.
        let combined = format!("{}\n{}", result.stdout, result.stderr);
        extract_python_version(&combined).ok_or_else(|| EnvkitError::ProbeFailed {
            probe: "python --version".to_string(),
            message: format!("unrecognized output: {}", combined.trim()),
        })
    }
}

fn extract_python_version(output: &str) -> Option<String> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r"Python\s+(\d+\.\d+(?:\.\d+)?\S*)").ok())
        .as_ref()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Run a snippet and return its `key=value` fields.
///
/// Spawn failures, non-zero exits and tracebacks all become
/// [`EnvkitError::ProbeFailed`] carrying the most useful message.
pub fn run_probe(
    runner: &dyn ProcessRunner,
    probe: &str,
    spec: &CommandSpec,
) -> Result<HashMap<String, String>> {
    let result = runner.run(spec).map_err(|e| EnvkitError::ProbeFailed {
        probe: probe.to_string(),
        message: e.to_string(),
    })?;

    if !result.success {
        return Err(EnvkitError::ProbeFailed {
            probe: probe.to_string(),
            message: result.failure_message(),
        });
    }

    Ok(parse_fields(&result.stdout))
}

/// Parse `key=value` lines. Lines without `=` are ignored. Snippets print
/// their fields last, so the last occurrence of a key wins over anything a
/// library printed while loading.
pub fn parse_fields(stdout: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in stdout.lines() {
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                continue;
            }
            fields.insert(key.to_string(), value.trim().to_string());
        }
    }
    fields
}

/// Read a required field, failing the probe when it is absent.
pub fn required_field<'a>(
    fields: &'a HashMap<String, String>,
    probe: &str,
    key: &str,
) -> Result<&'a str> {
    fields
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| EnvkitError::ProbeFailed {
            probe: probe.to_string(),
            message: format!("missing '{}' in probe output", key),
        })
}
