//! State shared between report checks.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::EnvkitConfig;
use crate::python::Interpreter;
use crate::shell::ProcessRunner;

/// Where torch work runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cuda,
    #[default]
    Cpu,
}

impl Device {
    /// Name torch uses for the device.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Cpu => "cpu",
        }
    }

    /// Compute type WhisperX supports on this device.
    pub fn compute_type(&self) -> &'static str {
        match self {
            Self::Cuda => "float16",
            Self::Cpu => "float32",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Import result for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStatus {
    pub name: String,
    pub available: bool,
}

/// Everything a check may read, plus what earlier checks found.
///
/// The token and project root are captured up front so checks never touch
/// process-global state.
pub struct ReportContext<'a> {
    pub project_root: PathBuf,
    pub token_name: String,
    pub token: Option<String>,
    pub interpreter: Interpreter,
    pub runner: &'a dyn ProcessRunner,
    /// Set by the CUDA check, read by the model and benchmark checks.
    pub device: Device,
    /// Filled by the module check, read by the summary.
    pub modules: Vec<ModuleStatus>,
}

impl<'a> ReportContext<'a> {
    pub fn new(
        project_root: impl Into<PathBuf>,
        interpreter: Interpreter,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            token_name: "HUGGINGFACE_TOKEN".to_string(),
            token: None,
            interpreter,
            runner,
            device: Device::Cpu,
            modules: Vec::new(),
        }
    }

    /// Build a context from the config and the current process environment.
    pub fn from_env(
        project_root: &Path,
        config: &EnvkitConfig,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        let token = std::env::var(&config.token_env).ok();
        Self::new(
            project_root,
            Interpreter::resolve(project_root, config),
            runner,
        )
        .with_token(&config.token_env, token)
    }

    /// Set the credential variable name and its value. Empty values count
    /// as unset.
    pub fn with_token(mut self, name: &str, value: Option<String>) -> Self {
        self.token_name = name.to_string();
        self.token = value.filter(|v| !v.is_empty());
        self
    }

    /// Every checked module imported.
    pub fn all_modules_available(&self) -> bool {
        self.modules.iter().all(|m| m.available)
    }
}
