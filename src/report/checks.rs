//! The diagnostic checks, in report order.

use std::path::Path;

use chrono::Local;
use sysinfo::System;

use crate::config::{ModuleEntry, ReportSettings};
use crate::error::{EnvkitError, Result};
use crate::python::scripts::{
    CUDA_DEVICE, IMPORT_MODULE, LOAD_DIARIZATION, LOAD_WHISPER, MATMUL, TOKEN_ENV,
};
use crate::python::{required_field, run_probe};
use crate::shell::{is_windows, CommandSpec};

use super::context::{Device, ModuleStatus, ReportContext};
use super::outcome::CheckOutcome;
use super::Check;

/// Timestamp format of the summary's last-check line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of token characters shown before the ellipsis.
const TOKEN_PREFIX_CHARS: usize = 10;

/// The full check list for `settings`.
pub fn default_checks(settings: &ReportSettings) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(SystemCheck),
        Box::new(TokenCheck),
        Box::new(ModulesCheck {
            modules: settings.modules.clone(),
        }),
        Box::new(CudaCheck),
        Box::new(WhisperCheck {
            model: settings.whisper_model.clone(),
        }),
        Box::new(DiarizationCheck {
            pipeline: settings.diarization_pipeline.clone(),
        }),
        Box::new(LayoutCheck {
            folders: settings.folders.clone(),
            files: settings.files.clone(),
        }),
        Box::new(MatmulCheck {
            size: settings.matmul_size,
        }),
        Box::new(SummaryCheck),
    ]
}

/// The message worth showing for a failed probe.
fn failure_text(err: &EnvkitError) -> String {
    match err {
        EnvkitError::ProbeFailed { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Run a snippet that prints `elapsed=<seconds>` and return the seconds.
fn timed_probe(ctx: &ReportContext<'_>, probe: &str, spec: &CommandSpec) -> Result<f64> {
    let fields = run_probe(ctx.runner, probe, spec)?;
    let raw = required_field(&fields, probe, "elapsed")?;
    raw.parse::<f64>().map_err(|_| EnvkitError::ProbeFailed {
        probe: probe.to_string(),
        message: format!("unparsable elapsed time '{}'", raw),
    })
}

/// OS, interpreter version and working directory.
pub struct SystemCheck;

impl SystemCheck {
    /// Platform family as Python's `platform.system()` names it.
    fn platform_name() -> &'static str {
        match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "Darwin",
            "windows" => "Windows",
            other => other,
        }
    }

    /// Platform family plus kernel release, e.g. `Linux 6.8.0-45-generic`.
    fn os_description() -> String {
        match System::kernel_version() {
            Some(release) => format!("{} {}", Self::platform_name(), release),
            None => Self::platform_name().to_string(),
        }
    }
}

impl Check for SystemCheck {
    fn title(&self) -> &str {
        "SYSTEM INFORMATION"
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        let python = match ctx.interpreter.version(ctx.runner) {
            Ok(version) => version,
            Err(e) => {
                tracing::debug!("Interpreter version unavailable: {}", e);
                "unavailable".to_string()
            }
        };
        vec![
            CheckOutcome::info("Operating system", Self::os_description()),
            CheckOutcome::info("Python version", python),
            CheckOutcome::info("Working directory", ctx.project_root.display().to_string()),
        ]
    }
}

/// Presence of the Hugging Face token, never printed in full.
pub struct TokenCheck;

/// First characters of a token followed by `...`.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_PREFIX_CHARS).collect();
    format!("{}...", prefix)
}

/// How to set `name` persistently on the current platform family.
pub fn token_hint(name: &str, windows: bool) -> String {
    if windows {
        format!("Set it with: setx {} \"your_token\"", name)
    } else {
        format!("Set it with: export {}=\"your_token\"", name)
    }
}

impl Check for TokenCheck {
    fn title(&self) -> &str {
        "HUGGING FACE TOKEN"
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        match &ctx.token {
            Some(token) => vec![CheckOutcome::success(format!(
                "Token found: {} (length: {})",
                redact_token(token),
                token.chars().count()
            ))],
            None => vec![
                CheckOutcome::warning(format!("{} is not set", ctx.token_name)),
                CheckOutcome::hint(token_hint(&ctx.token_name, is_windows())),
            ],
        }
    }
}

/// Import every configured module and record which ones work.
pub struct ModulesCheck {
    pub modules: Vec<ModuleEntry>,
}

impl Check for ModulesCheck {
    fn title(&self) -> &str {
        "INSTALLED MODULES"
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        let mut outcomes = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            let spec = ctx
                .interpreter
                .snippet(IMPORT_MODULE, [module.import_name.as_str()]);
            let result = run_probe(ctx.runner, &module.name, &spec);
            let available = result.is_ok();
            outcomes.push(match result {
                Ok(fields) => {
                    let version = fields
                        .get("version")
                        .map(String::as_str)
                        .unwrap_or("unknown");
                    CheckOutcome::success(format!("{} (version: {})", module.name, version))
                }
                Err(e) => CheckOutcome::warning(format!(
                    "{} not available: {}",
                    module.name,
                    failure_text(&e)
                )),
            });
            ctx.modules.push(ModuleStatus {
                name: module.name.clone(),
                available,
            });
        }
        outcomes
    }
}

/// CUDA availability; decides the device for later checks.
pub struct CudaCheck;

impl Check for CudaCheck {
    fn title(&self) -> &str {
        "GPU (CUDA)"
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        ctx.device = Device::Cpu;
        let spec = ctx.interpreter.snippet(CUDA_DEVICE, Vec::<String>::new());
        match run_probe(ctx.runner, "cuda", &spec) {
            Ok(fields) if fields.get("available").map(String::as_str) == Some("True") => {
                ctx.device = Device::Cuda;
                let name = fields
                    .get("device")
                    .map(String::as_str)
                    .unwrap_or("unknown device");
                vec![CheckOutcome::success(format!("CUDA GPU detected: {}", name))]
            }
            Ok(_) => vec![CheckOutcome::warning("No CUDA GPU available, using CPU")],
            Err(e) => vec![CheckOutcome::error(format!(
                "GPU check failed: {}",
                failure_text(&e)
            ))],
        }
    }
}

/// Time loading a WhisperX model on the detected device.
pub struct WhisperCheck {
    pub model: String,
}

impl Check for WhisperCheck {
    fn title(&self) -> &str {
        "WHISPERX MODEL"
    }

    fn progress_message(&self) -> Option<String> {
        Some(format!("Loading WhisperX model '{}'...", self.model))
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        let device = ctx.device;
        let spec = ctx
            .interpreter
            .snippet(LOAD_WHISPER, [self.model.as_str(), device.as_str()]);
        match timed_probe(ctx, "whisperx", &spec) {
            Ok(secs) => vec![CheckOutcome::success(format!(
                "WhisperX model '{}' loaded in {:.2}s on {} ({})",
                self.model,
                secs,
                device.as_str().to_uppercase(),
                device.compute_type()
            ))],
            Err(e) => vec![CheckOutcome::error(format!(
                "WhisperX load failed: {}",
                failure_text(&e)
            ))],
        }
    }
}

/// Time loading the pyannote diarization pipeline.
pub struct DiarizationCheck {
    pub pipeline: String,
}

impl Check for DiarizationCheck {
    fn title(&self) -> &str {
        "PYANNOTE PIPELINE"
    }

    fn progress_message(&self) -> Option<String> {
        Some(format!("Loading pipeline {}...", self.pipeline))
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        let mut spec = ctx
            .interpreter
            .snippet(LOAD_DIARIZATION, [self.pipeline.as_str()]);
        if let Some(token) = &ctx.token {
            spec = spec.env(TOKEN_ENV, token.as_str());
        }
        match timed_probe(ctx, "pyannote", &spec) {
            Ok(secs) => vec![CheckOutcome::success(format!(
                "Pyannote pipeline loaded in {:.2}s",
                secs
            ))],
            Err(e) => vec![CheckOutcome::warning(format!(
                "Pyannote not available or token missing: {}",
                failure_text(&e)
            ))],
        }
    }
}

/// Expected folders and files, one line each.
pub struct LayoutCheck {
    pub folders: Vec<String>,
    pub files: Vec<String>,
}

impl LayoutCheck {
    fn entry(root: &Path, kind: &str, name: &str, present: fn(&Path) -> bool) -> CheckOutcome {
        if present(&root.join(name)) {
            CheckOutcome::success(format!("{} {}", kind, name))
        } else {
            CheckOutcome::warning(format!("{} {} missing", kind, name))
        }
    }
}

impl Check for LayoutCheck {
    fn title(&self) -> &str {
        "PROJECT STRUCTURE"
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        let root = ctx.project_root.as_path();
        let folders = self
            .folders
            .iter()
            .map(|f| Self::entry(root, "Folder", f, Path::is_dir));
        let files = self
            .files
            .iter()
            .map(|f| Self::entry(root, "File", f, Path::is_file));
        folders.chain(files).collect()
    }
}

/// Time a square matrix multiply on the detected device.
pub struct MatmulCheck {
    pub size: u32,
}

impl Check for MatmulCheck {
    fn title(&self) -> &str {
        "TORCH PERFORMANCE"
    }

    fn progress_message(&self) -> Option<String> {
        Some(format!("Multiplying {0}x{0} matrices...", self.size))
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        let device = ctx.device;
        let size = self.size.to_string();
        let spec = ctx
            .interpreter
            .snippet(MATMUL, [size.as_str(), device.as_str()]);
        match timed_probe(ctx, "matmul", &spec) {
            Ok(secs) => vec![CheckOutcome::success(format!(
                "{0}x{0} matrix multiply completed in {1:.3}s on {2}",
                self.size,
                secs,
                device.as_str().to_uppercase()
            ))],
            Err(e) => vec![CheckOutcome::warning(format!(
                "Torch operation failed: {}",
                failure_text(&e)
            ))],
        }
    }
}

/// Overall verdict from the module check, plus a timestamp.
pub struct SummaryCheck;

impl Check for SummaryCheck {
    fn title(&self) -> &str {
        "SUMMARY"
    }

    fn run(&self, ctx: &mut ReportContext<'_>) -> Vec<CheckOutcome> {
        let mut outcomes = Vec::new();
        if ctx.all_modules_available() {
            outcomes.push(CheckOutcome::success("Environment ready"));
        } else {
            let missing: Vec<&str> = ctx
                .modules
                .iter()
                .filter(|m| !m.available)
                .map(|m| m.name.as_str())
                .collect();
            outcomes.push(CheckOutcome::warning(format!(
                "Some modules are missing: {}",
                missing.join(", ")
            )));
            outcomes.push(CheckOutcome::hint("Run: pip install -r requirements.txt"));
        }
        outcomes.push(CheckOutcome::info(
            "Last check",
            Local::now().format(TIMESTAMP_FORMAT).to_string(),
        ));
        outcomes
    }
}
