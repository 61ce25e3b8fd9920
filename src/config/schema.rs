//! Configuration schema definitions for envkit.
//!
//! This module contains the struct definitions that map to
//! `.envkit/config.yml`. Every field is optional in the file; the defaults
//! describe the speech transcription project the tool was written for.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvkitConfig {
    /// Base interpreter used to create the virtualenv (and as a fallback
    /// when no virtualenv exists yet).
    pub python: String,

    /// Virtualenv directory, relative to the project root.
    pub venv: PathBuf,

    /// Environment variable holding the Hugging Face token.
    pub token_env: String,

    /// Diagnostic report settings.
    pub report: ReportSettings,

    /// Installer settings.
    pub install: InstallSettings,
}

impl Default for EnvkitConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            venv: PathBuf::from(".venv"),
            token_env: "HUGGINGFACE_TOKEN".to_string(),
            report: ReportSettings::default(),
            install: InstallSettings::default(),
        }
    }
}

fn default_python() -> String {
    if cfg!(target_os = "windows") {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

/// A Python package the report tries to import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ModuleEntryRepr")]
pub struct ModuleEntry {
    /// Name shown in the report.
    pub name: String,
    /// Dotted module path passed to `importlib.import_module`.
    #[serde(rename = "import")]
    pub import_name: String,
}

impl ModuleEntry {
    /// Entry whose display name is the first dotted segment of the import.
    pub fn from_import(import_name: &str) -> Self {
        let name = import_name.split('.').next().unwrap_or(import_name);
        Self {
            name: name.to_string(),
            import_name: import_name.to_string(),
        }
    }

    /// Entry with an explicit display name.
    pub fn named(name: &str, import_name: &str) -> Self {
        Self {
            name: name.to_string(),
            import_name: import_name.to_string(),
        }
    }
}

/// Accepts either `torch` or `{ name: python-docx, import: docx }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ModuleEntryRepr {
    Short(String),
    Full {
        name: Option<String>,
        #[serde(rename = "import")]
        import_name: String,
    },
}

impl From<ModuleEntryRepr> for ModuleEntry {
    fn from(repr: ModuleEntryRepr) -> Self {
        match repr {
            ModuleEntryRepr::Short(import_name) => ModuleEntry::from_import(&import_name),
            ModuleEntryRepr::Full {
                name: Some(name),
                import_name,
            } => ModuleEntry::named(&name, &import_name),
            ModuleEntryRepr::Full {
                name: None,
                import_name,
            } => ModuleEntry::from_import(&import_name),
        }
    }
}

/// Settings for `envkit report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Packages whose import decides the final verdict.
    pub modules: Vec<ModuleEntry>,

    /// Folders expected in the project root.
    pub folders: Vec<String>,

    /// Files expected in the project root.
    pub files: Vec<String>,

    /// WhisperX model size to load.
    pub whisper_model: String,

    /// pyannote pipeline identifier to load.
    pub diarization_pipeline: String,

    /// Side length of the square matrices in the benchmark.
    pub matmul_size: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            modules: vec![
                ModuleEntry::from_import("torch"),
                ModuleEntry::from_import("torchaudio"),
                ModuleEntry::from_import("whisperx"),
                ModuleEntry::from_import("pyannote.audio"),
                ModuleEntry::from_import("flask"),
                ModuleEntry::named("python-docx", "docx"),
                ModuleEntry::from_import("transformers"),
                ModuleEntry::from_import("librosa"),
                ModuleEntry::from_import("soundfile"),
            ],
            folders: ["classes", "templates", "static", "logs", "uploads"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            files: ["server.py", "config.py", "requirements.txt", "run.bat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            whisper_model: "tiny".to_string(),
            diarization_pipeline: "pyannote/speaker-diarization@2.1".to_string(),
            matmul_size: 5000,
        }
    }
}

/// How reconciliation decides that a requirement is already installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive substring of the whole `pip freeze` text.
    ///
    /// `torch` counts as installed when only `torchvision` is.
    #[default]
    Substring,
    /// Normalized package name equality against parsed freeze lines.
    Exact,
}

/// The pinned accelerator stack installed before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinnedStack {
    /// Pinned requirement strings; their bare names are probed with `pip show`.
    pub packages: Vec<String>,

    /// Extra package index carrying the accelerator builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_index_url: Option<String>,
}

impl Default for PinnedStack {
    fn default() -> Self {
        Self {
            packages: vec![
                "torch==2.5.1+cu121".to_string(),
                "torchaudio==2.5.1+cu121".to_string(),
                "torchvision==0.20.1+cu121".to_string(),
            ],
            extra_index_url: Some("https://download.pytorch.org/whl/cu121".to_string()),
        }
    }
}

/// Settings for `envkit install`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSettings {
    /// Requirements list to reconcile.
    pub requirements: PathBuf,

    /// Append-only install log.
    pub log_file: PathBuf,

    /// Scratch file receiving the `pip freeze` listing.
    pub snapshot_file: PathBuf,

    /// Installed-package matching strategy.
    pub match_mode: MatchMode,

    /// Accelerator stack override.
    pub pinned: PinnedStack,
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            requirements: PathBuf::from("requirements.txt"),
            log_file: PathBuf::from("logs").join("install_log.txt"),
            snapshot_file: PathBuf::from("installed.txt"),
            match_mode: MatchMode::default(),
            pinned: PinnedStack::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config: EnvkitConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EnvkitConfig::default());
        assert_eq!(config.token_env, "HUGGINGFACE_TOKEN");
        assert_eq!(config.venv, PathBuf::from(".venv"));
    }

    #[test]
    fn default_module_list_has_nine_entries() {
        let report = ReportSettings::default();
        assert_eq!(report.modules.len(), 9);
        assert_eq!(report.modules[3].name, "pyannote");
        assert_eq!(report.modules[3].import_name, "pyannote.audio");
        assert_eq!(report.modules[5].name, "python-docx");
        assert_eq!(report.modules[5].import_name, "docx");
    }

    #[test]
    fn modules_accept_short_and_full_forms() {
        let yaml = r#"
report:
  modules:
    - numpy
    - speechbrain.inference
    - { name: opencv, import: cv2 }
    - { import: scipy.signal }
"#;
        let config: EnvkitConfig = serde_yaml::from_str(yaml).unwrap();
        let modules = &config.report.modules;
        assert_eq!(modules[0], ModuleEntry::named("numpy", "numpy"));
        assert_eq!(
            modules[1],
            ModuleEntry::named("speechbrain", "speechbrain.inference")
        );
        assert_eq!(modules[2], ModuleEntry::named("opencv", "cv2"));
        assert_eq!(modules[3], ModuleEntry::named("scipy", "scipy.signal"));
    }

    #[test]
    fn partial_report_keeps_other_defaults() {
        let yaml = "report:\n  matmul_size: 256\n";
        let config: EnvkitConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.report.matmul_size, 256);
        assert_eq!(config.report.whisper_model, "tiny");
        assert_eq!(config.report.folders.len(), 5);
    }

    #[test]
    fn match_mode_parses_lowercase() {
        let config: EnvkitConfig = serde_yaml::from_str("install:\n  match_mode: exact\n").unwrap();
        assert_eq!(config.install.match_mode, MatchMode::Exact);
        assert_eq!(InstallSettings::default().match_mode, MatchMode::Substring);
    }

    #[test]
    fn pinned_stack_defaults_to_cu121() {
        let pinned = PinnedStack::default();
        assert_eq!(pinned.packages.len(), 3);
        assert!(pinned.packages.iter().all(|p| p.contains("+cu121")));
        assert_eq!(
            pinned.extra_index_url.as_deref(),
            Some("https://download.pytorch.org/whl/cu121")
        );
    }

    #[test]
    fn pinned_stack_index_can_be_cleared() {
        let yaml = "install:\n  pinned:\n    packages: [torch==2.5.1]\n";
        let config: EnvkitConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.install.pinned.packages, vec!["torch==2.5.1"]);
        assert!(config.install.pinned.extra_index_url.is_some());

        let yaml = "install:\n  pinned:\n    extra_index_url: null\n";
        let config: EnvkitConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.install.pinned.extra_index_url.is_none());
    }
}
