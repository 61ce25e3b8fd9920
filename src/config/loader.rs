//! Configuration file discovery and loading.
//!
//! envkit reads at most one file: the `--config` override when given,
//! otherwise `.envkit/config.yml` in the project root. A missing default file
//! is not an error; every setting has a default.

use crate::config::schema::EnvkitConfig;
use crate::error::{EnvkitError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding envkit's project config.
pub const CONFIG_DIR: &str = ".envkit";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Default config location for a project.
pub fn default_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Load a single config file and parse it into `EnvkitConfig`.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<EnvkitConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvkitError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvkitError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into `EnvkitConfig`.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<EnvkitConfig> {
    if content.trim().is_empty() {
        return Ok(EnvkitConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| EnvkitError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// With an override the file must exist. Without one, the project's
/// `.envkit/config.yml` is used when present and defaults otherwise.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<EnvkitConfig> {
    if let Some(override_path) = config_override {
        tracing::debug!("Loading config from {}", override_path.display());
        return load_config_file(override_path);
    }

    let path = default_config_path(project_root);
    if path.is_file() {
        tracing::debug!("Loading config from {}", path.display());
        load_config_file(&path)
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        Ok(EnvkitConfig::default())
    }
}

/// Resolve a configured path against the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
