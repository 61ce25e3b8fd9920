//! Configuration loading for envkit.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use envkit::config::{load_config, MatchMode};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join(".envkit")).unwrap();
//! fs::write(
//!     temp.path().join(".envkit/config.yml"),
//!     "install:\n  match_mode: exact\n",
//! ).unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.install.match_mode, MatchMode::Exact);
//! assert_eq!(config.report.whisper_model, "tiny");
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    default_config_path, load_config, load_config_file, parse_config, resolve_path, CONFIG_DIR,
    CONFIG_FILE,
};
pub use schema::{
    EnvkitConfig, InstallSettings, MatchMode, ModuleEntry, PinnedStack, ReportSettings,
};
