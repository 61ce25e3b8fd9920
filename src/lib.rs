//! envkit - diagnostics and setup for a Python speech/ML project environment.
//!
//! envkit reports on the interpreter, packages, GPU and project layout of a
//! Python application, and prepares its virtualenv by installing only what
//! the requirements file lists that is not yet present.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Optional YAML configuration
//! - [`error`] - Error types and result aliases
//! - [`gpu`] - Torch/CUDA probe and NVIDIA driver query
//! - [`installer`] - Virtualenv preparation and package reconciliation
//! - [`python`] - Interpreter resolution and embedded probe snippets
//! - [`report`] - Environment diagnostic checks
//! - [`requirements`] - Requirements parsing and installed-set matching
//! - [`shell`] - Structured process execution
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use envkit::config::MatchMode;
//! use envkit::requirements::{reconcile, InstalledSnapshot};
//!
//! let installed = InstalledSnapshot::from_listing("Flask==3.0.0\ntorch==2.5.1\n");
//! let requirements = vec!["flask".to_string(), "librosa>=0.10".to_string()];
//! let missing = reconcile(&requirements, &installed, MatchMode::Substring);
//! assert_eq!(missing, vec!["librosa>=0.10".to_string()]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gpu;
pub mod installer;
pub mod python;
pub mod report;
pub mod requirements;
pub mod shell;
pub mod ui;

pub use error::{EnvkitError, Result};
