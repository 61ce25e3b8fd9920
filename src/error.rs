//! Error types for envkit operations.
//!
//! This module defines [`EnvkitError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `EnvkitError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `EnvkitError::Other`) for unexpected errors
//! - Report checks never return these; they capture failures as outcomes

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envkit operations.
#[derive(Debug, Error)]
pub enum EnvkitError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// External command could not be spawned or waited on.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A Python-side probe ran but did not produce a usable answer.
    #[error("Probe '{probe}' failed: {message}")]
    ProbeFailed { probe: String, message: String },

    /// The requirements list the installer reconciles against is missing.
    #[error("Requirements file not found: {path}")]
    RequirementsNotFound { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for envkit operations.
pub type Result<T> = std::result::Result<T, EnvkitError>;
