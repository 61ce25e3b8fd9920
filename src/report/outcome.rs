//! Report data model.

use serde::Serialize;

/// Result of one step within a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CheckOutcome {
    /// A fact about the environment.
    Info { label: String, value: String },
    /// Something was found or worked.
    Success { message: String },
    /// Something is absent or degraded; the environment may still work.
    Warning { message: String },
    /// An operation failed.
    Error { message: String },
    /// How to fix the outcome before it.
    Hint { message: String },
}

impl CheckOutcome {
    pub fn info(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Info {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn hint(message: impl Into<String>) -> Self {
        Self::Hint {
            message: message.into(),
        }
    }

    /// Whether this outcome reports a problem.
    pub fn is_problem(&self) -> bool {
        matches!(self, Self::Warning { .. } | Self::Error { .. })
    }

    /// The line shown to the user, without styling.
    pub fn text(&self) -> String {
        match self {
            Self::Info { label, value } => format!("{}: {}", label, value),
            Self::Success { message }
            | Self::Warning { message }
            | Self::Error { message }
            | Self::Hint { message } => message.clone(),
        }
    }
}

/// A titled group of outcomes produced by one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub outcomes: Vec<CheckOutcome>,
}

/// A finished diagnostic report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub sections: Vec<Section>,
    /// Every checked module imported.
    pub ready: bool,
}

impl Report {
    /// Find a section by title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}
