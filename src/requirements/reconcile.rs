//! Reconciling a requirements list against installed packages.
//!
//! The default [`MatchMode::Substring`] reproduces a heuristic: a requirement
//! counts as installed when its bare name, case-folded, occurs anywhere in the
//! case-folded `pip freeze` text. `torch` is therefore satisfied by
//! `torchvision` alone, and short names match inside unrelated ones.
//! [`MatchMode::Exact`] compares normalized names instead.

use std::collections::HashSet;

use crate::config::MatchMode;

use super::requirement::{bare_name, normalize_name};

/// A `pip freeze` listing captured at one point in time.
#[derive(Debug, Clone, Default)]
pub struct InstalledSnapshot {
    folded: String,
    names: HashSet<String>,
}

impl InstalledSnapshot {
    /// Build a snapshot from the raw listing text.
    pub fn from_listing(text: &str) -> Self {
        let names = text.lines().filter_map(freeze_line_name).collect();
        Self {
            folded: text.to_lowercase(),
            names,
        }
    }

    /// Whether `name` is installed according to `mode`.
    pub fn is_installed(&self, name: &str, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Substring => self.folded.contains(&name.to_lowercase()),
            MatchMode::Exact => self.names.contains(&normalize_name(name)),
        }
    }
}

/// Package name of one freeze line, normalized.
///
/// Handles `name==1.0`, `name @ file:///...` and `-e ...#egg=name`.
fn freeze_line_name(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if line.starts_with('-') {
        let egg = line.split("#egg=").nth(1)?;
        return package_prefix(egg);
    }
    package_prefix(line)
}

fn package_prefix(text: &str) -> Option<String> {
    let name: String = text
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    if name.is_empty() {
        None
    } else {
        Some(normalize_name(&name))
    }
}

/// Requirements that still need installing, in their original order.
///
/// ```
/// use envkit::config::MatchMode;
/// use envkit::requirements::{reconcile, InstalledSnapshot};
///
/// let snapshot = InstalledSnapshot::from_listing("flask==2.0.1\nnumpy==1.26.0\n");
/// let queued = reconcile(
///     &["Flask==2.0.1".to_string(), "torch".to_string()],
///     &snapshot,
///     MatchMode::Substring,
/// );
/// assert_eq!(queued, vec!["torch".to_string()]);
/// ```
pub fn reconcile(
    requirements: &[String],
    snapshot: &InstalledSnapshot,
    mode: MatchMode,
) -> Vec<String> {
    requirements
        .iter()
        .filter(|req| {
            let name = bare_name(req);
            let installed = snapshot.is_installed(name, mode);
            tracing::debug!("{} -> {} (installed: {})", req, name, installed);
            !installed
        })
        .cloned()
        .collect()
}
