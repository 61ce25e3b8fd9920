//! Virtualenv layout.

use std::path::{Path, PathBuf};

/// A Python virtualenv directory and the paths inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEnv {
    root: PathBuf,
}

impl VirtualEnv {
    /// Virtualenv rooted at `root` (which need not exist yet).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The virtualenv directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the directory exists. Contents are not validated.
    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    /// Interpreter inside the virtualenv.
    pub fn python(&self) -> PathBuf {
        if cfg!(target_os = "windows") {
            self.root.join("Scripts").join("python.exe")
        } else {
            self.root.join("bin").join("python")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn python_path_follows_platform_layout() {
        let venv = VirtualEnv::new("/work/.venv");
        let python = venv.python();
        if cfg!(target_os = "windows") {
            assert!(python.ends_with("Scripts/python.exe"));
        } else {
            assert_eq!(python, PathBuf::from("/work/.venv/bin/python"));
        }
    }

    #[test]
    fn exists_tracks_directory() {
        let temp = TempDir::new().unwrap();
        let venv = VirtualEnv::new(temp.path().join(".venv"));
        assert!(!venv.exists());
        std::fs::create_dir(venv.root()).unwrap();
        assert!(venv.exists());
    }
}
