//! Requirement lines and package names.

use std::fs;
use std::path::Path;

use crate::error::{EnvkitError, Result};

/// Version operators recognised when extracting a bare package name.
pub const VERSION_OPERATORS: [&str; 3] = ["==", ">=", "~="];

/// The package name of a requirement, without its version constraint.
///
/// This is the text before the first `==`, `>=` or `~=`, trimmed. Other
/// specifiers (`<`, `!=`, extras, markers) are left in place.
///
/// ```
/// use envkit::requirements::bare_name;
///
/// assert_eq!(bare_name("Flask==2.0.1"), "Flask");
/// assert_eq!(bare_name("numpy >= 1.26"), "numpy");
/// assert_eq!(bare_name("torch"), "torch");
/// ```
pub fn bare_name(requirement: &str) -> &str {
    let cut = VERSION_OPERATORS
        .iter()
        .filter_map(|op| requirement.find(op))
        .min()
        .unwrap_or(requirement.len());
    requirement[..cut].trim()
}

/// Parse the contents of a requirements file.
///
/// Lines are trimmed; blank lines and `#` comment lines are dropped and the
/// remaining lines are kept verbatim in file order.
pub fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Read and parse a requirements file.
///
/// # Errors
///
/// Returns `RequirementsNotFound` if the file does not exist.
pub fn read_requirements(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvkitError::RequirementsNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvkitError::Io(e)
        }
    })?;
    Ok(parse_requirements(&content))
}

/// PEP 503 normalized form: lowercase, runs of `-`, `_`, `.` become `-`.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bare_name_cuts_at_each_operator() {
        assert_eq!(bare_name("Flask==2.0.1"), "Flask");
        assert_eq!(bare_name("numpy>=1.26.0"), "numpy");
        assert_eq!(bare_name("requests~=2.31"), "requests");
    }

    #[test]
    fn bare_name_uses_earliest_operator() {
        // `>=` appears before `==` here; the prefix ends at the first one.
        assert_eq!(bare_name("pkg>=1.0,==1.2"), "pkg");
        assert_eq!(bare_name("pkg~=1.0,>=1.0.2"), "pkg");
    }

    #[test]
    fn bare_name_trims_whitespace() {
        assert_eq!(bare_name("  soundfile == 0.12.1 "), "soundfile");
    }

    #[test]
    fn bare_name_leaves_other_specifiers() {
        assert_eq!(bare_name("librosa<0.11"), "librosa<0.11");
        assert_eq!(bare_name("uvicorn[standard]==0.30"), "uvicorn[standard]");
    }

    #[test]
    fn bare_name_without_operator_is_whole_string() {
        assert_eq!(bare_name("whisperx"), "whisperx");
    }

    #[test]
    fn parse_requirements_drops_blank_and_comment_lines() {
        let content = "# core\nflask==2.0.1\n\n   \ntorch\n  # indented comment\npython-docx>=1.1\n";
        assert_eq!(
            parse_requirements(content),
            vec!["flask==2.0.1", "torch", "python-docx>=1.1"]
        );
    }

    #[test]
    fn parse_requirements_handles_crlf() {
        let content = "flask==2.0.1\r\ntorch\r\n";
        assert_eq!(parse_requirements(content), vec!["flask==2.0.1", "torch"]);
    }

    #[test]
    fn read_requirements_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = read_requirements(&temp.path().join("requirements.txt")).unwrap_err();
        assert!(matches!(err, EnvkitError::RequirementsNotFound { .. }));
    }

    #[test]
    fn read_requirements_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("requirements.txt");
        std::fs::write(&path, "flask\n#x\nlibrosa\n").unwrap();
        assert_eq!(read_requirements(&path).unwrap(), vec!["flask", "librosa"]);
    }

    #[test]
    fn normalize_name_follows_pep503() {
        assert_eq!(normalize_name("Python_Docx"), "python-docx");
        assert_eq!(normalize_name("pyannote.audio"), "pyannote-audio");
        assert_eq!(normalize_name("a-_.b"), "a-b");
    }
}
