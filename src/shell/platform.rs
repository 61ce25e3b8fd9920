//! Platform detection helpers.

/// Check if running in a CI environment.
///
/// Used to force non-interactive rendering in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    is_ci_with_env(|key| std::env::var(key))
}

/// CI detection with a custom env var lookup (for testing).
pub fn is_ci_with_env<F>(env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    const CI_VARS: &[&str] = &[
        "CI",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "CIRCLECI",
        "TRAVIS",
        "JENKINS_URL",
    ];
    CI_VARS.iter().any(|key| env_fn(key).is_ok())
}

/// Whether the current target is Windows.
pub fn is_windows() -> bool {
    cfg!(target_os = "windows")
}
