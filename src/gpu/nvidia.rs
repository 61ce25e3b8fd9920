//! Driver details from `nvidia-smi`.

use serde::Serialize;

use crate::shell::{CommandSpec, ProcessRunner};

/// One GPU as listed by `nvidia-smi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverInfo {
    pub driver_version: String,
    pub name: String,
}

/// `nvidia-smi --query-gpu=driver_version,name --format=csv,noheader`.
pub fn nvidia_smi_command() -> CommandSpec {
    CommandSpec::new("nvidia-smi").args([
        "--query-gpu=driver_version,name",
        "--format=csv,noheader",
    ])
}

/// Query driver versions. Returns an empty list when nvidia-smi is absent
/// or fails.
pub fn query_drivers(runner: &dyn ProcessRunner) -> Vec<DriverInfo> {
    match runner.run(&nvidia_smi_command()) {
        Ok(result) if result.success => parse_driver_csv(&result.stdout),
        Ok(result) => {
            tracing::debug!("nvidia-smi failed: {}", result.failure_message());
            Vec::new()
        }
        Err(e) => {
            tracing::debug!("nvidia-smi unavailable: {}", e);
            Vec::new()
        }
    }
}

/// Parse `driver_version, name` lines (one per GPU).
pub fn parse_driver_csv(output: &str) -> Vec<DriverInfo> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (version, name) = line.split_once(',')?;
            let version = version.trim();
            if version.is_empty() {
                return None;
            }
            Some(DriverInfo {
                driver_version: version.to_string(),
                name: name.trim().to_string(),
            })
        })
        .collect()
}
