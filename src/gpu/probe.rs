//! torch and CUDA runtime facts, as seen by the project interpreter.

use serde::Serialize;

use crate::error::{EnvkitError, Result};
use crate::python::scripts::GPU_REPORT;
use crate::python::{required_field, run_probe, Interpreter};
use crate::shell::ProcessRunner;

const PROBE: &str = "gpu";

/// What torch reports about the accelerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpuReport {
    pub torch_version: String,
    /// `None` for CPU-only torch builds.
    pub cuda_version: Option<String>,
    pub cuda_available: bool,
    /// Name of device 0, when CUDA is available.
    pub device_name: Option<String>,
    pub device_count: Option<u32>,
}

impl GpuReport {
    /// Lines printed by `envkit gpu`, in order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Torch version: {}", self.torch_version),
            format!(
                "CUDA version: {}",
                self.cuda_version.as_deref().unwrap_or("None")
            ),
            format!(
                "CUDA available: {}",
                if self.cuda_available { "True" } else { "False" }
            ),
        ];
        if let Some(name) = &self.device_name {
            lines.push(format!("GPU name: {}", name));
        }
        if let Some(count) = self.device_count {
            lines.push(format!("GPU count: {}", count));
        }
        lines
    }
}

/// Run the GPU probe. Any failure is returned to the caller.
pub fn probe_gpu(runner: &dyn ProcessRunner, interpreter: &Interpreter) -> Result<GpuReport> {
    let spec = interpreter.snippet(GPU_REPORT, Vec::<String>::new());
    let fields = run_probe(runner, PROBE, &spec)?;

    let torch_version = required_field(&fields, PROBE, "torch")?.to_string();
    let cuda_version = match required_field(&fields, PROBE, "cuda")? {
        "None" => None,
        version => Some(version.to_string()),
    };
    let cuda_available = required_field(&fields, PROBE, "available")? == "True";

    let (device_name, device_count) = if cuda_available {
        let name = required_field(&fields, PROBE, "device")?.to_string();
        let raw = required_field(&fields, PROBE, "count")?;
        let count = raw.parse::<u32>().map_err(|_| EnvkitError::ProbeFailed {
            probe: PROBE.to_string(),
            message: format!("unparsable device count '{}'", raw),
        })?;
        (Some(name), Some(count))
    } else {
        (None, None)
    };

    Ok(GpuReport {
        torch_version,
        cuda_version,
        cuda_available,
        device_name,
        device_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;

    #[test]
    fn probe_with_cuda() {
        let runner = MockRunner::new();
        runner.succeed(
            "torch.version.cuda",
            "torch=2.5.1+cu121\ncuda=12.1\navailable=True\ndevice=NVIDIA GeForce RTX 4070\ncount=2\n",
        );

        let report = probe_gpu(&runner, &Interpreter::new("python")).unwrap();

        assert_eq!(
            report.lines(),
            vec![
                "Torch version: 2.5.1+cu121",
                "CUDA version: 12.1",
                "CUDA available: True",
                "GPU name: NVIDIA GeForce RTX 4070",
                "GPU count: 2",
            ]
        );
    }

    #[test]
    fn probe_cpu_only_build() {
        let runner = MockRunner::new();
        runner.succeed(
            "torch.version.cuda",
            "torch=2.5.1+cpu\ncuda=None\navailable=False\n",
        );

        let report = probe_gpu(&runner, &Interpreter::new("python")).unwrap();

        assert_eq!(report.cuda_version, None);
        assert!(!report.cuda_available);
        assert_eq!(report.lines().len(), 3);
        assert_eq!(report.lines()[1], "CUDA version: None");
    }

    #[test]
    fn probe_propagates_import_error() {
        let runner = MockRunner::new();
        runner.fail(
            "torch.version.cuda",
            1,
            "Traceback (most recent call last):\nModuleNotFoundError: No module named 'torch'\n",
        );

        let err = probe_gpu(&runner, &Interpreter::new("python")).unwrap_err();
        assert!(err.to_string().contains("No module named 'torch'"));
    }

    #[test]
    fn probe_propagates_spawn_error() {
        let runner = MockRunner::new();
        runner.spawn_error("python");
        assert!(probe_gpu(&runner, &Interpreter::new("python")).is_err());
    }

    #[test]
    fn probe_rejects_truncated_output() {
        let runner = MockRunner::new();
        runner.succeed("torch.version.cuda", "torch=2.5.1\n");
        let err = probe_gpu(&runner, &Interpreter::new("python")).unwrap_err();
        assert!(err.to_string().contains("missing 'cuda'"));
    }
}
