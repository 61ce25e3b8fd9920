//! Python snippets executed with `python -c`.
//!
//! Each snippet prints `key=value` lines on success and lets exceptions
//! escape on failure, so the traceback's last line becomes the error message.
//! Inputs arrive through `sys.argv`, never by string formatting.

/// Import `sys.argv[1]` and print its `__version__`.
pub const IMPORT_MODULE: &str = r#"
import importlib, sys
mod = importlib.import_module(sys.argv[1])
print("version=" + str(getattr(mod, "__version__", "unknown")))
"#;

/// Report CUDA availability and the first device name.
pub const CUDA_DEVICE: &str = r#"
import torch
available = torch.cuda.is_available()
print("available=" + str(available))
if available:
    print("device=" + torch.cuda.get_device_name(0))
"#;

/// Load WhisperX model `sys.argv[1]` on device `sys.argv[2]`.
pub const LOAD_WHISPER: &str = r#"
import sys, time
import whisperx
device = sys.argv[2]
compute_type = "float16" if device == "cuda" else "float32"
start = time.time()
whisperx.load_model(sys.argv[1], device=device, compute_type=compute_type)
print("elapsed=%.6f" % (time.time() - start))
"#;

/// Load pyannote pipeline `sys.argv[1]` with the token from [`TOKEN_ENV`].
pub const LOAD_DIARIZATION: &str = r#"
import os, sys, time
from pyannote.audio import Pipeline
start = time.time()
pipeline = Pipeline.from_pretrained(sys.argv[1], use_auth_token=os.environ.get("ENVKIT_HF_TOKEN"))
if pipeline is None:
    raise RuntimeError("pipeline returned None (gated model or invalid token)")
print("elapsed=%.6f" % (time.time() - start))
"#;

/// Multiply two random `sys.argv[1]`-square matrices on device `sys.argv[2]`.
pub const MATMUL: &str = r#"
import sys, time
import torch
size = int(sys.argv[1])
device = sys.argv[2]
start = time.time()
x = torch.rand((size, size), device=device)
y = torch.mm(x, x)
if device == "cuda":
    torch.cuda.synchronize()
print("elapsed=%.6f" % (time.time() - start))
"#;

/// torch and CUDA runtime versions plus device facts.
pub const GPU_REPORT: &str = r#"
import torch
print("torch=" + torch.__version__)
print("cuda=" + str(torch.version.cuda))
available = torch.cuda.is_available()
print("available=" + str(available))
if available:
    print("device=" + torch.cuda.get_device_name(0))
    print("count=" + str(torch.cuda.device_count()))
"#;

/// Child environment variable carrying the Hugging Face token.
pub const TOKEN_ENV: &str = "ENVKIT_HF_TOKEN";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippets_read_inputs_from_argv() {
        for script in [IMPORT_MODULE, LOAD_WHISPER, LOAD_DIARIZATION, MATMUL] {
            assert!(script.contains("sys.argv[1]"));
        }
    }

    #[test]
    fn diarization_reads_token_from_env() {
        assert!(LOAD_DIARIZATION.contains(TOKEN_ENV));
    }

    #[test]
    fn timed_snippets_print_elapsed() {
        for script in [LOAD_WHISPER, LOAD_DIARIZATION, MATMUL] {
            assert!(script.contains("print(\"elapsed="));
        }
    }
}
