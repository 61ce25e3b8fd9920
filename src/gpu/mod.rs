//! GPU, driver and runtime version facts.
//!
//! The torch probe is authoritative and its failures propagate. Driver
//! details from `nvidia-smi` are best-effort extras.

pub mod nvidia;
pub mod probe;

pub use nvidia::{parse_driver_csv, query_drivers, DriverInfo};
pub use probe::{probe_gpu, GpuReport};
