//! Hardware detection public API module.
//!
//! perfdeck only needs CPU identification: the LBR call-graph mode is
//! restricted to Intel CPUs, and the CPU model is shown in logs.

pub mod cpu;

pub use cpu::{detect_cpu_model, detect_cpu_vendor, is_intel};
