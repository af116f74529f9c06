//! CPU detection and identification module.

use crate::error::HardwareError;
use std::fs;

/// Parse /proc/cpuinfo and extract CPU model and vendor id.
fn parse_cpuinfo(content: &str) -> (String, String) {
    let mut model = "Unknown".to_string();
    let mut vendor = "Unknown".to_string();

    for line in content.lines() {
        if line.starts_with("model name") && model == "Unknown" {
            if let Some(value) = line.split(": ").nth(1) {
                model = value.trim().to_string();
            }
        }
        if line.starts_with("vendor_id") && vendor == "Unknown" {
            if let Some(value) = line.split(": ").nth(1) {
                vendor = value.trim().to_string();
            }
        }
    }

    (model, vendor)
}

fn read_cpuinfo() -> (String, String) {
    match fs::read_to_string("/proc/cpuinfo") {
        Ok(content) => parse_cpuinfo(&content),
        Err(_) => ("Unknown".to_string(), "Unknown".to_string()),
    }
}

/// Detect CPU model name from /proc/cpuinfo.
pub fn detect_cpu_model() -> Result<String, HardwareError> {
    let (model, _) = read_cpuinfo();
    Ok(model)
}

/// Detect CPU vendor id from /proc/cpuinfo.
pub fn detect_cpu_vendor() -> Result<String, HardwareError> {
    let (_, vendor) = read_cpuinfo();
    Ok(vendor)
}

/// Whether this machine has an Intel CPU.
///
/// Gates the Last Branch Record unwind option, which perf only supports on
/// Intel hardware.
pub fn is_intel() -> bool {
    matches!(detect_cpu_vendor().as_deref(), Ok("GenuineIntel"))
}
