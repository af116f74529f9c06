//! perfdeck: a desktop frontend for `perf record`.
//!
//! This crate wraps Linux `perf` sampling in an egui panel: pick an
//! application (or attach to running processes), choose the call-graph
//! and event options, and stream the recorder's output live while the
//! profile data file is written.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Core data structures and types
//! - **hardware**: CPU detection (gates the LBR call-graph mode)
//! - **system**: Process enumeration for the attach picker
//! - **config**: Preference persistence (recent entries, per-app settings)
//! - **record**: Validation, perf argument assembly, and the recorder driver
//! - **ui**: UI controller and egui integration

#![allow(dead_code)]

// Core foundational modules
pub mod error;
pub mod models;

// CPU detection for call-graph gating
pub mod hardware;

// Process enumeration
pub mod system;

// Preference persistence
pub mod config;

// Validation, argument assembly, recorder driver
pub mod record;

// UI controller and egui integration
pub mod ui;

// Robust, decoupled logging system
pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

// Re-export log collector for use throughout the system
pub use log_collector::{ensure_logs_dir_exists, get_logs_path, LogCollector, LogLine};

// Re-export error types for easy access
pub use error::{ConfigError, HardwareError, RecordError, Result};

// Re-export model types for easy access
pub use models::{CallGraphMode, ProcData, ProcessState, RecordRequest, RecordTarget, RecordType};

// Re-export config types and SettingsManager
pub use config::{AppPrefs, AppState, SettingsManager, MAX_RECENT_ENTRIES};

// Re-export the UI surface
pub use ui::{AppUI, RecordController, RecordEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert_eq!(VERSION, "0.1.0");
    }

    #[test]
    fn test_error_reexport() {
        // Verify error types are accessible via crate root
        let _: Result<i32> = Ok(42);
    }

    #[test]
    fn test_models_reexport() {
        // Verify model types are accessible via crate root
        let _mode = CallGraphMode::Dwarf;
        let _kind = RecordType::LaunchApplication;
    }

    #[test]
    fn test_enum_variants_accessible() {
        assert_eq!(RecordType::AttachToProcess, RecordType::AttachToProcess);
        assert_eq!(CallGraphMode::FramePointer.perf_arg(), "fp");
    }
}
