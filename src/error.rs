//! Unified error type hierarchy for perfdeck
//!
//! Provides structured error handling with ConfigError, RecordError and
//! HardwareError, plus the crate-level Result alias.

use std::io;
use thiserror::Error;

/// Configuration file parsing and persistence errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Config directory could not be resolved")]
    NoConfigDir,

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Recorder driver errors.
///
/// Validation variants carry a user-facing message that the UI shows
/// verbatim in the inline error banner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Application file cannot be found: {0}")]
    ApplicationNotFound(String),

    #[error("Application file is not valid: {0}")]
    ApplicationNotAFile(String),

    #[error("Application file is not executable: {0}")]
    ApplicationNotExecutable(String),

    #[error("Working directory folder cannot be found: {0}")]
    WorkingDirNotFound(String),

    #[error("Working directory folder is not valid: {0}")]
    WorkingDirNotADirectory(String),

    #[error("Working directory folder is not writable: {0}")]
    WorkingDirNotWritable(String),

    #[error("Output file directory folder cannot be found: {0}")]
    OutputDirNotFound(String),

    #[error("Output file directory folder is not valid: {0}")]
    OutputDirNotADirectory(String),

    #[error("Output file directory folder is not writable: {0}")]
    OutputDirNotWritable(String),

    #[error("Output file must end with {0}")]
    OutputMissingExtension(&'static str),

    #[error("No process selected for attaching")]
    NoProcessSelected,

    #[error("Failed to start perf: {0}")]
    SpawnFailed(String),

    #[error("perf exited with an error: {0}")]
    RecorderFailed(String),

    #[error("Recording cancelled by user")]
    Cancelled,
}

/// Hardware detection errors.
#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("CPU detection failed: {0}")]
    CpuDetectionFailed(String),

    #[error("IO error during hardware detection: {0}")]
    IoError(#[from] io::Error),
}

/// Top-level result type for operations that may fail.
/// Use this as the return type for all fallible functions.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        let err = RecordError::ApplicationNotFound("/tmp/nope".to_string());
        assert_eq!(err.to_string(), "Application file cannot be found: /tmp/nope");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::FileNotFound("/etc/perfdeck.json".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /etc/perfdeck.json"
        );
    }

    #[test]
    fn test_output_extension_message() {
        let err = RecordError::OutputMissingExtension(".data");
        assert_eq!(err.to_string(), "Output file must end with .data");
    }

    #[test]
    fn test_result_type_ok() {
        let result: Result<i32> = Ok(42);
        assert!(result.is_ok());
    }
}
