//! Integration tests for record-form validation.
//!
//! Exercises the full validation truth table against real files on disk:
//! - Application field (missing, non-file, non-executable, PATH lookup)
//! - Working directory field (missing, non-directory, read-only, empty)
//! - Output file field (parent checks, `.data` extension, auto-append)
//! - Attach-mode process selection

use perfdeck::error::RecordError;
use perfdeck::record::validator::{
    ensure_data_extension, validate_application, validate_attach_selection, validate_output_file,
    validate_working_dir, PERF_DATA_EXTENSION,
};
use std::collections::BTreeSet;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn chmod(path: &Path, mode: u32) {
    let mut perms = std::fs::metadata(path)
        .expect("Failed to stat test file")
        .permissions();
    perms.set_mode(mode);
    std::fs::set_permissions(path, perms).expect("Failed to chmod test file");
}

// ============================================================================
// APPLICATION FIELD
// ============================================================================

#[test]
fn test_application_absolute_path_ok() {
    let valid = validate_application("/bin/sh").expect("/bin/sh should validate");
    assert_eq!(valid.resolved, Path::new("/bin/sh"));
    assert_eq!(valid.default_working_dir, Path::new("/bin"));
}

#[test]
fn test_application_bare_name_resolved_on_path() {
    // `sh` lives on PATH everywhere this suite runs
    let valid = validate_application("sh").expect("sh should resolve via PATH");
    assert!(valid.resolved.is_absolute());
    assert!(valid.resolved.ends_with("sh"));
}

#[test]
fn test_application_missing_file() {
    let err = validate_application("/no/such/binary").unwrap_err();
    assert_eq!(
        err,
        RecordError::ApplicationNotFound("/no/such/binary".to_string())
    );
    assert_eq!(
        err.to_string(),
        "Application file cannot be found: /no/such/binary"
    );
}

#[test]
fn test_application_directory_rejected() {
    let err = validate_application("/tmp").unwrap_err();
    assert_eq!(err, RecordError::ApplicationNotAFile("/tmp".to_string()));
}

#[test]
fn test_application_not_executable() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file = dir.path().join("plain.txt");
    std::fs::write(&file, b"data").expect("Failed to write test file");
    chmod(&file, 0o644);

    let input = file.to_string_lossy().into_owned();
    let err = validate_application(&input).unwrap_err();
    assert_eq!(err, RecordError::ApplicationNotExecutable(input));
}

#[test]
fn test_application_executable_file_ok() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file = dir.path().join("tool");
    std::fs::write(&file, b"#!/bin/sh\n").expect("Failed to write test file");
    chmod(&file, 0o755);

    let input = file.to_string_lossy().into_owned();
    let valid = validate_application(&input).expect("Executable file should validate");
    assert_eq!(valid.default_working_dir, dir.path());
}

// ============================================================================
// WORKING DIRECTORY FIELD
// ============================================================================

#[test]
fn test_working_dir_empty_is_valid() {
    assert!(validate_working_dir("").is_ok());
}

#[test]
fn test_working_dir_missing() {
    let err = validate_working_dir("/no/such/dir").unwrap_err();
    assert_eq!(err, RecordError::WorkingDirNotFound("/no/such/dir".to_string()));
    assert_eq!(
        err.to_string(),
        "Working directory folder cannot be found: /no/such/dir"
    );
}

#[test]
fn test_working_dir_file_rejected() {
    let err = validate_working_dir("/bin/sh").unwrap_err();
    assert_eq!(
        err,
        RecordError::WorkingDirNotADirectory("/bin/sh".to_string())
    );
}

#[test]
fn test_working_dir_read_only_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let sub = dir.path().join("frozen");
    std::fs::create_dir(&sub).expect("Failed to create sub dir");
    chmod(&sub, 0o555);

    let input = sub.to_string_lossy().into_owned();
    let err = validate_working_dir(&input).unwrap_err();
    assert_eq!(err, RecordError::WorkingDirNotWritable(input.clone()));

    // restore so TempDir can clean up
    chmod(&sub, 0o755);
}

#[test]
fn test_working_dir_writable_ok() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    assert!(validate_working_dir(&dir.path().to_string_lossy()).is_ok());
}

// ============================================================================
// OUTPUT FILE FIELD
// ============================================================================

#[test]
fn test_output_file_ok() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("perf.data").to_string_lossy().into_owned();
    assert!(validate_output_file(&input).is_ok());
}

#[test]
fn test_output_file_parent_missing() {
    let err = validate_output_file("/no/such/dir/perf.data").unwrap_err();
    assert_eq!(
        err,
        RecordError::OutputDirNotFound("/no/such/dir".to_string())
    );
}

#[test]
fn test_output_file_parent_is_file() {
    let err = validate_output_file("/bin/sh/perf.data").unwrap_err();
    assert_eq!(
        err,
        RecordError::OutputDirNotADirectory("/bin/sh".to_string())
    );
}

#[test]
fn test_output_file_parent_read_only() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let sub = dir.path().join("frozen");
    std::fs::create_dir(&sub).expect("Failed to create sub dir");
    chmod(&sub, 0o555);

    let input = sub.join("perf.data").to_string_lossy().into_owned();
    let err = validate_output_file(&input).unwrap_err();
    assert_eq!(
        err,
        RecordError::OutputDirNotWritable(sub.to_string_lossy().into_owned())
    );

    chmod(&sub, 0o755);
}

#[test]
fn test_output_file_requires_data_extension() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("profile.bin").to_string_lossy().into_owned();
    let err = validate_output_file(&input).unwrap_err();
    assert_eq!(err, RecordError::OutputMissingExtension(PERF_DATA_EXTENSION));
    assert_eq!(err.to_string(), "Output file must end with .data");
}

#[test]
fn test_ensure_data_extension_appends_once() {
    assert_eq!(ensure_data_extension("/tmp/run1"), "/tmp/run1.data");
    assert_eq!(ensure_data_extension("/tmp/run1.data"), "/tmp/run1.data");
}

// ============================================================================
// ATTACH SELECTION
// ============================================================================

#[test]
fn test_attach_selection_requires_process() {
    let empty = BTreeSet::new();
    assert_eq!(
        validate_attach_selection(&empty).unwrap_err(),
        RecordError::NoProcessSelected
    );

    let mut selected = BTreeSet::new();
    selected.insert(1u32);
    assert!(validate_attach_selection(&selected).is_ok());
}
