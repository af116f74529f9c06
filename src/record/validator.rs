//! Field validation for the record page.
//!
//! Each validator returns the first failing check as a `RecordError` whose
//! display string is shown verbatim in the inline error banner. The checks
//! and their order match the form behavior: application, working directory
//! and output path are validated on every edit, attach selection when the
//! recording starts.

use crate::error::RecordError;
use crate::record::args::tilde_expand;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Required extension for the recorder output file.
pub const PERF_DATA_EXTENSION: &str = ".data";

/// A validated launch application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidApplication {
    /// Absolute path to the executable, after tilde expansion and PATH
    /// lookup.
    pub resolved: PathBuf,
    /// The executable's parent directory, used as the working-directory
    /// placeholder when the user leaves that field empty.
    pub default_working_dir: PathBuf,
}

/// Resolve a user-entered application name against PATH, mirroring how the
/// shell would find it. Absolute and relative paths are used as-is.
fn find_executable(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    let direct = Path::new(name);
    if direct.components().count() > 1 || direct.is_absolute() {
        return Some(direct.to_path_buf());
    }
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(unix)]
fn is_writable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o200 != 0)
        .unwrap_or(false)
}

/// Validate the launch-mode application field.
pub fn validate_application(input: &str) -> Result<ValidApplication, RecordError> {
    let expanded = tilde_expand(input);
    let resolved = find_executable(&expanded)
        .ok_or_else(|| RecordError::ApplicationNotFound(input.to_string()))?;

    if !resolved.exists() {
        return Err(RecordError::ApplicationNotFound(input.to_string()));
    }
    if !resolved.is_file() {
        return Err(RecordError::ApplicationNotAFile(input.to_string()));
    }
    if !is_executable(&resolved) {
        return Err(RecordError::ApplicationNotExecutable(input.to_string()));
    }

    let default_working_dir = resolved
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));

    Ok(ValidApplication {
        resolved,
        default_working_dir,
    })
}

/// Validate the working-directory field. An empty field is valid; the
/// launch form substitutes the application's directory.
pub fn validate_working_dir(input: &str) -> Result<(), RecordError> {
    if input.is_empty() {
        return Ok(());
    }
    let folder = PathBuf::from(tilde_expand(input));

    if !folder.exists() {
        return Err(RecordError::WorkingDirNotFound(input.to_string()));
    }
    if !folder.is_dir() {
        return Err(RecordError::WorkingDirNotADirectory(input.to_string()));
    }
    if !is_writable(&folder) {
        return Err(RecordError::WorkingDirNotWritable(input.to_string()));
    }
    Ok(())
}

/// Validate the output-file field: the parent directory must exist, be a
/// directory and be writable, and the file name must carry the `.data`
/// extension.
pub fn validate_output_file(input: &str) -> Result<(), RecordError> {
    let file = PathBuf::from(tilde_expand(input));
    let folder = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let folder_str = folder.to_string_lossy().into_owned();
    if !folder.exists() {
        return Err(RecordError::OutputDirNotFound(folder_str));
    }
    if !folder.is_dir() {
        return Err(RecordError::OutputDirNotADirectory(folder_str));
    }
    if !is_writable(&folder) {
        return Err(RecordError::OutputDirNotWritable(folder_str));
    }
    if !file.to_string_lossy().ends_with(PERF_DATA_EXTENSION) {
        return Err(RecordError::OutputMissingExtension(PERF_DATA_EXTENSION));
    }
    Ok(())
}

/// Append the `.data` extension if the path doesn't already carry it.
/// Applied when the user confirms the output path (enter or file picker).
pub fn ensure_data_extension(path: &str) -> String {
    if path.ends_with(PERF_DATA_EXTENSION) {
        path.to_string()
    } else {
        format!("{}{}", path, PERF_DATA_EXTENSION)
    }
}

/// Attach mode needs at least one selected process.
pub fn validate_attach_selection(selected: &BTreeSet<u32>) -> Result<(), RecordError> {
    if selected.is_empty() {
        return Err(RecordError::NoProcessSelected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_application_found_on_path() {
        // /bin/sh exists on any Linux box this runs on
        let valid = validate_application("/bin/sh").unwrap();
        assert!(valid.resolved.is_file());
        assert_eq!(valid.default_working_dir, PathBuf::from("/bin"));
    }

    #[test]
    fn test_validate_application_bare_name_resolves_via_path() {
        let valid = validate_application("sh").unwrap();
        assert!(valid.resolved.is_absolute());
    }

    #[test]
    fn test_validate_application_missing() {
        assert_eq!(
            validate_application("/definitely/not/here"),
            Err(RecordError::ApplicationNotFound("/definitely/not/here".to_string()))
        );
    }

    #[test]
    fn test_validate_application_directory_rejected() {
        assert_eq!(
            validate_application("/tmp"),
            Err(RecordError::ApplicationNotAFile("/tmp".to_string()))
        );
    }

    #[test]
    fn test_validate_working_dir() {
        assert!(validate_working_dir("").is_ok());
        assert!(validate_working_dir("/tmp").is_ok());
        assert_eq!(
            validate_working_dir("/no/such/dir"),
            Err(RecordError::WorkingDirNotFound("/no/such/dir".to_string()))
        );
        assert_eq!(
            validate_working_dir("/bin/sh"),
            Err(RecordError::WorkingDirNotADirectory("/bin/sh".to_string()))
        );
    }

    #[test]
    fn test_validate_output_file() {
        assert!(validate_output_file("/tmp/perf.data").is_ok());
        assert_eq!(
            validate_output_file("/tmp/perf.bin"),
            Err(RecordError::OutputMissingExtension(PERF_DATA_EXTENSION))
        );
        assert_eq!(
            validate_output_file("/no/such/dir/perf.data"),
            Err(RecordError::OutputDirNotFound("/no/such/dir".to_string()))
        );
    }

    #[test]
    fn test_ensure_data_extension() {
        assert_eq!(ensure_data_extension("/tmp/out"), "/tmp/out.data");
        assert_eq!(ensure_data_extension("/tmp/out.data"), "/tmp/out.data");
    }

    #[test]
    fn test_attach_selection() {
        let mut selected = BTreeSet::new();
        assert_eq!(
            validate_attach_selection(&selected),
            Err(RecordError::NoProcessSelected)
        );
        selected.insert(1);
        assert!(validate_attach_selection(&selected).is_ok());
    }
}
