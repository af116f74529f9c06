//! Recorder driver: wraps the external `perf record` command.
//!
//! This module owns everything between "the user pressed start" and "perf
//! exited": input validation, argument assembly, process spawning, output
//! streaming and stop/cancel handling.
//!
//! - `validator`: field validation for the launch/attach forms
//! - `args`: shell-style splitting, tilde expansion, perf argv assembly
//! - `driver`: async perf process driver

pub mod args;
pub mod driver;
pub mod validator;

pub use args::{build_perf_args, perf_options, split_args, tilde_expand};
pub use driver::run_perf_record;
pub use validator::{
    ensure_data_extension, validate_application, validate_attach_selection,
    validate_output_file, validate_working_dir, ValidApplication, PERF_DATA_EXTENSION,
};
