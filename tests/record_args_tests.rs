//! Integration tests for perf argument assembly.
//!
//! Verifies the exact argv handed to `perf` for both record modes, the
//! option mapping for call-graph and event settings, and the shell-style
//! splitting of the launch-argument field.

use perfdeck::models::{CallGraphMode, RecordRequest, RecordTarget};
use perfdeck::record::args::{build_perf_args, perf_options, split_args};
use std::path::PathBuf;

fn launch_request(perf_options: Vec<String>, application: &str, args: &[&str]) -> RecordRequest {
    RecordRequest {
        perf_options,
        output_file: PathBuf::from("/tmp/perf.data"),
        target: RecordTarget::Launch {
            application: application.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            working_dir: PathBuf::from("/tmp"),
        },
    }
}

// ============================================================================
// ARGV ASSEMBLY
// ============================================================================

#[test]
fn test_launch_argv_shape() {
    let options = perf_options(CallGraphMode::Dwarf, "");
    let request = launch_request(options, "/usr/bin/stress", &["--cpu", "4"]);

    assert_eq!(
        build_perf_args(&request),
        vec![
            "record",
            "--call-graph",
            "dwarf",
            "--output",
            "/tmp/perf.data",
            "--",
            "/usr/bin/stress",
            "--cpu",
            "4",
        ]
    );
}

#[test]
fn test_attach_argv_joins_pids() {
    let request = RecordRequest {
        perf_options: perf_options(CallGraphMode::FramePointer, "cycles:u"),
        output_file: PathBuf::from("/home/me/run.data"),
        target: RecordTarget::Attach {
            pids: vec![101, 2002, 33],
        },
    };

    assert_eq!(
        build_perf_args(&request),
        vec![
            "record",
            "--call-graph",
            "fp",
            "--event",
            "cycles:u",
            "--output",
            "/home/me/run.data",
            "--pid",
            "101,2002,33",
        ]
    );
}

#[test]
fn test_launch_application_always_behind_separator() {
    // An application named like a perf flag must stay on the command side
    let request = launch_request(Vec::new(), "--output", &[]);
    let argv = build_perf_args(&request);
    let sep = argv.iter().position(|a| a == "--").expect("missing -- separator");
    assert_eq!(argv[sep + 1], "--output");
}

// ============================================================================
// OPTION MAPPING
// ============================================================================

#[test]
fn test_perf_options_none_mode_omits_call_graph() {
    assert!(perf_options(CallGraphMode::None, "").is_empty());
}

#[test]
fn test_perf_options_event_only() {
    assert_eq!(
        perf_options(CallGraphMode::None, "branch-misses"),
        vec!["--event", "branch-misses"]
    );
}

#[test]
fn test_perf_options_trims_event_spec() {
    assert_eq!(
        perf_options(CallGraphMode::Lbr, "  cycles:Pu  "),
        vec!["--call-graph", "lbr", "--event", "cycles:Pu"]
    );
    // Whitespace-only means "perf defaults", same as empty
    assert_eq!(
        perf_options(CallGraphMode::None, "   "),
        Vec::<String>::new()
    );
}

// ============================================================================
// LAUNCH-ARGUMENT SPLITTING
// ============================================================================

#[test]
fn test_split_args_plain_words() {
    assert_eq!(split_args("-a -b value"), vec!["-a", "-b", "value"]);
}

#[test]
fn test_split_args_quotes_preserve_spaces() {
    assert_eq!(
        split_args(r#"--title "my run" --path '/opt/some dir'"#),
        vec!["--title", "my run", "--path", "/opt/some dir"]
    );
}

#[test]
fn test_split_args_backslash_escapes() {
    assert_eq!(split_args(r"a\ b c"), vec!["a b", "c"]);
}

#[test]
fn test_split_args_empty_input() {
    assert!(split_args("").is_empty());
    assert!(split_args("   ").is_empty());
}
