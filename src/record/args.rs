//! Argument handling: tilde expansion, shell-style splitting and assembly
//! of the final `perf record` argument vector.

use crate::models::{CallGraphMode, RecordRequest, RecordTarget};

/// Expand a leading `~` or `~/` to the user's home directory.
pub fn tilde_expand(path: &str) -> String {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.to_string_lossy().into_owned();
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    path.to_string()
}

/// Split a user-entered parameter string into arguments, shell-style.
///
/// Supports single quotes (verbatim), double quotes (backslash escapes
/// `\"` and `\\`), and backslash escaping outside quotes. An unterminated
/// quote swallows the rest of the string, which matches what users expect
/// while still typing.
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                for qc in chars.by_ref() {
                    if qc == '\'' {
                        break;
                    }
                    current.push(qc);
                }
            }
            '"' => {
                in_word = true;
                while let Some(qc) = chars.next() {
                    match qc {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some(esc @ ('"' | '\\')) => current.push(esc),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => current.push('\\'),
                        },
                        _ => current.push(qc),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(esc) = chars.next() {
                    current.push(esc);
                }
            }
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        args.push(current);
    }
    args
}

/// Assemble the perf option strings for the selected call-graph mode and
/// event spec. An empty event spec means "perf defaults" and adds no flag;
/// `CallGraphMode::None` likewise omits `--call-graph`.
pub fn perf_options(call_graph: CallGraphMode, event_type: &str) -> Vec<String> {
    let mut options = Vec::new();

    let call_graph_arg = call_graph.perf_arg();
    if !call_graph_arg.is_empty() {
        options.push("--call-graph".to_string());
        options.push(call_graph_arg.to_string());
    }

    let event_type = event_type.trim();
    if !event_type.is_empty() {
        options.push("--event".to_string());
        options.push(event_type.to_string());
    }

    options
}

/// Build the full argument vector for `perf`, starting with the `record`
/// subcommand. The launch target's application and args go after a `--`
/// separator so perf never mistakes them for its own options.
pub fn build_perf_args(request: &RecordRequest) -> Vec<String> {
    let mut argv = vec!["record".to_string()];
    argv.extend(request.perf_options.iter().cloned());
    argv.push("--output".to_string());
    argv.push(request.output_file.to_string_lossy().into_owned());

    match &request.target {
        RecordTarget::Attach { pids } => {
            argv.push("--pid".to_string());
            argv.push(
                pids.iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        RecordTarget::Launch {
            application, args, ..
        } => {
            argv.push("--".to_string());
            argv.push(application.clone());
            argv.extend(args.iter().cloned());
        }
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_split_plain_args() {
        assert_eq!(split_args("foo bar  baz"), vec!["foo", "bar", "baz"]);
        assert_eq!(split_args(""), Vec::<String>::new());
        assert_eq!(split_args("   "), Vec::<String>::new());
    }

    #[test]
    fn test_split_quoted_args() {
        assert_eq!(split_args("-e 'cycles:u' \"a b\""), vec!["-e", "cycles:u", "a b"]);
        assert_eq!(split_args(r#"a\ b c"#), vec!["a b", "c"]);
        assert_eq!(split_args(r#""he said \"hi\"""#), vec![r#"he said "hi""#]);
    }

    #[test]
    fn test_split_empty_quoted_arg() {
        assert_eq!(split_args("'' x"), vec!["", "x"]);
    }

    #[test]
    fn test_perf_options_full() {
        assert_eq!(
            perf_options(crate::models::CallGraphMode::Dwarf, "cycles:u"),
            vec!["--call-graph", "dwarf", "--event", "cycles:u"]
        );
    }

    #[test]
    fn test_perf_options_omit_empty() {
        assert!(perf_options(crate::models::CallGraphMode::None, "").is_empty());
        assert_eq!(
            perf_options(crate::models::CallGraphMode::None, "cycles"),
            vec!["--event", "cycles"]
        );
    }

    #[test]
    fn test_build_args_launch() {
        let request = crate::models::RecordRequest {
            perf_options: vec!["--call-graph".into(), "dwarf".into()],
            output_file: PathBuf::from("/tmp/perf.data"),
            target: crate::models::RecordTarget::Launch {
                application: "/usr/bin/ls".into(),
                args: vec!["-l".into()],
                working_dir: PathBuf::from("/tmp"),
            },
        };
        assert_eq!(
            build_perf_args(&request),
            vec![
                "record", "--call-graph", "dwarf", "--output", "/tmp/perf.data", "--",
                "/usr/bin/ls", "-l"
            ]
        );
    }

    #[test]
    fn test_build_args_attach() {
        let request = crate::models::RecordRequest {
            perf_options: vec![],
            output_file: PathBuf::from("/tmp/perf.data"),
            target: crate::models::RecordTarget::Attach { pids: vec![10, 21] },
        };
        assert_eq!(
            build_perf_args(&request),
            vec!["record", "--output", "/tmp/perf.data", "--pid", "10,21"]
        );
    }

    #[test]
    fn test_tilde_expand() {
        let home = dirs::home_dir().map(|h| h.to_string_lossy().into_owned());
        if let Some(home) = home {
            assert_eq!(tilde_expand("~/bin/app"), format!("{}/bin/app", home));
            assert_eq!(tilde_expand("~"), home);
        }
        assert_eq!(tilde_expand("/usr/bin/ls"), "/usr/bin/ls");
    }
}
