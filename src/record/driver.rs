//! Async driver for the external `perf record` process.
//!
//! Spawns perf, streams stdout/stderr line-by-line to a callback, and
//! supports cooperative stopping via a watch channel. Stopping sends perf a
//! SIGINT rather than killing it outright: perf traps SIGINT to flush and
//! finalize the data file, which is exactly what "stop recording" means.

use crate::error::RecordError;
use crate::models::{RecordRequest, RecordTarget};
use crate::record::args::build_perf_args;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::watch;

/// How many trailing stderr lines to include in a failure message.
const ERROR_TAIL_LINES: usize = 8;

/// Run `perf record` for the given request until it exits or is stopped.
///
/// `output_callback` receives every line perf prints, in order. Returns the
/// output file path on success. A stop requested through `cancel_rx` still
/// returns `Ok` when perf manages to finalize the data file; if the file
/// never appeared the run is reported as `Cancelled`.
pub async fn run_perf_record<F>(
    request: &RecordRequest,
    output_callback: F,
    mut cancel_rx: watch::Receiver<bool>,
) -> Result<PathBuf, RecordError>
where
    F: Fn(String) + Send,
{
    let argv = build_perf_args(request);
    // The perf binary resolves via PATH; PERFDECK_PERF overrides it.
    let program = std::env::var("PERFDECK_PERF").unwrap_or_else(|_| "perf".to_string());
    log::info!("[Record] Starting: {} {}", program, argv.join(" "));

    let mut command = Command::new(&program);
    command.args(&argv);
    if let RecordTarget::Launch { working_dir, .. } = &request.target {
        command.current_dir(working_dir);
    }
    command.stdout(std::process::Stdio::piped());
    command.stderr(std::process::Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|e| RecordError::SpawnFailed(e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RecordError::SpawnFailed("Failed to capture stdout".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| RecordError::SpawnFailed("Failed to capture stderr".to_string()))?;

    let mut stdout_lines = BufReader::new(stdout).lines();
    let mut stderr_lines = BufReader::new(stderr).lines();

    let mut stdout_closed = false;
    let mut stderr_closed = false;
    let mut stop_requested = false;
    // perf prints its diagnostics on stderr; keep a tail for error reporting
    let mut stderr_tail: Vec<String> = Vec::new();

    loop {
        if stdout_closed && stderr_closed {
            break;
        }

        tokio::select! {
            line_result = stdout_lines.next_line(), if !stdout_closed => {
                match line_result {
                    Ok(Some(line)) => output_callback(line),
                    Ok(None) => stdout_closed = true,
                    Err(e) => {
                        log::warn!("[Record] stdout read error: {}", e);
                        stdout_closed = true;
                    }
                }
            }
            line_result = stderr_lines.next_line(), if !stderr_closed => {
                match line_result {
                    Ok(Some(line)) => {
                        if stderr_tail.len() == ERROR_TAIL_LINES {
                            stderr_tail.remove(0);
                        }
                        stderr_tail.push(line.clone());
                        output_callback(line);
                    }
                    Ok(None) => stderr_closed = true,
                    Err(e) => {
                        log::warn!("[Record] stderr read error: {}", e);
                        stderr_closed = true;
                    }
                }
            }
            changed = cancel_rx.changed(), if !stop_requested => {
                if changed.is_ok() && *cancel_rx.borrow() {
                    stop_requested = true;
                    log::info!("[Record] Stop requested, sending SIGINT to perf");
                    if let Some(pid) = child.id() {
                        if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGINT) {
                            log::warn!("[Record] Failed to signal perf: {}", e);
                            let _ = child.start_kill();
                        }
                    }
                    // keep draining output until the streams close
                }
            }
        }
    }

    let status = child
        .wait()
        .await
        .map_err(|e| RecordError::RecorderFailed(e.to_string()))?;
    log::info!("[Record] perf exited with status: {}", status);

    let finalized = request.output_file.exists();

    if stop_requested {
        // A stopped recording is a successful one as long as perf wrote
        // its data file before going down.
        if finalized {
            return Ok(request.output_file.clone());
        }
        return Err(RecordError::Cancelled);
    }

    if status.success() && finalized {
        Ok(request.output_file.clone())
    } else {
        let detail = if stderr_tail.is_empty() {
            match status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            }
        } else {
            stderr_tail.join("\n")
        };
        Err(RecordError::RecorderFailed(detail))
    }
}
