//! Decoupled logging pipeline for perfdeck.
//!
//! A single background thread drains an unbounded crossbeam channel and
//! appends every line to a log file on disk, forwarding a copy to the UI
//! channel without blocking. Each recording session can switch to a
//! dedicated session log file so perf output stays grouped per run.
//!
//! ```text
//! log::* macros / recorder output
//!     |
//! [LogCollector] (crossbeam unbounded, non-blocking)
//!     +--> logs/<timestamp>.log (always written)
//!     +--> UI channel (try_send, dropped when congested)
//! ```

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Internal log line or flush marker.
enum LogMessage {
    Line(LogLine),
    /// Flush marker with a channel to signal completion.
    Flush(std::sync::mpsc::Sender<()>),
}

/// Session state with generation tracking so the background thread can
/// detect a session switch and reopen its file handle.
#[derive(Clone, Debug)]
struct SessionState {
    path: Option<PathBuf>,
    generation: u64,
}

/// Resolve the logs directory relative to the current working directory.
pub fn get_logs_path() -> Result<PathBuf, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Failed to get current working directory: {}", e))?;
    Ok(cwd.join("logs"))
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir_exists(log_dir: &PathBuf) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))
}

/// A log line with metadata.
#[derive(Clone, Debug)]
pub struct LogLine {
    pub message: String,
    pub timestamp: String,
}

impl LogLine {
    pub fn new(message: String) -> Self {
        LogLine {
            message,
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }
}

/// Unified logger handling disk persistence and UI dispatch.
pub struct LogCollector {
    /// Unbounded sender; log submission can never block or fail.
    tx: Sender<LogMessage>,
    log_dir: PathBuf,
    ui_tx: tokio::sync::mpsc::Sender<LogLine>,
    session_state: Arc<Mutex<SessionState>>,
}

impl LogCollector {
    /// Create a new LogCollector with a background persister thread.
    ///
    /// A plain OS thread with a blocking `recv()` rather than a tokio task:
    /// logs must survive regardless of which runtime (or none) the sender
    /// lives on.
    pub fn new(
        log_dir: PathBuf,
        ui_tx: tokio::sync::mpsc::Sender<LogLine>,
    ) -> Result<Self, String> {
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| format!("Failed to create log dir: {}", e))?;

        let (tx, rx) = unbounded::<LogMessage>();

        let session_state = Arc::new(Mutex::new(SessionState {
            path: None,
            generation: 0,
        }));
        let session_state_clone = Arc::clone(&session_state);
        let log_dir_clone = log_dir.clone();
        let ui_tx_clone = ui_tx.clone();

        std::thread::spawn(move || {
            let mut file_handle: Option<File> = None;
            let mut last_generation: u64 = 0;

            while let Ok(msg) = rx.recv() {
                match msg {
                    LogMessage::Line(line) => {
                        // Reopen when a recording session switched log files
                        if let Ok(session) = session_state_clone.lock() {
                            if session.generation != last_generation {
                                file_handle = None;
                                last_generation = session.generation;
                            }
                        }

                        if file_handle.is_none() {
                            let path = session_state_clone
                                .lock()
                                .ok()
                                .and_then(|s| s.path.clone())
                                .map(Ok)
                                .unwrap_or_else(|| new_log_file(&log_dir_clone));
                            if let Ok(path) = path {
                                file_handle = OpenOptions::new()
                                    .create(true)
                                    .append(true)
                                    .open(&path)
                                    .ok();
                            }
                        }

                        if let Some(file) = file_handle.as_mut() {
                            let formatted =
                                format!("[{}] {}\n", line.timestamp, line.message);
                            let _ = file.write_all(formatted.as_bytes());
                            let _ = file.flush();
                        }

                        // Disk persistence has priority; a congested UI
                        // channel just drops the copy.
                        let _ = ui_tx_clone.try_send(line);
                    }
                    LogMessage::Flush(done) => {
                        if let Some(file) = file_handle.as_mut() {
                            let _ = file.flush();
                        }
                        let _ = done.send(());
                    }
                }
            }
        });

        Ok(LogCollector {
            tx,
            log_dir,
            ui_tx,
            session_state,
        })
    }

    /// Start a new recording session with a dedicated log file.
    ///
    /// Increments the generation counter so the background thread reopens
    /// its handle on the next write.
    pub fn start_new_session(&self, filename: &str) -> Result<PathBuf, String> {
        let log_path = self.log_dir.join(filename);
        {
            let mut session = self
                .session_state
                .lock()
                .map_err(|e| format!("Failed to lock session state: {}", e))?;
            session.path = Some(log_path.clone());
            session.generation = session.generation.wrapping_add(1);
        }
        log::info!("[Log] New session log file: {}", log_path.display());
        Ok(log_path)
    }

    /// Get the current session log file path, if a session is active.
    pub fn get_session_log_path(&self) -> Option<PathBuf> {
        self.session_state
            .lock()
            .ok()
            .and_then(|session| session.path.clone())
    }

    /// Send a log line (non-blocking, cannot fail).
    pub fn log(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Send a simple string log.
    pub fn log_str(&self, message: impl Into<String>) {
        self.log(LogLine::new(message.into()));
    }

    /// Wait for all pending logs to be durably written to disk.
    ///
    /// Sends a flush marker down the channel and blocks until the persister
    /// thread has processed it. Call before shutdown so trailing lines
    /// ("recording finished") reach disk.
    pub async fn wait_for_empty(&self) -> Result<(), String> {
        let (tx, rx) = std::sync::mpsc::channel::<()>();

        self.tx
            .send(LogMessage::Flush(tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;

        rx.recv()
            .map_err(|e| format!("Flush signal interrupted: {}", e))?;
        Ok(())
    }
}

impl Clone for LogCollector {
    fn clone(&self) -> Self {
        LogCollector {
            tx: self.tx.clone(),
            log_dir: self.log_dir.clone(),
            ui_tx: self.ui_tx.clone(),
            session_state: Arc::clone(&self.session_state),
        }
    }
}

/// Wires all log::info!(), log::warn!(), log::error!() calls into the
/// collector pipeline.
impl Log for LogCollector {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.log_str(format!("[{}] {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {
        // LogCollector flushes after every write
    }
}

fn new_log_file(log_dir: &PathBuf) -> Result<PathBuf, String> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("{}.log", timestamp));
    File::create(&log_path).map_err(|e| format!("Failed to create log file: {}", e))?;
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_collector_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let (ui_tx, _ui_rx) = tokio::sync::mpsc::channel(100);
        let result = LogCollector::new(log_dir.clone(), ui_tx);

        assert!(result.is_ok());
        assert!(log_dir.exists());
    }

    #[tokio::test]
    async fn test_lines_reach_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let (ui_tx, mut ui_rx) = tokio::sync::mpsc::channel(100);
        let collector = LogCollector::new(log_dir.clone(), ui_tx).unwrap();

        collector.log_str("samples captured: 1234");
        collector.wait_for_empty().await.unwrap();

        let mut entries = std::fs::read_dir(&log_dir).unwrap();
        let file = entries.next().unwrap().unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("samples captured: 1234"));

        // UI copy arrives too
        let line = ui_rx.recv().await.unwrap();
        assert!(line.message.contains("samples captured"));
    }

    #[tokio::test]
    async fn test_session_log_switches_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");

        let (ui_tx, _ui_rx) = tokio::sync::mpsc::channel(100);
        let collector = LogCollector::new(log_dir.clone(), ui_tx).unwrap();

        let session = collector.start_new_session("session_test.log").unwrap();
        collector.log_str("perf output line");
        collector.wait_for_empty().await.unwrap();

        assert_eq!(collector.get_session_log_path(), Some(session.clone()));
        let content = std::fs::read_to_string(&session).unwrap();
        assert!(content.contains("perf output line"));
    }
}
