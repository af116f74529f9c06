//! RecordController: central orchestrator between the egui frontend and the
//! background recorder/enumeration tasks.
//!
//! Owns the shared `AppState`, the event channel to the UI, and the
//! cancellation channel to the driver. All long-running work is spawned
//! here and reports back as `RecordEvent`s.

use crate::config::{AppState, SettingsManager};
use crate::error::ConfigError;
use crate::models::{ProcData, RecordRequest};
use crate::record::driver::run_perf_record;
use crate::system::processes::snapshot_processes;
use crate::LogCollector;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Capacity of the record event channel. Recorder output is forwarded with
/// `try_send`, so the buffer must absorb a full burst of perf stderr between
/// two UI frames without dropping lines.
pub const EVENT_CHANNEL_CAPACITY: usize = 65536;

/// Discrete events emitted from background tasks to the UI.
#[derive(Clone, Debug)]
pub enum RecordEvent {
    /// One line of recorder output (stdout or stderr).
    Output(String),
    /// Recording ended and the data file is in place.
    Finished(PathBuf),
    /// Recording failed; the message is shown verbatim.
    Failed(String),
    /// Fresh process snapshot for the attach picker.
    ProcessList(Vec<ProcData>),
    /// Application log line for the collapsible log view.
    Log(String),
}

/// Central state manager wiring settings, events and background tasks.
pub struct RecordController {
    /// Thread-safe application state, persisted on change.
    pub settings: Arc<std::sync::RwLock<AppState>>,
    /// Channel for record events.
    pub record_tx: tokio::sync::mpsc::Sender<RecordEvent>,
    /// Channel for stop signals to the driver.
    pub cancel_tx: tokio::sync::watch::Sender<bool>,
    /// Log collector for disk persistence of recorder output.
    pub log_collector: Option<Arc<LogCollector>>,
    /// Whether a recording is currently running.
    pub is_recording: Arc<AtomicBool>,
    /// Guards against overlapping process snapshots.
    process_refresh_inflight: Arc<AtomicBool>,
    /// Detected once at startup; gates the LBR call-graph option.
    pub intel_cpu: bool,
}

impl RecordController {
    /// Create a controller with settings loaded from disk.
    pub fn new(
        record_tx: tokio::sync::mpsc::Sender<RecordEvent>,
        cancel_tx: tokio::sync::watch::Sender<bool>,
        log_collector: Option<Arc<LogCollector>>,
    ) -> Result<Self, ConfigError> {
        let settings = SettingsManager::new_shared()?;
        let intel_cpu = crate::hardware::is_intel();
        log::info!(
            "[Controller] Settings loaded, CPU vendor {}",
            if intel_cpu { "Intel (LBR available)" } else { "non-Intel" }
        );

        Ok(RecordController {
            settings,
            record_tx,
            cancel_tx,
            log_collector,
            is_recording: Arc::new(AtomicBool::new(false)),
            process_refresh_inflight: Arc::new(AtomicBool::new(false)),
            intel_cpu,
        })
    }

    /// Snapshot of the current settings.
    pub fn get_state(&self) -> Result<AppState, String> {
        self.settings
            .read()
            .map(|s| s.clone())
            .map_err(|e| format!("Settings lock poisoned: {}", e))
    }

    /// Mutate settings and persist them. Persistence failures are logged,
    /// not surfaced; losing a preference write never blocks a recording.
    pub fn update_state(&self, f: impl FnOnce(&mut AppState)) {
        let state = match self.settings.write() {
            Ok(mut guard) => {
                f(&mut guard);
                guard.clone()
            }
            Err(e) => {
                log::error!("[Controller] Settings lock poisoned: {}", e);
                return;
            }
        };
        if let Err(e) = SettingsManager::save(&state) {
            log::warn!("[Controller] Failed to persist settings: {}", e);
        }
    }

    /// Start a recording in a background task.
    ///
    /// Events flow back over `record_tx`: `Output` per line, then exactly
    /// one of `Finished` or `Failed`.
    pub fn start_recording(&self, request: RecordRequest) {
        if self.is_recording.swap(true, Ordering::SeqCst) {
            log::warn!("[Controller] start_recording while already recording, ignored");
            return;
        }

        // Fresh cancel state for this run
        let _ = self.cancel_tx.send(false);
        let cancel_rx = self.cancel_tx.subscribe();
        let record_tx = self.record_tx.clone();
        let is_recording = self.is_recording.clone();
        let log_collector = self.log_collector.clone();

        if let Some(ref collector) = log_collector {
            let session_name = format!(
                "record_{}.log",
                chrono::Local::now().format("%Y%m%d_%H%M%S")
            );
            if let Err(e) = collector.start_new_session(&session_name) {
                log::warn!("[Controller] Failed to start session log: {}", e);
            }
        }

        tokio::spawn(async move {
            let output_tx = record_tx.clone();
            let output_collector = log_collector.clone();
            let result = run_perf_record(
                &request,
                move |line| {
                    if let Some(ref collector) = output_collector {
                        collector.log_str(&line);
                    }
                    let _ = output_tx.try_send(RecordEvent::Output(line));
                },
                cancel_rx,
            )
            .await;

            is_recording.store(false, Ordering::SeqCst);

            match result {
                Ok(path) => {
                    log::info!("[Controller] Recording finished: {}", path.display());
                    let _ = record_tx.send(RecordEvent::Finished(path)).await;
                }
                Err(e) => {
                    log::error!("[Controller] Recording failed: {}", e);
                    let _ = record_tx.send(RecordEvent::Failed(e.to_string())).await;
                }
            }
        });
    }

    /// Signal the driver to stop; perf finalizes its data file on SIGINT.
    pub fn stop_recording(&self) {
        if let Err(e) = self.cancel_tx.send(true) {
            log::warn!("[Controller] Failed to signal stop: {}", e);
        }
    }

    /// Fetch a fresh process snapshot on a background task.
    ///
    /// At most one snapshot runs at a time; redundant calls while one is in
    /// flight are dropped. The result arrives as `RecordEvent::ProcessList`.
    pub fn refresh_processes(&self) {
        if self
            .process_refresh_inflight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let record_tx = self.record_tx.clone();
        let inflight = self.process_refresh_inflight.clone();
        tokio::spawn(async move {
            let snapshot = tokio::task::spawn_blocking(snapshot_processes).await;
            inflight.store(false, Ordering::SeqCst);
            match snapshot {
                Ok(list) => {
                    let _ = record_tx.send(RecordEvent::ProcessList(list)).await;
                }
                Err(e) => {
                    log::warn!("[Controller] Process enumeration task failed: {}", e);
                }
            }
        });
    }
}
