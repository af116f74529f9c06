/// Main App Orchestrator and UI State Management
///
/// This module provides the central application state and the eframe::App
/// implementation for the egui-based frontend. It manages async event
/// processing, the validation/error banner, and delegates rendering to the
/// record and process-picker view modules.
use eframe::egui;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::{CallGraphMode, ProcData, RecordType};
use crate::system::processes::{merge_processes, sort_processes, ProcessSort};
use crate::ui::controller::{RecordController, RecordEvent};

/// Delay between process-list refreshes while the attach page is visible.
const PROCESS_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Cap on buffered recorder output and application log lines.
const MAX_LOG_LINES: usize = 5000;

/// Transient UI state - state that doesn't persist across sessions
pub struct UIState {
    /// Dirty flag: set when data changes, cleared after render.
    /// Used for adaptive repainting instead of fixed-frequency repaints.
    pub needs_repaint: bool,

    /// Last repaint time (for idle-based fallback repaints)
    pub last_repaint_time: Instant,

    /// Launch vs attach
    pub record_type: RecordType,

    /// Launch form: application path or name
    pub application: String,

    /// Launch form: parameter string, split shell-style on start
    pub parameters: String,

    /// Launch form: working directory; empty means the placeholder applies
    pub working_dir: String,

    /// Placeholder: the validated application's parent directory
    pub working_dir_placeholder: String,

    /// perf options: event spec (empty = perf defaults)
    pub event_type: String,

    /// perf options: index into `call_graph_modes`
    pub call_graph_idx: usize,

    /// Call-graph modes available on this machine
    pub call_graph_modes: Vec<CallGraphMode>,

    /// Output file path
    pub output_file: String,

    /// Inline validation/recorder error; non-empty disables the start action
    pub error_message: Option<String>,

    /// Informational message (results location etc.)
    pub info_message: Option<String>,

    /// Whether a recording is in progress
    pub is_recording: bool,

    /// Data file of the last finished recording
    pub results_file: Option<std::path::PathBuf>,

    /// Recorder output lines (fixed-size VecDeque for O(1) appends)
    pub recorder_output: VecDeque<String>,

    /// Application log lines for the collapsible log view
    pub app_log: VecDeque<String>,

    /// Attach picker: current process model
    pub processes: Vec<ProcData>,

    /// Attach picker: selected pids
    pub selected_pids: BTreeSet<u32>,

    /// Attach picker: filter query
    pub process_filter: String,

    /// Attach picker: sort state
    pub process_sort: ProcessSort,

    /// When the next process poll is due; None forces an immediate poll
    pub next_process_poll: Option<Instant>,

    /// MRU lists mirrored from settings for the combo popups
    pub recent_applications: Vec<String>,
    pub recent_event_types: Vec<String>,
}

impl Default for UIState {
    fn default() -> Self {
        let output_file = std::env::current_dir()
            .map(|d| d.join("perf.data").to_string_lossy().into_owned())
            .unwrap_or_else(|_| "perf.data".to_string());

        Self {
            needs_repaint: true,
            last_repaint_time: Instant::now(),
            record_type: RecordType::default(),
            application: String::new(),
            parameters: String::new(),
            working_dir: String::new(),
            working_dir_placeholder: String::new(),
            event_type: String::new(),
            call_graph_idx: 0,
            call_graph_modes: vec![CallGraphMode::default()],
            output_file,
            error_message: None,
            info_message: None,
            is_recording: false,
            results_file: None,
            recorder_output: VecDeque::with_capacity(1024),
            app_log: VecDeque::with_capacity(256),
            processes: Vec::new(),
            selected_pids: BTreeSet::new(),
            process_filter: String::new(),
            process_sort: ProcessSort::default(),
            next_process_poll: None,
            recent_applications: Vec::new(),
            recent_event_types: Vec::new(),
        }
    }
}

impl UIState {
    fn push_capped(buf: &mut VecDeque<String>, line: String) {
        buf.push_back(line);
        while buf.len() > MAX_LOG_LINES {
            buf.pop_front();
        }
    }
}

/// Main Application UI Structure
pub struct AppUI {
    /// Persistent application state and background task orchestration
    pub controller: Arc<RecordController>,

    /// Transient UI state
    pub ui_state: UIState,

    /// Channel receiver for record events
    pub record_rx: Option<tokio::sync::mpsc::Receiver<RecordEvent>>,
}

impl AppUI {
    /// Create a new AppUI instance, seeding UI state from persisted
    /// settings.
    pub fn new(
        controller: Arc<RecordController>,
        record_rx: Option<tokio::sync::mpsc::Receiver<RecordEvent>>,
    ) -> Self {
        let mut ui_state = UIState::default();
        ui_state.call_graph_modes = CallGraphMode::available(controller.intel_cpu);

        if let Ok(state) = controller.get_state() {
            ui_state.recent_applications = state.recent_applications.clone();
            ui_state.recent_event_types = state.recent_event_types.clone();
            let saved: CallGraphMode = state
                .call_graph
                .parse()
                .unwrap_or_default();
            ui_state.call_graph_idx = ui_state
                .call_graph_modes
                .iter()
                .position(|m| *m == saved)
                .unwrap_or_else(|| {
                    ui_state
                        .call_graph_modes
                        .iter()
                        .position(|m| *m == CallGraphMode::Dwarf)
                        .unwrap_or(0)
                });
        }

        Self {
            controller,
            ui_state,
            record_rx,
        }
    }

    /// Process all pending record events from the channel.
    /// Sets the dirty flag when data changes (adaptive repaint trigger).
    fn process_record_events(&mut self) {
        let Some(ref mut rx) = self.record_rx else {
            return;
        };
        while let Ok(event) = rx.try_recv() {
            match event {
                RecordEvent::Output(line) => {
                    UIState::push_capped(&mut self.ui_state.recorder_output, line);
                    self.ui_state.needs_repaint = true;
                }
                RecordEvent::Finished(path) => {
                    self.ui_state.is_recording = false;
                    self.ui_state.error_message = None;
                    self.ui_state.results_file = Some(path);
                    self.ui_state.needs_repaint = true;
                }
                RecordEvent::Failed(message) => {
                    self.ui_state.is_recording = false;
                    self.ui_state.results_file = None;
                    self.ui_state.error_message = Some(message);
                    self.ui_state.needs_repaint = true;
                }
                RecordEvent::ProcessList(snapshot) => {
                    let mut snapshot = snapshot;
                    sort_processes(&mut snapshot, self.ui_state.process_sort);
                    merge_processes(
                        &mut self.ui_state.processes,
                        snapshot,
                        &mut self.ui_state.selected_pids,
                    );
                    // Reschedule only while the attach page stays visible
                    if self.ui_state.record_type == RecordType::AttachToProcess {
                        self.ui_state.next_process_poll =
                            Some(Instant::now() + PROCESS_POLL_INTERVAL);
                    }
                    self.ui_state.needs_repaint = true;
                }
                RecordEvent::Log(line) => {
                    UIState::push_capped(&mut self.ui_state.app_log, line);
                    self.ui_state.needs_repaint = true;
                }
            }
        }
    }

    /// Drive the process-list poll while the attach page is visible.
    fn drive_process_polling(&mut self) {
        if self.ui_state.record_type != RecordType::AttachToProcess {
            self.ui_state.next_process_poll = None;
            return;
        }
        let due = match self.ui_state.next_process_poll {
            None => true,
            Some(at) => Instant::now() >= at,
        };
        if due {
            // Pushed out again when the snapshot arrives; the inflight
            // guard in the controller swallows redundant triggers.
            self.ui_state.next_process_poll = Some(Instant::now() + PROCESS_POLL_INTERVAL);
            self.controller.refresh_processes();
        }
    }

    /// Render transient messages (validation errors, info)
    fn render_messages(&mut self, ctx: &egui::Context) {
        if let Some(msg) = self.ui_state.error_message.clone() {
            egui::TopBottomPanel::top("error_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(
                        egui::Color32::from_rgb(255, 100, 100),
                        format!("Error: {}", msg),
                    );
                    // Cleared here but re-raised by the next revalidation
                    // while the offending field stays invalid.
                    if ui.button("Dismiss").clicked() {
                        self.ui_state.error_message = None;
                    }
                });
            });
        }

        if let Some(msg) = self.ui_state.info_message.clone() {
            egui::TopBottomPanel::top("info_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(100, 150, 255), msg);
                    if ui.button("Dismiss").clicked() {
                        self.ui_state.info_message = None;
                    }
                });
            });
        }
    }
}

impl eframe::App for AppUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process all pending async events (sets needs_repaint on changes)
        self.process_record_events();

        self.drive_process_polling();

        self.render_messages(ctx);

        egui::TopBottomPanel::bottom("record_controls").show(ctx, |ui| {
            super::record::render_record_controls(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            super::record::render_record_page(ui, self);
        });

        // ADAPTIVE REPAINTING: repaint immediately on data changes, with an
        // idle fallback so slow updates still surface.
        const IDLE_REPAINT_INTERVAL_MS: u64 = 500;
        let elapsed = self.ui_state.last_repaint_time.elapsed();
        if self.ui_state.needs_repaint {
            ctx.request_repaint();
            self.ui_state.needs_repaint = false;
            self.ui_state.last_repaint_time = Instant::now();
        } else if elapsed.as_millis() > IDLE_REPAINT_INTERVAL_MS as u128 {
            ctx.request_repaint_after(Duration::from_millis(IDLE_REPAINT_INTERVAL_MS));
            self.ui_state.last_repaint_time = Instant::now();
        }

        // Polling repaint while the attach picker is visible or output is
        // streaming, so events are drained promptly.
        if self.ui_state.record_type == RecordType::AttachToProcess
            || self.ui_state.is_recording
        {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }
}
