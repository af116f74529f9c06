//! Record page view: launch/attach forms, perf options, output file row,
//! start/stop controls and the live recorder output area.
//!
//! Validation runs on every field change: the first failing check lands in
//! the shared error banner and disables the start action, mirroring the
//! truth table in `record::validator`.

use eframe::egui;
use egui_extras::StripBuilder;
use std::path::PathBuf;

use crate::config::remember_recent;
use crate::models::{RecordRequest, RecordTarget, RecordType};
use crate::record::args::{perf_options, split_args, tilde_expand};
use crate::record::validator::{
    ensure_data_extension, validate_application, validate_attach_selection,
    validate_output_file, validate_working_dir,
};
use crate::ui::app::AppUI;

/// Re-run the field validators for the current page and update the shared
/// error banner. Called after any relevant edit.
pub fn revalidate(app: &mut AppUI) {
    let ui_state = &mut app.ui_state;
    let error = match ui_state.record_type {
        RecordType::LaunchApplication => validate_application(&ui_state.application)
            .map(|_| ())
            .and_then(|_| validate_working_dir(&ui_state.working_dir))
            .and_then(|_| validate_output_file(&ui_state.output_file)),
        RecordType::AttachToProcess => validate_output_file(&ui_state.output_file),
    };
    ui_state.error_message = error.err().map(|e| e.to_string());
    ui_state.needs_repaint = true;
}

/// React to an application-field edit: validate, and on success restore the
/// per-application preferences and working-directory placeholder.
fn on_application_changed(app: &mut AppUI) {
    match validate_application(&app.ui_state.application) {
        Ok(valid) => {
            if let Ok(state) = app.controller.get_state() {
                let prefs = state.prefs_for(&app.ui_state.application);
                app.ui_state.working_dir = prefs.working_dir;
                app.ui_state.parameters = prefs.params;
            }
            app.ui_state.working_dir_placeholder =
                valid.default_working_dir.to_string_lossy().into_owned();
        }
        Err(_) => {
            app.ui_state.working_dir_placeholder.clear();
        }
    }
    revalidate(app);
}

/// Whether the start action is currently allowed.
fn start_enabled(app: &AppUI) -> bool {
    if app.ui_state.error_message.is_some() {
        return false;
    }
    match app.ui_state.record_type {
        RecordType::LaunchApplication => !app.ui_state.application.trim().is_empty(),
        RecordType::AttachToProcess => !app.ui_state.selected_pids.is_empty(),
    }
}

/// Assemble the RecordRequest from widget state, persist the preference
/// echoes, and hand it to the controller.
fn start_recording(app: &mut AppUI) {
    let call_graph = app.ui_state.call_graph_modes[app.ui_state.call_graph_idx];
    let event_type = app.ui_state.event_type.clone();
    let options = perf_options(call_graph, &event_type);
    let output_file = PathBuf::from(tilde_expand(&app.ui_state.output_file));

    let target = match app.ui_state.record_type {
        RecordType::LaunchApplication => {
            let application_text = app.ui_state.application.clone();
            let working_dir = if app.ui_state.working_dir.is_empty() {
                app.ui_state.working_dir_placeholder.clone()
            } else {
                app.ui_state.working_dir.clone()
            };
            let parameters = app.ui_state.parameters.clone();

            app.controller.update_state(|state| {
                state.remember_application(&application_text, &parameters, &working_dir);
            });

            RecordTarget::Launch {
                application: tilde_expand(&application_text),
                args: split_args(&parameters),
                working_dir: PathBuf::from(tilde_expand(&working_dir)),
            }
        }
        RecordType::AttachToProcess => {
            if let Err(e) = validate_attach_selection(&app.ui_state.selected_pids) {
                app.ui_state.error_message = Some(e.to_string());
                return;
            }
            RecordTarget::Attach {
                pids: app.ui_state.selected_pids.iter().copied().collect(),
            }
        }
    };

    // Preferences are only touched once the request is known to be valid;
    // a rejected start must not disturb saved choices.
    app.controller.update_state(|state| {
        state.call_graph = call_graph.perf_arg().to_string();
        remember_recent(&mut state.recent_event_types, event_type.trim());
    });

    // Mirror the refreshed MRU lists into the combo popups
    if let Ok(state) = app.controller.get_state() {
        app.ui_state.recent_applications = state.recent_applications;
        app.ui_state.recent_event_types = state.recent_event_types;
    }

    app.ui_state.recorder_output.clear();
    app.ui_state.results_file = None;
    app.ui_state.error_message = None;
    app.ui_state.info_message = None;
    app.ui_state.is_recording = true;

    app.controller.start_recording(RecordRequest {
        perf_options: options,
        output_file,
        target,
    });
}

/// A text field with a companion popup of recently used values.
fn recent_value_row(
    ui: &mut egui::Ui,
    id: &str,
    text: &mut String,
    hint: &str,
    recent: &[String],
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui
            .add(
                egui::TextEdit::singleline(text)
                    .hint_text(hint)
                    .desired_width(360.0),
            )
            .changed();
        if !recent.is_empty() {
            egui::ComboBox::from_id_source(id)
                .selected_text("recent")
                .width(80.0)
                .show_ui(ui, |ui| {
                    for value in recent {
                        if ui.selectable_label(*value == *text, value.as_str()).clicked() {
                            *text = value.clone();
                            changed = true;
                        }
                    }
                });
        }
    });
    changed
}

fn render_launch_form(ui: &mut egui::Ui, app: &mut AppUI) {
    let mut application_changed = false;
    let mut other_changed = false;

    egui::Grid::new("launch_form")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Application:");
            application_changed = recent_value_row(
                ui,
                "recent_applications",
                &mut app.ui_state.application,
                "executable path or name",
                &app.ui_state.recent_applications.clone(),
            );
            ui.end_row();

            ui.label("Parameters:");
            other_changed |= ui
                .add(
                    egui::TextEdit::singleline(&mut app.ui_state.parameters)
                        .desired_width(360.0),
                )
                .changed();
            ui.end_row();

            ui.label("Working Directory:");
            other_changed |= ui
                .add(
                    egui::TextEdit::singleline(&mut app.ui_state.working_dir)
                        .hint_text(app.ui_state.working_dir_placeholder.clone())
                        .desired_width(360.0),
                )
                .changed();
            ui.end_row();
        });

    if application_changed {
        on_application_changed(app);
    } else if other_changed {
        revalidate(app);
    }
}

fn render_perf_options(ui: &mut egui::Ui, app: &mut AppUI) {
    let mut changed = false;

    egui::Grid::new("perf_options_form")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Event Type:");
            changed |= recent_value_row(
                ui,
                "recent_event_types",
                &mut app.ui_state.event_type,
                "perf defaults (usually cycles:Pu)",
                &app.ui_state.recent_event_types.clone(),
            );
            ui.end_row();

            ui.label("Call Graph:");
            let modes = app.ui_state.call_graph_modes.clone();
            let current = modes[app.ui_state.call_graph_idx];
            egui::ComboBox::from_id_source("call_graph_combo")
                .selected_text(current.label())
                .show_ui(ui, |ui| {
                    for (i, mode) in modes.iter().enumerate() {
                        let response = ui
                            .selectable_value(&mut app.ui_state.call_graph_idx, i, mode.label())
                            .on_hover_text(mode.description());
                        if response.changed() {
                            changed = true;
                        }
                    }
                });
            ui.end_row();

            ui.label("Output File:");
            let output_response = ui.add(
                egui::TextEdit::singleline(&mut app.ui_state.output_file)
                    .desired_width(360.0),
            );
            if output_response.changed() {
                changed = true;
            }
            // Confirmation (enter / focus loss) appends the extension
            if output_response.lost_focus() {
                let fixed = ensure_data_extension(&app.ui_state.output_file);
                if fixed != app.ui_state.output_file {
                    app.ui_state.output_file = fixed;
                    changed = true;
                }
            }
            ui.end_row();
        });

    if changed {
        revalidate(app);
    }
}

fn render_recorder_output(ui: &mut egui::Ui, app: &mut AppUI) {
    if app.ui_state.recorder_output.is_empty() && !app.ui_state.is_recording {
        return;
    }
    ui.separator();
    ui.label("Recorder output:");
    egui::ScrollArea::vertical()
        .id_source("recorder_output_scroll")
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for line in &app.ui_state.recorder_output {
                ui.monospace(line.as_str());
            }
        });
}

fn render_app_log(ui: &mut egui::Ui, app: &mut AppUI) {
    if app.ui_state.app_log.is_empty() {
        return;
    }
    egui::CollapsingHeader::new("Application Log")
        .default_open(false)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_source("app_log_scroll")
                .stick_to_bottom(true)
                .max_height(120.0)
                .show(ui, |ui| {
                    for line in &app.ui_state.app_log {
                        ui.monospace(line.as_str());
                    }
                });
        });
}

/// Render the record page body.
pub fn render_record_page(ui: &mut egui::Ui, app: &mut AppUI) {
    ui.heading("Record");
    ui.separator();

    StripBuilder::new(ui)
        .size(egui_extras::Size::initial(300.0).at_least(220.0))
        .size(egui_extras::Size::remainder())
        .vertical(|mut strip| {
            strip.cell(|ui| {
                egui::ScrollArea::vertical()
                    .id_source("record_config_scroll")
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("Record Type:");
                            let mut type_idx = app.ui_state.record_type.to_index();
                            let combo = egui::ComboBox::from_id_source("record_type_combo")
                                .selected_text(app.ui_state.record_type.to_string());
                            ui.add_enabled_ui(!app.ui_state.is_recording, |ui| {
                                combo.show_ui(ui, |ui| {
                                    for (i, label) in
                                        ["Launch Application", "Attach To Process(es)"]
                                            .iter()
                                            .enumerate()
                                    {
                                        ui.selectable_value(&mut type_idx, i, *label);
                                    }
                                });
                            });
                            let new_type = RecordType::from_index(type_idx);
                            if new_type != app.ui_state.record_type {
                                app.ui_state.record_type = new_type;
                                if new_type == RecordType::AttachToProcess {
                                    // Poll immediately when the picker appears
                                    app.ui_state.next_process_poll = None;
                                }
                                revalidate(app);
                            }
                        });
                        ui.add_space(6.0);

                        match app.ui_state.record_type {
                            RecordType::LaunchApplication => {
                                ui.group(|ui| render_launch_form(ui, app));
                            }
                            RecordType::AttachToProcess => {
                                ui.group(|ui| {
                                    super::processes::render_process_picker(ui, app)
                                });
                            }
                        }

                        ui.add_space(6.0);
                        ui.group(|ui| render_perf_options(ui, app));
                    });
            });
            strip.cell(|ui| {
                render_recorder_output(ui, app);
                render_app_log(ui, app);
            });
        });
}

/// Render the bottom start/stop and view-results controls.
pub fn render_record_controls(ui: &mut egui::Ui, app: &mut AppUI) {
    ui.horizontal(|ui| {
        if app.ui_state.is_recording {
            if ui.button("⏹ Stop Recording").clicked() {
                app.controller.stop_recording();
            }
        } else {
            let enabled = start_enabled(app);
            if ui
                .add_enabled(enabled, egui::Button::new("▶ Start Recording"))
                .clicked()
            {
                revalidate(app);
                if app.ui_state.error_message.is_none() {
                    start_recording(app);
                }
            }
        }

        let results_available = app.ui_state.results_file.is_some();
        if ui
            .add_enabled(results_available, egui::Button::new("View Results"))
            .clicked()
        {
            if let Some(path) = app.ui_state.results_file.clone() {
                log::info!("[UI] Viewing results: {}", path.display());
                app.ui_state.info_message = Some(format!(
                    "Profile data written to {} - load it with hotspot or perf report",
                    path.display()
                ));
            }
        }

        if app.ui_state.is_recording {
            ui.spinner();
            ui.label("Recording...");
        }
    });
}
