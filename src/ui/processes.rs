//! Attach-to-process picker: filter box plus a sortable, multi-select
//! process table. The rows come from the controller's periodic snapshots;
//! see `ui::app::drive_process_polling`.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::system::processes::{filter_processes, sort_processes, ProcessSort, SortColumn};
use crate::ui::app::AppUI;

fn sort_header(
    ui: &mut egui::Ui,
    label: &str,
    column: SortColumn,
    sort: &mut ProcessSort,
) -> bool {
    let marker = if sort.column == column {
        if sort.ascending {
            " ⏶"
        } else {
            " ⏷"
        }
    } else {
        ""
    };
    if ui
        .selectable_label(sort.column == column, format!("{}{}", label, marker))
        .clicked()
    {
        if sort.column == column {
            sort.ascending = !sort.ascending;
        } else {
            *sort = ProcessSort {
                column,
                ascending: true,
            };
        }
        return true;
    }
    false
}

/// Render the process filter box and table. Clicking a row toggles its
/// selection; the start action needs at least one selected pid.
pub fn render_process_picker(ui: &mut egui::Ui, app: &mut AppUI) {
    ui.horizontal(|ui| {
        ui.label("Filter:");
        if ui
            .add(
                egui::TextEdit::singleline(&mut app.ui_state.process_filter)
                    .hint_text("name, user or pid")
                    .desired_width(240.0),
            )
            .changed()
        {
            app.ui_state.needs_repaint = true;
        }
        ui.label(format!("{} selected", app.ui_state.selected_pids.len()));
        if !app.ui_state.selected_pids.is_empty() && ui.button("Clear").clicked() {
            app.ui_state.selected_pids.clear();
        }
    });
    ui.add_space(4.0);

    let mut resort = false;
    let mut sort = app.ui_state.process_sort;

    // Rows shown this frame: filtered view over the merged model
    let rows: Vec<(u32, String, String, String, String)> =
        filter_processes(&app.ui_state.processes, &app.ui_state.process_filter)
            .into_iter()
            .map(|p| {
                (
                    p.pid,
                    p.name.clone(),
                    p.user.clone(),
                    p.state.to_string(),
                    p.command.clone(),
                )
            })
            .collect();

    TableBuilder::new(ui)
        .striped(true)
        .sense(egui::Sense::click())
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .column(Column::auto().at_least(80.0))
        .max_scroll_height(240.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                resort |= sort_header(ui, "PID", SortColumn::Pid, &mut sort);
            });
            header.col(|ui| {
                resort |= sort_header(ui, "Name", SortColumn::Name, &mut sort);
            });
            header.col(|ui| {
                resort |= sort_header(ui, "User", SortColumn::User, &mut sort);
            });
        })
        .body(|mut body| {
            for (pid, name, user, state, command) in &rows {
                body.row(18.0, |mut row| {
                    let selected = app.ui_state.selected_pids.contains(pid);
                    row.set_selected(selected);
                    row.col(|ui| {
                        ui.monospace(pid.to_string());
                    });
                    row.col(|ui| {
                        let label = ui.label(name.as_str());
                        if !command.is_empty() {
                            label.on_hover_text(command.as_str());
                        }
                    });
                    row.col(|ui| {
                        ui.label(user.as_str())
                            .on_hover_text(format!("State: {}", state));
                    });
                    if row.response().clicked() {
                        if selected {
                            app.ui_state.selected_pids.remove(pid);
                        } else {
                            app.ui_state.selected_pids.insert(*pid);
                        }
                        app.ui_state.needs_repaint = true;
                    }
                });
            }
        });

    if rows.is_empty() {
        ui.monospace("[No matching processes]");
    }

    if resort {
        app.ui_state.process_sort = sort;
        sort_processes(&mut app.ui_state.processes, sort);
        app.ui_state.needs_repaint = true;
    }
}
