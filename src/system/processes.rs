//! Process enumeration for the attach-to-process picker.
//!
//! Snapshots running processes via the sysinfo crate, merges fresh
//! snapshots into the displayed model, and provides the filtering and
//! sorting the picker table uses. Enumeration is blocking and runs on a
//! `spawn_blocking` task; see `ui::controller`.

use crate::models::{ProcData, ProcessState};
use sysinfo::{ProcessStatus, System, Users};

/// Column the process table can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Pid,
    Name,
    User,
}

/// Sort order of the process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSort {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for ProcessSort {
    fn default() -> Self {
        // Matches the picker default: by name, ascending.
        ProcessSort {
            column: SortColumn::Name,
            ascending: true,
        }
    }
}

fn map_status(status: ProcessStatus) -> ProcessState {
    match status {
        ProcessStatus::Run => ProcessState::Running,
        ProcessStatus::Sleep | ProcessStatus::Idle => ProcessState::Sleeping,
        ProcessStatus::Stop => ProcessState::Stopped,
        ProcessStatus::Zombie => ProcessState::Zombie,
        _ => ProcessState::Other,
    }
}

/// Take a fresh snapshot of all running processes.
///
/// Blocking; call from a background task. The returned list is unsorted,
/// callers apply `ProcessSort` via `sort_processes`.
pub fn snapshot_processes() -> Vec<ProcData> {
    let mut sys = System::new_all();
    sys.refresh_all();
    let users = Users::new_with_refreshed_list();

    let mut list = Vec::with_capacity(sys.processes().len());
    for (pid, process) in sys.processes() {
        let user = process
            .user_id()
            .and_then(|uid| users.get_user_by_id(uid))
            .map(|u| u.name().to_string())
            .unwrap_or_default();

        let command = process
            .cmd()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ");

        list.push(ProcData {
            pid: pid.as_u32(),
            name: process.name().to_string_lossy().into_owned(),
            user,
            state: map_status(process.status()),
            command,
        });
    }
    list
}

/// Merge a fresh snapshot into the current model.
///
/// Rows are replaced wholesale by the snapshot; the caller keeps its
/// selection by pid and drops selections whose pid vanished. Kept as a
/// separate step so the merge is testable without sysinfo.
pub fn merge_processes(
    current: &mut Vec<ProcData>,
    snapshot: Vec<ProcData>,
    selected_pids: &mut std::collections::BTreeSet<u32>,
) {
    *current = snapshot;
    let alive: std::collections::BTreeSet<u32> = current.iter().map(|p| p.pid).collect();
    selected_pids.retain(|pid| alive.contains(pid));
}

/// Case-insensitive substring filter over pid, name and user.
pub fn filter_processes<'a>(processes: &'a [ProcData], query: &str) -> Vec<&'a ProcData> {
    let query = query.trim().to_lowercase();
    processes
        .iter()
        .filter(|p| {
            query.is_empty()
                || p.name.to_lowercase().contains(&query)
                || p.user.to_lowercase().contains(&query)
                || p.pid.to_string().contains(&query)
        })
        .collect()
}

/// Sort the process list in place according to the given sort state.
pub fn sort_processes(processes: &mut [ProcData], sort: ProcessSort) {
    processes.sort_by(|a, b| {
        let ord = match sort.column {
            SortColumn::Pid => a.pid.cmp(&b.pid),
            SortColumn::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.pid.cmp(&b.pid)),
            SortColumn::User => a
                .user
                .to_lowercase()
                .cmp(&b.user.to_lowercase())
                .then(a.pid.cmp(&b.pid)),
        };
        if sort.ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn proc(pid: u32, name: &str, user: &str) -> ProcData {
        ProcData {
            pid,
            name: name.to_string(),
            user: user.to_string(),
            state: ProcessState::Running,
            command: format!("/usr/bin/{}", name),
        }
    }

    #[test]
    fn test_merge_drops_vanished_selection() {
        let mut current = vec![proc(1, "init", "root"), proc(42, "bash", "alice")];
        let mut selected: BTreeSet<u32> = [42, 99].into_iter().collect();

        merge_processes(&mut current, vec![proc(1, "init", "root"), proc(42, "bash", "alice")], &mut selected);
        assert_eq!(selected.iter().copied().collect::<Vec<_>>(), vec![42]);

        merge_processes(&mut current, vec![proc(1, "init", "root")], &mut selected);
        assert!(selected.is_empty());
        assert_eq!(current.len(), 1);
    }

    #[test]
    fn test_filter_matches_name_user_and_pid() {
        let processes = vec![proc(1, "init", "root"), proc(42, "bash", "alice")];

        assert_eq!(filter_processes(&processes, "BASH").len(), 1);
        assert_eq!(filter_processes(&processes, "root").len(), 1);
        assert_eq!(filter_processes(&processes, "42").len(), 1);
        assert_eq!(filter_processes(&processes, "").len(), 2);
        assert!(filter_processes(&processes, "nothing").is_empty());
    }

    #[test]
    fn test_sort_by_name_ascending_default() {
        let mut processes = vec![proc(2, "zsh", "a"), proc(1, "bash", "b")];
        sort_processes(&mut processes, ProcessSort::default());
        assert_eq!(processes[0].name, "bash");
    }

    #[test]
    fn test_sort_by_pid_descending() {
        let mut processes = vec![proc(1, "a", "u"), proc(3, "b", "u"), proc(2, "c", "u")];
        sort_processes(
            &mut processes,
            ProcessSort {
                column: SortColumn::Pid,
                ascending: false,
            },
        );
        assert_eq!(processes.iter().map(|p| p.pid).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn test_snapshot_contains_self() {
        let snapshot = snapshot_processes();
        let me = std::process::id();
        assert!(snapshot.iter().any(|p| p.pid == me));
    }
}
