//! Core data types for perfdeck.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How a recording session targets its workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    /// Launch a new application under perf.
    LaunchApplication,
    /// Attach to one or more already-running processes.
    AttachToProcess,
}

impl RecordType {
    /// Convert to UI index (0=Launch, 1=Attach)
    pub fn to_index(&self) -> usize {
        match self {
            RecordType::LaunchApplication => 0,
            RecordType::AttachToProcess => 1,
        }
    }

    /// Convert from UI index (0=Launch, 1=Attach)
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => RecordType::AttachToProcess,
            _ => RecordType::LaunchApplication,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::LaunchApplication => write!(f, "Launch Application"),
            RecordType::AttachToProcess => write!(f, "Attach To Process(es)"),
        }
    }
}

impl Default for RecordType {
    fn default() -> Self {
        RecordType::LaunchApplication
    }
}

/// Call stack unwinding method passed to `perf record --call-graph`.
///
/// `Lbr` is only offered on Intel CPUs; see `hardware::is_intel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallGraphMode {
    None,
    Dwarf,
    FramePointer,
    Lbr,
}

impl CallGraphMode {
    /// The value passed to `--call-graph`. `None` maps to an empty string,
    /// which means the flag is omitted entirely.
    pub fn perf_arg(&self) -> &'static str {
        match self {
            CallGraphMode::None => "",
            CallGraphMode::Dwarf => "dwarf",
            CallGraphMode::FramePointer => "fp",
            CallGraphMode::Lbr => "lbr",
        }
    }

    /// User-facing label for the selector.
    pub fn label(&self) -> &'static str {
        match self {
            CallGraphMode::None => "None",
            CallGraphMode::Dwarf => "DWARF",
            CallGraphMode::FramePointer => "Frame Pointer",
            CallGraphMode::Lbr => "Last Branch Record",
        }
    }

    /// Tooltip text shown next to the selector entry.
    pub fn description(&self) -> &'static str {
        match self {
            CallGraphMode::None => {
                "Do not unwind the call stack. This results in tiny data files. \
                 But the data can be hard to make use of, when hotspots lie \
                 in third party or system libraries not under your direct control."
            }
            CallGraphMode::Dwarf => {
                "Use the DWARF unwinder, which requires debug information to be available. \
                 This can result in large data files, but is usually the most portable option to use."
            }
            CallGraphMode::FramePointer => {
                "Use the frame pointer for stack unwinding. This only works when your code was compiled \
                 with -fno-omit-framepointer, which is usually not the case nowadays. \
                 As such, only use this option when you know that you have frame pointers available. \
                 If frame pointers are available, this option is the recommended unwinding option, \
                 as it results in smaller data files and has less overhead while recording."
            }
            CallGraphMode::Lbr => {
                "Use the Last Branch Record (LBR) for stack unwinding. This only works on newer Intel CPUs \
                 but does not require any special compile options. The depth of the LBR is relatively limited, \
                 which makes this option not too useful for many real-world applications."
            }
        }
    }

    /// The modes available on this machine, in selector order.
    pub fn available(intel_cpu: bool) -> Vec<CallGraphMode> {
        let mut modes = vec![
            CallGraphMode::None,
            CallGraphMode::Dwarf,
            CallGraphMode::FramePointer,
        ];
        if intel_cpu {
            modes.push(CallGraphMode::Lbr);
        }
        modes
    }
}

impl Default for CallGraphMode {
    fn default() -> Self {
        CallGraphMode::Dwarf
    }
}

impl fmt::Display for CallGraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CallGraphMode {
    type Err = String;

    /// Parses the persisted `--call-graph` argument value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(CallGraphMode::None),
            "dwarf" => Ok(CallGraphMode::Dwarf),
            "fp" => Ok(CallGraphMode::FramePointer),
            "lbr" => Ok(CallGraphMode::Lbr),
            other => Err(format!("unknown call-graph mode: {}", other)),
        }
    }
}

/// What the recorder should profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    /// Launch `application` with `args` in `working_dir`.
    Launch {
        application: String,
        args: Vec<String>,
        working_dir: PathBuf,
    },
    /// Attach to the given process ids.
    Attach { pids: Vec<u32> },
}

/// A fully assembled recording request, handed to the driver when the user
/// presses start. Built transiently from widget state; never persisted whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRequest {
    /// Extra perf options such as `--call-graph dwarf` or `--event cycles`.
    pub perf_options: Vec<String>,
    /// Destination perf.data path.
    pub output_file: PathBuf,
    /// Launch or attach target.
    pub target: RecordTarget,
}

/// Coarse process state shown in the attach picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Sleeping,
    Stopped,
    Zombie,
    Other,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Running => write!(f, "Running"),
            ProcessState::Sleeping => write!(f, "Sleeping"),
            ProcessState::Stopped => write!(f, "Stopped"),
            ProcessState::Zombie => write!(f, "Zombie"),
            ProcessState::Other => write!(f, "Other"),
        }
    }
}

/// One row of the attach-to-process picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcData {
    pub pid: u32,
    pub name: String,
    pub user: String,
    pub state: ProcessState,
    /// Full command line, shown as a tooltip on the name column.
    pub command: String,
}
