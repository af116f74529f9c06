//! OS abstraction layer: process enumeration for the attach picker.

pub mod processes;

pub use processes::{
    filter_processes, merge_processes, snapshot_processes, sort_processes, ProcessSort,
    SortColumn,
};
