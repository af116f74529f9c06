//! UI Module - egui integration and RecordController
//!
//! Handles the interface between the Rust backend logic and the egui UI
//! frontend: the record page itself, the attach-to-process picker, and the
//! controller that owns settings and background tasks.

pub mod app;
pub mod controller;
pub mod processes;
pub mod record;

pub use app::{AppUI, UIState};
pub use controller::{RecordController, RecordEvent};
