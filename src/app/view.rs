// LogViewer - app/view.rs
//
// Boundary between application state and a rendering backend.
// A backend draws the rows it is handed and reports user actions back as
// `ViewEvent`s; it never reads or mutates `AppState` directly.

use crate::core::model::LogRecord;
use std::path::PathBuf;

/// A user action reported by a rendering backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The user picked a file to open.
    OpenRequested(PathBuf),
    /// The user submitted a filter expression (possibly empty).
    FilterSubmitted(String),
}

/// Something that can display the visible records.
pub trait RecordView {
    /// Replace the displayed rows with `records`, in order.
    fn render_list(&mut self, records: &[&LogRecord]);
}
