// LogViewer - app/mod.rs
//
// Application layer: state, filter history, and the view boundary.
// Dependencies: core layer, platform::fs for file reads.
// Must NOT depend on: ui.

pub mod history;
pub mod state;
pub mod view;
