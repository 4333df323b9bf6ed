// LogViewer - ui/mod.rs
//
// UI layer: presentation only. Holds the two `RecordView` backends
// (egui record list and console printer).
// Dependencies: app (view boundary), core (read-only models), egui, rfd.
// Must NOT depend on: platform.

pub mod console;
pub mod panels;
pub mod theme;
