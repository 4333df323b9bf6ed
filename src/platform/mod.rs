// LogViewer - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories, serde/toml.
// Must NOT depend on: core, app, ui.

pub mod config;
pub mod fs;
