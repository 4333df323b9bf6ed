// LogViewer - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library plus pure data crates (chrono, regex, serde).
// Must NOT depend on: ui, platform, app, or perform file I/O directly.

pub mod export;
pub mod expr;
pub mod filter;
pub mod model;
pub mod parser;
pub mod store;
