// LogViewer - ui/panels/mod.rs

pub mod detail;
pub mod record_list;
pub mod toolbar;
