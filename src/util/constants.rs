// LogViewer - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogViewer";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogViewer";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log line format
// =============================================================================

/// Width in characters of the leading `DD.MM.YYYY HH:MM:SS` stamp.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Character offset at which the `name:level:file:lineno` header begins.
///
/// The writer emits `<timestamp> [` so the header starts after the space and
/// the opening bracket.
pub const HEADER_START: usize = 21;

/// Literal sequence that terminates the header and starts the message.
pub const RECORD_DELIMITER: &str = "] ";

/// Separator between header fields.
pub const HEADER_SEPARATOR: char = ':';

/// Number of colon-separated header fields a record must have.
pub const HEADER_FIELD_COUNT: usize = 4;

/// chrono format of the leading timestamp.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// chrono format of the time column in the record list.
pub const DISPLAY_TIME_FORMAT: &str = "%H:%M:%S";

/// Maximum number of parse errors kept per file before suppression.
/// Further errors are counted but not stored.
pub const MAX_PARSE_ERRORS_PER_FILE: usize = 1_000;

/// Maximum number of warnings held in application state.
pub const MAX_WARNINGS: usize = 1_000;

// =============================================================================
// Filter expressions
// =============================================================================

/// Longest filter expression accepted by the compiler, in characters.
pub const MAX_FILTER_EXPRESSION_LEN: usize = 4_096;

/// Deepest nesting of `not`/`!` and parentheses accepted by the parser.
pub const MAX_FILTER_NESTING_DEPTH: usize = 64;

/// Longest regex pattern accepted by the `matches` operator.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 1_024;

/// Accepted formats for date literals compared against `date`.
/// Formats without a time component are handled separately (midnight).
pub const FILTER_DATETIME_FORMATS: &[&str] = &[
    "%d.%m.%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Accepted date-only formats for date literals (interpreted as midnight).
pub const FILTER_DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d"];

// =============================================================================
// History
// =============================================================================

/// Maximum number of filter expressions kept in the history.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// History file name inside the platform data directory.
pub const HISTORY_FILE_NAME: &str = "filter.history";

// =============================================================================
// UI
// =============================================================================

/// Default body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Minimum font size accepted from config.
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum font size accepted from config.
pub const MAX_FONT_SIZE: f32 = 24.0;

/// Initial window size.
pub const DEFAULT_WINDOW_SIZE: [f32; 2] = [800.0, 600.0];

/// Minimum window size.
pub const MIN_WINDOW_SIZE: [f32; 2] = [480.0, 320.0];

/// File dialog filter: extensions offered under "Log files".
pub const LOG_FILE_EXTENSIONS: &[&str] = &["log", "txt"];

// =============================================================================
// Logging
// =============================================================================

/// Default tracing level when neither RUST_LOG, --debug nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// File names
// =============================================================================

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
