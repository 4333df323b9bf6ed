// LogViewer - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

// =============================================================================
// Log Record
// =============================================================================

/// A single parsed log line.
///
/// Produced by the line parser, held by the log store, and read by the
/// filter evaluator, the views and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Wall-clock time from the `DD.MM.YYYY HH:MM:SS` prefix. The writer
    /// stamps local time without a zone, so none is attached here.
    pub timestamp: NaiveDateTime,

    /// Logger name (subsystem tag).
    pub name: String,

    /// Severity code.
    pub level: Level,

    /// Source file that emitted the line.
    pub file: String,

    /// Line number within `file`.
    pub line_number: u32,

    /// Message text after the header, without the trailing newline.
    pub message: String,
}

impl LogRecord {
    /// Row text shown in the record list: time of day followed by the message.
    pub fn display_text(&self) -> String {
        format!(
            "{} {}",
            self.timestamp
                .format(crate::util::constants::DISPLAY_TIME_FORMAT),
            self.message
        )
    }
}

// =============================================================================
// Level
// =============================================================================

/// Severity code of a record.
///
/// The writer emits one of the single-character codes E, W, I, N, D. Anything
/// else is kept verbatim in `Other` so no information is lost; such levels
/// have no assigned colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
    Info,
    Notice,
    Debug,
    Other(String),
}

impl Level {
    /// The five known levels, most severe first.
    pub fn all() -> &'static [Level] {
        &[
            Level::Error,
            Level::Warning,
            Level::Info,
            Level::Notice,
            Level::Debug,
        ]
    }

    /// Map a raw header code to a level. Matching is exact (case-sensitive),
    /// as the writer only ever emits upper-case codes.
    pub fn from_code(code: &str) -> Self {
        match code {
            "E" => Level::Error,
            "W" => Level::Warning,
            "I" => Level::Info,
            "N" => Level::Notice,
            "D" => Level::Debug,
            other => Level::Other(other.to_string()),
        }
    }

    /// The code as it appears in the log file.
    pub fn code(&self) -> &str {
        match self {
            Level::Error => "E",
            Level::Warning => "W",
            Level::Info => "I",
            Level::Notice => "N",
            Level::Debug => "D",
            Level::Other(code) => code,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &str {
        match self {
            Level::Error => "Error",
            Level::Warning => "Warning",
            Level::Info => "Info",
            Level::Notice => "Notice",
            Level::Debug => "Debug",
            Level::Other(code) => code,
        }
    }

    /// Severity rank: 0 is most severe. Unknown codes rank after Debug.
    pub fn rank(&self) -> u8 {
        match self {
            Level::Error => 0,
            Level::Warning => 1,
            Level::Info => 2,
            Level::Notice => 3,
            Level::Debug => 4,
            Level::Other(_) => 5,
        }
    }
}

impl Ord for Level {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.code().cmp(other.code()))
    }
}

impl PartialOrd for Level {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_code_round_trip() {
        for level in Level::all() {
            assert_eq!(&Level::from_code(level.code()), level);
        }
        assert_eq!(Level::from_code("X"), Level::Other("X".to_string()));
        assert_eq!(Level::from_code("e"), Level::Other("e".to_string()));
    }

    #[test]
    fn test_level_orders_by_severity() {
        assert!(Level::Error < Level::Warning);
        assert!(Level::Warning < Level::Info);
        assert!(Level::Info < Level::Notice);
        assert!(Level::Notice < Level::Debug);
        assert!(Level::Debug < Level::Other("A".to_string()));
        assert!(Level::Other("A".to_string()) < Level::Other("B".to_string()));
    }
}
