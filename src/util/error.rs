// LogViewer - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for operations that fail as a whole: opening a
/// file, applying a filter, exporting. Line, history and config errors are
/// reported as warnings and never reach this type.
#[derive(Debug)]
pub enum LogViewerError {
    /// A filter expression could not be compiled.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LogViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LogViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Why a single line that looks like a record (it has a `"] "` delimiter)
/// could not be turned into one.
#[derive(Debug)]
pub enum LineError {
    /// The first `"] "` sits before the header region starts.
    DelimiterInsideHeader { index: usize },

    /// The header did not split into exactly four colon-separated fields.
    FieldCount { found: usize },

    /// The `lineno` header field is not an unsigned integer.
    LineNumber {
        raw: String,
        source: std::num::ParseIntError,
    },

    /// The leading 19 characters are not a `DD.MM.YYYY HH:MM:SS` stamp.
    /// `source` is `None` when the line is too short to hold a stamp.
    Timestamp {
        raw: String,
        source: Option<chrono::ParseError>,
    },
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DelimiterInsideHeader { index } => write!(
                f,
                "record delimiter at column {index} lies inside the timestamp prefix"
            ),
            Self::FieldCount { found } => write!(
                f,
                "expected {} header fields (name:level:file:lineno), found {found}",
                crate::util::constants::HEADER_FIELD_COUNT
            ),
            Self::LineNumber { raw, source } => {
                write!(f, "invalid line number '{raw}': {source}")
            }
            Self::Timestamp { raw, source: Some(e) } => {
                write!(f, "cannot parse timestamp '{raw}': {e}")
            }
            Self::Timestamp { raw, source: None } => {
                write!(f, "line too short for a timestamp: '{raw}'")
            }
        }
    }
}

impl std::error::Error for LineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::LineNumber { source, .. } => Some(source),
            Self::Timestamp {
                source: Some(e), ..
            } => Some(e),
            _ => None,
        }
    }
}

/// Errors related to log file parsing.
#[derive(Debug)]
pub enum ParseError {
    /// A line in a log file could not be parsed.
    Line { line_number: u64, source: LineError },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line {
                line_number,
                source,
            } => write!(f, "line {line_number}: {source}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Line { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors raised while compiling a filter expression.
///
/// `position` is a character offset into the expression.
#[derive(Debug)]
pub enum FilterError {
    /// Expression is longer than the accepted maximum.
    TooLong { length: usize, max: usize },

    /// `not` and parentheses nested deeper than the parser allows.
    TooDeep { position: usize, max: usize },

    /// A character that starts no token.
    UnexpectedChar { position: usize, found: char },

    /// A string literal without its closing quote.
    UnterminatedString { position: usize },

    /// A token that does not fit the grammar at this point.
    UnexpectedToken {
        position: usize,
        found: String,
        expected: &'static str,
    },

    /// The expression ended early.
    UnexpectedEnd { expected: &'static str },

    /// An identifier that names no record field.
    UnknownField { position: usize, name: String },

    /// Operand types do not fit the operator.
    TypeMismatch {
        position: usize,
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// A level literal that is empty.
    InvalidLevel { position: usize, literal: String },

    /// A date literal in none of the accepted formats.
    InvalidDate { position: usize, literal: String },

    /// An integer literal out of range or not numeric.
    InvalidInteger { position: usize, literal: String },

    /// Pattern for `matches` is not a valid regex.
    InvalidRegex {
        position: usize,
        pattern: String,
        source: regex::Error,
    },

    /// Pattern for `matches` exceeds the maximum length.
    RegexTooLong {
        position: usize,
        length: usize,
        max: usize,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { length, max } => write!(
                f,
                "expression is {length} characters, exceeds maximum of {max}"
            ),
            Self::TooDeep { position, max } => {
                write!(f, "nesting at {position} exceeds maximum depth of {max}")
            }
            Self::UnexpectedChar { position, found } => {
                write!(f, "unexpected character '{found}' at {position}")
            }
            Self::UnterminatedString { position } => {
                write!(f, "unterminated string starting at {position}")
            }
            Self::UnexpectedToken {
                position,
                found,
                expected,
            } => write!(f, "expected {expected} at {position}, found '{found}'"),
            Self::UnexpectedEnd { expected } => {
                write!(f, "expected {expected} at end of expression")
            }
            Self::UnknownField { position, name } => write!(
                f,
                "unknown field '{name}' at {position} \
                 (known: date, name, level, file, lineno, text)"
            ),
            Self::TypeMismatch {
                position,
                operator,
                left,
                right,
            } => write!(
                f,
                "cannot apply '{operator}' to {left} and {right} at {position}"
            ),
            Self::InvalidLevel { position, literal } => {
                write!(f, "invalid level '{literal}' at {position}")
            }
            Self::InvalidDate { position, literal } => write!(
                f,
                "invalid date '{literal}' at {position} \
                 (use DD.MM.YYYY HH:MM:SS or YYYY-MM-DD HH:MM:SS)"
            ),
            Self::InvalidInteger { position, literal } => {
                write!(f, "invalid integer '{literal}' at {position}")
            }
            Self::InvalidRegex {
                position,
                pattern,
                source,
            } => write!(f, "invalid regex '{pattern}' at {position}: {source}"),
            Self::RegexTooLong {
                position,
                length,
                max,
            } => write!(
                f,
                "regex at {position} is {length} chars, exceeds maximum of {max}"
            ),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FilterError> for LogViewerError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// History errors
// ---------------------------------------------------------------------------

/// Errors related to filter history persistence.
#[derive(Debug)]
pub enum HistoryError {
    /// I/O error reading or writing the history file.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "cannot {operation} history file '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LogViewerError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
