// LogViewer - core/parser.rs
//
// Positional parser for the `DD.MM.YYYY HH:MM:SS [name:L:file:lineno] text`
// line format. Core layer: operates on strings, never touches the filesystem.
//
// Column offsets are character offsets, not byte offsets, so a multi-byte
// character in the padding region does not shift the header.

use crate::core::model::{Level, LogRecord};
use crate::util::constants::{
    HEADER_SEPARATOR, HEADER_START, MAX_PARSE_ERRORS_PER_FILE,
    RECORD_DELIMITER, TIMESTAMP_FORMAT, TIMESTAMP_WIDTH,
};
use crate::util::error::{LineError, ParseError};
use chrono::NaiveDateTime;

/// Result of parsing a sequence of lines.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Successfully parsed records, in input order.
    pub records: Vec<LogRecord>,
    /// Line-level errors (capped at MAX_PARSE_ERRORS_PER_FILE).
    pub errors: Vec<ParseError>,
    /// Total number of malformed lines, including those not stored in `errors`.
    pub error_count: usize,
    /// Lines without a record delimiter (skipped silently).
    pub skipped: usize,
    /// Total lines processed.
    pub lines_processed: u64,
}

/// Parse one raw line.
///
/// * `Ok(None)`: the line has no `"] "` delimiter and is not a record.
/// * `Ok(Some(_))`: a well-formed record.
/// * `Err(_)`: the line has a delimiter but its header or timestamp is
///   malformed.
///
/// A trailing `\n` or `\r\n` is ignored.
pub fn parse_line(raw: &str) -> Result<Option<LogRecord>, LineError> {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let Some(delimiter) = line.find(RECORD_DELIMITER) else {
        return Ok(None);
    };

    let header_start = match char_boundary(line, HEADER_START) {
        Some(start) if start <= delimiter => start,
        _ => {
            return Err(LineError::DelimiterInsideHeader {
                index: line[..delimiter].chars().count(),
            })
        }
    };

    let timestamp = parse_timestamp(line)?;

    let header = &line[header_start..delimiter];
    let fields: Vec<&str> = header.split(HEADER_SEPARATOR).collect();
    let &[name, level, file, lineno] = fields.as_slice() else {
        return Err(LineError::FieldCount {
            found: fields.len(),
        });
    };

    let lineno = lineno.trim();
    let line_number = lineno.parse::<u32>().map_err(|e| LineError::LineNumber {
        raw: lineno.to_string(),
        source: e,
    })?;

    Ok(Some(LogRecord {
        timestamp,
        name: name.trim().to_string(),
        level: Level::from_code(level.trim()),
        file: file.trim().to_string(),
        line_number,
        message: line[delimiter + RECORD_DELIMITER.len()..].to_string(),
    }))
}

/// Parse every line of an in-memory file.
pub fn parse_content(content: &str) -> ParseResult {
    parse_lines(content.lines())
}

/// Parse a sequence of lines, keeping well-formed records in order.
///
/// Malformed lines are recorded as errors and skipped; parsing always runs
/// to the end of the input.
pub fn parse_lines<I, S>(lines: I) -> ParseResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = ParseResult::default();

    for (idx, line) in lines.into_iter().enumerate() {
        result.lines_processed += 1;
        let line_number = (idx as u64) + 1;

        match parse_line(line.as_ref()) {
            Ok(Some(record)) => result.records.push(record),
            Ok(None) => result.skipped += 1,
            Err(source) => {
                tracing::trace!(line = line_number, error = %source, "Malformed log line");
                result.error_count += 1;
                if result.errors.len() < MAX_PARSE_ERRORS_PER_FILE {
                    result.errors.push(ParseError::Line {
                        line_number,
                        source,
                    });
                }
            }
        }
    }

    tracing::debug!(
        records = result.records.len(),
        errors = result.error_count,
        skipped = result.skipped,
        lines = result.lines_processed,
        "Parsing complete"
    );

    result
}

/// Render a record in the writer's line format (without trailing newline).
///
/// For records whose text fields contain neither `:` nor `"] "`, parsing the
/// output yields the same record.
pub fn format_line(record: &LogRecord) -> String {
    format!(
        "{} [{}{sep}{}{sep}{}{sep}{}{}{}",
        record.timestamp.format(TIMESTAMP_FORMAT),
        record.name,
        record.level.code(),
        record.file,
        record.line_number,
        RECORD_DELIMITER,
        record.message,
        sep = HEADER_SEPARATOR,
    )
}

/// Parse the leading `DD.MM.YYYY HH:MM:SS` stamp of `line`.
fn parse_timestamp(line: &str) -> Result<NaiveDateTime, LineError> {
    let Some(end) = char_boundary(line, TIMESTAMP_WIDTH) else {
        return Err(LineError::Timestamp {
            raw: line.to_string(),
            source: None,
        });
    };
    let raw = &line[..end];
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| LineError::Timestamp {
        raw: raw.to_string(),
        source: Some(e),
    })
}

/// Byte offset just past the first `chars` characters of `s`, or `None` if
/// `s` is shorter than that.
fn char_boundary(s: &str, chars: usize) -> Option<usize> {
    if chars == 0 {
        return Some(0);
    }
    s.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .nth(chars - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn ts(d: u32, m: u32, y: i32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_writer_format() {
        let record = parse_line("24.12.2023 18:30:05 [net:W:tcp_server.cpp:117] accept failed\n")
            .unwrap()
            .expect("line is a record");
        assert_eq!(record.timestamp, ts(24, 12, 2023, 18, 30, 5));
        assert_eq!(record.name, "net");
        assert_eq!(record.level, Level::Warning);
        assert_eq!(record.file, "tcp_server.cpp");
        assert_eq!(record.line_number, 117);
        assert_eq!(record.message, "accept failed");
    }

    #[test]
    fn test_parse_padded_header() {
        let record = parse_line("01.02.2023 10:00:00 x MOD:E:file.cpp:42] boom")
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "MOD");
        assert_eq!(record.level, Level::Error);
        assert_eq!(record.line_number, 42);
        assert_eq!(record.message, "boom");
    }

    #[test]
    fn test_line_without_delimiter_is_not_a_record() {
        assert!(parse_line("plain text without header").unwrap().is_none());
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("01.02.2023 10:00:00 [a:E:f:1]no-space")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delimiter_before_header_region() {
        let err = parse_line("] early delimiter").unwrap_err();
        assert!(matches!(err, LineError::DelimiterInsideHeader { index: 0 }));
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_line("01.02.2023 10:00:00 [MOD:E:42] text").unwrap_err();
        assert!(matches!(err, LineError::FieldCount { found: 3 }));

        let err = parse_line("01.02.2023 10:00:00 [MOD:E:a:b:42] text").unwrap_err();
        assert!(matches!(err, LineError::FieldCount { found: 5 }));
    }

    #[test]
    fn test_invalid_line_number() {
        let err = parse_line("01.02.2023 10:00:00 [MOD:E:f.cpp:x1] text").unwrap_err();
        assert!(matches!(err, LineError::LineNumber { ref raw, .. } if raw == "x1"));
    }

    #[test]
    fn test_invalid_timestamp() {
        let err = parse_line("32.13.2023 10:00:00 [MOD:E:f.cpp:1] text").unwrap_err();
        assert!(matches!(err, LineError::Timestamp { source: Some(_), .. }));
    }

    #[test]
    fn test_crlf_line_ending_stripped() {
        let record = parse_line("01.02.2023 10:00:00 [MOD:I:f.cpp:1] hello\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(record.message, "hello");
    }

    #[test]
    fn test_message_keeps_later_delimiters() {
        let record = parse_line("01.02.2023 10:00:00 [MOD:I:f.cpp:1] a] b: c")
            .unwrap()
            .unwrap();
        assert_eq!(record.message, "a] b: c");
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        // 'é' is two bytes but one character: character 21 is the ':' here,
        // so the header gains an empty leading field.
        let record = parse_line("01.02.2023 10:00:00 é:MOD:I:f.cpp:7] x");
        assert!(matches!(record, Err(LineError::FieldCount { found: 5 })));

        let record = parse_line("01.02.2023 10:00:00 éMOD:I:f.cpp:7] x")
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "MOD");
    }

    #[test]
    fn test_format_line_round_trips() {
        let original = LogRecord {
            timestamp: ts(3, 4, 2024, 5, 6, 7),
            name: "core".to_string(),
            level: Level::Notice,
            file: "main.cpp".to_string(),
            line_number: 12,
            message: "started".to_string(),
        };
        let line = format_line(&original);
        assert_eq!(line, "03.04.2024 05:06:07 [core:N:main.cpp:12] started");
        let parsed = parse_line(&line).unwrap().unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.timestamp.second(), 7);
    }

    #[test]
    fn test_parse_content_skips_and_reports() {
        let content = "\
01.02.2023 10:00:00 [A:E:a.cpp:1] first
not a record
99.99.2023 10:00:00 [A:E:a.cpp:2] bad date
01.02.2023 10:00:02 [A:I:a.cpp:3] third
";
        let result = parse_content(content);
        assert_eq!(result.lines_processed, 4);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].message, "first");
        assert_eq!(result.records[1].message, "third");
        assert!(matches!(
            result.errors[0],
            ParseError::Line { line_number: 3, .. }
        ));
    }

    #[test]
    fn test_parse_error_cap() {
        let bad = "01.02.2023 10:00:00 [A:E:1] bad";
        let lines = vec![bad; MAX_PARSE_ERRORS_PER_FILE + 5];
        let result = parse_lines(lines);
        assert_eq!(result.errors.len(), MAX_PARSE_ERRORS_PER_FILE);
        assert_eq!(result.error_count, MAX_PARSE_ERRORS_PER_FILE + 5);
        assert!(result.records.is_empty());
    }
}
