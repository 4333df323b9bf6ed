// LogViewer - core/store.rs
//
// Ordered, in-memory collection of the records of the currently open file.
// Core layer: receives lines or content, never opens files itself.

use crate::core::model::LogRecord;
use crate::core::parser::{self, ParseResult};
use crate::util::error::ParseError;
use std::path::{Path, PathBuf};

/// Outcome of a load, for status display and warnings.
#[derive(Debug, Default)]
pub struct ParseReport {
    /// Records now held by the store.
    pub records: usize,
    /// Malformed lines, including those beyond the stored error cap.
    pub error_count: usize,
    /// Lines without a header delimiter.
    pub skipped: usize,
    /// Stored line errors.
    pub errors: Vec<ParseError>,
}

impl ParseReport {
    fn from_result(result: &mut ParseResult) -> Self {
        Self {
            records: result.records.len(),
            error_count: result.error_count,
            skipped: result.skipped,
            errors: std::mem::take(&mut result.errors),
        }
    }
}

/// Records of one log file, in file order.
#[derive(Debug, Default)]
pub struct LogStore {
    records: Vec<LogRecord>,
    source: Option<PathBuf>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `lines` and replace the current content with the records found.
    ///
    /// The source path is cleared; use `load_content` to set it.
    pub fn load<I, S>(&mut self, lines: I) -> ParseReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = parser::parse_lines(lines);
        let report = ParseReport::from_result(&mut result);
        self.records = result.records;
        self.source = None;
        report
    }

    /// Load an in-memory file and remember where it came from.
    pub fn load_content(&mut self, content: &str, source: Option<PathBuf>) -> ParseReport {
        let report = self.load(content.lines());
        self.source = source;
        tracing::debug!(
            source = ?self.source,
            records = report.records,
            errors = report.error_count,
            "Log store loaded"
        );
        report
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&LogRecord> {
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path of the loaded file, if it was loaded from disk.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.source = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
01.02.2023 10:00:00 [A:E:a.cpp:1] one
continuation without header
01.02.2023 10:00:01 [A:I:a.cpp:2] two
01.02.2023 10:00:02 [A:I:2] broken
";

    #[test]
    fn test_load_keeps_records_in_order() {
        let mut store = LogStore::new();
        let report = store.load(SAMPLE.lines());
        assert_eq!(report.records, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].message, "one");
        assert_eq!(store.get(1).map(|r| r.message.as_str()), Some("two"));
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_load_replaces_previous_content() {
        let mut store = LogStore::new();
        store.load_content(SAMPLE, Some(PathBuf::from("first.log")));
        assert_eq!(store.source(), Some(Path::new("first.log")));

        let report = store.load(["01.02.2023 11:00:00 [B:W:b.cpp:9] only"]);
        assert_eq!(report.records, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].name, "B");
        assert!(store.source().is_none());
    }

    #[test]
    fn test_empty_input_gives_empty_store() {
        let mut store = LogStore::new();
        store.load_content(SAMPLE, None);
        let report = store.load_content("", Some(PathBuf::from("empty.log")));
        assert_eq!(report.records, 0);
        assert!(store.is_empty());
        assert_eq!(store.source(), Some(Path::new("empty.log")));
    }

    #[test]
    fn test_clear() {
        let mut store = LogStore::new();
        store.load_content(SAMPLE, Some(PathBuf::from("x.log")));
        store.clear();
        assert!(store.is_empty());
        assert!(store.source().is_none());
    }
}
