// LogViewer - core/export.rs
//
// CSV and JSON export of the visible records.
// Core layer: writes to any Write implementation; the caller opens the file.

use crate::core::model::LogRecord;
use crate::util::constants::TIMESTAMP_FORMAT;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export records as CSV with columns `date,name,level,file,lineno,text`.
///
/// Dates use the log file's own `DD.MM.YYYY HH:MM:SS` format.
pub fn export_csv<W: Write>(
    records: &[&LogRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["date", "name", "level", "file", "lineno", "text"])
        .map_err(csv_err)?;

    for record in records {
        let date = record.timestamp.format(TIMESTAMP_FORMAT).to_string();
        let lineno = record.line_number.to_string();
        csv_writer
            .write_record([
                date.as_str(),
                record.name.as_str(),
                record.level.code(),
                record.file.as_str(),
                lineno.as_str(),
                record.message.as_str(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %export_path.display(), records = records.len(), "CSV export written");
    Ok(records.len())
}

/// Export records as a pretty-printed JSON array of objects.
pub fn export_json<W: Write>(
    records: &[&LogRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %export_path.display(), records = records.len(), "JSON export written");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Level;
    use chrono::NaiveDate;

    fn make_record(line_number: u32, message: &str) -> LogRecord {
        LogRecord {
            timestamp: NaiveDate::from_ymd_opt(2023, 2, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            name: "net".to_string(),
            level: Level::Error,
            file: "tcp.cpp".to_string(),
            line_number,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_csv_export() {
        let records = [make_record(1, "Error one"), make_record(2, "has, comma")];
        let refs: Vec<&LogRecord> = records.iter().collect();
        let mut buf = Vec::new();
        let count = export_csv(&refs, &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("date,name,level,file,lineno,text"));
        assert_eq!(
            lines.next(),
            Some("01.02.2023 10:00:00,net,E,tcp.cpp,1,Error one")
        );
        assert_eq!(
            lines.next(),
            Some("01.02.2023 10:00:00,net,E,tcp.cpp,2,\"has, comma\"")
        );
    }

    #[test]
    fn test_json_export() {
        let records = [make_record(7, "Test message")];
        let refs: Vec<&LogRecord> = records.iter().collect();
        let mut buf = Vec::new();
        let count = export_json(&refs, &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 1);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["level"], "E");
        assert_eq!(value[0]["line_number"], 7);
        assert_eq!(value[0]["message"], "Test message");
    }
}
