// LogViewer - ui/console.rs
//
// Plain-text rendering backend used by `--print`.
// Writes one row per record: the level code followed by the list text.

use crate::app::view::RecordView;
use crate::core::model::LogRecord;
use std::io::{self, Write};

/// Writes visible records to any `Write` sink.
///
/// `render_list` cannot fail, so the first write error is kept and
/// returned by `finish`.
pub struct ConsoleView<W: Write> {
    out: W,
    rows_written: usize,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            rows_written: 0,
            error: None,
        }
    }

    /// Rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the sink, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> RecordView for ConsoleView<W> {
    fn render_list(&mut self, records: &[&LogRecord]) {
        if self.error.is_some() {
            return;
        }
        for record in records {
            if let Err(e) = writeln!(self.out, "{} {}", record.level.code(), record.display_text()) {
                self.error = Some(e);
                return;
            }
            self.rows_written += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_content;

    #[test]
    fn test_console_rows() {
        let parsed = parse_content(
            "01.02.2023 10:00:00 [A:E:a.cpp:1] boom\n01.02.2023 10:00:01 [A:I:a.cpp:2] fine\n",
        );
        let refs: Vec<&LogRecord> = parsed.records.iter().collect();

        let mut view = ConsoleView::new(Vec::new());
        view.render_list(&refs);
        assert_eq!(view.rows_written(), 2);
        let out = String::from_utf8(view.finish().unwrap()).unwrap();
        assert_eq!(out, "E 10:00:00 boom\nI 10:00:01 fine\n");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_reported_by_finish() {
        let parsed = parse_content("01.02.2023 10:00:00 [A:E:a.cpp:1] boom\n");
        let refs: Vec<&LogRecord> = parsed.records.iter().collect();

        let mut view = ConsoleView::new(FailingWriter);
        view.render_list(&refs);
        assert_eq!(view.rows_written(), 0);
        let err = view.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
