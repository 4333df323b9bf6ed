// LogViewer - app/state.rs
//
// Application state: the open file's records, the active filter, the
// filtered view, filter history, selection and status text.
// Owned by whichever backend drives it (egui app or console printer).

use crate::app::history::HistoryStore;
use crate::app::view::{RecordView, ViewEvent};
use crate::core::filter::{self, Filter};
use crate::core::model::LogRecord;
use crate::core::store::LogStore;
use crate::platform::fs;
use crate::util::constants::MAX_WARNINGS;
use crate::util::error::{FilterError, LogViewerError};
use std::path::Path;

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Records of the currently open file.
    pub store: LogStore,

    /// Submitted filter history.
    pub history: HistoryStore,

    /// Last successfully applied filter.
    filter: Filter,

    /// Indices into `store.records()` passing the active filter.
    pub filtered_indices: Vec<usize>,

    /// Index of the selected row within `filtered_indices`.
    /// Cleared whenever the filtered view is rebuilt.
    pub selected_index: Option<usize>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Error from the last rejected filter, cleared on the next success.
    pub filter_error: Option<String>,

    /// Non-fatal warnings (malformed lines, history write failures).
    pub warnings: Vec<String>,
}

impl AppState {
    pub fn new(history: HistoryStore) -> Self {
        Self {
            store: LogStore::new(),
            history,
            filter: Filter::All,
            filtered_indices: Vec::new(),
            selected_index: None,
            status_message: "Ready. Open a log file to begin.".to_string(),
            filter_error: None,
            warnings: Vec::new(),
        }
    }

    /// Dispatch a backend event and redraw `view` on success.
    ///
    /// On failure the status message describes the error and the view keeps
    /// its previous content.
    pub fn handle(
        &mut self,
        event: ViewEvent,
        view: &mut dyn RecordView,
    ) -> Result<(), LogViewerError> {
        let outcome = match event {
            ViewEvent::OpenRequested(path) => self.open_file(&path).map(|_| ()),
            ViewEvent::FilterSubmitted(expression) => self
                .submit_filter(&expression)
                .map(|_| ())
                .map_err(LogViewerError::from),
        };

        match outcome {
            Ok(()) => {
                self.refresh(view);
                Ok(())
            }
            Err(e) => {
                self.status_message = e.to_string();
                Err(e)
            }
        }
    }

    /// Load `path`, replacing the current records, and re-apply the active
    /// filter. Returns the number of records loaded.
    ///
    /// If the file cannot be read the current records are kept.
    pub fn open_file(&mut self, path: &Path) -> Result<usize, LogViewerError> {
        let content = fs::read_file_lossy(path).map_err(|e| LogViewerError::Io {
            path: path.to_path_buf(),
            operation: "read",
            source: e,
        })?;

        let report = self.store.load_content(&content, Some(path.to_path_buf()));

        self.warnings.clear();
        for err in &report.errors {
            self.push_warning(format!("{}: {err}", path.display()));
        }
        if report.error_count > report.errors.len() {
            self.push_warning(format!(
                "{}: {} further malformed lines not listed",
                path.display(),
                report.error_count - report.errors.len()
            ));
        }

        self.recompute();

        self.status_message = if report.error_count > 0 {
            format!(
                "Loaded {} records from {} ({} malformed lines skipped)",
                report.records,
                path.display(),
                report.error_count
            )
        } else {
            format!("Loaded {} records from {}", report.records, path.display())
        };
        tracing::info!(
            path = %path.display(),
            records = report.records,
            malformed = report.error_count,
            visible = self.filtered_indices.len(),
            "Log file opened"
        );
        Ok(report.records)
    }

    /// Compile and activate a filter. Returns the number of visible records.
    ///
    /// On error the previous filter and view stay active.
    pub fn apply_filter(&mut self, expression: &str) -> Result<usize, FilterError> {
        match Filter::compile(expression) {
            Ok(compiled) => {
                self.filter = compiled;
                self.filter_error = None;
                self.recompute();
                self.status_message = format!(
                    "Showing {} of {} records",
                    self.filtered_indices.len(),
                    self.store.len()
                );
                tracing::debug!(
                    filter = self.filter.source(),
                    visible = self.filtered_indices.len(),
                    "Filter applied"
                );
                Ok(self.filtered_indices.len())
            }
            Err(e) => {
                tracing::debug!(expression, error = %e, "Filter rejected");
                self.filter_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Apply a filter typed by the user and record it in history.
    ///
    /// Only valid, non-empty expressions are recorded. A failure to save the
    /// history is reported as a warning; the filter stays applied.
    pub fn submit_filter(&mut self, expression: &str) -> Result<usize, FilterError> {
        let visible = self.apply_filter(expression)?;
        if !self.filter.is_empty() {
            let source = self.filter.source().to_string();
            if let Err(e) = self.history.record(&source) {
                tracing::warn!(error = %e, "Filter history not saved");
                self.status_message = format!("{} (history not saved: {e})", self.status_message);
                self.push_warning(e.to_string());
            }
        }
        Ok(visible)
    }

    /// The active filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Records passing the active filter, in file order.
    pub fn visible_records(&self) -> Vec<&LogRecord> {
        self.filtered_indices
            .iter()
            .filter_map(|&idx| self.store.get(idx))
            .collect()
    }

    /// Push the visible records to `view`.
    pub fn refresh(&self, view: &mut dyn RecordView) {
        view.render_list(&self.visible_records());
    }

    /// Get the currently selected record, if any.
    pub fn selected_record(&self) -> Option<&LogRecord> {
        self.selected_index
            .and_then(|idx| self.filtered_indices.get(idx))
            .and_then(|&record_idx| self.store.get(record_idx))
    }

    fn recompute(&mut self) {
        self.filtered_indices = filter::apply_filter(self.store.records(), &self.filter);
        self.selected_index = None;
    }

    fn push_warning(&mut self, warning: String) {
        if self.warnings.len() < MAX_WARNINGS {
            self.warnings.push(warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Captured {
        renders: Vec<Vec<String>>,
    }

    impl RecordView for Captured {
        fn render_list(&mut self, records: &[&LogRecord]) {
            self.renders
                .push(records.iter().map(|r| r.display_text()).collect());
        }
    }

    const CONTENT: &str = "\
01.02.2023 10:00:00 x MOD:E:file.cpp:42] boom
01.02.2023 10:00:01 x MOD:I:file.cpp:43] ok
01.02.2023 10:00:02 [MOD:I:1] malformed
";

    fn setup() -> (TempDir, AppState, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("app.log");
        std::fs::write(&log, CONTENT).unwrap();
        let history = HistoryStore::load(Some(dir.path().join("filter.history")));
        (dir, AppState::new(history), log)
    }

    #[test]
    fn test_open_then_filter_renders_subset() {
        let (_dir, mut state, log) = setup();
        let mut view = Captured::default();

        state
            .handle(ViewEvent::OpenRequested(log), &mut view)
            .unwrap();
        assert_eq!(view.renders[0], ["10:00:00 boom", "10:00:01 ok"]);
        assert_eq!(state.warnings.len(), 1);

        state
            .handle(ViewEvent::FilterSubmitted("level == 'E'".into()), &mut view)
            .unwrap();
        assert_eq!(view.renders[1], ["10:00:00 boom"]);
        assert_eq!(state.history.entries(), ["level == 'E'"]);
    }

    #[test]
    fn test_invalid_filter_keeps_previous_view() {
        let (_dir, mut state, log) = setup();
        let mut view = Captured::default();
        state.open_file(&log).unwrap();
        state.submit_filter("level == 'I'").unwrap();

        let err = state
            .handle(ViewEvent::FilterSubmitted("level ==".into()), &mut view)
            .unwrap_err();
        assert!(matches!(err, LogViewerError::Filter(_)));
        assert!(view.renders.is_empty());
        assert_eq!(state.filtered_indices, vec![1]);
        assert_eq!(state.filter().source(), "level == 'I'");
        assert!(state.filter_error.is_some());
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_empty_filter_shows_all_and_is_not_recorded() {
        let (_dir, mut state, log) = setup();
        state.open_file(&log).unwrap();
        state.submit_filter("level == 'E'").unwrap();
        assert_eq!(state.submit_filter("  ").unwrap(), 2);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_filter_survives_reopen() {
        let (dir, mut state, log) = setup();
        state.submit_filter("level == 'E'").unwrap();
        assert!(state.visible_records().is_empty());

        assert_eq!(state.open_file(&log).unwrap(), 2);
        assert_eq!(state.visible_records().len(), 1);

        let other = dir.path().join("other.log");
        std::fs::write(&other, "01.02.2023 11:00:00 [N:E:n.cpp:1] again\n").unwrap();
        state.open_file(&other).unwrap();
        assert_eq!(state.visible_records()[0].message, "again");
    }

    #[test]
    fn test_unreadable_file_keeps_store() {
        let (dir, mut state, log) = setup();
        state.open_file(&log).unwrap();

        let err = state.open_file(&dir.path().join("missing.log")).unwrap_err();
        assert!(matches!(err, LogViewerError::Io { operation: "read", .. }));
        assert_eq!(state.store.len(), 2);
        assert_eq!(state.store.source(), Some(log.as_path()));
    }

    #[test]
    fn test_selection_cleared_when_out_of_range() {
        let (_dir, mut state, log) = setup();
        state.open_file(&log).unwrap();
        state.selected_index = Some(1);
        assert_eq!(state.selected_record().map(|r| r.line_number), Some(43));

        state.apply_filter("level == 'E'").unwrap();
        assert!(state.selected_index.is_none());
    }

    #[test]
    fn test_selection_cleared_when_filter_changes_in_range() {
        let (_dir, mut state, log) = setup();
        state.open_file(&log).unwrap();
        state.selected_index = Some(0);
        assert_eq!(state.selected_record().map(|r| r.line_number), Some(42));

        // Row 0 still exists but now holds the line-43 record.
        state.apply_filter("level == 'I'").unwrap();
        assert_eq!(state.filtered_indices, vec![1]);
        assert!(state.selected_record().is_none());
    }

    #[test]
    fn test_unwritable_history_keeps_filter_applied() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("app.log");
        std::fs::write(&log, CONTENT).unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();
        let history = HistoryStore::load(Some(blocker.join("filter.history")));
        let mut state = AppState::new(history);
        state.open_file(&log).unwrap();
        let load_warnings = state.warnings.len();

        assert_eq!(state.submit_filter("level == 'E'").unwrap(), 1);
        assert_eq!(state.filtered_indices, vec![0]);
        assert_eq!(state.filter().source(), "level == 'E'");
        assert_eq!(state.warnings.len(), load_warnings + 1);
        assert!(state.status_message.contains("history not saved"));
        assert_eq!(state.history.entries(), ["level == 'E'"]);
    }
}
