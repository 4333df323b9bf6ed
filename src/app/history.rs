// LogViewer - app/history.rs
//
// Persistent history of submitted filter expressions.
//
// - One expression per line, oldest first, at most MAX_HISTORY_ENTRIES.
// - A missing file is an empty history, not an error.
// - Writes are atomic (write temp, rename) so a crash mid-write keeps the
//   previous file intact.
// - Persist failures leave the in-memory history usable.

use crate::util::constants::MAX_HISTORY_ENTRIES;
use crate::util::error::HistoryError;
use std::path::{Path, PathBuf};

/// Ordered, de-duplicated list of filter expressions.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<String>,
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// Load history from `path`, or create an in-memory store for `None`.
    pub fn load(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => parse_entries(&content),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Cannot read filter history; starting empty"
                    );
                }
                Vec::new()
            }
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Filter history loaded");
        Self {
            entries,
            path: Some(path),
        }
    }

    /// Add an expression and persist.
    ///
    /// Returns `Ok(false)` for blank or already-recorded expressions. On a
    /// persist error the entry stays recorded in memory.
    pub fn record(&mut self, expression: &str) -> Result<bool, HistoryError> {
        let expression = expression.trim_end();
        if expression.trim().is_empty() || self.entries.iter().any(|e| e == expression) {
            return Ok(false);
        }

        self.entries.push(expression.to_string());
        while self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.remove(0);
        }

        self.persist()?;
        Ok(true)
    }

    /// Write all entries to the backing file. No-op without one.
    pub fn persist(&self) -> Result<(), HistoryError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, "create directory for", e))?;
        }

        let mut content = String::new();
        for entry in self.entries.iter().filter(|e| !e.trim().is_empty()) {
            content.push_str(entry);
            content.push('\n');
        }

        let tmp = tmp_path(path);
        std::fs::write(&tmp, content.as_bytes()).map_err(|e| io_error(&tmp, "write", e))?;
        std::fs::rename(&tmp, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            io_error(path, "replace", e)
        })?;

        tracing::debug!(path = %path.display(), entries = self.entries.len(), "Filter history saved");
        Ok(())
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Parse file content into entries, keeping the newest MAX_HISTORY_ENTRIES.
fn parse_entries(content: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in content.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() || entries.iter().any(|e| e == line) {
            continue;
        }
        entries.push(line.to_string());
    }
    if entries.len() > MAX_HISTORY_ENTRIES {
        entries.drain(..entries.len() - MAX_HISTORY_ENTRIES);
    }
    entries
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, operation: &'static str, source: std::io::Error) -> HistoryError {
    HistoryError::Io {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::load(Some(dir.path().join("filter.history")))
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert_eq!(store.path(), Some(dir.path().join("filter.history").as_path()));
    }

    #[test]
    fn test_record_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(store.record("level == 'E'").unwrap());
        assert!(store.record("text contains 'x'  ").unwrap());

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.entries(), ["level == 'E'", "text contains 'x'"]);

        let raw = std::fs::read_to_string(dir.path().join("filter.history")).unwrap();
        assert_eq!(raw, "level == 'E'\ntext contains 'x'\n");
    }

    #[test]
    fn test_record_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(store.record("a").unwrap());
        assert!(!store.record("a").unwrap());
        assert!(!store.record("a \n").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_blank_expression_not_recorded() {
        let mut store = HistoryStore::load(None);
        assert!(!store.record("").unwrap());
        assert!(!store.record("   ").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_oldest_entry_evicted_past_capacity() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for i in 0..=MAX_HISTORY_ENTRIES {
            store.record(&format!("lineno == {i}")).unwrap();
        }
        assert_eq!(store.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(store.entries()[0], "lineno == 1");
        assert_eq!(
            store.entries()[MAX_HISTORY_ENTRIES - 1],
            format!("lineno == {MAX_HISTORY_ENTRIES}")
        );
        assert_eq!(store_in(&dir).len(), MAX_HISTORY_ENTRIES);
    }

    #[test]
    fn test_load_skips_blank_lines_and_keeps_newest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filter.history");
        let mut content = String::from("\n   \n");
        for i in 0..MAX_HISTORY_ENTRIES + 10 {
            content.push_str(&format!("name == 'n{i}'\n\n"));
        }
        std::fs::write(&path, content).unwrap();

        let store = HistoryStore::load(Some(path));
        assert_eq!(store.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(store.entries()[0], "name == 'n10'");
    }

    #[test]
    fn test_persist_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("filter.history");
        let mut store = HistoryStore::load(Some(path.clone()));
        store.record("level == 'W'").unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("nested/deeper/filter.history.tmp").exists());
    }

    #[test]
    fn test_unwritable_path_keeps_memory_entry() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let mut store = HistoryStore::load(Some(blocker.join("filter.history")));

        let err = store.record("level == 'E'").unwrap_err();
        assert!(matches!(err, HistoryError::Io { .. }));
        assert_eq!(store.entries(), ["level == 'E'"]);
    }

    #[test]
    fn test_in_memory_store_never_touches_disk() {
        let mut store = HistoryStore::load(None);
        assert!(store.record("a").unwrap());
        assert!(store.path().is_none());
        store.persist().unwrap();
    }
}
