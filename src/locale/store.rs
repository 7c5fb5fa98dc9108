use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError},
};

use indexmap::IndexMap;
use serde_json::Value;

use super::table::LocaleTable;
use crate::error::PersistenceError;

/// A key and the source-language text it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub key: String,
    pub text: String,
}

/// Outcome of [`LocaleStore::record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Added,
    /// Same key and text were already recorded in this run.
    Duplicate,
    /// The key was recorded earlier with different text; the earlier text wins.
    Conflict { existing: String },
}

/// What a flush changed on disk.
#[derive(Debug, Default)]
pub struct FlushReport {
    /// Keys appended to the source table.
    pub source_added: usize,
    /// Empty placeholders appended to the target table.
    pub target_added: usize,
    /// Keys whose target text already existed and was left as is.
    pub target_kept: usize,
    /// Keys bound to different text, in memory or on disk.
    pub conflicts: Vec<PersistenceError>,
    /// Tables that were malformed and restarted empty.
    pub recovered: Vec<RecoveredTable>,
}

/// A malformed table that was replaced by an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredTable {
    pub path: PathBuf,
    /// Copy of the previous content, if the copy could be made.
    pub backup: Option<PathBuf>,
}

impl FlushReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

#[derive(Debug, Default)]
struct Pending {
    entries: IndexMap<String, String>,
    conflicts: Vec<PersistenceError>,
}

/// Single-writer locks, one per table path, shared by every store in the
/// process.
static WRITER_LOCKS: LazyLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Locks for every path in `paths`, sorted by absolute path so that two
/// flushes over overlapping tables always acquire them in the same order.
fn writer_locks(paths: &[&Path]) -> Vec<Arc<Mutex<()>>> {
    let mut keys: Vec<PathBuf> = paths
        .iter()
        .map(|path| std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
        .collect();
    keys.sort();
    keys.dedup();

    let mut locks = WRITER_LOCKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    keys.into_iter()
        .map(|key| locks.entry(key).or_default().clone())
        .collect()
}

/// Pending translation entries for one run, and the two tables they merge into.
///
/// Workers call [`record`](Self::record) from any thread; [`flush`](Self::flush)
/// merges everything recorded so far into the files.
#[derive(Debug)]
pub struct LocaleStore {
    source_path: PathBuf,
    target_path: PathBuf,
    pending: Mutex<Pending>,
}

impl LocaleStore {
    pub fn new(source_path: impl Into<PathBuf>, target_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            pending: Mutex::new(Pending::default()),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, key: &str, text: &str) -> RecordOutcome {
        let mut pending = self.pending();
        match pending.entries.get(key) {
            None => {
                pending.entries.insert(key.to_string(), text.to_string());
                RecordOutcome::Added
            }
            Some(existing) if existing == text => RecordOutcome::Duplicate,
            Some(existing) => {
                let existing = existing.clone();
                tracing::warn!(
                    "Key `{}` already holds \"{}\"; ignoring \"{}\"",
                    key,
                    existing,
                    text
                );
                pending.conflicts.push(PersistenceError::KeyConflict {
                    key: key.to_string(),
                    existing: existing.clone(),
                    incoming: text.to_string(),
                });
                RecordOutcome::Conflict { existing }
            }
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending().entries.len()
    }

    /// Merge pending entries into both tables and write them.
    ///
    /// On a write error the entries stay pending, so a later flush retries
    /// them. Flushes that share either table never overlap.
    pub fn flush(&self) -> Result<FlushReport, PersistenceError> {
        let locks = writer_locks(&[self.source_path.as_path(), self.target_path.as_path()]);
        let _guards: Vec<_> = locks
            .iter()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();

        let entries = self.pending().entries.clone();
        let mut report = FlushReport::default();
        if entries.is_empty() {
            report.conflicts = std::mem::take(&mut self.pending().conflicts);
            return Ok(report);
        }

        let mut source = LocaleTable::load(&self.source_path)?;
        let mut target = LocaleTable::load(&self.target_path)?;
        for table in [&source, &target] {
            if let Some(backup) = table.recovered() {
                report.recovered.push(RecoveredTable {
                    path: table.path().to_path_buf(),
                    backup: backup.map(Path::to_path_buf),
                });
            }
        }

        for (key, text) in &entries {
            match source.get(key) {
                None => {
                    source.insert_if_absent(key, text);
                    report.source_added += 1;
                }
                Some(Value::String(existing)) if existing == text => {}
                Some(existing) => {
                    let existing = match existing {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    tracing::warn!(
                        "{}: key `{}` is bound to \"{}\"; keeping it over \"{}\"",
                        self.source_path.display(),
                        key,
                        existing,
                        text
                    );
                    report.conflicts.push(PersistenceError::KeyConflict {
                        key: key.clone(),
                        existing,
                        incoming: text.clone(),
                    });
                }
            }

            if target.insert_if_absent(key, "") {
                report.target_added += 1;
            } else {
                report.target_kept += 1;
            }
        }

        source.save()?;
        target.save()?;

        let mut pending = self.pending();
        for key in entries.keys() {
            pending.entries.shift_remove(key);
        }
        let mut conflicts = std::mem::take(&mut pending.conflicts);
        conflicts.append(&mut report.conflicts);
        report.conflicts = conflicts;

        tracing::debug!(
            "Flushed {} entries to {} ({} keys) and {} ({} keys)",
            entries.len(),
            self.source_path.display(),
            source.len(),
            self.target_path.display(),
            target.len()
        );
        Ok(report)
    }
}
