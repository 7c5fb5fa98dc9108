use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::PersistenceError;

/// One locale file: a flat JSON object of key to text.
///
/// Key order is the file's order, with new keys appended.
#[derive(Debug)]
pub struct LocaleTable {
    path: PathBuf,
    entries: Map<String, Value>,
    /// Set when the file on disk was unreadable as a table and got replaced
    /// by an empty one. Holds the backup location, if the backup succeeded.
    recovered: Option<Option<PathBuf>>,
}

impl LocaleTable {
    /// Read the table at `path`.
    ///
    /// A missing or blank file is an empty table. Malformed content is copied
    /// to `<file>.corrupt` and replaced by an empty table.
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut table = Self {
            path: path.to_path_buf(),
            entries: Map::new(),
            recovered: None,
        };
        if content.trim().is_empty() {
            return Ok(table);
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => table.entries = map,
            Ok(_) => table.recover("root is not a JSON object"),
            Err(e) => table.recover(&e.to_string()),
        }
        Ok(table)
    }

    fn recover(&mut self, reason: &str) {
        let backup = corrupt_backup_path(&self.path);
        let saved = match fs::copy(&self.path, &backup) {
            Ok(_) => {
                tracing::warn!(
                    "Malformed locale table {} ({}); starting empty, previous content saved to {}",
                    self.path.display(),
                    reason,
                    backup.display()
                );
                Some(backup)
            }
            Err(e) => {
                tracing::warn!(
                    "Malformed locale table {} ({}); starting empty, backup failed: {}",
                    self.path.display(),
                    reason,
                    e
                );
                None
            }
        };
        self.recovered = Some(saved);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backup location if this table was recovered from malformed content.
    pub fn recovered(&self) -> Option<Option<&Path>> {
        self.recovered.as_ref().map(|backup| backup.as_deref())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `key` unless it exists. Returns true if inserted.
    pub fn insert_if_absent(&mut self, key: &str, value: &str) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries
            .insert(key.to_string(), Value::String(value.to_string()));
        true
    }

    /// Write the whole table, replacing the file atomically.
    ///
    /// Output is pretty-printed with 2-space indentation and a trailing newline.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let write_error = |source: io::Error| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(write_error)?;

        let content =
            serde_json::to_string_pretty(&self.entries).map_err(|source| {
                PersistenceError::Serialize {
                    path: self.path.clone(),
                    source,
                }
            })?;

        let mut file = NamedTempFile::new_in(parent).map_err(write_error)?;
        file.write_all(format!("{}\n", content).as_bytes())
            .map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(&self.path).map_err(|e| write_error(e.error))?;

        Ok(())
    }
}

/// `locales/he.json` -> `locales/he.json.corrupt`
fn corrupt_backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}
