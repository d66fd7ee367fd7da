//! Short-name table: small integers standing in for storage names
//!
//! Ids are assigned from 1 upward and rendered with at least three digits
//! (`001`, `042`, `1234`). The table is held in memory and persisted to a
//! JSON file after every insert via write-then-rename, so a crash leaves
//! either the old or the new table on disk.
//!
//! Shortening the same storage name twice returns the id it already has.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sealdrop_core::{RelayError, RelayResult};

#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    next_id: u64,
    entries: BTreeMap<u64, String>,
}

impl Default for TableFile {
    fn default() -> Self {
        Self {
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }
}

struct Inner {
    table: TableFile,
    /// Reverse index: storage name → id
    by_name: HashMap<String, u64>,
}

pub struct ShortNameTable {
    db_path: PathBuf,
    inner: Mutex<Inner>,
}

fn format_id(id: u64) -> String {
    format!("{id:03}")
}

impl ShortNameTable {
    /// Load or create the table at `db_path`.
    pub fn open(db_path: &Path) -> RelayResult<Self> {
        let table: TableFile = if db_path.exists() {
            let content = std::fs::read_to_string(db_path)?;
            serde_json::from_str(&content).map_err(|e| {
                RelayError::Storage(format!("parsing short-name table {}: {e}", db_path.display()))
            })?
        } else {
            TableFile::default()
        };

        let by_name = table
            .entries
            .iter()
            .map(|(id, name)| (name.clone(), *id))
            .collect();

        tracing::debug!(
            path = %db_path.display(),
            entries = table.entries.len(),
            "short-name table loaded"
        );

        Ok(Self {
            db_path: db_path.to_path_buf(),
            inner: Mutex::new(Inner { table, by_name }),
        })
    }

    fn lock(&self) -> RelayResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| RelayError::Storage("short-name table lock poisoned".into()))
    }

    /// Short name for `name`, allocating one if it has none yet.
    pub fn shorten(&self, name: &str) -> RelayResult<String> {
        let mut inner = self.lock()?;
        if let Some(id) = inner.by_name.get(name) {
            return Ok(format_id(*id));
        }

        let id = inner.table.next_id;
        inner.table.next_id += 1;
        inner.table.entries.insert(id, name.to_string());

        if let Err(e) = self.flush(&inner.table) {
            inner.table.entries.remove(&id);
            inner.table.next_id = id;
            return Err(e);
        }
        inner.by_name.insert(name.to_string(), id);

        tracing::debug!(id, name, "short name allocated");
        Ok(format_id(id))
    }

    /// The storage name behind `short`, accepting any zero padding.
    pub fn resolve(&self, short: &str) -> Option<String> {
        if short.is_empty() || !short.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let id: u64 = short.parse().ok()?;
        let inner = self.inner.lock().ok()?;
        inner.table.entries.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.table.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Atomic write: temp file, then rename over the table.
    fn flush(&self, table: &TableFile) -> RelayResult<()> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(table)
            .map_err(|e| RelayError::Storage(format!("serializing short-name table: {e}")))?;

        let tmp_path = self.db_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.db_path)?;
        Ok(())
    }
}
