//! Embedded document store with file snapshots.
//!
//! # Responsibilities
//! - Hold one database: a set of named collections
//! - Serialize concurrent access per collection (DashMap shard locks)
//! - Load the database snapshot on open and write it back on flush
//! - Pick up a snapshot rewritten by another process on `refresh`
//!
//! # Design Decisions
//! - A missing snapshot file opens as an empty database
//! - An unreadable or corrupt snapshot is a connectivity failure
//! - Snapshots are written to a named temp file in the same directory and
//!   persisted over the previous one; a failed write leaves no temp file
//! - A snapshot is identified by modification time, length and (on unix)
//!   inode, so every persisted rewrite is seen as a change

use std::collections::BTreeMap;
use std::fs::{self, File, Metadata};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::store::collection::{Collection, CollectionSnapshot};
use crate::store::{Document, DocumentStore, Filter, StoreError, TextSearchable};

#[derive(Debug, Default, Serialize, Deserialize)]
struct DatabaseSnapshot {
    #[serde(default)]
    collections: BTreeMap<String, CollectionSnapshot>,
}

/// Identity of a snapshot file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SnapshotStamp {
    modified: Option<SystemTime>,
    len: u64,
    inode: u64,
}

impl SnapshotStamp {
    fn of(metadata: &Metadata) -> Self {
        #[cfg(unix)]
        let inode = std::os::unix::fs::MetadataExt::ino(metadata);
        #[cfg(not(unix))]
        let inode = 0;
        Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
            inode,
        }
    }
}

/// A database held in memory, optionally persisted to a JSON snapshot.
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    snapshot_path: Option<PathBuf>,
    collections: DashMap<String, Collection>,
    loaded: RwLock<Option<SnapshotStamp>>,
}

fn connectivity(path: &Path, reason: impl ToString) -> StoreError {
    StoreError::Connectivity {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Read the snapshot at `path`, or `None` if there is no file.
fn read_snapshot(path: &Path) -> Result<Option<(DatabaseSnapshot, SnapshotStamp)>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(connectivity(path, e)),
    };
    let stamp = SnapshotStamp::of(&file.metadata().map_err(|e| connectivity(path, e))?);
    let snapshot = serde_json::from_reader(BufReader::new(file)).map_err(|e| connectivity(path, e))?;
    Ok(Some((snapshot, stamp)))
}

impl MemoryStore {
    /// Create a database that lives only in memory.
    pub fn in_memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Open database `name` under `data_dir`, loading `<data_dir>/<name>.json`
    /// if it exists.
    pub fn open(data_dir: &Path, name: &str) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir).map_err(|e| connectivity(data_dir, e))?;

        let path = data_dir.join(format!("{name}.json"));
        let store = Self {
            name: name.to_string(),
            snapshot_path: Some(path.clone()),
            ..Self::default()
        };

        match read_snapshot(&path)? {
            Some((snapshot, stamp)) => {
                store.replace_collections(snapshot, stamp);
                tracing::info!(
                    database = %name,
                    collections = store.collections.len(),
                    "Loaded database snapshot"
                );
            }
            None => {
                tracing::info!(database = %name, path = ?path, "No snapshot found, starting empty")
            }
        }

        Ok(store)
    }

    /// Reload the snapshot if the file changed since this store last loaded
    /// or wrote it. Returns whether the collections were replaced.
    ///
    /// A snapshot that disappeared leaves the current contents in place.
    pub fn refresh(&self) -> Result<bool, StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(false);
        };

        let current = match fs::metadata(path) {
            Ok(metadata) => SnapshotStamp::of(&metadata),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(connectivity(path, e)),
        };
        if self.loaded_stamp() == Some(current) {
            return Ok(false);
        }

        let Some((snapshot, stamp)) = read_snapshot(path)? else {
            return Ok(false);
        };
        self.replace_collections(snapshot, stamp);
        tracing::info!(
            database = %self.name,
            collections = self.collections.len(),
            "Reloaded changed database snapshot"
        );
        Ok(true)
    }

    fn loaded_stamp(&self) -> Option<SnapshotStamp> {
        *self.loaded.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_loaded_stamp(&self, stamp: Option<SnapshotStamp>) {
        *self.loaded.write().unwrap_or_else(|e| e.into_inner()) = stamp;
    }

    fn replace_collections(&self, snapshot: DatabaseSnapshot, stamp: SnapshotStamp) {
        self.collections
            .retain(|name, _| snapshot.collections.contains_key(name));
        for (name, data) in snapshot.collections {
            self.collections.insert(name, Collection::from_snapshot(data));
        }
        self.set_loaded_stamp(Some(stamp));
    }

    /// Whether the collection currently carries a text index.
    pub fn has_text_index(&self, collection: &str) -> bool {
        self.collections
            .get(collection)
            .map(|c| c.has_text_index())
            .unwrap_or(false)
    }

    fn snapshot(&self) -> DatabaseSnapshot {
        let collections = self
            .collections
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().to_snapshot()))
            .collect();
        DatabaseSnapshot { collections }
    }
}

impl DocumentStore for MemoryStore {
    fn list_collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    fn create_collection(&self, name: &str) {
        self.collections.entry(name.to_string()).or_default();
    }

    fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|c| c.find(filter))
            .unwrap_or_default())
    }

    fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(document);
        Ok(())
    }

    fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<(), StoreError> {
        let mut target = self.collections.entry(collection.to_string()).or_default();
        for doc in documents {
            target.insert(doc);
        }
        Ok(())
    }

    fn delete_many(&self, collection: &str, filter: &Filter) -> Result<usize, StoreError> {
        Ok(self
            .collections
            .get_mut(collection)
            .map(|mut c| c.delete_many(filter))
            .unwrap_or(0))
    }

    fn drop_indexes(&self, collection: &str) -> Result<(), StoreError> {
        if let Some(mut c) = self.collections.get_mut(collection) {
            c.drop_indexes();
        }
        Ok(())
    }

    fn estimated_document_count(&self, collection: &str) -> usize {
        self.collections.get(collection).map(|c| c.len()).unwrap_or(0)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot = self.snapshot();
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        let file = tmp.persist(path).map_err(|e| e.error)?;
        self.set_loaded_stamp(file.metadata().ok().map(|m| SnapshotStamp::of(&m)));

        tracing::debug!(
            database = %self.name,
            collections = snapshot.collections.len(),
            "Flushed database snapshot"
        );
        Ok(())
    }
}

impl TextSearchable for MemoryStore {
    fn create_text_index(&self, collection: &str) -> Result<(), StoreError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .create_text_index();
        Ok(())
    }

    fn find_text(&self, collection: &str, query: &str) -> Result<Vec<Document>, StoreError> {
        match self.collections.get(collection) {
            Some(c) => c
                .find_text(query)
                .ok_or_else(|| StoreError::TextIndexRequired(collection.to_string())),
            None => Ok(Vec::new()),
        }
    }
}
