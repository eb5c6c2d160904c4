//! File-backed JSON document store
//!
//! Stores each document as its own file, like git refs:
//! - `members/00000042.json` - member 42
//! - `loans/LN-2026-001.json` - one loan
//! - `attendance/meeting/2026-05-03.json` - one attendance record
//! - `state/rotation.json` - funeral duty rotation cursor
//!
//! Documents are written to a temp file and renamed into place, so readers
//! never see a half-written document. Every read-modify-write runs under one
//! store-wide lock, which makes conditional updates (the loan balance
//! decrement) atomic within the process.

mod attendance;
mod cash;
mod funerals;
mod loans;
mod members;
mod officers;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Serialize, de::DeserializeOwned};

use crate::core::ports::{StoreError, StoreResult};

pub(crate) const MEMBERS: &str = "members";
pub(crate) const LOANS: &str = "loans";
pub(crate) const FUNERALS: &str = "funerals";
pub(crate) const SETTINGS: &str = "settings";
pub(crate) const OFFICERS: &str = "officers";
pub(crate) const CASH: &str = "cash";
pub(crate) const STATE: &str = "state";

const EXTENSION: &str = "json";

/// JSON document store rooted at a data directory
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Open (creating if needed) a store at `root`
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        log::debug!("Opened JSON store at {}", root.display());
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Data directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hold the store-wide write lock.
    ///
    /// A panic while holding the lock cannot leave a half-written document
    /// (writes are rename-based), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn doc_path(&self, collection: &str, key: &str) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{}.{EXTENSION}", safe_key(key)))
    }

    fn read_path<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_path<T: Serialize>(path: &Path, doc: &T) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Read one document
    pub(crate) fn read_doc<T: DeserializeOwned>(&self, collection: &str, key: &str) -> StoreResult<Option<T>> {
        Self::read_path(&self.doc_path(collection, key))
    }

    /// Insert or replace one document
    pub(crate) fn write_doc<T: Serialize>(&self, collection: &str, key: &str, doc: &T) -> StoreResult<()> {
        let _guard = self.lock();
        Self::write_path(&self.doc_path(collection, key), doc)
    }

    /// Insert a document only if its key is free; returns `false` if taken
    pub(crate) fn insert_doc<T: Serialize>(
        &self,
        collection: &str,
        key: &str,
        doc: &T,
    ) -> StoreResult<bool> {
        let _guard = self.lock();
        let path = self.doc_path(collection, key);
        if path.exists() {
            return Ok(false);
        }
        Self::write_path(&path, doc)?;
        Ok(true)
    }

    /// Read, modify and write one document under the write lock.
    ///
    /// If `modify` fails nothing is written.
    pub(crate) fn update_doc<T, R, F>(
        &self,
        collection: &'static str,
        key: &str,
        modify: F,
    ) -> StoreResult<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T) -> StoreResult<R>,
    {
        let _guard = self.lock();
        let path = self.doc_path(collection, key);
        let mut doc: T =
            Self::read_path(&path)?.ok_or_else(|| StoreError::not_found(collection, key))?;
        let result = modify(&mut doc)?;
        Self::write_path(&path, &doc)?;
        Ok(result)
    }

    /// Create or rewrite one document from its current state, under the
    /// write lock
    pub(crate) fn upsert_doc<T, F>(&self, collection: &str, key: &str, build: F) -> StoreResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> StoreResult<T>,
    {
        let _guard = self.lock();
        let path = self.doc_path(collection, key);
        let doc = build(Self::read_path(&path)?)?;
        Self::write_path(&path, &doc)?;
        Ok(doc)
    }

    /// Replace a document that must already exist
    pub(crate) fn replace_doc<T: Serialize>(
        &self,
        collection: &'static str,
        key: &str,
        doc: &T,
    ) -> StoreResult<()> {
        let _guard = self.lock();
        let path = self.doc_path(collection, key);
        if !path.exists() {
            return Err(StoreError::not_found(collection, key));
        }
        Self::write_path(&path, doc)
    }

    /// Delete a document; returns `true` if it existed
    pub(crate) fn delete_doc(&self, collection: &str, key: &str) -> StoreResult<bool> {
        let _guard = self.lock();
        match fs::remove_file(self.doc_path(collection, key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Every document in a collection, in file-name order
    pub(crate) fn list_docs<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<Vec<T>> {
        let dir = self.collection_dir(collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .collect();
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(doc) = Self::read_path(&path)? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }
}

/// Map a key onto a single path component
fn safe_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Zero-padded numeric key so file-name order is numeric order
pub(crate) fn numeric_key(id: u32) -> String {
    format!("{id:010}")
}
