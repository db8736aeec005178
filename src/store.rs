//! Persisting collections as slug-keyed records
//!
//! [`DocumentStore`] is the narrow port a collection saves through: upsert a
//! record by slug, list what is stored, remove a stored record. Two adapters
//! ship with the crate: [`MemoryStore`] and [`JsonFileStore`], which keeps a
//! pretty-printed JSON array on disk.

use crate::core::collection::DocumentCollection;
use crate::core::record::{FieldSelection, Record};
use crate::error::{CorpusError, Result};
use crate::io::writer::write_atomic;
use log::{debug, info};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Record key that stores are keyed by
pub const SLUG_KEY: &str = "slug";

/// Storage port for document records
pub trait DocumentStore {
    /// Insert `record`, or merge it into the stored record with the same slug
    fn upsert(&mut self, slug: &str, record: Record) -> Result<()>;

    /// Every stored record
    fn scan_existing(&self) -> Result<Vec<Record>>;

    /// Remove one previously scanned record
    ///
    /// Other records sharing its slug stay stored.
    fn remove(&mut self, record: &Record) -> Result<()>;

    /// Persist pending changes; a no-op for stores that write through
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Options for [`sync_collection`]
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Remove stored records whose slug is not in the collection
    pub sync: bool,
    /// Fields written for each document
    pub selection: FieldSelection,
}

impl SaveOptions {
    pub fn sync() -> Self {
        Self {
            sync: true,
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: FieldSelection) -> Self {
        self.selection = selection;
        self
    }
}

/// Counts from one save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub upserted: usize,
    pub removed: usize,
}

/// Write every document of `collection` to `store`, keyed by slug
///
/// All records are built before the store is touched, so a document without a
/// slug or a failing render leaves the store unchanged. The `slug` key is
/// always written, whatever the selection says.
pub fn sync_collection<S: DocumentStore + ?Sized>(
    store: &mut S,
    collection: &DocumentCollection,
    options: &SaveOptions,
) -> Result<SyncReport> {
    let mut pending = Vec::with_capacity(collection.len());
    for document in collection {
        let slug = document.slug().ok_or_else(|| {
            CorpusError::missing_slug(
                document
                    .source_path()
                    .unwrap_or_else(|| Path::new("<memory>")),
            )
        })?;
        let mut record = document.to_record(collection.renderer(), &options.selection)?;
        record.insert(SLUG_KEY.to_string(), JsonValue::String(slug.clone()));
        pending.push((slug, record));
    }

    let mut report = SyncReport::default();
    if options.sync {
        let current: HashSet<&str> = pending.iter().map(|(slug, _)| slug.as_str()).collect();
        for existing in store.scan_existing()? {
            if record_slug(&existing).map_or(false, |slug| current.contains(slug)) {
                continue;
            }
            debug!("Removing stale record: {:?}", record_slug(&existing));
            store.remove(&existing)?;
            report.removed += 1;
        }
    }

    for (slug, record) in pending {
        store.upsert(&slug, record)?;
        report.upserted += 1;
    }
    store.flush()?;

    info!(
        "Saved collection: {} upserted, {} removed",
        report.upserted, report.removed
    );
    Ok(report)
}

fn record_slug(record: &Record) -> Option<&str> {
    record.get(SLUG_KEY).and_then(JsonValue::as_str)
}

/// In-memory store, mostly useful in tests and as a staging area
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn find(&self, slug: &str) -> Option<&Record> {
        self.records.iter().find(|r| record_slug(r) == Some(slug))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn upsert(&mut self, slug: &str, record: Record) -> Result<()> {
        match self
            .records
            .iter_mut()
            .find(|r| record_slug(r) == Some(slug))
        {
            Some(existing) => existing.extend(record),
            None => {
                let mut record = record;
                record.insert(SLUG_KEY.to_string(), JsonValue::String(slug.to_string()));
                self.records.push(record);
            }
        }
        Ok(())
    }

    fn scan_existing(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }

    fn remove(&mut self, record: &Record) -> Result<()> {
        let position = self
            .records
            .iter()
            .position(|r| r == record)
            .or_else(|| {
                let slug = record_slug(record)?;
                self.records.iter().position(|r| record_slug(r) == Some(slug))
            })
            .ok_or_else(|| CorpusError::store("record to remove is not stored"))?;
        self.records.remove(position);
        Ok(())
    }
}

/// Store backed by a JSON array in a single file
///
/// Changes are held in memory until [`DocumentStore::flush`], which replaces
/// the file atomically.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    dirty: bool,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file starts empty
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<Record>>(&text)?
            }
        } else {
            Vec::new()
        };
        debug!("Opened store {} with {} records", path.display(), records.len());

        Ok(Self {
            path,
            inner: MemoryStore::from_records(records),
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        self.inner.records()
    }
}

impl DocumentStore for JsonFileStore {
    fn upsert(&mut self, slug: &str, record: Record) -> Result<()> {
        self.dirty = true;
        self.inner.upsert(slug, record)
    }

    fn scan_existing(&self) -> Result<Vec<Record>> {
        self.inner.scan_existing()
    }

    fn remove(&mut self, record: &Record) -> Result<()> {
        self.dirty = true;
        self.inner.remove(record)
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let content = serde_json::to_string_pretty(self.inner.records())?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_atomic(&self.path, &content)?;
        self.dirty = false;
        debug!("Wrote {} records to {}", self.inner.len(), self.path.display());
        Ok(())
    }
}
