//! Local durable snapshot of the product collection.
//!
//! The whole collection lives under one key as a JSON array. It is read once
//! at startup and rewritten in full after every mutation.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, instrument, warn};

use super::StoreError;
use crate::domain::{seed_products, Product};

/// Keyed durable storage holding serialized snapshots.
pub trait SnapshotStorage: Send + 'static {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes a sibling temp file and renames it over the snapshot, so a
    /// failed write leaves the previous snapshot intact.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

/// In-process storage. Clones share the same map, so a clone outlives a
/// restarted system.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("storage quota exceeded".to_string()));
        }
        self.insert(key, value);
        Ok(())
    }
}

/// Local variant of the product store adapter.
pub struct LocalStore {
    storage: Box<dyn SnapshotStorage>,
    key: String,
}

impl LocalStore {
    pub fn new(storage: impl SnapshotStorage, key: impl Into<String>) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.into(),
        }
    }

    /// Reads the snapshot, falling back to the seed catalog when it is
    /// missing, empty or malformed.
    #[instrument(name = "local_store_load", skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Vec<Product> {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                info!("No stored snapshot, using seed catalog");
                return seed_products();
            }
            Err(e) => {
                error!(error = %e, "Failed to read snapshot, using seed catalog");
                return seed_products();
            }
        };

        match serde_json::from_str::<Vec<Product>>(&raw) {
            Ok(products) => {
                debug!(product_count = products.len(), "Snapshot loaded");
                products
            }
            Err(e) => {
                warn!(error = %e, "Malformed snapshot discarded, using seed catalog");
                seed_products()
            }
        }
    }

    /// Rewrites the full collection.
    pub fn persist(&self, products: &[Product]) -> Result<(), StoreError> {
        let json = serde_json::to_string(products)?;
        self.storage.write(&self.key, &json)
    }
}
