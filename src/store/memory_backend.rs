//! In-process document backend.
//!
//! Behaves like a live-synced remote collection: several clients connect to
//! the same data, every write is broadcast as a full snapshot to all
//! listeners, and the last write to a field wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::remote::{Document, DocumentBackend, DocumentPatch, ProductDocument, Subscription};
use super::StoreError;

#[derive(Default)]
struct Collection {
    docs: Vec<Document>,
    listeners: HashMap<u64, mpsc::UnboundedSender<Vec<Document>>>,
}

impl Collection {
    fn broadcast(&mut self) {
        let snapshot = self.docs.clone();
        self.listeners.retain(|_, tx| tx.send(snapshot.clone()).is_ok());
    }
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Collection>,
    next_listener: u64,
}

/// Per-connection state: closing one connection leaves the others running.
#[derive(Default)]
struct Connection {
    closed: AtomicBool,
    listeners: Mutex<Vec<(String, u64)>>,
}

/// Shared in-memory document store.
///
/// Clones are the same connection; [`MemoryCollection::connect`] opens a new
/// connection to the same data.
#[derive(Clone, Default)]
pub struct MemoryCollection {
    inner: Arc<Mutex<Inner>>,
    fail_writes: Arc<AtomicBool>,
    connection: Arc<Connection>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            fail_writes: Arc::clone(&self.fail_writes),
            connection: Arc::new(Connection::default()),
        }
    }

    /// Rejects every write until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of live listeners on `collection`.
    pub fn listener_count(&self, collection: &str) -> usize {
        self.lock()
            .collections
            .get(collection)
            .map_or(0, |c| c.listeners.len())
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.lock()
            .collections
            .get(collection)
            .map(|c| c.docs.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_closed(&self) -> bool {
        self.connection.closed.load(Ordering::SeqCst)
    }

    fn writable(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        let inner = self.lock();
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected("permission denied".to_string()));
        }
        Ok(inner)
    }
}

#[async_trait]
impl DocumentBackend for MemoryCollection {
    fn subscribe(
        &self,
        collection: &str,
    ) -> Result<(Subscription, mpsc::UnboundedReceiver<Vec<Document>>), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        let mut inner = self.lock();
        let listener_id = inner.next_listener;
        inner.next_listener += 1;

        let (tx, rx) = mpsc::unbounded_channel();
        let entry = inner.collections.entry(collection.to_string()).or_default();
        let _ = tx.send(entry.docs.clone());
        entry.listeners.insert(listener_id, tx);
        drop(inner);
        self.connection
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((collection.to_string(), listener_id));
        debug!(collection, listener_id, "Listener registered");

        let shared = Arc::clone(&self.inner);
        let connection = Arc::clone(&self.connection);
        let name = collection.to_string();
        let subscription = Subscription::new(move || {
            connection
                .listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|(_, id)| *id != listener_id);
            let mut inner = shared.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(c) = inner.collections.get_mut(&name) {
                c.listeners.remove(&listener_id);
            }
            debug!(collection = %name, listener_id, "Listener removed");
        });

        Ok((subscription, rx))
    }

    fn new_document_id(&self, _collection: &str) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    async fn create(&self, collection: &str, id: &str, doc: ProductDocument) -> Result<(), StoreError> {
        let mut inner = self.writable()?;
        let entry = inner.collections.entry(collection.to_string()).or_default();
        match entry.docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.fields = doc,
            None => entry.docs.push(Document {
                id: id.to_string(),
                fields: doc,
            }),
        }
        entry.broadcast();
        Ok(())
    }

    async fn patch(&self, collection: &str, id: &str, patch: DocumentPatch) -> Result<(), StoreError> {
        let mut inner = self.writable()?;
        let entry = inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let doc = entry
            .docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply_to(&mut doc.fields);
        entry.broadcast();
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut inner = self.writable()?;
        if let Some(entry) = inner.collections.get_mut(collection) {
            let before = entry.docs.len();
            entry.docs.retain(|d| d.id != id);
            if entry.docs.len() != before {
                entry.broadcast();
            }
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.connection.closed.store(true, Ordering::SeqCst);
        let owned: Vec<(String, u64)> = std::mem::take(
            &mut *self.connection.listeners.lock().unwrap_or_else(|e| e.into_inner()),
        );
        let mut inner = self.lock();
        for (name, listener_id) in owned {
            if let Some(c) = inner.collections.get_mut(&name) {
                c.listeners.remove(&listener_id);
            }
        }
        Ok(())
    }
}
