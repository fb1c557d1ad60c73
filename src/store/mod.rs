//! Product store adapters: where the durable copy of the catalog lives.

pub mod error;
pub mod local;
pub mod memory_backend;
pub mod remote;

pub use error::*;
pub use local::{FileStorage, LocalStore, MemoryStorage, SnapshotStorage};
pub use memory_backend::MemoryCollection;
pub use remote::{
    Document, DocumentBackend, DocumentPatch, ProductDocument, ProductFeed, RemoteConfig,
    RemoteStore, RemoteWrite, Subscription,
};

/// The persistence backend behind the inventory.
pub enum StoreAdapter {
    /// Single writer, synchronous write-through to a durable snapshot.
    Local(LocalStore),
    /// Multi-writer document collection observed through a subscription.
    Remote(RemoteStore),
}

impl StoreAdapter {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreAdapter::Local(_) => "local",
            StoreAdapter::Remote(_) => "remote",
        }
    }
}
