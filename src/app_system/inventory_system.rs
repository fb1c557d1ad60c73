use std::sync::Arc;

use tracing::{error, info, instrument};

use super::{BackendKind, InventoryConfig};
use crate::clients::InventoryClient;
use crate::inventory::{InventoryActor, InventoryError};
use crate::store::{
    DocumentBackend, FileStorage, LocalStore, MemoryCollection, RemoteConfig, RemoteStore,
    SnapshotStorage, StoreAdapter, StoreError,
};
use crate::sync::{BridgeHandle, SyncBridge};

/// Starts the inventory actor, wires the persistence backend and, for
/// remote backends, mounts the sync bridge. Tears everything down in
/// reverse order on shutdown.
pub struct InventorySystem {
    pub inventory: InventoryClient,
    remote: Option<RemoteStore>,
    bridge: Option<BridgeHandle>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl InventorySystem {
    /// Opens the backend named by `config`.
    ///
    /// The remote variant runs against an in-process [`MemoryCollection`];
    /// use [`InventorySystem::remote`] to inject another backend.
    pub fn open(config: &InventoryConfig) -> Result<Self, StoreError> {
        match config.backend {
            BackendKind::Local => Ok(Self::local(config, FileStorage::new(&config.data_dir))),
            BackendKind::Remote => Self::remote(config, Arc::new(MemoryCollection::new())),
        }
    }

    #[instrument(name = "inventory_system", skip(config, storage))]
    pub fn local(config: &InventoryConfig, storage: impl SnapshotStorage) -> Self {
        info!("Starting local inventory system");

        let store = LocalStore::new(storage, config.snapshot_key.clone());
        let (actor, inventory) = InventoryActor::new(config.channel_buffer, StoreAdapter::Local(store));
        let handle = tokio::spawn(actor.run());

        info!("Inventory system started");
        Self {
            inventory,
            remote: None,
            bridge: None,
            handles: vec![handle],
        }
    }

    #[instrument(name = "inventory_system", skip(config, backend))]
    pub fn remote(config: &InventoryConfig, backend: Arc<dyn DocumentBackend>) -> Result<Self, StoreError> {
        info!("Starting remote inventory system");

        let store = RemoteStore::open(
            RemoteConfig::new(config.project_id.clone(), config.collection.clone()),
            backend,
        );
        let (actor, inventory) =
            InventoryActor::new(config.channel_buffer, StoreAdapter::Remote(store.clone()));
        let handle = tokio::spawn(actor.run());

        let bridge = match SyncBridge::spawn(&store, inventory.clone()) {
            Ok(bridge) => bridge,
            Err(e) => {
                error!(error = %e, "Failed to subscribe to product collection");
                handle.abort();
                return Err(e);
            }
        };

        info!("Inventory system started");
        Ok(Self {
            inventory,
            remote: Some(store),
            bridge: Some(bridge),
            handles: vec![handle],
        })
    }

    /// Unmounts the sync bridge, stops the actor and closes the backend.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), InventoryError> {
        info!("Shutting down inventory system");

        if let Some(bridge) = self.bridge {
            bridge.unmount().await;
        }

        let _ = self.inventory.shutdown().await;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        if let Some(remote) = self.remote {
            if let Err(e) = remote.close().await {
                error!(error = %e, "Failed to close remote store");
            }
        }

        info!("Inventory system shutdown complete");
        Ok(())
    }
}
