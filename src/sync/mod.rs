//! Keeps the in-memory catalog and the durable copy in step.
//!
//! Remote variant: [`SyncBridge`] holds the single subscription to the
//! backend and feeds every full snapshot into the inventory actor.
//! Local variant: [`write_through`] mirrors the collection after each mutation.
//! Remote writes go through the ordered writer owned by
//! [`RemoteStore`](crate::store::RemoteStore).

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::InventoryClient;
use crate::domain::Product;
use crate::store::{LocalStore, ProductFeed, RemoteStore, StoreError};

/// Persists the full collection, reporting failure without propagating it.
pub fn write_through(store: &LocalStore, products: &[Product]) {
    match store.persist(products) {
        Ok(()) => debug!(product_count = products.len(), "Snapshot written"),
        Err(e) => error!(error = %e, "Failed to persist products snapshot"),
    }
}

/// Forwards the remote change feed into the inventory.
pub struct SyncBridge {
    feed: ProductFeed,
    client: InventoryClient,
    stop: oneshot::Receiver<()>,
}

/// Owner-side handle of a running bridge.
pub struct BridgeHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SyncBridge {
    /// Opens the one subscription this bridge will ever hold.
    pub fn mount(store: &RemoteStore, client: InventoryClient) -> Result<(Self, oneshot::Sender<()>), StoreError> {
        let feed = store.subscribe()?;
        let (stop_tx, stop) = oneshot::channel();
        Ok((Self { feed, client, stop }, stop_tx))
    }

    /// Mounts the bridge and runs it on its own task.
    pub fn spawn(store: &RemoteStore, client: InventoryClient) -> Result<BridgeHandle, StoreError> {
        let (bridge, stop) = Self::mount(store, client)?;
        let task = tokio::spawn(bridge.run());
        Ok(BridgeHandle { stop, task })
    }

    #[instrument(name = "sync_bridge", skip(self))]
    pub async fn run(mut self) {
        info!("SyncBridge mounted");

        loop {
            tokio::select! {
                biased;
                _ = &mut self.stop => {
                    debug!("Unmount requested");
                    break;
                }
                snapshot = self.feed.next() => match snapshot {
                    Some(products) => {
                        debug!(product_count = products.len(), "Applying snapshot");
                        if let Err(e) = self.client.replace_all(products).await {
                            error!(error = %e, "Inventory unavailable, stopping bridge");
                            break;
                        }
                    }
                    None => {
                        warn!("Change feed ended");
                        break;
                    }
                }
            }
        }

        self.feed.unsubscribe();
        info!("SyncBridge unmounted");
    }
}

impl BridgeHandle {
    /// Stops the bridge and waits until it has unsubscribed.
    pub async fn unmount(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            error!(error = ?e, "SyncBridge task failed");
        }
    }
}
