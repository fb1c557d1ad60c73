use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

use super::messages::{InventoryRequest, Response};
use super::{InventoryError, InventoryView, Phase};
use crate::clients::InventoryClient;
use crate::domain::{NewProduct, Product, ProductId, ProductUpdate};
use crate::query::filter_by_name;
use crate::store::{DocumentPatch, RemoteStore, RemoteWrite, StoreAdapter};
use crate::sync::write_through;

/// Owner of the canonical product collection.
///
/// All mutations are serialized through the mailbox, so the collection has a
/// single writer. Local stores are written through synchronously after each
/// change. Remote writes are dispatched in the background and the collection
/// only changes when the change feed delivers the backend's new state.
pub struct InventoryActor {
    receiver: mpsc::Receiver<InventoryRequest>,
    store: StoreAdapter,
    products: Vec<Product>,
    phase: Phase,
    search_term: String,
    /// Highest local id handed out this session, so deleted ids are not reused.
    last_local_id: u64,
    view: watch::Sender<InventoryView>,
}

impl InventoryActor {
    pub fn new(buffer_size: usize, store: StoreAdapter) -> (Self, InventoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (view, view_rx) = watch::channel(InventoryView::loading());

        let (products, phase) = match &store {
            StoreAdapter::Local(local) => (local.load(), Phase::Ready),
            StoreAdapter::Remote(_) => (Vec::new(), Phase::Loading),
        };
        let last_local_id = highest_local_id(&products);

        let actor = Self {
            receiver,
            store,
            products,
            phase,
            search_term: String::new(),
            last_local_id,
            view,
        };
        actor.persist_local();
        actor.publish();

        (actor, InventoryClient::new(sender, view_rx))
    }

    #[instrument(name = "inventory_service", skip(self), fields(backend = self.store.kind()))]
    pub async fn run(mut self) {
        info!("InventoryService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                InventoryRequest::Add { product, respond_to } => {
                    self.handle_add(product, respond_to);
                }
                InventoryRequest::AdjustStock { id, delta, respond_to } => {
                    self.handle_adjust_stock(id, delta, respond_to);
                }
                InventoryRequest::Update { update, respond_to } => {
                    self.handle_update(update, respond_to);
                }
                InventoryRequest::Remove { id, respond_to } => {
                    self.handle_remove(id, respond_to);
                }
                InventoryRequest::ReplaceAll { products, respond_to } => {
                    self.handle_replace_all(products, respond_to);
                }
                InventoryRequest::SetSearchTerm { term, respond_to } => {
                    self.search_term = term;
                    self.publish();
                    let _ = respond_to.send(Ok(()));
                }
                InventoryRequest::GetProduct { id, respond_to } => {
                    let product = self.position(&id).map(|i| self.products[i].clone());
                    let _ = respond_to.send(Ok(product));
                }
                InventoryRequest::ListProducts { respond_to } => {
                    let _ = respond_to.send(Ok(self.products.clone()));
                }
                InventoryRequest::ListFiltered { respond_to } => {
                    let _ = respond_to.send(Ok(filter_by_name(&self.products, &self.search_term)));
                }
                InventoryRequest::GetPhase { respond_to } => {
                    let _ = respond_to.send(Ok(self.phase));
                }
                InventoryRequest::Shutdown => {
                    info!("InventoryService shutting down");
                    break;
                }
            }
        }

        info!("InventoryService stopped");
    }

    #[instrument(fields(product_name = %product.name), skip(self, product, respond_to))]
    fn handle_add(&mut self, product: NewProduct, respond_to: Response<ProductId>) {
        debug!("Processing add request");

        if let Err(e) = product.validate() {
            warn!(error = %e, "Rejected product");
            let _ = respond_to.send(Err(e.into()));
            return;
        }

        let id = match self.remote() {
            None => {
                let highest = self.last_local_id.max(highest_local_id(&self.products));
                let Some(next) = highest.checked_add(1) else {
                    error!(highest, "Local id space exhausted");
                    let _ = respond_to.send(Err(InventoryError::IdSpaceExhausted));
                    return;
                };
                self.last_local_id = next;
                let id = ProductId::Local(next);
                self.products.push(Product::create(id.clone(), product));
                self.persist_local();
                self.publish();
                id
            }
            Some(remote) => {
                let (doc_id, doc) = remote.prepare(product);
                remote.submit(RemoteWrite::Create {
                    id: doc_id.clone(),
                    doc,
                });
                ProductId::Remote(doc_id)
            }
        };

        info!(product_id = %id, "Product added");
        let _ = respond_to.send(Ok(id));
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_adjust_stock(&mut self, id: ProductId, delta: i64, respond_to: Response<()>) {
        debug!("Processing adjust_stock request");

        let Some(index) = self.position(&id) else {
            debug!("Product not found, nothing to adjust");
            let _ = respond_to.send(Ok(()));
            return;
        };

        let stock = self.products[index].stock_after(delta);
        match self.remote() {
            None => {
                self.products[index].stock = stock;
                self.persist_local();
                self.publish();
            }
            Some(remote) => {
                remote.submit(RemoteWrite::Update {
                    id: id.to_string(),
                    patch: DocumentPatch::stock(stock),
                });
            }
        }

        info!(stock, "Stock adjusted");
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = %update.id), skip(self, update, respond_to))]
    fn handle_update(&mut self, update: ProductUpdate, respond_to: Response<()>) {
        debug!("Processing update request");

        if let Err(e) = update.validate() {
            warn!(error = %e, "Rejected update");
            let _ = respond_to.send(Err(e.into()));
            return;
        }

        let Some(index) = self.position(&update.id) else {
            debug!("Product not found, nothing to update");
            let _ = respond_to.send(Ok(()));
            return;
        };

        match self.remote() {
            None => {
                self.products[index].apply(update);
                self.persist_local();
                self.publish();
            }
            Some(remote) => {
                remote.submit(RemoteWrite::Update {
                    id: update.id.to_string(),
                    patch: DocumentPatch::from(update),
                });
            }
        }

        info!("Product updated");
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_remove(&mut self, id: ProductId, respond_to: Response<()>) {
        debug!("Processing remove request");

        let Some(index) = self.position(&id) else {
            debug!("Product not found, nothing to remove");
            let _ = respond_to.send(Ok(()));
            return;
        };

        match self.remote() {
            None => {
                self.products.remove(index);
                self.persist_local();
                self.publish();
            }
            Some(remote) => remote.submit(RemoteWrite::Delete { id: id.to_string() }),
        }

        info!("Product removed");
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(product_count = products.len()), skip(self, products, respond_to))]
    fn handle_replace_all(&mut self, products: Vec<Product>, respond_to: Response<()>) {
        debug!("Applying full snapshot");

        self.products = products;
        if self.phase == Phase::Loading {
            info!("Inventory ready");
        }
        self.phase = Phase::Ready;
        self.persist_local();
        self.publish();

        let _ = respond_to.send(Ok(()));
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.products.iter().position(|p| &p.id == id)
    }

    fn remote(&self) -> Option<RemoteStore> {
        match &self.store {
            StoreAdapter::Remote(remote) => Some(remote.clone()),
            StoreAdapter::Local(_) => None,
        }
    }

    fn persist_local(&self) {
        if let StoreAdapter::Local(local) = &self.store {
            write_through(local, &self.products);
        }
    }

    fn publish(&self) {
        let filtered = filter_by_name(&self.products, &self.search_term);
        self.view.send_modify(|view| {
            view.phase = self.phase;
            view.products = self.products.clone();
            view.search_term = self.search_term.clone();
            view.filtered = filtered;
            view.revision += 1;
        });
    }
}

fn highest_local_id(products: &[Product]) -> u64 {
    products.iter().filter_map(|p| p.id.as_local()).max().unwrap_or(0)
}
