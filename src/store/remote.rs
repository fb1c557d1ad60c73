//! Remote variant of the product store adapter.
//!
//! The backend is a live-synced document collection shared by many writers.
//! Reads only ever arrive through a subscription that delivers the full
//! collection on every change; writes are independent per-document requests.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

use super::StoreError;
use crate::domain::{NewProduct, Product, ProductId, ProductUpdate};

/// Fields stored in a product document. The document id is the product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub image_url: String,
}

/// Partial write to a product document. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl DocumentPatch {
    pub fn stock(stock: u32) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, doc: &mut ProductDocument) {
        if let Some(name) = &self.name {
            doc.name = name.clone();
        }
        if let Some(description) = &self.description {
            doc.description = description.clone();
        }
        if let Some(price) = self.price {
            doc.price = price;
        }
        if let Some(stock) = self.stock {
            doc.stock = stock;
        }
    }
}

impl From<ProductUpdate> for DocumentPatch {
    fn from(update: ProductUpdate) -> Self {
        Self {
            name: Some(update.name),
            description: Some(update.description),
            price: Some(update.price),
            stock: Some(update.stock),
        }
    }
}

/// A document together with its backend-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: ProductDocument,
}

impl From<Document> for Product {
    fn from(doc: Document) -> Self {
        Product {
            id: ProductId::Remote(doc.id),
            name: doc.fields.name,
            description: doc.fields.description,
            price: doc.fields.price,
            stock: doc.fields.stock,
            image_url: doc.fields.image_url,
        }
    }
}

/// Cancellation handle for a backend subscription.
///
/// The cancel hook runs exactly once: either through [`Subscription::unsubscribe`]
/// or, as a fallback, when the handle is dropped.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            warn!("Subscription dropped without unsubscribe, releasing listener");
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Capability set of a remote document collection backend.
#[async_trait]
pub trait DocumentBackend: Send + Sync + 'static {
    /// Registers a listener. The current collection is delivered right away,
    /// then again after every change from any writer.
    fn subscribe(
        &self,
        collection: &str,
    ) -> Result<(Subscription, mpsc::UnboundedReceiver<Vec<Document>>), StoreError>;

    /// Reserves a fresh document id without writing anything.
    fn new_document_id(&self, collection: &str) -> String;

    async fn create(&self, collection: &str, id: &str, doc: ProductDocument) -> Result<(), StoreError>;

    async fn patch(&self, collection: &str, id: &str, patch: DocumentPatch) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Releases backend resources. Later requests fail with [`StoreError::Closed`].
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Connection settings for the remote collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub project_id: String,
    pub collection: String,
}

impl RemoteConfig {
    pub fn new(project_id: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            collection: collection.into(),
        }
    }
}

/// Stream of full-collection snapshots plus the handle that stops it.
#[derive(Debug)]
pub struct ProductFeed {
    subscription: Subscription,
    receiver: mpsc::UnboundedReceiver<Vec<Document>>,
}

impl ProductFeed {
    /// Next snapshot, or `None` once the backend stops delivering.
    pub async fn next(&mut self) -> Option<Vec<Product>> {
        let docs = self.receiver.recv().await?;
        Some(docs.into_iter().map(Product::from).collect())
    }

    pub fn unsubscribe(self) {
        self.subscription.unsubscribe();
    }
}

/// A write queued for the background writer.
#[derive(Debug)]
pub enum RemoteWrite {
    Create { id: String, doc: ProductDocument },
    Update { id: String, patch: DocumentPatch },
    Delete { id: String },
}

impl RemoteWrite {
    fn op(&self) -> &'static str {
        match self {
            RemoteWrite::Create { .. } => "create",
            RemoteWrite::Update { .. } => "update",
            RemoteWrite::Delete { .. } => "delete",
        }
    }

    fn product_id(&self) -> &str {
        match self {
            RemoteWrite::Create { id, .. } | RemoteWrite::Update { id, .. } | RemoteWrite::Delete { id } => id,
        }
    }
}

enum WriterCommand {
    Write(RemoteWrite),
    Flush(oneshot::Sender<()>),
}

/// Remote product store. Cheap to clone; all clones share one backend and
/// one writer, so queued writes reach the backend in submission order.
#[derive(Clone)]
pub struct RemoteStore {
    backend: Arc<dyn DocumentBackend>,
    config: RemoteConfig,
    writer: mpsc::UnboundedSender<WriterCommand>,
}

impl RemoteStore {
    /// Binds an injected backend to the configured collection and starts
    /// its writer task. Must be called inside a tokio runtime.
    #[instrument(name = "remote_store_open", skip(backend))]
    pub fn open(config: RemoteConfig, backend: Arc<dyn DocumentBackend>) -> Self {
        info!("Opening remote product store");
        let (writer, commands) = mpsc::unbounded_channel();
        let span = info_span!("remote_writer", collection = %config.collection);
        tokio::spawn(run_writer(Arc::clone(&backend), config.collection.clone(), commands).instrument(span));
        Self { backend, config, writer }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    pub fn subscribe(&self) -> Result<ProductFeed, StoreError> {
        let (subscription, receiver) = self.backend.subscribe(&self.config.collection)?;
        debug!(collection = %self.config.collection, "Subscribed to product collection");
        Ok(ProductFeed { subscription, receiver })
    }

    /// Reserves an id and returns the fully formed document to write.
    pub fn prepare(&self, payload: NewProduct) -> (String, ProductDocument) {
        let id = self.backend.new_document_id(&self.config.collection);
        let product = Product::create(ProductId::Remote(id.clone()), payload);
        let doc = ProductDocument {
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
        };
        (id, doc)
    }

    /// Queues a write and returns at once. The outcome is only logged.
    pub fn submit(&self, write: RemoteWrite) {
        let op = write.op();
        if self.writer.send(WriterCommand::Write(write)).is_err() {
            error!(op, "Remote writer stopped, write dropped");
        }
    }

    /// Waits until every write submitted before this call has been attempted.
    pub async fn flush(&self) {
        let (done, flushed) = oneshot::channel();
        if self.writer.send(WriterCommand::Flush(done)).is_ok() {
            let _ = flushed.await;
        }
    }

    pub async fn create(&self, id: &str, doc: ProductDocument) -> Result<(), StoreError> {
        self.backend.create(&self.config.collection, id, doc).await
    }

    pub async fn update(&self, id: &str, patch: DocumentPatch) -> Result<(), StoreError> {
        self.backend.patch(&self.config.collection, id, patch).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.backend.delete(&self.config.collection, id).await
    }

    /// Drains queued writes, then closes the backend.
    #[instrument(name = "remote_store_close", skip(self), fields(collection = %self.config.collection))]
    pub async fn close(&self) -> Result<(), StoreError> {
        self.flush().await;
        info!("Closing remote product store");
        self.backend.close().await
    }
}

async fn run_writer(
    backend: Arc<dyn DocumentBackend>,
    collection: String,
    mut commands: mpsc::UnboundedReceiver<WriterCommand>,
) {
    debug!("Remote writer started");
    while let Some(command) = commands.recv().await {
        let write = match command {
            WriterCommand::Write(write) => write,
            WriterCommand::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };

        let op = write.op();
        let product_id = write.product_id().to_string();
        let result = match write {
            RemoteWrite::Create { id, doc } => backend.create(&collection, &id, doc).await,
            RemoteWrite::Update { id, patch } => backend.patch(&collection, &id, patch).await,
            RemoteWrite::Delete { id } => backend.delete(&collection, &id).await,
        };
        match result {
            Ok(()) => debug!(op, product_id = %product_id, "Remote write acknowledged"),
            Err(e) => error!(op, product_id = %product_id, error = %e, "Remote write failed"),
        }
    }
    debug!("Remote writer stopped");
}
