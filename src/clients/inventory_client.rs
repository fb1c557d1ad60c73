use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument};

use crate::confirm::{Confirm, DELETE_PROMPT};
use crate::domain::{NewProduct, Product, ProductId, ProductUpdate};
use crate::inventory::{InventoryError, InventoryRequest, InventoryView, Phase};

/// Handle for talking to the inventory actor.
///
/// Presentation code holds one of these: it reads the current view and
/// sends intents. It never mutates the collection itself.
#[derive(Clone)]
pub struct InventoryClient {
    sender: mpsc::Sender<InventoryRequest>,
    view: watch::Receiver<InventoryView>,
}

impl InventoryClient {
    pub fn new(sender: mpsc::Sender<InventoryRequest>, view: watch::Receiver<InventoryView>) -> Self {
        Self { sender, view }
    }

    /// Latest published view.
    pub fn view(&self) -> InventoryView {
        self.view.borrow().clone()
    }

    /// Receiver that is notified on every republish.
    pub fn watch(&self) -> watch::Receiver<InventoryView> {
        self.view.clone()
    }

    /// Waits until the published view satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&InventoryView) -> bool,
    ) -> Result<InventoryView, InventoryError> {
        let mut view = self.view.clone();
        let result = view.wait_for(predicate).await.map(|v| v.clone());
        result.map_err(|_| InventoryError::ActorCommunicationError("View channel closed".to_string()))
    }

    /// Deletes a product once the user confirms. Returns whether the delete
    /// was issued; a cancelled confirmation sends nothing.
    #[instrument(skip(self, confirm))]
    pub async fn remove(&self, id: ProductId, confirm: &impl Confirm) -> Result<bool, InventoryError> {
        if !confirm.confirm(DELETE_PROMPT) {
            info!("Deletion cancelled");
            return Ok(false);
        }
        self.remove_confirmed(id).await?;
        Ok(true)
    }

    pub async fn shutdown(&self) -> Result<(), InventoryError> {
        debug!("Sending shutdown");
        self.sender
            .send(InventoryRequest::Shutdown)
            .await
            .map_err(|_| InventoryError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(InventoryClient => pub fn add(product: NewProduct) -> ProductId as InventoryRequest::Add);
client_method!(InventoryClient => pub fn adjust_stock(id: ProductId, delta: i64) -> () as InventoryRequest::AdjustStock);
client_method!(InventoryClient => pub fn update(update: ProductUpdate) -> () as InventoryRequest::Update);
client_method!(InventoryClient => fn remove_confirmed(id: ProductId) -> () as InventoryRequest::Remove);
client_method!(InventoryClient => pub(crate) fn replace_all(products: Vec<Product>) -> () as InventoryRequest::ReplaceAll);
client_method!(InventoryClient => pub fn get(id: ProductId) -> Option<Product> as InventoryRequest::GetProduct);
client_method!(InventoryClient => pub fn products() -> Vec<Product> as InventoryRequest::ListProducts);
client_method!(InventoryClient => pub fn filtered() -> Vec<Product> as InventoryRequest::ListFiltered);
client_method!(InventoryClient => pub fn phase() -> Phase as InventoryRequest::GetPhase);

impl InventoryClient {
    /// Sets the search term the filtered view is derived from.
    pub async fn set_search_term(&self, term: impl Into<String>) -> Result<(), InventoryError> {
        self.search(term.into()).await
    }
}

client_method!(InventoryClient => fn search(term: String) -> () as InventoryRequest::SetSearchTerm);
