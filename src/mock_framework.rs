//! # Mock Framework
//!
//! Utilities for testing code that talks to the inventory through an
//! [`InventoryClient`] without running an [`InventoryActor`](crate::inventory::InventoryActor).
//!
//! Use [`create_mock_client`] to get a client and the receiver its requests
//! land on, then assert with helpers like [`expect_add`] or [`expect_remove`].

use tokio::sync::{mpsc, watch};

use crate::clients::InventoryClient;
use crate::domain::{NewProduct, Product, ProductId};
use crate::inventory::{InventoryRequest, InventoryView, Response};

/// Creates a mock client and a receiver for asserting requests.
///
/// The view channel is fixed at `view`; the mock never republishes.
pub fn create_mock_client(
    buffer_size: usize,
    view: InventoryView,
) -> (InventoryClient, mpsc::Receiver<InventoryRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (_view_tx, view_rx) = watch::channel(view);
    (InventoryClient::new(sender, view_rx), receiver)
}

/// Helper to verify that the next message is an Add request
pub async fn expect_add(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(NewProduct, Response<ProductId>)> {
    match receiver.recv().await {
        Some(InventoryRequest::Add { product, respond_to }) => Some((product, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an AdjustStock request
pub async fn expect_adjust_stock(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(ProductId, i64, Response<()>)> {
    match receiver.recv().await {
        Some(InventoryRequest::AdjustStock { id, delta, respond_to }) => Some((id, delta, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Remove request
pub async fn expect_remove(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(ProductId, Response<()>)> {
    match receiver.recv().await {
        Some(InventoryRequest::Remove { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a ReplaceAll request
pub async fn expect_replace_all(
    receiver: &mut mpsc::Receiver<InventoryRequest>,
) -> Option<(Vec<Product>, Response<()>)> {
    match receiver.recv().await {
        Some(InventoryRequest::ReplaceAll { products, respond_to }) => Some((products, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::Answer;
    use crate::inventory::InventoryError;
    use tokio::sync::mpsc::error::TryRecvError;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10, InventoryView::loading());

        let add_task = tokio::spawn(async move {
            client.add(NewProduct::new("X", "", 10.0, 5)).await
        });

        let (payload, responder) = expect_add(&mut receiver).await.expect("Expected Add request");
        assert_eq!(payload.name, "X");
        responder.send(Ok(ProductId::Local(1))).unwrap();

        let result = add_task.await.unwrap();
        assert_eq!(result, Ok(ProductId::Local(1)));
    }

    #[tokio::test]
    async fn test_cancelled_remove_sends_nothing() {
        let (client, mut receiver) = create_mock_client(10, InventoryView::loading());

        let removed = client.remove(ProductId::Local(1), &Answer(false)).await.unwrap();
        assert!(!removed);
        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));

        let task = tokio::spawn(async move { client.remove(ProductId::Local(1), &Answer(true)).await });
        let (id, responder) = expect_remove(&mut receiver).await.expect("Expected Remove request");
        assert_eq!(id, ProductId::Local(1));
        responder.send(Ok(())).unwrap();
        assert_eq!(task.await.unwrap(), Ok(true));
    }

    #[tokio::test]
    async fn test_remove_asks_in_spanish() {
        let (client, mut receiver) = create_mock_client(10, InventoryView::loading());
        let asked = std::sync::Mutex::new(Vec::new());

        let removed = client
            .remove(ProductId::Local(1), &|prompt: &str| {
                asked.lock().unwrap().push(prompt.to_string());
                false
            })
            .await
            .unwrap();

        assert!(!removed);
        assert_eq!(
            *asked.lock().unwrap(),
            ["¿Estás seguro de que deseas eliminar este producto?"]
        );
        assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_dropped_actor_reported() {
        let (client, receiver) = create_mock_client(10, InventoryView::loading());
        drop(receiver);

        let result = client.adjust_stock(ProductId::Local(1), -1).await;
        assert!(matches!(result, Err(InventoryError::ActorCommunicationError(_))));
    }

    #[tokio::test]
    async fn test_unanswered_request_reported() {
        let (client, mut receiver) = create_mock_client(10, InventoryView::loading());

        let task = tokio::spawn(async move { client.adjust_stock(ProductId::Local(1), -1).await });
        let (id, delta, responder) = expect_adjust_stock(&mut receiver).await.expect("Expected AdjustStock");
        assert_eq!((id, delta), (ProductId::Local(1), -1));
        drop(responder);

        assert!(matches!(task.await.unwrap(), Err(InventoryError::ActorCommunicationError(_))));
    }
}
