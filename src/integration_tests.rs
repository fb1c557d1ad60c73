#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::app_system::{BackendKind, InventoryConfig, InventorySystem};
    use crate::confirm::Answer;
    use crate::domain::{NewProduct, ProductForm, ProductId, ProductUpdate};
    use crate::inventory::{InventoryError, InventoryView, Phase};
    use crate::mock_framework::{create_mock_client, expect_replace_all};
    use crate::store::{DocumentBackend, MemoryCollection, MemoryStorage, RemoteConfig, RemoteStore};
    use crate::sync::SyncBridge;

    fn config() -> InventoryConfig {
        InventoryConfig {
            quotes_enabled: false,
            ..InventoryConfig::default()
        }
    }

    #[tokio::test]
    async fn test_local_state_survives_restart() {
        let storage = MemoryStorage::new();

        let system = InventorySystem::local(&config(), storage.clone());
        let inventory = system.inventory.clone();
        let id = inventory.add(NewProduct::new("Esponja", "Pack x3", 45.0, 12)).await.unwrap();
        inventory.adjust_stock(ProductId::Local(1), -60).await.unwrap();
        inventory.remove(ProductId::Local(2), &Answer(true)).await.unwrap();
        let before = inventory.products().await.unwrap();
        system.shutdown().await.unwrap();

        let restarted = InventorySystem::local(&config(), storage);
        let after = restarted.inventory.products().await.unwrap();
        assert_eq!(after, before);
        assert_eq!(after.last().unwrap().id, id);
        assert_eq!(after[0].stock, 0);
        restarted.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_local_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = config().with_data_dir(dir.path());

        let system = InventorySystem::open(&config).unwrap();
        system.inventory.adjust_stock(ProductId::Local(3), 7).await.unwrap();
        let before = system.inventory.products().await.unwrap();
        system.shutdown().await.unwrap();

        assert!(dir.path().join("products.json").exists());
        let reopened = InventorySystem::open(&config).unwrap();
        assert_eq!(reopened.inventory.products().await.unwrap(), before);
        reopened.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_form_validation_blocks_add() {
        let system = InventorySystem::local(&config(), MemoryStorage::new());

        let form = ProductForm::new("Escoba", "", "", "3");
        let error = form.into_new_product().unwrap_err();
        assert_eq!(error.to_string(), "Por favor, complete al menos nombre, precio y stock.");
        assert_eq!(system.inventory.products().await.unwrap().len(), 4);

        let product = ProductForm::new("Escoba", "", "99.9", "3").into_new_product().unwrap();
        let id = system.inventory.add(product).await.unwrap();
        assert_eq!(id, ProductId::Local(5));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_remote_clients_share_state() {
        let backend = MemoryCollection::new();
        let config = config().with_backend(BackendKind::Remote);

        let first = InventorySystem::remote(&config, Arc::new(backend.connect())).unwrap();
        let second = InventorySystem::remote(&config, Arc::new(backend.connect())).unwrap();
        first.inventory.wait_for(|v| v.is_ready()).await.unwrap();

        let id = first.inventory.add(NewProduct::new("Lavandina", "Botella de 1L", 150.0, 50)).await.unwrap();
        assert!(matches!(id, ProductId::Remote(_)));

        // The writer sees its own write only through the subscription round trip.
        let view = second.inventory.wait_for(|v| v.products.len() == 1).await.unwrap();
        assert_eq!(view.products[0].id, id);
        first.inventory.wait_for(|v| v.products.len() == 1).await.unwrap();

        second.inventory.adjust_stock(id.clone(), -60).await.unwrap();
        let view = first.inventory.wait_for(|v| v.products.first().map(|p| p.stock) == Some(0)).await.unwrap();
        assert_eq!(view.products[0].name, "Lavandina");

        first
            .inventory
            .update(ProductUpdate {
                id: id.clone(),
                name: "Lavandina Premium".into(),
                description: "Botella de 2L".into(),
                price: 210.0,
                stock: 20,
            })
            .await
            .unwrap();
        let view = second
            .inventory
            .wait_for(|v| v.products.first().map(|p| p.name.as_str()) == Some("Lavandina Premium"))
            .await
            .unwrap();
        assert_eq!(view.products[0].stock, 20);
        assert!(view.products[0].image_url.contains(&id.to_string()));

        assert!(!second.inventory.remove(id.clone(), &Answer(false)).await.unwrap());
        assert_eq!(backend.documents("products").len(), 1);

        assert!(second.inventory.remove(id, &Answer(true)).await.unwrap());
        first.inventory.wait_for(|v| v.products.is_empty()).await.unwrap();

        first.shutdown().await.unwrap();
        assert_eq!(backend.listener_count("products"), 1);
        second.shutdown().await.unwrap();
        assert_eq!(backend.listener_count("products"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_own_remote_writes_land_in_issue_order() {
        let backend = MemoryCollection::new();
        let system = InventorySystem::remote(&config(), Arc::new(backend.clone())).unwrap();
        let inventory = system.inventory.clone();

        let id = inventory.add(NewProduct::new("Lavandina", "", 150.0, 0)).await.unwrap();
        inventory.wait_for(|v| v.products.len() == 1).await.unwrap();

        for stock in 1..=50 {
            inventory
                .update(ProductUpdate {
                    id: id.clone(),
                    name: "Lavandina".into(),
                    description: String::new(),
                    price: 150.0,
                    stock,
                })
                .await
                .unwrap();
        }

        // Shutdown drains the write queue before closing the backend.
        system.shutdown().await.unwrap();
        assert_eq!(backend.documents("products")[0].fields.stock, 50);
    }

    #[tokio::test]
    async fn test_remote_write_failure_is_not_fatal() {
        let backend = MemoryCollection::new();
        let system = InventorySystem::remote(&config(), Arc::new(backend.clone())).unwrap();
        let inventory = system.inventory.clone();
        inventory.wait_for(|v| v.is_ready()).await.unwrap();

        backend.set_fail_writes(true);
        inventory.add(NewProduct::new("X", "", 1.0, 1)).await.unwrap();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(inventory.products().await.unwrap().is_empty());

        backend.set_fail_writes(false);
        inventory.add(NewProduct::new("Y", "", 1.0, 1)).await.unwrap();
        let view = inventory.wait_for(|v| v.products.len() == 1).await.unwrap();
        assert_eq!(view.products[0].name, "Y");

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_remote_validation_rejected_before_write() {
        let backend = MemoryCollection::new();
        let system = InventorySystem::remote(&config(), Arc::new(backend.clone())).unwrap();

        let result = system.inventory.add(NewProduct::new("", "", 1.0, 1)).await;
        assert!(matches!(result, Err(InventoryError::Validation(_))));
        tokio::task::yield_now().await;
        assert!(backend.documents("products").is_empty());

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_bridge_forwards_full_snapshots() {
        let backend = MemoryCollection::new();
        let store = RemoteStore::open(RemoteConfig::new("test", "products"), Arc::new(backend.clone()));
        let (client, mut receiver) = create_mock_client(10, InventoryView::loading());
        let bridge = SyncBridge::spawn(&store, client).unwrap();

        let (products, responder) = expect_replace_all(&mut receiver).await.expect("Expected initial snapshot");
        assert!(products.is_empty());
        responder.send(Ok(())).unwrap();

        let (id, doc) = store.prepare(NewProduct::new("A", "", 1.0, 1));
        backend.create("products", &id, doc).await.unwrap();
        let (products, responder) = expect_replace_all(&mut receiver).await.expect("Expected snapshot");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, ProductId::Remote(id));
        responder.send(Ok(())).unwrap();

        bridge.unmount().await;
        assert_eq!(backend.listener_count("products"), 0);
    }

    #[tokio::test]
    async fn test_loading_view_hides_products() {
        let backend = MemoryCollection::new();
        let store = RemoteStore::open(RemoteConfig::new("test", "products"), Arc::new(backend));
        let (actor, client) =
            crate::inventory::InventoryActor::new(10, crate::store::StoreAdapter::Remote(store));
        tokio::spawn(actor.run());

        let view = client.view();
        assert_eq!(view.phase, Phase::Loading);
        assert!(view.visible().is_none());
        client.shutdown().await.unwrap();
    }
}
