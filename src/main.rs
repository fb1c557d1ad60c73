use std::sync::Arc;

use stock_control::app_system::{setup_tracing, InventoryConfig, InventorySystem};
use stock_control::confirm::Answer;
use stock_control::domain::ProductForm;
use stock_control::quotes::{HttpQuoteSource, QuoteFeed, QuoteState};
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = InventoryConfig::from_env();
    info!(backend = ?config.backend, "Starting stock control");

    let system = InventorySystem::open(&config).map_err(|e| e.to_string())?;
    let inventory = system.inventory.clone();

    let quotes = config.quotes_enabled.then(|| {
        QuoteFeed::spawn(
            Arc::new(HttpQuoteSource::new(config.quotes_url.clone())),
            config.quotes_interval,
        )
    });

    let view = inventory
        .wait_for(|v| v.is_ready())
        .await
        .map_err(|e| e.to_string())?;
    info!(count = view.products.len(), "Inventory ready");

    let form = ProductForm::new("Trapo de piso", "Algodón, gris", "85.5", "30");
    let span = tracing::info_span!("product_creation");
    let product_id = async {
        info!("Adding product from form");
        let product = form.into_new_product().map_err(|e| e.to_string())?;
        inventory.add(product).await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    info!(product_id = %product_id, "Product added");

    // Remote writes show up once the change feed echoes them back.
    inventory
        .wait_for(|v| v.products.iter().any(|p| p.id == product_id))
        .await
        .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("stock_adjustment");
    async {
        inventory.adjust_stock(product_id.clone(), 5).await?;
        inventory.adjust_stock(product_id.clone(), -40).await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    inventory.set_search_term("trapo").await.map_err(|e| e.to_string())?;
    match inventory.filtered().await {
        Ok(matches) => {
            for product in &matches {
                info!(id = %product.id, name = %product.name, stock = product.stock, "Search match");
            }
        }
        Err(e) => error!(error = %e, "Search failed"),
    }
    inventory.set_search_term("").await.map_err(|e| e.to_string())?;

    match inventory.remove(product_id.clone(), &Answer(true)).await {
        Ok(true) => info!(product_id = %product_id, "Product removed"),
        Ok(false) => info!(product_id = %product_id, "Removal cancelled"),
        Err(e) => error!(error = %e, "Removal failed"),
    }

    if let Some(handle) = quotes {
        let mut state = handle.watch();
        let _ = tokio::time::timeout(std::time::Duration::from_secs(5), state.changed()).await;
        match handle.current() {
            QuoteState::Available(board) => {
                if let Some(official) = board.official {
                    info!(buy = ?official.buy, sell = ?official.sell, "Official dollar");
                }
                if let Some(blue) = board.blue {
                    info!(buy = ?blue.buy, sell = ?blue.sell, "Blue dollar");
                }
            }
            QuoteState::Unavailable => warn!("Exchange rates unavailable"),
            QuoteState::Loading => warn!("Exchange rates still loading"),
        }
        handle.stop().await;
    }

    let view = inventory.view();
    info!(count = view.products.len(), revision = view.revision, "Final inventory");

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Stock control finished");
    Ok(())
}
