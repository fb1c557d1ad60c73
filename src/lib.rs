//! # stock-control
//!
//! Inventory state management for a small product catalog: add, edit and
//! delete products, adjust stock counts, and keep the catalog in sync with
//! either a local durable snapshot or a shared, live-synced document store.
//!
//! ## Layout
//!
//! - **Domain** - [`Product`](domain::Product), payloads and form validation → [`domain`]
//! - **State manager** - one actor owns the canonical collection → [`inventory::InventoryActor`]
//! - **Client** - cloneable handle that sends intents and reads the view → [`clients::InventoryClient`]
//! - **Store adapters** - local snapshot or remote document collection → [`store::StoreAdapter`]
//! - **Sync** - remote change feed into the actor, local write-through → [`sync`]
//! - **Query** - case-insensitive name filter → [`query::filter_by_name`]
//! - **System** - startup, wiring, graceful shutdown → [`app_system::InventorySystem`]
//!
//! ## Example
//!
//! ```no_run
//! # use stock_control::app_system::{InventoryConfig, InventorySystem};
//! # use stock_control::domain::NewProduct;
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let system = InventorySystem::open(&InventoryConfig::from_env())?;
//! let id = system.inventory.add(NewProduct::new("Esponja", "Pack x3", 45.0, 12)).await?;
//! system.inventory.adjust_stock(id, -2).await?;
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod app_system;
pub mod clients;
pub mod confirm;
pub mod domain;
pub mod inventory;
pub mod query;
pub mod quotes;
pub mod store;
pub mod sync;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;
