#[macro_use]
mod macros;

pub mod inventory_client;

pub use inventory_client::InventoryClient;
