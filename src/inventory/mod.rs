//! The inventory state manager: the single owner of the product catalog.

pub mod actor;
pub mod error;
pub mod messages;
pub mod view;

pub use actor::InventoryActor;
pub use error::*;
pub use messages::*;
pub use view::*;
