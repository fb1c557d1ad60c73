use tokio::sync::oneshot;

use super::{InventoryError, Phase};
use crate::domain::{NewProduct, Product, ProductId, ProductUpdate};

pub type Response<T> = oneshot::Sender<Result<T, InventoryError>>;

/// Typed messages for the inventory actor. Each variant carries its
/// parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum InventoryRequest {
    Add {
        product: NewProduct,
        respond_to: Response<ProductId>,
    },
    AdjustStock {
        id: ProductId,
        delta: i64,
        respond_to: Response<()>,
    },
    Update {
        update: ProductUpdate,
        respond_to: Response<()>,
    },
    /// Sent only after the user confirmed the deletion.
    Remove {
        id: ProductId,
        respond_to: Response<()>,
    },
    /// Full-replace snapshot from the remote change feed.
    ReplaceAll {
        products: Vec<Product>,
        respond_to: Response<()>,
    },
    SetSearchTerm {
        term: String,
        respond_to: Response<()>,
    },
    GetProduct {
        id: ProductId,
        respond_to: Response<Option<Product>>,
    },
    ListProducts {
        respond_to: Response<Vec<Product>>,
    },
    ListFiltered {
        respond_to: Response<Vec<Product>>,
    },
    GetPhase {
        respond_to: Response<Phase>,
    },
    Shutdown,
}
