use thiserror::Error;

use crate::domain::ValidationError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Product validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("No local product id left to assign")]
    IdSpaceExhausted,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
