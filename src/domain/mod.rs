pub mod form;
pub mod product;

pub use form::*;
pub use product::*;
