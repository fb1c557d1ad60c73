use std::fmt;

use serde::{Deserialize, Serialize};

const IMAGE_BASE_URL: &str = "https://picsum.photos/seed";

/// Identifier of a product.
///
/// Locally stored catalogs number their products; remote collections use the
/// opaque document id handed out by the backend. Serialized untagged so the
/// local snapshot keeps plain numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Local(u64),
    Remote(String),
}

impl ProductId {
    pub fn as_local(&self) -> Option<u64> {
        match self {
            ProductId::Local(n) => Some(*n),
            ProductId::Remote(_) => None,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Local(n) => write!(f, "{}", n),
            ProductId::Remote(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId::Local(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::Remote(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::Remote(id)
    }
}

/// Represents a product in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub image_url: String,
}

impl Product {
    /// Builds a freshly created product, deriving its image from `id`.
    pub fn create(id: ProductId, payload: NewProduct) -> Self {
        let image_url = image_url_for(&id);
        Self {
            id,
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock: payload.stock,
            image_url,
        }
    }

    /// Replaces every mutable field. `id` and `image_url` are left alone.
    pub fn apply(&mut self, update: ProductUpdate) {
        self.name = update.name;
        self.description = update.description;
        self.price = update.price;
        self.stock = update.stock;
    }

    /// Stock after applying `delta`, floored at zero.
    pub fn stock_after(&self, delta: i64) -> u32 {
        let next = i64::from(self.stock).saturating_add(delta);
        next.clamp(0, i64::from(u32::MAX)) as u32
    }
}

/// Payload for creating a new product. The id and image are assigned on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64, stock: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            stock,
        }
    }
}

/// Payload for replacing the mutable fields of an existing product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
}

/// Image URL for a product, a pure function of its id.
pub fn image_url_for(id: &ProductId) -> String {
    image_url_for_seed(&id.to_string())
}

pub fn image_url_for_seed(seed: &str) -> String {
    format!("{}/{}/400/300", IMAGE_BASE_URL, seed)
}

/// The catalog used when no usable local snapshot exists.
pub fn seed_products() -> Vec<Product> {
    let seed = |id: u64, name: &str, description: &str, price: f64, stock: u32, image_seed: &str| Product {
        id: ProductId::Local(id),
        name: name.to_string(),
        description: description.to_string(),
        price,
        stock,
        image_url: image_url_for_seed(image_seed),
    };

    vec![
        seed(1, "Lavandina", "Botella de 1L", 150.0, 50, "lavandina"),
        seed(2, "Detergente", "Botella de 500ml", 120.5, 40, "detergente"),
        seed(3, "Limpiador Multiuso", "Aerosol de 750ml", 200.0, 60, "limpiador"),
        seed(4, "Bolsas de Residuos", "Paquete de 20 unidades", 80.0, 100, "bolsas"),
    ]
}
