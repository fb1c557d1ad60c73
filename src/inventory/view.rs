use crate::domain::Product;

/// Lifecycle of the inventory as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No read or subscription snapshot has arrived yet.
    Loading,
    Ready,
}

/// Derived state republished after every change, for presentation to render.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryView {
    pub phase: Phase,
    pub products: Vec<Product>,
    pub search_term: String,
    pub filtered: Vec<Product>,
    /// Bumped on every publish.
    pub revision: u64,
}

impl InventoryView {
    pub fn loading() -> Self {
        Self {
            phase: Phase::Loading,
            products: Vec::new(),
            search_term: String::new(),
            filtered: Vec::new(),
            revision: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// The filtered products, or `None` while product data must not be shown.
    pub fn visible(&self) -> Option<&[Product]> {
        match self.phase {
            Phase::Ready => Some(&self.filtered),
            Phase::Loading => None,
        }
    }
}

impl Default for InventoryView {
    fn default() -> Self {
        Self::loading()
    }
}
