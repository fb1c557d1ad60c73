//! Raw product form input and its validation.
//!
//! Presentation collects every field as text; nothing reaches the inventory
//! until the form parses into a [`NewProduct`] or [`ProductUpdate`].

use thiserror::Error;

use super::product::{NewProduct, Product, ProductId, ProductUpdate};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Por favor, complete al menos nombre, precio y stock.")]
    MissingRequired,
    #[error("Precio inválido: {0}")]
    InvalidPrice(String),
    #[error("Stock inválido: {0}")]
    InvalidStock(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
}

impl ProductForm {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<String>,
        stock: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price: price.into(),
            stock: stock.into(),
        }
    }

    /// Prefills the form for editing an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
        }
    }

    pub fn into_new_product(self) -> Result<NewProduct, ValidationError> {
        let (price, stock) = self.parse_numbers()?;
        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price,
            stock,
        })
    }

    pub fn into_update(self, id: ProductId) -> Result<ProductUpdate, ValidationError> {
        let (price, stock) = self.parse_numbers()?;
        Ok(ProductUpdate {
            id,
            name: self.name,
            description: self.description,
            price,
            stock,
        })
    }

    fn parse_numbers(&self) -> Result<(f64, u32), ValidationError> {
        let price = self.price.trim();
        let stock = self.stock.trim();
        if self.name.trim().is_empty() || price.is_empty() || stock.is_empty() {
            return Err(ValidationError::MissingRequired);
        }

        let price = parse_price(price)?;
        let stock: i64 = stock
            .parse()
            .map_err(|_| ValidationError::InvalidStock(stock.to_string()))?;
        let stock = stock.clamp(0, i64::from(u32::MAX)) as u32;

        Ok((price, stock))
    }
}

fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let price: f64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidPrice(raw.to_string()))?;
    check_price(price)?;
    Ok(price)
}

pub(crate) fn check_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidPrice(price.to_string()))
    }
}

/// Checks a payload built outside of a form.
pub(crate) fn check_fields(name: &str, price: f64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingRequired);
    }
    check_price(price)
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.name, self.price)
    }
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.name, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_rejected() {
        for form in [
            ProductForm::new("", "d", "10", "5"),
            ProductForm::new("X", "d", "", "5"),
            ProductForm::new("X", "d", "10", "  "),
        ] {
            assert_eq!(form.into_new_product(), Err(ValidationError::MissingRequired));
        }
    }

    #[test]
    fn test_valid_form() {
        let product = ProductForm::new("X", "", "10", "5").into_new_product().unwrap();
        assert_eq!(product, NewProduct::new("X", "", 10.0, 5));
    }

    #[test]
    fn test_bad_numbers() {
        assert!(matches!(
            ProductForm::new("X", "", "ten", "5").into_new_product(),
            Err(ValidationError::InvalidPrice(_))
        ));
        assert!(matches!(
            ProductForm::new("X", "", "-1", "5").into_new_product(),
            Err(ValidationError::InvalidPrice(_))
        ));
        assert!(matches!(
            ProductForm::new("X", "", "1", "2.5").into_new_product(),
            Err(ValidationError::InvalidStock(_))
        ));
    }

    #[test]
    fn test_negative_stock_clamps() {
        let product = ProductForm::new("X", "", "1", "-3").into_new_product().unwrap();
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_edit_prefill_round_trip() {
        let existing = Product::create(ProductId::Local(2), NewProduct::new("Detergente", "Botella", 120.5, 40));
        let update = ProductForm::from_product(&existing).into_update(existing.id.clone()).unwrap();
        assert_eq!(update.name, "Detergente");
        assert_eq!(update.price, 120.5);
        assert_eq!(update.stock, 40);
        assert_eq!(update.id, ProductId::Local(2));
    }
}
