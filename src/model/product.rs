use serde_json::{Number, Value};

use super::{Model, ProductId};
use crate::document::{strip_id, Fields};

pub struct Product;

impl Model for Product {
    const COLLECTION: &'static str = "products";
    const NOT_FOUND: &'static str = "Produit non trouvé";
    const DELETED: &'static str = "Produit supprimé avec succès";
}

/// Fields every new product must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "category", "price", "product_id"];

/// Why a product payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    #[error("Les champs name, category, price et product_id sont requis")]
    MissingFields,
    #[error("L'ID du produit doit être un entier positif")]
    InvalidProductId,
    #[error("Le prix doit être un nombre valide")]
    InvalidPrice,
}

/// A validated product payload, ready for insertion.
///
/// Extra fields are kept as supplied; `price` has been coerced to a float.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    product_id: ProductId,
    price: f64,
    fields: Fields,
}

impl NewProduct {
    /// Validate a free-form body. Checks run in order: presence of the
    /// required fields, then `product_id`, then `price`.
    pub fn from_fields(fields: Fields) -> Result<Self, ProductValidationError> {
        let mut fields = strip_id(fields);

        if !REQUIRED_FIELDS.iter().all(|name| fields.contains_key(*name)) {
            return Err(ProductValidationError::MissingFields);
        }

        let product_id = fields
            .get("product_id")
            .and_then(Value::as_i64)
            .filter(|id| *id > 0)
            .map(ProductId)
            .ok_or(ProductValidationError::InvalidProductId)?;

        let price = fields
            .get("price")
            .and_then(coerce_price)
            .ok_or(ProductValidationError::InvalidPrice)?;
        let number = Number::from_f64(price).ok_or(ProductValidationError::InvalidPrice)?;
        fields.insert("price".into(), Value::Number(number));

        Ok(Self {
            product_id,
            price,
            fields,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

/// Accept numbers and numeric strings; anything non-finite is rejected.
fn coerce_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}
