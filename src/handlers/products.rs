//! Product handlers.
//!
//! Creation is the one validated write path: required fields, a positive
//! integer `product_id` not already in use, and a numeric `price`. Updates
//! are unvalidated merges, so they can reuse an existing `product_id`.

use super::{Deleted, HandlerError};
use crate::document::{strip_id, Fields, Filter, Stored};
use crate::model::{NewProduct, Product, RecordsExt};
use crate::store::DocumentStore;

pub async fn list<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<Stored<Fields>>, HandlerError> {
    super::list::<Product, S>(store).await
}

pub async fn get<S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
) -> Result<Stored<Fields>, HandlerError> {
    super::get::<Product, S>(store, id).await
}

pub async fn create<S: DocumentStore + ?Sized>(
    store: &S,
    body: Fields,
) -> Result<Stored<Fields>, HandlerError> {
    let product = NewProduct::from_fields(body)?;
    let product_id = product.product_id();
    let records = store.records::<Product>();

    let duplicate = Filter::new().eq("product_id", product_id.0);
    if records.find_one(&duplicate).await?.is_some() {
        return Err(HandlerError::Conflict(format!(
            "Un produit avec l'ID {product_id} existe déjà"
        )));
    }

    tracing::info!(%product_id, price = product.price(), "creating product");
    let inserted = records.insert(product.into_fields()).await?;

    let created = records.get(&inserted.id).await?.ok_or_else(|| {
        tracing::error!(%product_id, id = %inserted.id, "created product could not be read back");
        HandlerError::Internal("Erreur lors de la création du produit".into())
    })?;
    tracing::info!(%product_id, id = %created.id, "product created");
    Ok(created)
}

/// Every supplied field overwrites the stored value.
pub async fn update<S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
    body: Fields,
) -> Result<Stored<Fields>, HandlerError> {
    super::update::<Product, S>(store, id, strip_id(body)).await
}

pub async fn delete<S: DocumentStore + ?Sized>(store: &S, id: &str) -> Result<Deleted, HandlerError> {
    super::delete::<Product, S>(store, id).await
}
