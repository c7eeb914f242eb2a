//! Client handlers. Clients are free-form: any JSON object is accepted.

use super::{Deleted, HandlerError};
use crate::document::{strip_id, Fields, Stored};
use crate::model::{Client, RecordsExt};
use crate::store::DocumentStore;

pub async fn list<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<Stored<Fields>>, HandlerError> {
    super::list::<Client, S>(store).await
}

pub async fn get<S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
) -> Result<Stored<Fields>, HandlerError> {
    super::get::<Client, S>(store, id).await
}

pub async fn create<S: DocumentStore + ?Sized>(
    store: &S,
    body: Fields,
) -> Result<Stored<Fields>, HandlerError> {
    let created = store.records::<Client>().insert(strip_id(body)).await?;
    tracing::info!(id = %created.id, "client created");
    Ok(created)
}

/// Every supplied field overwrites the stored value.
pub async fn update<S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
    body: Fields,
) -> Result<Stored<Fields>, HandlerError> {
    super::update::<Client, S>(store, id, strip_id(body)).await
}

pub async fn delete<S: DocumentStore + ?Sized>(store: &S, id: &str) -> Result<Deleted, HandlerError> {
    super::delete::<Client, S>(store, id).await
}
