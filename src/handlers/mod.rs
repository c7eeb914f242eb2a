//! Collection handlers - one function per operation on each collection.
//!
//! Handlers are plain async functions of `(store, input)`. They know nothing
//! about HTTP; the transport layer maps their [`HandlerError`] to a status
//! code via [`HandlerError::status_code`].
//!
//! ## Example
//!
//! ```ignore
//! use client_ledger::{handlers, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! let created = handlers::products::create(&store, body).await?;
//! let loaded = handlers::products::get(&store, &created.id.to_string()).await?;
//! ```

pub mod clients;
pub mod invoices;
pub mod products;

use serde::Serialize;

use crate::document::{DocumentId, Fields, Stored};
use crate::model::{Model, ProductValidationError, RecordsExt};
use crate::store::{DocumentStore, StoreError};

/// Error type for handler operations.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// No such record, or the identifier is malformed.
    #[error("{0}")]
    NotFound(String),
    /// The payload is missing fields or carries invalid values.
    #[error("{0}")]
    Validation(String),
    /// The payload collides with an existing record.
    #[error("{0}")]
    Conflict(String),
    /// The request itself (query string, body encoding) is unusable.
    #[error("{0}")]
    BadRequest(String),
    /// The document store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// A write succeeded but its result could not be confirmed.
    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::NotFound(_) => 404,
            HandlerError::Validation(_) => 422,
            HandlerError::Conflict(_) => 409,
            HandlerError::BadRequest(_) => 400,
            HandlerError::Store(_) => 500,
            HandlerError::Internal(_) => 500,
        }
    }

    fn not_found<M: Model>() -> Self {
        HandlerError::NotFound(M::NOT_FOUND.to_string())
    }
}

impl From<ProductValidationError> for HandlerError {
    fn from(err: ProductValidationError) -> Self {
        HandlerError::Validation(err.to_string())
    }
}

/// Acknowledgement returned by deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

/// Parse a path identifier; malformed identifiers resolve to nothing.
fn parse_id<M: Model>(id: &str) -> Result<DocumentId, HandlerError> {
    id.parse().map_err(|_| HandlerError::not_found::<M>())
}

async fn list<M: Model, S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Vec<Stored<Fields>>, HandlerError> {
    Ok(store.records::<M>().list().await?)
}

async fn get<M: Model, S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
) -> Result<Stored<Fields>, HandlerError> {
    let id = parse_id::<M>(id)?;
    store
        .records::<M>()
        .get(&id)
        .await?
        .ok_or_else(HandlerError::not_found::<M>)
}

/// Merge `set` into a record and return the record as it now reads.
///
/// A record that matched but did not change is still a success.
async fn update<M: Model, S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
    set: Fields,
) -> Result<Stored<Fields>, HandlerError> {
    let id = parse_id::<M>(id)?;
    let records = store.records::<M>();

    let outcome = records.update(&id, set).await?;
    if !outcome.is_matched() {
        tracing::warn!(collection = M::COLLECTION, %id, "update target not found");
        return Err(HandlerError::not_found::<M>());
    }
    if outcome.modified == 0 {
        tracing::debug!(collection = M::COLLECTION, %id, "update changed nothing");
    }

    records
        .get(&id)
        .await?
        .ok_or_else(HandlerError::not_found::<M>)
}

async fn delete<M: Model, S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
) -> Result<Deleted, HandlerError> {
    let id = parse_id::<M>(id)?;
    if !store.records::<M>().delete(&id).await? {
        tracing::warn!(collection = M::COLLECTION, %id, "delete target not found");
        return Err(HandlerError::not_found::<M>());
    }
    Ok(Deleted {
        message: M::DELETED,
    })
}
