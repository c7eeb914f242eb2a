//! Invoice handlers.

use serde::Deserialize;
use serde_json::Value;

use super::{Deleted, HandlerError};
use crate::document::{Fields, Filter, Stored};
use crate::model::{ClientId, Invoice, InvoiceCreate, InvoiceUpdate, RecordsExt};
use crate::store::DocumentStore;

/// Invoice search criteria. Every criterion is optional; none returns all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    /// Exact match on the invoice's `client_id`.
    pub client_id: Option<ClientId>,
    /// Inclusive lower bound on `invoice_date`, compared as text. Empty means unbounded.
    pub date_start: Option<String>,
    /// Inclusive upper bound on `invoice_date`, compared as text. Empty means unbounded.
    pub date_end: Option<String>,
}

impl SearchQuery {
    pub fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(client_id) = self.client_id {
            filter = filter.eq("client_id", client_id.0);
        }
        filter.range(
            "invoice_date",
            date_bound(self.date_start.as_deref()),
            date_bound(self.date_end.as_deref()),
        )
    }
}

/// An empty bound is the same as no bound.
fn date_bound(bound: Option<&str>) -> Option<Value> {
    bound
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
}

pub async fn list<S: DocumentStore + ?Sized>(store: &S) -> Result<Vec<Stored<Fields>>, HandlerError> {
    super::list::<Invoice, S>(store).await
}

pub async fn get<S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
) -> Result<Stored<Fields>, HandlerError> {
    super::get::<Invoice, S>(store, id).await
}

pub async fn search<S: DocumentStore + ?Sized>(
    store: &S,
    query: &SearchQuery,
) -> Result<Vec<Stored<Fields>>, HandlerError> {
    let filter = query.to_filter();
    tracing::debug!(?filter, "searching invoices");
    Ok(store.records::<Invoice>().find(&filter).await?)
}

pub async fn create<S: DocumentStore + ?Sized>(
    store: &S,
    invoice: InvoiceCreate,
) -> Result<Stored<Fields>, HandlerError> {
    let invoice_number = invoice.invoice_number.clone();
    let fields = invoice
        .into_fields()
        .map_err(|e| HandlerError::Validation(e.to_string()))?;

    let created = store.records::<Invoice>().insert(fields).await?;
    tracing::info!(id = %created.id, %invoice_number, "invoice created");
    Ok(created)
}

/// Apply the supplied non-null fields; `products` is replaced as a whole.
pub async fn update<S: DocumentStore + ?Sized>(
    store: &S,
    id: &str,
    changes: InvoiceUpdate,
) -> Result<Stored<Fields>, HandlerError> {
    let set = changes
        .into_fields()
        .map_err(|e| HandlerError::Validation(e.to_string()))?;
    super::update::<Invoice, S>(store, id, set).await
}

pub async fn delete<S: DocumentStore + ?Sized>(store: &S, id: &str) -> Result<Deleted, HandlerError> {
    super::delete::<Invoice, S>(store, id).await
}
